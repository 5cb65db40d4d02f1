use crate::domain;
use crate::domain::user::TaskUser;
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{query, query_scalar};

pub struct DbDetectUser;

impl domain::user::driven_ports::DetectUser for DbDetectUser {
    async fn user_exists(&self, user_id: i32, ext_cxn: &mut impl ExternalConnectivity) -> Result<bool, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let exists: bool = query_scalar("SELECT EXISTS(SELECT 1 FROM users u WHERE u.id = $1)")
            .bind(user_id)
            .fetch_one(connection.borrow_connection())
            .await
            .context("Detecting user with ID")?;

        Ok(exists)
    }
}

pub struct DbUserSeeder;

impl domain::user::driven_ports::UserSeeder for DbUserSeeder {
    async fn insert_user_with_id(
        &self,
        user: &TaskUser,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        let result = query(
            "INSERT INTO users(id, email, password_hash) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(connection.borrow_connection())
        .await
        .context("Inserting user with a fixed ID")?;

        Ok(result.rows_affected() > 0)
    }

    async fn sync_user_id_sequence(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<(), Error> {
        let mut connection = ext_cxn.database_cxn().await?;

        query("SELECT setval(pg_get_serial_sequence('users', 'id'), (SELECT COALESCE(MAX(u.id), 1) FROM users u))")
            .execute(connection.borrow_connection())
            .await
            .context("Advancing the user ID sequence")?;

        Ok(())
    }
}
