use crate::domain::user::driving_ports::SeedError;
use crate::external_connections::{ExternalConnectivity, Transactable, TransactionHandle};
use anyhow::Context;
use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use rand::RngCore;
use thiserror::Error;
use tracing::info;

/// A user that owns tasks. The password is only ever held as an Argon2 PHC string.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TaskUser {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
}

/// Credentials for the user guaranteed to exist after startup
pub struct SeedUser {
    pub id: i32,
    pub email: String,
    pub password: String,
}

/// Result of running the seed step
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum SeedOutcome {
    Inserted,
    AlreadyPresent,
}

pub mod driven_ports {
    use super::*;

    pub trait DetectUser {
        async fn user_exists(
            &self,
            user_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }

    pub trait UserSeeder {
        /// Inserts the user with its ID as given. Returns false without writing anything
        /// if a user with that ID is already present.
        async fn insert_user_with_id(
            &self,
            user: &TaskUser,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;

        /// Moves the user ID generator past every existing ID, so users inserted with an
        /// explicit ID never collide with generated ones
        async fn sync_user_id_sequence(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    #[derive(Debug, Error)]
    pub enum SeedError {
        #[error("could not hash the seed user's password: {0}")]
        Hashing(argon2::password_hash::Error),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    pub trait UserPort {
        async fn seed_user(
            &self,
            seed: &SeedUser,
            ext_cxn: &impl Transactable,
            u_detect: &impl driven_ports::DetectUser,
            u_seed: &impl driven_ports::UserSeeder,
        ) -> Result<SeedOutcome, SeedError>;
    }
}

pub struct UserService {}

impl driving_ports::UserPort for UserService {
    async fn seed_user(
        &self,
        seed: &SeedUser,
        ext_cxn: &impl Transactable,
        u_detect: &impl driven_ports::DetectUser,
        u_seed: &impl driven_ports::UserSeeder,
    ) -> Result<SeedOutcome, SeedError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("starting the seed transaction")?;

        let already_seeded = u_detect
            .user_exists(seed.id, &mut txn)
            .await
            .context("looking up the seed user")?;
        if already_seeded {
            info!("Seed user already present");
            return Ok(SeedOutcome::AlreadyPresent);
        }

        let user = TaskUser {
            id: seed.id,
            email: seed.email.clone(),
            password_hash: hash_password(&seed.password).map_err(SeedError::Hashing)?,
        };
        let inserted = u_seed
            .insert_user_with_id(&user, &mut txn)
            .await
            .context("inserting the seed user")?;
        u_seed
            .sync_user_id_sequence(&mut txn)
            .await
            .context("advancing the user id sequence")?;
        txn.commit().await.context("committing the seed user")?;

        if inserted {
            info!("Seeded user {}", seed.email);
            Ok(SeedOutcome::Inserted)
        } else {
            // Another instance won the race between the lookup and the insert
            Ok(SeedOutcome::AlreadyPresent)
        }
    }
}

/// Hashes a password with Argon2 using a fresh random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Checks a password against a hash produced by [hash_password]. Malformed hashes never match.
#[cfg(test)]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[derive(Debug, Error)]
pub(super) enum UserExistsErr {
    #[error("user with ID {0} does not exist")]
    UserDoesNotExist(i32),

    #[error(transparent)]
    PortError(#[from] anyhow::Error),
}

pub(super) async fn verify_user_exists(
    id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    user_detect: &impl driven_ports::DetectUser,
) -> Result<(), UserExistsErr> {
    let does_user_exist = user_detect.user_exists(id, ext_cxn).await?;

    if does_user_exist {
        Ok(())
    } else {
        Err(UserExistsErr::UserDoesNotExist(id))
    }
}
