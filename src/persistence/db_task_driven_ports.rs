use crate::domain;
use crate::domain::task::{NewTask, TaskItem, UpdateTask};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use sqlx::{FromRow, query, query_as};

#[derive(FromRow)]
struct TaskRow {
    id: i32,
    title: String,
    is_done: bool,
    user_id: i32,
}

impl From<TaskRow> for TaskItem {
    fn from(value: TaskRow) -> Self {
        TaskItem {
            id: value.id,
            title: value.title,
            is_done: value.is_done,
            user_id: value.user_id,
        }
    }
}

pub struct DbTaskReader;

impl domain::task::driven_ports::TaskReader for DbTaskReader {
    async fn all_tasks(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<TaskItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let tasks: Vec<TaskItem> = query_as::<_, TaskRow>(
            "SELECT t.id, t.title, t.is_done, t.user_id FROM tasks t ORDER BY t.id",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all tasks")?
        .into_iter()
        .map(TaskItem::from)
        .collect();

        Ok(tasks)
    }

    async fn task_by_id(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TaskItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let task = query_as::<_, TaskRow>(
            "SELECT t.id, t.title, t.is_done, t.user_id FROM tasks t WHERE t.id = $1",
        )
        .bind(task_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to fetch a task by ID")?
        .map(TaskItem::from);

        Ok(task)
    }
}

pub struct DbTaskWriter;

impl domain::task::driven_ports::TaskWriter for DbTaskWriter {
    async fn create_task(
        &self,
        new_task: &NewTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TaskItem, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let created = query_as::<_, TaskRow>(
            "INSERT INTO tasks(title, is_done, user_id) VALUES ($1, $2, $3) \
             RETURNING id, title, is_done, user_id",
        )
        .bind(&new_task.title)
        .bind(new_task.is_done)
        .bind(new_task.user_id)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new task into the database")?;

        Ok(created.into())
    }

    async fn update_task(
        &self,
        task_id: i32,
        update: &UpdateTask,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TaskItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let updated = query_as::<_, TaskRow>(
            "UPDATE tasks SET title = $1, is_done = $2, user_id = $3 WHERE id = $4 \
             RETURNING id, title, is_done, user_id",
        )
        .bind(&update.title)
        .bind(update.is_done)
        .bind(update.user_id)
        .bind(task_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a task in the database")?;

        Ok(updated.map(TaskItem::from))
    }

    async fn delete_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<bool, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let result = query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a task from the database")?;

        Ok(result.rows_affected() > 0)
    }
}
