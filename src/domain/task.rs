use crate::domain;
use crate::domain::task::driven_ports::{TaskReader, TaskWriter};
use crate::domain::task::driving_ports::TaskError;
use crate::domain::user::driven_ports::DetectUser;
use crate::external_connections::{ExternalConnectivity, Transactable, TransactionHandle};
use anyhow::Context;
use tracing::warn;

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TaskItem {
    pub id: i32,
    pub title: String,
    pub is_done: bool,
    pub user_id: i32,
}

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct NewTask {
    pub title: String,
    pub is_done: bool,
    pub user_id: i32,
}

/// Replacement content for every mutable field of an existing task
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct UpdateTask {
    pub title: String,
    pub is_done: bool,
    pub user_id: i32,
}

pub mod driven_ports {
    use super::*;

    pub trait TaskReader {
        /// Every task, in storage order
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TaskItem>, anyhow::Error>;
        async fn task_by_id(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TaskItem>, anyhow::Error>;
    }

    pub trait TaskWriter {
        async fn create_task(
            &self,
            new_task: &NewTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TaskItem, anyhow::Error>;

        /// Replaces the task's content, returning the stored record or None if no task has the ID
        async fn update_task(
            &self,
            task_id: i32,
            update: &UpdateTask,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TaskItem>, anyhow::Error>;

        /// Removes the task, returning false if no task had the ID
        async fn delete_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<bool, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TaskError {
        #[error("user {0} does not exist")]
        UserDoesNotExist(i32),
        #[error("task {0} does not exist")]
        TaskDoesNotExist(i32),
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    impl From<domain::user::UserExistsErr> for TaskError {
        fn from(value: domain::user::UserExistsErr) -> Self {
            match value {
                domain::user::UserExistsErr::UserDoesNotExist(user_id) => {
                    warn!("User {} didn't exist when writing a task.", user_id);
                    TaskError::UserDoesNotExist(user_id)
                }
                domain::user::UserExistsErr::PortError(err) => {
                    TaskError::from(err.context("verifying task owner"))
                }
            }
        }
    }


    pub trait TaskPort {
        async fn all_tasks(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            task_read: &impl TaskReader,
        ) -> Result<Vec<TaskItem>, TaskError>;
        async fn task_by_id(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            task_read: &impl TaskReader,
        ) -> Result<TaskItem, TaskError>;
        async fn create_task(
            &self,
            new_task: &NewTask,
            ext_cxn: &impl Transactable,
            u_detect: &impl DetectUser,
            task_write: &impl TaskWriter,
        ) -> Result<TaskItem, TaskError>;
        async fn update_task(
            &self,
            task_id: i32,
            update: &UpdateTask,
            ext_cxn: &impl Transactable,
            u_detect: &impl DetectUser,
            task_read: &impl TaskReader,
            task_write: &impl TaskWriter,
        ) -> Result<TaskItem, TaskError>;
        async fn delete_task(
            &self,
            task_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            task_write: &impl TaskWriter,
        ) -> Result<(), TaskError>;
    }
}

pub struct TaskService {}

impl driving_ports::TaskPort for TaskService {
    async fn all_tasks(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<Vec<TaskItem>, TaskError> {
        let tasks = task_read
            .all_tasks(&mut *ext_cxn)
            .await
            .context("listing tasks")?;

        Ok(tasks)
    }

    async fn task_by_id(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        task_read: &impl TaskReader,
    ) -> Result<TaskItem, TaskError> {
        task_read
            .task_by_id(task_id, &mut *ext_cxn)
            .await
            .context("fetching a task")?
            .ok_or(TaskError::TaskDoesNotExist(task_id))
    }

    async fn create_task(
        &self,
        new_task: &NewTask,
        ext_cxn: &impl Transactable,
        u_detect: &impl DetectUser,
        task_write: &impl TaskWriter,
    ) -> Result<TaskItem, TaskError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("starting transaction to create a task")?;

        domain::user::verify_user_exists(new_task.user_id, &mut txn, u_detect).await?;
        let created_task = task_write
            .create_task(new_task, &mut txn)
            .await
            .context("creating a task")?;
        txn.commit().await.context("committing a new task")?;

        Ok(created_task)
    }

    async fn update_task(
        &self,
        task_id: i32,
        update: &UpdateTask,
        ext_cxn: &impl Transactable,
        u_detect: &impl DetectUser,
        task_read: &impl TaskReader,
        task_write: &impl TaskWriter,
    ) -> Result<TaskItem, TaskError> {
        let mut txn = ext_cxn
            .start_transaction()
            .await
            .context("starting transaction to update a task")?;

        // A missing task is reported before anything about the new owner
        task_read
            .task_by_id(task_id, &mut txn)
            .await
            .context("looking up the task to update")?
            .ok_or(TaskError::TaskDoesNotExist(task_id))?;
        domain::user::verify_user_exists(update.user_id, &mut txn, u_detect).await?;
        let updated_task = task_write
            .update_task(task_id, update, &mut txn)
            .await
            .context("updating a task")?
            .ok_or(TaskError::TaskDoesNotExist(task_id))?;
        txn.commit().await.context("committing a task update")?;

        Ok(updated_task)
    }

    async fn delete_task(
        &self,
        task_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        task_write: &impl TaskWriter,
    ) -> Result<(), TaskError> {
        let removed = task_write
            .delete_task(task_id, &mut *ext_cxn)
            .await
            .context("deleting a task")?;

        if removed {
            Ok(())
        } else {
            Err(TaskError::TaskDoesNotExist(task_id))
        }
    }
}
