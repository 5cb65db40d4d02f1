use crate::client::state::{EditMode, TaskAction, TaskListState};
use crate::client::task_api::TaskApi;
use crate::domain::DEFAULT_USER_ID;
use crate::dto::{NewTask, TaskItem};
use tracing::{error, warn};

/// Drives a [TaskListState] from user actions. Each action makes at most one API call, and the
/// local list only changes once that call has succeeded. Failures are logged and leave state as
/// it was.
pub struct TaskListController<A: TaskApi> {
    api: A,
    state: TaskListState,
}

impl<A: TaskApi> TaskListController<A> {
    pub fn new(api: A) -> Self {
        TaskListController {
            api,
            state: TaskListState::default(),
        }
    }

    pub fn state(&self) -> &TaskListState {
        &self.state
    }

    /// Fetches the full list from the server, replacing whatever is held locally
    pub async fn load(&mut self) {
        match self.api.list_tasks().await {
            Ok(tasks) => self.state.apply(TaskAction::Loaded(tasks)),
            Err(api_err) => error!("Failed to load tasks: {api_err}"),
        }
    }

    pub fn set_new_task_title(&mut self, title: impl Into<String>) {
        self.state.apply(TaskAction::NewTitleChanged(title.into()));
    }

    /// Creates a task from the new-task input, sent as typed. Input that is blank once trimmed is
    /// ignored without contacting the server.
    pub async fn add(&mut self) {
        if self.state.new_task_title.trim().is_empty() {
            return;
        }

        let new_task = NewTask {
            title: self.state.new_task_title.clone(),
            is_done: false,
            user_id: DEFAULT_USER_ID,
        };
        match self.api.create_task(&new_task).await {
            Ok(created) => self.state.apply(TaskAction::Added(created)),
            Err(api_err) => error!("Failed to create task: {api_err}"),
        }
    }

    /// Flips a task's done flag
    pub async fn toggle(&mut self, task_id: i32) {
        let Some(task) = self.state.task(task_id) else {
            warn!("Asked to toggle task {task_id}, which isn't in the list");
            return;
        };

        let toggled = TaskItem {
            is_done: !task.is_done,
            ..task.clone()
        };
        self.replace(&toggled).await;
    }

    pub fn start_edit(&mut self, task_id: i32) {
        self.state.apply(TaskAction::EditStarted(task_id));
    }

    pub fn set_edit_buffer(&mut self, title: impl Into<String>) {
        self.state.apply(TaskAction::EditBufferChanged(title.into()));
    }

    /// Saves the edit buffer as the edited task's title. Editing only ends when the save succeeds,
    /// so a rejected title (e.g. an empty one) can be corrected or cancelled.
    pub async fn save_edit(&mut self) {
        let EditMode::Editing { task_id, title } = &self.state.edit_mode else {
            return;
        };
        let (task_id, title) = (*task_id, title.clone());

        let Some(task) = self.state.task(task_id) else {
            warn!("Task {task_id} disappeared while it was being edited");
            self.state.apply(TaskAction::EditFinished);
            return;
        };

        let renamed = TaskItem {
            title,
            ..task.clone()
        };
        if self.replace(&renamed).await {
            self.state.apply(TaskAction::EditFinished);
        }
    }

    /// Leaves editing without saving. The task keeps its previous title.
    pub fn cancel_edit(&mut self) {
        self.state.apply(TaskAction::EditFinished);
    }

    pub async fn delete(&mut self, task_id: i32) {
        match self.api.delete_task(task_id).await {
            Ok(()) => self.state.apply(TaskAction::Removed(task_id)),
            Err(api_err) => error!("Failed to delete task {task_id}: {api_err}"),
        }
    }

    async fn replace(&mut self, task: &TaskItem) -> bool {
        match self.api.update_task(task).await {
            Ok(updated) => {
                self.state.apply(TaskAction::Replaced(updated));
                true
            }
            Err(api_err) => {
                error!("Failed to update task {}: {api_err}", task.id);
                false
            }
        }
    }
}
