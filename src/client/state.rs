use crate::dto::TaskItem;

/// Whether the user is looking at the list or editing one task's title
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing { task_id: i32, title: String },
}

/// Everything the client holds locally. The task list mirrors the server and only changes in
/// response to completed round trips.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskListState {
    pub tasks: Vec<TaskItem>,
    pub new_task_title: String,
    pub edit_mode: EditMode,
}

/// Transitions of [TaskListState]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// The server's list replaces the local one
    Loaded(Vec<TaskItem>),
    NewTitleChanged(String),
    /// A created task is appended and the new-task input cleared
    Added(TaskItem),
    /// The server's copy of a task replaces the local one with the same ID. Last write wins.
    Replaced(TaskItem),
    Removed(i32),
    /// Enter editing for a task, seeding the buffer with its current title
    EditStarted(i32),
    EditBufferChanged(String),
    EditFinished,
}

impl TaskListState {
    /// Applies a single transition. Actions that don't make sense in the current state
    /// (editing a task that isn't listed, changing the buffer while viewing) leave it unchanged.
    pub fn apply(&mut self, action: TaskAction) {
        match action {
            TaskAction::Loaded(tasks) => self.tasks = tasks,
            TaskAction::NewTitleChanged(title) => self.new_task_title = title,
            TaskAction::Added(task) => {
                self.tasks.push(task);
                self.new_task_title.clear();
            }
            TaskAction::Replaced(task) => {
                if let Some(existing) = self.tasks.iter_mut().find(|existing| existing.id == task.id) {
                    *existing = task;
                }
            }
            TaskAction::Removed(task_id) => {
                self.tasks.retain(|task| task.id != task_id);
                if self.editing_task_id() == Some(task_id) {
                    self.edit_mode = EditMode::Viewing;
                }
            }
            TaskAction::EditStarted(task_id) => {
                if let Some(task) = self.task(task_id) {
                    self.edit_mode = EditMode::Editing {
                        task_id,
                        title: task.title.clone(),
                    };
                }
            }
            TaskAction::EditBufferChanged(new_title) => {
                if let EditMode::Editing { title, .. } = &mut self.edit_mode {
                    *title = new_title;
                }
            }
            TaskAction::EditFinished => self.edit_mode = EditMode::Viewing,
        }
    }

    pub fn task(&self, task_id: i32) -> Option<&TaskItem> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn editing_task_id(&self) -> Option<i32> {
        match self.edit_mode {
            EditMode::Editing { task_id, .. } => Some(task_id),
            EditMode::Viewing => None,
        }
    }
}
