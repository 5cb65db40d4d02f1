//! Line-based front end for the task list. Each input line is one user action: while a task is
//! being edited, a plain line replaces its title and saves it (the terminal's "Enter"), and
//! `:cancel` or Escape abandons the edit.

use crate::client::controller::TaskListController;
use crate::client::state::{EditMode, TaskListState};
use crate::client::task_api::TaskApi;
use std::fmt::Write;

const ESCAPE: char = '\u{1b}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Add(String),
    Toggle(i32),
    Edit(i32),
    /// Saves the edited task with the given title
    SaveEdit(String),
    CancelEdit,
    Delete(i32),
    Reload,
    Help,
    Quit,
}

/// Problems with a line of console input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command \"{0}\", type \"help\" for a list of commands")]
    UnknownCommand(String),
    #[error("\"{0}\" needs a task ID")]
    MissingId(&'static str),
    #[error("\"{0}\" is not a task ID")]
    InvalidId(String),
}

impl ConsoleCommand {
    /// Interprets one line of input. [editing] decides whether plain text is a new title for the
    /// task being edited or a command.
    pub fn parse(line: &str, editing: bool) -> Result<ConsoleCommand, ParseError> {
        let line = line.trim_end_matches(['\r', '\n']);

        if editing {
            return Ok(match line.trim() {
                ":cancel" => ConsoleCommand::CancelEdit,
                trimmed if trimmed.starts_with(ESCAPE) => ConsoleCommand::CancelEdit,
                _ => ConsoleCommand::SaveEdit(line.to_owned()),
            });
        }

        let trimmed = line.trim();
        let (verb, rest) = trimmed
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((trimmed, ""));

        match verb {
            "add" | "a" => Ok(ConsoleCommand::Add(rest.to_owned())),
            "toggle" | "t" => Ok(ConsoleCommand::Toggle(parse_id("toggle", rest)?)),
            "edit" | "e" => Ok(ConsoleCommand::Edit(parse_id("edit", rest)?)),
            "delete" | "d" => Ok(ConsoleCommand::Delete(parse_id("delete", rest)?)),
            "reload" | "r" | "list" | "ls" => Ok(ConsoleCommand::Reload),
            "help" | "?" | "" => Ok(ConsoleCommand::Help),
            "quit" | "q" | "exit" => Ok(ConsoleCommand::Quit),
            other => Err(ParseError::UnknownCommand(other.to_owned())),
        }
    }
}

fn parse_id(command: &'static str, raw_id: &str) -> Result<i32, ParseError> {
    if raw_id.is_empty() {
        return Err(ParseError::MissingId(command));
    }

    raw_id
        .parse()
        .map_err(|_| ParseError::InvalidId(raw_id.to_owned()))
}

/// Applies a command to the controller. Returns false once the user asked to quit.
pub async fn run_command<A: TaskApi>(
    controller: &mut TaskListController<A>,
    command: ConsoleCommand,
) -> bool {
    match command {
        ConsoleCommand::Add(title) => {
            controller.set_new_task_title(title);
            controller.add().await;
        }
        ConsoleCommand::Toggle(task_id) => controller.toggle(task_id).await,
        ConsoleCommand::Edit(task_id) => controller.start_edit(task_id),
        ConsoleCommand::SaveEdit(title) => {
            controller.set_edit_buffer(title);
            controller.save_edit().await;
        }
        ConsoleCommand::CancelEdit => controller.cancel_edit(),
        ConsoleCommand::Delete(task_id) => controller.delete(task_id).await,
        ConsoleCommand::Reload => controller.load().await,
        ConsoleCommand::Help => {}
        ConsoleCommand::Quit => return false,
    }

    true
}

pub const HELP: &str = "\
Commands:
  add <title>     create a task
  toggle <id>     mark a task done or not done
  edit <id>       start editing a task's title, then type the new title and press Enter
                  (\":cancel\" or Escape abandons the edit)
  delete <id>     delete a task
  reload          fetch the list from the server again
  quit            leave";

/// Renders the task list, one task per line
pub fn render(state: &TaskListState) -> String {
    let mut output = String::from("Tasks\n");
    if state.tasks.is_empty() {
        output.push_str("  (nothing to do)\n");
    }

    for task in &state.tasks {
        match &state.edit_mode {
            EditMode::Editing { task_id, title } if *task_id == task.id => {
                let _ = writeln!(output, "  [{}] > {title}_", task.id);
            }
            _ => {
                let mark = if task.is_done { "✅" } else { "❌" };
                let _ = writeln!(output, "  [{}] {} {mark}", task.id, task.title);
            }
        }
    }

    if let Some(task_id) = state.editing_task_id() {
        let _ = writeln!(output, "Editing task {task_id}: type a new title, or :cancel");
    }

    output
}
