use anyhow::Context;
use dotenv::dotenv;
use task_manager::client::console::{self, ConsoleCommand};
use task_manager::client::{HttpTaskApi, TaskListController};
use task_manager::{app_env, logging};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    logging::setup_console_logging(logging::init_env_filter()?);

    let api_url = app_env::var_or(app_env::TASK_API_URL, app_env::DEFAULT_TASK_API_URL);
    info!("Using task API at {api_url}");
    let api = HttpTaskApi::new(&api_url).context("creating the task API client")?;

    let mut controller = TaskListController::new(api);
    controller.load().await;
    println!("{}", console::HELP);
    println!("{}", console::render(controller.state()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading from stdin")? {
        let editing = controller.state().editing_task_id().is_some();
        let command = match ConsoleCommand::parse(&line, editing) {
            Ok(command) => command,
            Err(parse_err) => {
                println!("{parse_err}");
                continue;
            }
        };

        if command == ConsoleCommand::Help {
            println!("{}", console::HELP);
            continue;
        }
        if !console::run_command(&mut controller, command).await {
            break;
        }
        println!("{}", console::render(controller.state()));
    }

    Ok(())
}
