use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use client_core::{
    DirectoryController, DirectoryError, EmployeeForm, EmployeeService, HeadlessPresenter,
    HttpEmployeeService,
};
use shared::domain::{Employee, EmployeeDraft, EmployeeId, Surface};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod settings;
mod terminal;

use settings::load_settings;
use terminal::{render_table, StderrNotifier, TerminalPresenter};

#[derive(Parser, Debug)]
#[command(name = "directory", about = "Browse and maintain the employee directory")]
struct Args {
    /// Base url of the employee service; overrides directory.toml and the environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Print employee lists as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default).
    Shell,
    #[command(flatten)]
    Once(OnceCommand),
}

/// Commands that run one operation and exit; surfaces are not shown.
#[derive(Subcommand, Debug)]
enum OnceCommand {
    List,
    Search {
        key: String,
    },
    Add(NewEmployee),
    Update {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: FieldOverrides,
    },
    Delete {
        #[arg(long)]
        id: Option<i64>,
    },
}

#[derive(ClapArgs, Debug)]
struct NewEmployee {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    job_title: String,
    #[arg(long, default_value = "")]
    image_url: String,
}

#[derive(ClapArgs, Debug)]
struct FieldOverrides {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    job_title: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
}

impl FieldOverrides {
    fn apply(self, employee: &mut Employee) {
        if let Some(v) = self.name {
            employee.name = v;
        }
        if let Some(v) = self.email {
            employee.email = v;
        }
        if let Some(v) = self.phone {
            employee.phone = v;
        }
        if let Some(v) = self.job_title {
            employee.job_title = v;
        }
        if let Some(v) = self.image_url {
            employee.image_url = v;
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let settings = load_settings();
    init_tracing(&settings.log_filter);

    let api_url = args.server_url.clone().unwrap_or(settings.api_url);
    let service: Arc<dyn EmployeeService> = Arc::new(HttpEmployeeService::with_timeout(
        &api_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?);
    info!(%api_url, "directory client ready");

    let outcome = match args.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let presenter = Arc::new(TerminalPresenter::default());
            let controller =
                DirectoryController::new(service, presenter.clone(), Arc::new(StderrNotifier));
            run_shell(&controller, &presenter, args.json).await
        }
        Command::Once(command) => {
            let controller = DirectoryController::new(
                service,
                Arc::new(HeadlessPresenter),
                Arc::new(StderrNotifier),
            );
            run(command, &controller, args.json).await
        }
    };
    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already shown to the user by the notifier.
        Err(err) if err.downcast_ref::<DirectoryError>().is_some() => {
            debug!(error = %err, "command failed");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: OnceCommand, controller: &DirectoryController, json: bool) -> Result<()> {
    match command {
        OnceCommand::List => {
            controller.reload().await?;
            print_employees(&controller.displayed().await, json)?;
        }
        OnceCommand::Search { key } => {
            controller.reload().await?;
            controller.search(&key).await?;
            print_employees(&controller.displayed().await, json)?;
        }
        OnceCommand::Add(new) => {
            let mut form = EmployeeForm::from(EmployeeDraft {
                name: new.name,
                email: new.email,
                phone: new.phone,
                job_title: new.job_title,
                image_url: new.image_url,
            });
            controller.open_add().await;
            controller.create(&mut form).await?;
            print_employees(&controller.displayed().await, json)?;
        }
        OnceCommand::Update { id, fields } => {
            controller.reload().await?;
            let Some(mut employee) = find_employee(&controller.directory().await, id) else {
                bail!("no employee with id {id}");
            };
            controller.open_edit(&employee).await;
            fields.apply(&mut employee);
            controller.update(&employee).await?;
            print_employees(&controller.displayed().await, json)?;
        }
        OnceCommand::Delete { id } => {
            controller.reload().await?;
            let directory = controller.directory().await;
            if let Some(employee) = id.and_then(|id| find_employee(&directory, id)) {
                controller.open_delete(&employee).await;
            }
            controller.remove(id.map(EmployeeId)).await?;
            print_employees(&controller.displayed().await, json)?;
        }
    }
    Ok(())
}

fn find_employee(employees: &[Employee], id: i64) -> Option<Employee> {
    employees
        .iter()
        .find(|employee| employee.id == Some(EmployeeId(id)))
        .cloned()
}

fn print_employees(employees: &[Employee], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(employees)?);
    } else {
        print!("{}", render_table(employees));
    }
    Ok(())
}

const SHELL_HELP: &str = "\
commands:
  list             reload and show every employee
  search [KEY]     filter by name, email, phone or job title
  add              open the add form
  edit ID          edit the employee with ID
  delete ID        delete the employee with ID
  quit";

async fn run_shell(
    controller: &DirectoryController,
    presenter: &TerminalPresenter,
    json: bool,
) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut add_form = EmployeeForm::default();

    if controller.reload().await.is_ok() {
        print_employees(&controller.displayed().await, json)?;
    }

    loop {
        write_prompt("> ").await?;
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        // Failed operations were already reported through the notifier.
        match cmd {
            "" => continue,
            "list" => {
                if controller.reload().await.is_ok() {
                    print_employees(&controller.displayed().await, json)?;
                }
            }
            "search" => {
                if controller.search(rest).await.is_ok() {
                    print_employees(&controller.displayed().await, json)?;
                }
            }
            mode @ ("add" | "edit" | "delete") => {
                let surface = mode.parse::<Surface>()?;
                let subject = if surface == Surface::Add {
                    None
                } else {
                    let Some(employee) = shell_target(controller, rest).await else {
                        eprintln!("usage: {mode} ID (an id from the current list)");
                        continue;
                    };
                    Some(employee)
                };
                controller.open_surface(subject.as_ref(), surface).await;
            }
            "help" => println!("{SHELL_HELP}"),
            "quit" | "exit" => break,
            other => eprintln!("unknown command `{other}`; try `help`"),
        }

        if let Some(surface) = presenter.take_pending() {
            show_surface(surface, controller, &mut lines, &mut add_form, json).await?;
        }
    }
    Ok(())
}

async fn shell_target(controller: &DirectoryController, raw_id: &str) -> Option<Employee> {
    let id = raw_id.parse::<i64>().ok()?;
    find_employee(&controller.displayed().await, id)
}

async fn show_surface(
    surface: Surface,
    controller: &DirectoryController,
    lines: &mut Lines<BufReader<Stdin>>,
    add_form: &mut EmployeeForm,
    json: bool,
) -> Result<()> {
    match surface {
        Surface::Add => {
            add_form.name = prompt_field(lines, "name", &add_form.name).await?;
            add_form.email = prompt_field(lines, "email", &add_form.email).await?;
            add_form.phone = prompt_field(lines, "phone", &add_form.phone).await?;
            add_form.job_title = prompt_field(lines, "job title", &add_form.job_title).await?;
            add_form.image_url = prompt_field(lines, "image url", &add_form.image_url).await?;
            if controller.create(add_form).await.is_ok() {
                print_employees(&controller.displayed().await, json)?;
            }
        }
        Surface::Edit => {
            let Some(selected) = controller.edit_selection().await else {
                return Ok(());
            };
            let mut edited = selected.clone();
            edited.name = prompt_field(lines, "name", &selected.name).await?;
            edited.email = prompt_field(lines, "email", &selected.email).await?;
            edited.phone = prompt_field(lines, "phone", &selected.phone).await?;
            edited.job_title = prompt_field(lines, "job title", &selected.job_title).await?;
            edited.image_url = prompt_field(lines, "image url", &selected.image_url).await?;
            if controller.update(&edited).await.is_ok() {
                print_employees(&controller.displayed().await, json)?;
            }
        }
        Surface::Delete => {
            let Some(selected) = controller.delete_selection().await else {
                return Ok(());
            };
            let answer = prompt_field(lines, &format!("delete {}? [y/N]", selected.name), "")
                .await?;
            if answer.eq_ignore_ascii_case("y") && controller.remove(selected.id).await.is_ok() {
                print_employees(&controller.displayed().await, json)?;
            }
        }
    }
    Ok(())
}

async fn write_prompt(text: &str) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Reads one line; an empty answer keeps `current`.
async fn prompt_field(
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
    current: &str,
) -> Result<String> {
    if current.is_empty() {
        write_prompt(&format!("{label}: ")).await?;
    } else {
        write_prompt(&format!("{label} [{current}]: ")).await?;
    }
    let line = lines
        .next_line()
        .await
        .context("failed to read stdin")?
        .unwrap_or_default();
    let line = line.trim();
    Ok(if line.is_empty() {
        current.to_string()
    } else {
        line.to_string()
    })
}
