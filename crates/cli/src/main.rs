//! minipm CLI - project task lists and dependency-aware scheduling.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use minipm_core::{Project, ProjectId, Task, TaskFilter, TaskId, Time};
use minipm_storage::{JsonStorage, Storage};
use minipm_scheduler::{
    MissingDueDate, ScheduleEngine, ScheduleRequest, ScheduleResponse, ScheduleService, SchedulerConfig,
};

#[derive(Parser)]
#[command(name = "minipm")]
#[command(about = "Project task lists with dependency-aware scheduling", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".minipm")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),
    /// Generate a schedule for a project
    Schedule {
        /// Project ID
        project: ProjectId,
        /// JSON request file with the tasks to schedule (default: stored tasks)
        #[arg(long)]
        request: Option<PathBuf>,
        /// Start of the timeline, RFC 3339 (default: now)
        #[arg(long, value_parser = parse_time)]
        start: Option<Time>,
        /// Where tasks without a due date go: first or last
        #[arg(long)]
        missing_due: Option<MissingDueDate>,
        /// Reject dependencies on unknown tasks instead of reporting a deadlock
        #[arg(long)]
        strict_deps: bool,
        /// strftime pattern for start/end times
        #[arg(long)]
        format: Option<String>,
    },
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Add a project
    Add {
        /// Title
        title: String,
        /// Description
        #[arg(long)]
        description: Option<String>,
    },
    /// List projects
    List,
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task to a project
    Add {
        /// Project ID
        #[arg(long)]
        project: ProjectId,
        /// Title
        title: String,
        /// Estimated hours
        #[arg(long, default_value = "0")]
        hours: f64,
        /// Due date, RFC 3339 or YYYY-MM-DD
        #[arg(long, value_parser = parse_time)]
        due: Option<Time>,
        /// Task this one depends on (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Vec<TaskId>,
    },
    /// List a project's tasks
    List {
        /// Project ID
        #[arg(long)]
        project: ProjectId,
    },
    /// Flip a task's completion flag
    Toggle {
        /// Project ID
        #[arg(long)]
        project: ProjectId,
        /// Task ID
        task: TaskId,
    },
    /// Remove a task from a project
    Delete {
        /// Project ID
        #[arg(long)]
        project: ProjectId,
        /// Task ID
        task: TaskId,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("MINIPM_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut storage = JsonStorage::new(&cli.data_dir).await?;

    match cli.command {
        Commands::Project(ProjectCommand::Add { title, description }) => {
            let mut project = Project::new(storage.next_project_id().await?, title);
            project.description = description;
            storage.save_project(&project).await?;
            println!("Added project: {} - {}", project.id, project.title);
        }
        Commands::Project(ProjectCommand::List) => {
            let projects = storage.list_projects().await?;
            println!("Projects ({})", projects.len());
            for project in projects {
                println!("  {} | {}", project.id, project.title);
            }
        }
        Commands::Task(TaskCommand::Add { project, title, hours, due, depends_on }) => {
            if storage.load_project(project).await?.is_none() {
                bail!("Project not found: {}", project);
            }
            let mut task = Task::new(storage.next_task_id().await?, project, title);
            task.estimated_hours = hours;
            task.due_date = due;
            task.dependencies = depends_on;
            storage.save_task(&task).await?;
            println!("Added task: {} - {}", task.id, task.title);
        }
        Commands::Task(TaskCommand::List { project }) => {
            let tasks = storage.list_tasks(&TaskFilter::for_project(project)).await?;
            println!("Tasks ({})", tasks.len());
            for task in tasks {
                println!("  {} | {} | {:>5.1}h | {} | deps {:?} | {}",
                    task.id,
                    if task.is_completed { "DONE" } else { "OPEN" },
                    task.estimated_hours,
                    task.due_date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
                    task.dependencies.iter().map(|d| d.get()).collect::<Vec<_>>(),
                    task.title,
                );
            }
        }
        Commands::Task(TaskCommand::Toggle { project, task }) => {
            let stored = toggle_task(&mut storage, project, task).await?;
            println!("Task {} is now {}", stored.id, if stored.is_completed { "done" } else { "open" });
        }
        Commands::Task(TaskCommand::Delete { project, task }) => {
            let removed = delete_task(&mut storage, project, task).await?;
            println!("Deleted task: {} - {}", removed.id, removed.title);
        }
        Commands::Schedule { project, request, start, missing_due, strict_deps, format } => {
            let mut config = load_config(storage.root()).await?;
            if let Some(policy) = missing_due {
                config.missing_due_date = policy;
            }
            if strict_deps {
                config.reject_unknown_dependencies = true;
            }
            if let Some(format) = format {
                config.time_format = format;
            }
            if config.utc_offset_minutes.is_none() {
                config.utc_offset_minutes = Some(chrono::Local::now().offset().local_minus_utc() / 60);
            }
            debug!(?config, "Scheduler configuration");

            let start = start.unwrap_or_else(Utc::now);
            let service = ScheduleService::new(storage).with_engine(ScheduleEngine::new(config));

            let result = match request {
                Some(path) => {
                    let request = read_request(&path).await?;
                    service.generate(project, &request, start).await
                }
                None => service.generate_from_storage(project, start).await,
            };

            let response = ScheduleResponse::from_result(result);
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            info!(status = ?response.status, code = response.code(), "Schedule request finished");

            if !response.status.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load `task` if it belongs to `project`.
async fn project_task<S: Storage>(storage: &S, project: ProjectId, task: TaskId) -> Result<Task> {
    match storage.load_task(task).await?.filter(|t| t.project_id == project) {
        Some(stored) => Ok(stored),
        None => bail!("Task not found: {}", task),
    }
}

async fn toggle_task<S: Storage>(storage: &mut S, project: ProjectId, task: TaskId) -> Result<Task> {
    let mut stored = project_task(storage, project, task).await?;
    stored.is_completed = !stored.is_completed;
    storage.save_task(&stored).await?;
    Ok(stored)
}

async fn delete_task<S: Storage>(storage: &mut S, project: ProjectId, task: TaskId) -> Result<Task> {
    let stored = project_task(storage, project, task).await?;
    storage.delete_task(stored.id).await?;
    info!(task_id = %stored.id, project_id = %project, "Deleted task");
    Ok(stored)
}

/// Read `config.json` from the data directory, or fall back to defaults.
async fn load_config(root: &Path) -> Result<SchedulerConfig> {
    let path = root.join("config.json");
    match tokio::fs::read_to_string(&path).await {
        Ok(json) => serde_json::from_str(&json).with_context(|| format!("Invalid config: {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SchedulerConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

async fn read_request(path: &Path) -> Result<ScheduleRequest> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid schedule request: {}", path.display()))
}

/// Parse RFC 3339, or a bare date as midnight UTC.
fn parse_time(s: &str) -> std::result::Result<Time, String> {
    if let Ok(time) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid date/time: {s} (expected RFC 3339 or YYYY-MM-DD)"))
}
