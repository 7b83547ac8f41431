mod app;
mod codepush;
mod model;
mod step;
mod toolbox;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::{AddOptions, App};
use model::config::AppConfig;
use model::project::Project;
use toolbox::{Printer, Toolbox};

/// Wire Microsoft CodePush into a React Native project.
#[derive(Debug, Parser)]
#[command(name = "codepush-install", version, about)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    project: Option<PathBuf>,

    /// Extra configuration file layered over the defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Install CodePush, patch native and JS files, provision cloud apps
    Add {
        /// Answer the README prompt up front
        #[arg(long, value_enum)]
        readme: Option<Answer>,

        /// Reuse the current code-push session
        #[arg(long)]
        skip_login: bool,
    },
    /// Uninstall CodePush and undo the file patches
    Remove,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Answer {
    Yes,
    No,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose)?;

    tracing::info!("codepush-install starting");

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        Printer::stdout().alert(format!("codepush-install error: {e:#}"));
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// File logging only; stdout belongs to the user-facing messages.
fn init_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = directories::ProjectDirs::from("", "", "codepush-install")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&log_dir)?;

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("codepush_install={level}")));

    let file_appender = tracing_appender::rolling::daily(&log_dir, "codepush-install.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .init();

    Ok(guard)
}

fn run(cli: Cli) -> Result<()> {
    let root = match cli.project {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };

    let config = AppConfig::load(cli.config.as_deref())?;
    let project = Project::load(&root)
        .with_context(|| format!("{} is not a React Native project", root.display()))?;
    tracing::info!(
        "project {} at {} (react-native {})",
        project.name,
        project.root.display(),
        project.react_native
    );

    let toolbox = Toolbox::system(&config);
    match cli.command {
        Command::Add { readme, skip_login } => {
            let options = AddOptions {
                readme: readme.map(|answer| matches!(answer, Answer::Yes)),
                skip_login,
            };
            App::new(config, project, toolbox, options).add()
        }
        Command::Remove => App::new(config, project, toolbox, AddOptions::default()).remove(),
    }
}
