//! CLI entrypoint for sleep-tracker
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use sleep_application::{BehaviorConfig, NightStore, SystemClock};
use sleep_infrastructure::{
    ConfigLoader, FileConfig, InMemoryNightStore, JsonFileNightStore, StoreBackend,
};
use sleep_presentation::{
    Cli, Command, TrackerAction, TrackerPresenter, TrackerRepl, TrackerRunner,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

/// Install the subscriber; the guard must outlive `main` when logging to a file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let (writer, guard) = file_writer(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Non-blocking writer appending to `path`; lines are flushed when the guard drops.
fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn tracker_action(command: &Command) -> Option<TrackerAction> {
    match command {
        Command::Repl => None,
        Command::Start => Some(TrackerAction::Start),
        Command::Stop => Some(TrackerAction::Stop),
        Command::Clear => Some(TrackerAction::Clear),
        Command::History => Some(TrackerAction::History),
        Command::Rate { quality } => Some(TrackerAction::Rate(*quality)),
    }
}

/// Run the requested command against the chosen store.
///
/// Returns `false` when a one-shot action failed.
async fn run<S: NightStore + 'static>(
    store: Arc<S>,
    action: Option<TrackerAction>,
    behavior: BehaviorConfig,
    presenter: TrackerPresenter,
) -> Result<bool> {
    let clock = Arc::new(SystemClock);

    match action {
        Some(action) => {
            let runner = TrackerRunner::new(store, clock, behavior, presenter);
            let output = runner.execute(action).await;
            for line in &output.lines {
                println!("{}", line);
            }
            Ok(output.success)
        }
        None => {
            let repl = TrackerRepl::new(store, clock, behavior, presenter);
            repl.run().await.context("tracker REPL failed")?;
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;
    info!("Starting sleep-tracker");

    let config = load_config(&cli)?;
    if !config.display.color {
        colored::control::set_override(false);
    }

    let behavior = config.behavior_config();
    let presenter = TrackerPresenter::new(config.display_config());
    let action = cli.command.as_ref().and_then(tracker_action);

    // === Dependency Injection ===
    let backend = if cli.memory {
        StoreBackend::Memory
    } else if cli.store.is_some() {
        StoreBackend::File
    } else {
        config.store.parse_backend()
    };

    let success = match backend {
        StoreBackend::Memory => {
            info!("Using in-memory store");
            let store = Arc::new(InMemoryNightStore::new());
            run(store, action, behavior, presenter).await?
        }
        StoreBackend::File => {
            let path = match cli.store.clone().or_else(|| config.store.expanded_path()) {
                Some(path) => path,
                None => match JsonFileNightStore::default_path() {
                    Some(path) => path,
                    None => bail!("no data directory found; pass --store <PATH>"),
                },
            };
            info!(path = %path.display(), "Using JSON file store");
            let store = JsonFileNightStore::open(path.clone())
                .await
                .with_context(|| format!("failed to open store {}", path.display()))?;
            run(Arc::new(store), action, behavior, presenter).await?
        }
    };

    // Returning lets `_log_guard` flush the file writer
    Ok(exit_code(success))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_log_is_flushed_when_guard_drops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("tracker.log");

        let (writer, guard) = file_writer(&path).unwrap();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(writer)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("stop failed: disk full");
        });
        drop(guard);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("stop failed: disk full"));
    }

    #[test]
    fn test_failed_action_maps_to_failure_code() {
        assert_eq!(format!("{:?}", exit_code(false)), format!("{:?}", ExitCode::FAILURE));
        assert_eq!(format!("{:?}", exit_code(true)), format!("{:?}", ExitCode::SUCCESS));
    }
}
