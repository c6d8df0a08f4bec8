//! Command line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use rosey_sync::{
    BatchReport,
    Workspace,
    config::ConfigManager,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rosey-sync", version, about = "Sync Rosey translation files with content blocks")]
struct Cli {
    /// Project root containing `rosey/` and `.rosey-sync.json`
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate translation files for every locale and delete stale ones
    Generate,
    /// Write translations back into content blocks
    Sync,
    /// Generate, then sync
    All,
    /// Log the translations stored in a page's content blocks
    Inspect {
        #[arg(long, value_name = "PAGE")]
        page: String,
        #[arg(long, value_name = "LOCALE")]
        locale: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config_manager = ConfigManager::new();
    if let Err(error) = config_manager.load_settings(cli.root) {
        tracing::error!(%error, "Failed to load settings");
        return ExitCode::FAILURE;
    }
    let workspace = Workspace::from_config(&config_manager);
    tracing::info!(
        root = %workspace.root().display(),
        locales = ?workspace.settings().locales,
        "Workspace ready"
    );

    if let Command::Inspect { page, locale } = &cli.command {
        return match workspace.inspect(page, locale).await {
            Ok(found) => {
                tracing::info!(page = %page, locale = %locale, count = found.len(), "Inspection finished");
                ExitCode::SUCCESS
            }
            Err(error) => {
                tracing::error!(%error, "Inspection failed");
                ExitCode::FAILURE
            }
        };
    }

    let inputs = match workspace.load_inputs().await {
        Ok(inputs) => inputs,
        Err(error) => {
            tracing::error!(%error, "Failed to load canonical inputs");
            return ExitCode::FAILURE;
        }
    };

    let mut report = BatchReport::new();
    if matches!(cli.command, Command::Generate | Command::All) {
        report.merge(workspace.generate(&inputs).await);
    }
    if matches!(cli.command, Command::Sync | Command::All) {
        report.merge(workspace.resync_content(&inputs).await);
    }

    for failure in &report.failures {
        tracing::warn!(scope = %failure.scope, error = %failure.error, "Failed");
    }
    tracing::info!(summary = %report.summary(), "Done");
    ExitCode::SUCCESS
}
