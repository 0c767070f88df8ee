//! Headless driver for the scan/export engine.
//!
//! Scans the project directory given on the command line, selects every
//! included file and writes the requested artifacts. This plays the role of
//! the presentation layer: it issues commands and drains the event channel,
//! nothing more.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use code_exporter::app::{commands, events::UserEvent, state::AppState};
use code_exporter::config::AppConfig;
use code_exporter::utils::format_size;

struct CliArgs {
    project_dir: PathBuf,
    contents_out: Option<PathBuf>,
    structure_out: Option<PathBuf>,
    show_excluded: bool,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let project_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => bail!(
            "Usage: code-exporter <project-dir> [--contents FILE] [--structure FILE] [--show-excluded]"
        ),
    };

    let mut cli = CliArgs {
        project_dir,
        contents_out: None,
        structure_out: None,
        show_excluded: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--contents" => {
                cli.contents_out =
                    Some(PathBuf::from(args.next().context("--contents needs a file")?))
            }
            "--structure" => {
                cli.structure_out =
                    Some(PathBuf::from(args.next().context("--structure needs a file")?))
            }
            "--show-excluded" => cli.show_excluded = true,
            other => bail!("Unknown argument: {other}"),
        }
    }
    Ok(cli)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "code_exporter=info".into()),
        )
        .init();

    let cli = parse_args()?;

    let mut config = AppConfig::load().unwrap_or_default();
    config.show_excluded = cli.show_excluded;

    let state = Arc::new(Mutex::new(AppState {
        config,
        ..AppState::default()
    }));

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UserEvent>();

    commands::request_scan(cli.project_dir.clone(), event_tx.clone(), state.clone());

    let mut pending_exports = 0usize;
    while let Some(event) = event_rx.recv().await {
        match event {
            UserEvent::ScanProgress(count) => {
                eprintln!("Scanning... {count} items processed");
            }
            UserEvent::Status(text) => {
                eprintln!("{text}");
            }
            UserEvent::ScanComplete(result) => {
                eprintln!(
                    "Scan complete: {} included, {} excluded, {}",
                    result.included_count,
                    result.excluded_count,
                    format_size(result.total_size)
                );

                commands::select_all(event_tx.clone(), state.clone());
                if let Some(dest) = &cli.contents_out {
                    commands::request_export_contents(dest, event_tx.clone(), state.clone());
                    pending_exports += 1;
                }
                if let Some(dest) = &cli.structure_out {
                    commands::request_export_structure(dest, event_tx.clone(), state.clone());
                    pending_exports += 1;
                }
                if pending_exports == 0 {
                    break;
                }
            }
            UserEvent::ExportComplete(destination) => {
                eprintln!("Saved to {}", destination.display());
                pending_exports -= 1;
                if pending_exports == 0 {
                    break;
                }
            }
            UserEvent::Error(message) => {
                bail!("{message}");
            }
        }
    }

    Ok(())
}
