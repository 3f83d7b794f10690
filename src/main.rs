//! project-pulse CLI
//!
//! Runs the analytics engine over a snapshot file: progress rollup,
//! timeline layout, and risk alerts, plus acknowledge/snooze maintenance of
//! the suppression store. The snapshot file stands in for the data-fetch
//! collaborator that assembles entity trees in the full application.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use project_pulse::alerts::suppression::SuppressionStore;
use project_pulse::cli::{Cli, Command};
use project_pulse::config::EngineConfig;
use project_pulse::engine::{Snapshot, compute};
use project_pulse::format::{
    OutputFormat, format_alerts_markdown, format_progress_markdown, format_timeline_markdown,
    format_upcoming_markdown,
};
use project_pulse::progress::project_report;
use project_pulse::timeline::project_timeline;
use project_pulse::types::{Viewer, now_ms};
use serde_json::json;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("installing tracing subscriber")?;
    Ok(())
}

/// Resolve the suppression store path: explicit flag, else a per-user
/// default under the home directory.
fn store_path(explicit: Option<&str>) -> Result<PathBuf> {
    let path = match explicit {
        Some(p) => PathBuf::from(p),
        None => dirs::home_dir()
            .ok_or_else(|| anyhow!("cannot determine home directory; pass --store"))?
            .join(".project-pulse")
            .join("suppressions.db"),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating store directory {}", parent.display()))?;
    }
    Ok(path)
}

fn load_snapshot(path: Option<&str>, project: Option<&str>) -> Result<Snapshot> {
    let path = path.ok_or_else(|| anyhow!("--snapshot is required for this command"))?;
    let snapshot = Snapshot::from_json_file(path)?;
    match project {
        Some(id) => Ok(snapshot.for_project(id)?),
        None => Ok(snapshot),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let format = OutputFormat::from_str(&cli.format)
        .ok_or_else(|| anyhow!("unknown output format: {}", cli.format))?;
    let config = EngineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Progress { project } => {
            let snapshot = load_snapshot(cli.snapshot.as_deref(), project.as_deref())?;
            let reports: Vec<_> = snapshot.projects.iter().map(project_report).collect();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
                OutputFormat::Markdown => {
                    for report in &reports {
                        print!("{}", format_progress_markdown(report));
                    }
                }
            }
        }

        Command::Timeline { project } => {
            let snapshot = load_snapshot(cli.snapshot.as_deref(), project.as_deref())?;
            let today = now_ms();
            let views: Vec<_> = snapshot
                .projects
                .iter()
                .map(|p| project_timeline(p, today, &config))
                .collect();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&views)?),
                OutputFormat::Markdown => {
                    for view in &views {
                        print!("{}", format_timeline_markdown(view));
                    }
                }
            }
        }

        Command::Alerts {
            uid,
            role,
            project,
            upcoming,
        } => {
            let snapshot = load_snapshot(cli.snapshot.as_deref(), project.as_deref())?;
            let store = SuppressionStore::open_or_default(store_path(cli.store.as_deref())?);
            let viewer = Viewer::new(role.into(), uid);
            let result = compute(&snapshot, &viewer, &store, now_ms(), &config);

            match format {
                OutputFormat::Json => {
                    let mut body = json!({
                        "alerts": result.alerts,
                        "critical": result.critical,
                    });
                    if upcoming {
                        body["upcoming"] = serde_json::to_value(&result.upcoming)?;
                    }
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Markdown => {
                    print!("{}", format_alerts_markdown(&result.alerts));
                    if upcoming {
                        print!("{}", format_upcoming_markdown(&result.upcoming));
                    }
                }
            }
        }

        Command::Ack { key } => {
            let path = store_path(cli.store.as_deref())?;
            let store = SuppressionStore::open(&path)
                .with_context(|| format!("opening suppression store {}", path.display()))?;
            store.acknowledge(&key)?;
            info!(key = %key, "alert acknowledged");
            println!("acknowledged {}", key);
        }

        Command::Snooze { key, days } => {
            let path = store_path(cli.store.as_deref())?;
            let store = SuppressionStore::open(&path)
                .with_context(|| format!("opening suppression store {}", path.display()))?;
            store.snooze(&key, days)?;
            info!(key = %key, days, "alert snoozed");
            println!("snoozed {} for {} days", key, days);
        }
    }

    Ok(())
}
