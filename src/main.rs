//! catalog-importer - CSV import client for the catalog platform
//!
//! Maps CSV headers to category attributes, submits import jobs and tracks
//! them to completion.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_importer::cli::{Cli, Command};
use catalog_importer::config::Config;
use catalog_importer::services::api_client::{CatalogApiClient, JobStore};
use catalog_importer::services::column_mapper::{self, ColumnMapping, TargetField};
use catalog_importer::services::recovery;
use catalog_importer::services::submitter::ImportSubmitter;
use catalog_importer::services::tracker::{JobTracker, TrackedJob, TrackerNotice};
use catalog_importer::types::{AttributeDef, ImportType};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "importer.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stderr and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,catalog_importer=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false)) // file
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = Arc::new(CatalogApiClient::new(&config.api_base_url, config.api_token.clone()));
    let store: Arc<dyn JobStore> = client.clone();

    match cli.command {
        Command::Map { file, fields } => {
            let headers = read_headers(&file)?;
            let targets = load_target_fields(&fields)?;
            let mapping = column_mapper::suggest(&headers, &targets);
            print_mapping(&mapping, &targets);
        }
        Command::Submit { file, import_type, category, fields, mapping } => {
            let headers = read_headers(&file)?;
            let targets = load_target_fields(&fields)?;
            let mapping = match mapping {
                Some(path) => load_mapping(&path, &headers)?,
                None => column_mapper::suggest(&headers, &targets),
            };
            print_mapping(&mapping, &targets);

            submit_and_track(&client, store, &config, &file, import_type, &category, &mapping, &targets)
                .await?;
        }
        Command::Watch { job_id } => {
            let job = store.fetch_job(&job_id).await?;
            if job.status.is_terminal() {
                println!("Job {} already {}", job.id, job.status.as_str());
                return Ok(());
            }
            let tracker = JobTracker::new(store, config.poll.clone());
            tracker.start(TrackedJob::from_snapshot(&job));
            watch_until_done(&tracker).await;
        }
        Command::Recover => {
            let tracker = JobTracker::new(store.clone(), config.poll.clone());
            if recovery::attach_if_active(&tracker, store.as_ref()).await {
                watch_until_done(&tracker).await;
            } else {
                println!("No active import job found");
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn submit_and_track(
    client: &Arc<CatalogApiClient>,
    store: Arc<dyn JobStore>,
    config: &Config,
    file: &Path,
    import_type: ImportType,
    category: &str,
    mapping: &ColumnMapping,
    targets: &[TargetField],
) -> Result<()> {
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("import.csv")
        .to_string();
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let submitter = ImportSubmitter::new(Arc::clone(client));
    let required = column_mapper::required_field_ids(targets);
    let response = submitter
        .submit(bytes, &file_name, import_type, category, mapping, &required)
        .await?;
    println!("Submitted import job {}", response.job_id);

    let tracker = JobTracker::new(store, config.poll.clone());
    tracker.start(TrackedJob::from_submission(response.job_id, import_type));
    watch_until_done(&tracker).await;
    Ok(())
}

/// Print progress updates until the tracked job reaches a terminal state
async fn watch_until_done(tracker: &JobTracker) {
    let mut notices = match tracker.notices() {
        Some(rx) => rx,
        None => return,
    };
    let mut state_rx = tracker.subscribe();
    let mut last_printed: Option<u8> = None;

    loop {
        tokio::select! {
            notice = notices.recv() => {
                match notice {
                    Some(TrackerNotice::Completed { summary, .. }) => {
                        println!("Import completed: {}", summary);
                    }
                    Some(TrackerNotice::Failed { message, .. }) => {
                        println!("Import failed: {}", message);
                    }
                    None => {}
                }
                break;
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                if state.is_importing && state.progress != last_printed {
                    if let Some(progress) = state.progress {
                        println!("  {}%", progress);
                        last_printed = Some(progress);
                    }
                }
            }
        }
    }

    // The summary is printed; no reason to keep the stay-visible window alive
    tracker.stop();
}

fn read_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;
    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?;
    Ok(headers.iter().map(|h| h.to_string()).collect())
}

/// Category attributes come from a JSON export of the category service;
/// core fields are always prepended
fn load_target_fields(path: &Path) -> Result<Vec<TargetField>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read field catalog {}", path.display()))?;
    let attributes: Vec<AttributeDef> =
        serde_json::from_str(&raw).context("Invalid field catalog JSON")?;
    Ok(column_mapper::target_fields(&attributes))
}

/// A confirmed mapping file is the same JSON object the backend receives:
/// header -> fieldId|null
fn load_mapping(path: &Path, headers: &[String]) -> Result<ColumnMapping> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file {}", path.display()))?;
    let loaded: std::collections::HashMap<String, Option<String>> =
        serde_json::from_str(&raw).context("Invalid mapping JSON")?;

    let mut mapping = ColumnMapping::default();
    for header in headers {
        mapping.assign(header, loaded.get(header).cloned().flatten());
    }
    Ok(mapping)
}

fn print_mapping(mapping: &ColumnMapping, targets: &[TargetField]) {
    for entry in mapping.entries() {
        let target = entry
            .field_id
            .as_deref()
            .and_then(|id| targets.iter().find(|f| f.id == id));
        match target {
            Some(field) => println!("  {:<30} -> {} ({})", entry.header, field.label, field.id),
            None => println!("  {:<30} -> (unmapped)", entry.header),
        }
    }

    let required = column_mapper::required_field_ids(targets);
    let missing = mapping.missing_required(&required);
    if missing.is_empty() {
        info!("All required fields covered");
    } else {
        println!("Missing required fields: {}", missing.join(", "));
    }
}
