//! Import job types mirroring the catalog backend's wire format
//!
//! Job status transitions are append-only and monotonic
//! (`pending → processing → {completed|failed}`); the client never regresses
//! a terminal state back to non-terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of catalog data being imported, determines the backend processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    Products,
    References,
    Applications,
}

impl ImportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportType::Products => "products",
            ImportType::References => "references",
            ImportType::Applications => "applications",
        }
    }
}

impl std::fmt::Display for ImportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ImportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "products" => Ok(ImportType::Products),
            "references" => Ok(ImportType::References),
            "applications" => Ok(ImportType::Applications),
            other => Err(format!(
                "unknown import type '{}' (expected products, references or applications)",
                other
            )),
        }
    }
}

/// Server-side job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ImportJobStatus {
    /// Terminal states stop the polling loop permanently
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportJobStatus::Completed | ImportJobStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportJobStatus::Pending => "pending",
            ImportJobStatus::Processing => "processing",
            ImportJobStatus::Completed => "completed",
            ImportJobStatus::Failed => "failed",
        }
    }
}

/// Transient runtime signals computed server-side, not part of the
/// persisted job record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRuntime {
    /// No forward progress for longer than the server's tolerance window
    #[serde(default)]
    pub is_stale: bool,
}

/// Snapshot of one import job as reported by `GET /jobs/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportJob {
    pub id: String,
    #[serde(rename = "type")]
    pub import_type: ImportType,
    pub status: ImportJobStatus,
    /// 0–100 when the backend reports it, absent while queued
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub created: u32,
    #[serde(default)]
    pub updated: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub original_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub runtime: Option<JobRuntime>,
}

impl ImportJob {
    /// Server-computed staleness signal; absent runtime block means not stale
    pub fn is_stale(&self) -> bool {
        self.runtime.as_ref().map_or(false, |r| r.is_stale)
    }

    /// Best available start instant for elapsed-time computations
    pub fn effective_started_at(&self) -> DateTime<Utc> {
        self.started_at.unwrap_or(self.created_at)
    }
}

/// Response to `POST /import`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: String,
    pub status: ImportJobStatus,
}

/// Response to `GET /jobs?status=...&limit=1`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub jobs: Vec<ImportJob>,
}

/// Error payload the backend returns on rejected requests
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
