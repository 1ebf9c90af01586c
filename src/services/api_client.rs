//! HTTP client for the catalog backend's import endpoints

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use crate::error::ImportError;
use crate::services::column_mapper::ColumnMapping;
use crate::types::{ErrorResponse, ImportJob, ImportJobStatus, ImportType, JobListResponse, SubmitResponse};

/// Read side of the job API, the seam the tracker and recovery poll through.
/// Kept as a trait so tests can script job snapshots without a server.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch the current snapshot of one job
    async fn fetch_job(&self, job_id: &str) -> Result<ImportJob>;

    /// Find at most one job with the given status
    async fn find_job_by_status(&self, status: ImportJobStatus) -> Result<Option<ImportJob>>;
}

/// Client for the catalog backend
pub struct CatalogApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl CatalogApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("catalog-importer/0.3")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Create an import job from a file and a confirmed column mapping.
    ///
    /// On any failure no job exists client-side and no tracking starts; the
    /// caller gets a structured error with the server's message when one was
    /// provided.
    pub async fn submit_import(
        &self,
        file: Vec<u8>,
        file_name: &str,
        import_type: ImportType,
        category_id: &str,
        mapping: &ColumnMapping,
    ) -> Result<SubmitResponse, ImportError> {
        let form = Form::new()
            .part("file", Part::bytes(file).file_name(file_name.to_string()))
            .text("importType", import_type.as_str())
            .text("categoryId", category_id.to_string())
            .text("columnMapping", serde_json::to_string(mapping)?);

        let response = self
            .request(self.client.post(format!("{}/import", self.base_url)))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::Submission {
                message: server_message(status, &body),
            });
        }

        Ok(response.json::<SubmitResponse>().await?)
    }
}

#[async_trait]
impl JobStore for CatalogApiClient {
    async fn fetch_job(&self, job_id: &str) -> Result<ImportJob> {
        let response = self
            .request(self.client.get(format!("{}/jobs/{}", self.base_url, job_id)))
            .send()
            .await
            .context("Failed to send job status request")?;

        let response = response
            .error_for_status()
            .with_context(|| format!("Job status request for {} rejected", job_id))?;

        response
            .json::<ImportJob>()
            .await
            .context("Failed to parse job snapshot")
    }

    async fn find_job_by_status(&self, status: ImportJobStatus) -> Result<Option<ImportJob>> {
        let response = self
            .request(self.client.get(format!("{}/jobs", self.base_url)))
            .query(&[("status", status.as_str()), ("limit", "1")])
            .send()
            .await
            .context("Failed to send job list request")?
            .error_for_status()
            .context("Job list request rejected")?;

        let list: JobListResponse = response
            .json()
            .await
            .context("Failed to parse job list response")?;

        Ok(list.jobs.into_iter().next())
    }
}

/// Best human-readable message for a rejected submission: the backend's
/// `{"error": "..."}` payload when present, a generic fallback otherwise
fn server_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| format!("server returned HTTP {}", status.as_u16()))
}
