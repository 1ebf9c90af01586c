//! Import submission orchestration
//!
//! Thin layer in front of the create-job endpoint: required-coverage
//! validation happens here, before any network traffic. On any error no job
//! exists client-side and no tracking starts.

use std::sync::Arc;

use tracing::info;

use crate::error::ImportError;
use crate::services::api_client::CatalogApiClient;
use crate::services::column_mapper::ColumnMapping;
use crate::types::{ImportType, SubmitResponse};

pub struct ImportSubmitter {
    client: Arc<CatalogApiClient>,
}

impl ImportSubmitter {
    pub fn new(client: Arc<CatalogApiClient>) -> Self {
        Self { client }
    }

    /// Validate the mapping against `required` field ids, then create the
    /// import job. Returns the job id and initial status on success.
    pub async fn submit(
        &self,
        file: Vec<u8>,
        file_name: &str,
        import_type: ImportType,
        category_id: &str,
        mapping: &ColumnMapping,
        required: &[String],
    ) -> Result<SubmitResponse, ImportError> {
        let missing = mapping.missing_required(required);
        if !missing.is_empty() {
            return Err(ImportError::Validation { missing });
        }

        info!(
            "Submitting {} import for category {} ({}, {} bytes)",
            import_type,
            category_id,
            file_name,
            file.len()
        );

        let response = self
            .client
            .submit_import(file, file_name, import_type, category_id, mapping)
            .await?;

        info!("Import job {} created ({})", response.job_id, response.status.as_str());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::column_mapper::{suggest, TargetField};

    fn field(id: &str, csv_name: &str, required: bool) -> TargetField {
        TargetField {
            id: id.to_string(),
            label: id.to_uppercase(),
            csv_name: Some(csv_name.to_string()),
            required,
        }
    }

    #[tokio::test]
    async fn test_unmapped_required_field_rejected_before_any_call() {
        // The base URL is unroutable on purpose: validation must fail first
        let client = Arc::new(CatalogApiClient::new("http://invalid.localhost:1", None));
        let submitter = ImportSubmitter::new(client);

        let fields = vec![field("core:sku", "sku", true), field("f3", "anio", true)];
        let mapping = suggest(&["SKU".to_string()], &fields);

        let err = submitter
            .submit(
                b"sku\nA-1\n".to_vec(),
                "catalog.csv",
                ImportType::Products,
                "cat-1",
                &mapping,
                &["core:sku".to_string(), "f3".to_string()],
            )
            .await
            .unwrap_err();

        match err {
            ImportError::Validation { missing } => assert_eq!(missing, vec!["f3".to_string()]),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
