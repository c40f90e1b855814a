use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::entities::conversions;
use crate::entities::observation::{self, ObservationDocument, TranslateError};
use glucose_guide_data::database::DatabasePool;
use glucose_guide_data::repository::{
    GlucoseRecordRepository, GlucoseRecordRepositoryTrait, RepositoryError,
};

/// Glucose record service errors
#[derive(Debug, Error, PartialEq)]
pub enum GlucoseServiceError {
    /// The document contains a malformed value
    #[error("{0}")]
    Parse(String),

    /// The document lacks a required key
    #[error("Missing field: {0}")]
    MissingField(String),

    /// No record with the given id
    #[error("Record not found")]
    NotFound(i64),

    /// The store failed
    #[error("{0}")]
    Storage(String),
}

impl From<TranslateError> for GlucoseServiceError {
    fn from(err: TranslateError) -> Self {
        match err {
            TranslateError::Parse(msg) => GlucoseServiceError::Parse(msg),
            TranslateError::MissingField(field) => GlucoseServiceError::MissingField(field),
        }
    }
}

impl From<RepositoryError> for GlucoseServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => GlucoseServiceError::NotFound(id),
            other => GlucoseServiceError::Storage(other.to_string()),
        }
    }
}

/// Trait for glucose record service operations
#[async_trait]
pub trait GlucoseRecordServiceTrait: Send + Sync {
    /// Decode an observation document and store it, returning the new id
    async fn create_record(&self, document: &Value) -> Result<i64, GlucoseServiceError>;

    /// Read up to `limit` records in id order as observation documents
    async fn get_records(&self, limit: i64) -> Result<Vec<ObservationDocument>, GlucoseServiceError>;

    /// Replace every field of an existing record from an observation document
    async fn update_record(&self, id: i64, document: &Value) -> Result<(), GlucoseServiceError>;

    /// Delete an existing record
    async fn delete_record(&self, id: i64) -> Result<(), GlucoseServiceError>;
}

/// Glucose record service over a record repository
pub struct GlucoseRecordService<R: GlucoseRecordRepositoryTrait> {
    repository: R,
}

impl<R: GlucoseRecordRepositoryTrait> GlucoseRecordService<R> {
    /// Create a new glucose record service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: GlucoseRecordRepositoryTrait> GlucoseRecordServiceTrait for GlucoseRecordService<R> {
    async fn create_record(&self, document: &Value) -> Result<i64, GlucoseServiceError> {
        let record = observation::decode(document)?;
        let row = conversions::convert_to_data_new_record(&record);

        let stored = self.repository.create(row).await?;
        info!("Created glucose record {}", stored.id);
        Ok(stored.id)
    }

    async fn get_records(&self, limit: i64) -> Result<Vec<ObservationDocument>, GlucoseServiceError> {
        let rows = self.repository.list(limit).await?;
        debug!("Loaded {} glucose records (limit {})", rows.len(), limit);

        rows.into_iter()
            .map(|row| {
                conversions::convert_to_domain_record(row)
                    .map(|record| observation::encode(&record))
                    .map_err(|e| {
                        error!("Failed to read stored glucose record: {}", e);
                        GlucoseServiceError::Storage(e)
                    })
            })
            .collect()
    }

    async fn update_record(&self, id: i64, document: &Value) -> Result<(), GlucoseServiceError> {
        // Existence is checked before the document is looked at
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(GlucoseServiceError::NotFound(id));
        }

        let record = observation::decode(document)?;
        let row = conversions::convert_to_data_new_record(&record);

        self.repository.update(id, row).await?;
        info!("Updated glucose record {}", id);
        Ok(())
    }

    async fn delete_record(&self, id: i64) -> Result<(), GlucoseServiceError> {
        self.repository.delete(id).await?;
        info!("Deleted glucose record {}", id);
        Ok(())
    }
}

/// Create a glucose record service backed by the SQLite pool
pub fn create_glucose_record_service(pool: DatabasePool) -> impl GlucoseRecordServiceTrait {
    GlucoseRecordService::new(GlucoseRecordRepository::new(pool))
}

/// Create a glucose record service over an in-memory repository.
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_glucose_record_service(
    repository: glucose_guide_data::repository::InMemoryGlucoseRecordRepository,
) -> impl GlucoseRecordServiceTrait {
    GlucoseRecordService::new(repository)
}
