use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::glucose_record::{GlucoseRecordRow, NewGlucoseRecordRow, STORAGE_DATE_FORMAT};
use super::errors::RepositoryError;
use super::storage::GlucoseRecordStorage;

/// Default number of records returned by a listing
pub const DEFAULT_LIST_LIMIT: i64 = 500;

/// Repository trait for glucose records
#[async_trait]
pub trait GlucoseRecordRepositoryTrait: Send + Sync {
    /// Persist a new record and return it with its assigned id
    async fn create(&self, record: NewGlucoseRecordRow) -> Result<GlucoseRecordRow, RepositoryError>;

    /// List up to `limit` records in id order; a negative limit means no limit
    async fn list(&self, limit: i64) -> Result<Vec<GlucoseRecordRow>, RepositoryError>;

    /// List the records owned by one user
    async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<GlucoseRecordRow>, RepositoryError>;

    /// Get a record by id
    async fn get_by_id(&self, id: i64) -> Result<Option<GlucoseRecordRow>, RepositoryError>;

    /// Replace every mutable field of an existing record.
    ///
    /// Fails with `RepositoryError::NotFound` when no row has this id.
    async fn update(&self, id: i64, record: NewGlucoseRecordRow) -> Result<GlucoseRecordRow, RepositoryError>;

    /// Delete a record.
    ///
    /// Fails with `RepositoryError::NotFound` when no row has this id.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Number of stored records
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// Current time in the storage date layout, used when a record carries no date
pub fn storage_now() -> String {
    Utc::now().naive_utc().format(STORAGE_DATE_FORMAT).to_string()
}

/// SQLite-backed repository for glucose records
#[derive(Debug, Clone)]
pub struct GlucoseRecordRepository {
    pool: DatabasePool,
}

impl GlucoseRecordRepository {
    /// Create a repository over an open pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GlucoseRecordRepositoryTrait for GlucoseRecordRepository {
    async fn create(&self, record: NewGlucoseRecordRow) -> Result<GlucoseRecordRow, RepositoryError> {
        self.pool
            .run_in_transaction("create_glucose_record", move |tx| {
                let date = record.date.clone().unwrap_or_else(storage_now);
                let id = GlucoseRecordStorage::insert(tx, &record, &date)?;
                debug!("Stored glucose record {}", id);
                Ok(record.into_row(id, date))
            })
            .await
    }

    async fn list(&self, limit: i64) -> Result<Vec<GlucoseRecordRow>, RepositoryError> {
        self.pool
            .run_in_transaction("list_glucose_records", move |tx| {
                Ok(GlucoseRecordStorage::list(tx, limit)?)
            })
            .await
    }

    async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<GlucoseRecordRow>, RepositoryError> {
        self.pool
            .run_in_transaction("list_glucose_records_for_user", move |tx| {
                Ok(GlucoseRecordStorage::list_for_user(tx, user_id, limit)?)
            })
            .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<GlucoseRecordRow>, RepositoryError> {
        self.pool
            .run_in_transaction("get_glucose_record", move |tx| {
                Ok(GlucoseRecordStorage::find_by_id(tx, id)?)
            })
            .await
    }

    async fn update(&self, id: i64, record: NewGlucoseRecordRow) -> Result<GlucoseRecordRow, RepositoryError> {
        self.pool
            .run_in_transaction("update_glucose_record", move |tx| {
                if GlucoseRecordStorage::update(tx, id, &record)? == 0 {
                    return Err(RepositoryError::NotFound(id));
                }
                GlucoseRecordStorage::find_by_id(tx, id)?.ok_or(RepositoryError::NotFound(id))
            })
            .await
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.pool
            .run_in_transaction("delete_glucose_record", move |tx| {
                match GlucoseRecordStorage::delete(tx, id)? {
                    0 => Err(RepositoryError::NotFound(id)),
                    _ => Ok(()),
                }
            })
            .await
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        self.pool
            .run_in_transaction("count_glucose_records", |tx| Ok(GlucoseRecordStorage::count(tx)?))
            .await
    }
}
