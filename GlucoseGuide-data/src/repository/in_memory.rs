use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::models::glucose_record::{GlucoseRecordRow, NewGlucoseRecordRow};
use super::errors::RepositoryError;
use super::glucose_record::{storage_now, GlucoseRecordRepositoryTrait};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    records: BTreeMap<i64, GlucoseRecordRow>,
}

/// In-memory glucose record repository for tests.
///
/// Clones share the same storage. Ids are assigned sequentially from 1.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGlucoseRecordRepository {
    inner: Arc<Mutex<Inner>>,
    fail_with: Option<String>,
}

impl InMemoryGlucoseRecordRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository whose every call fails with a storage error
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        match &self.fail_with {
            Some(message) => Err(RepositoryError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }

    fn take(records: impl Iterator<Item = GlucoseRecordRow>, limit: i64) -> Vec<GlucoseRecordRow> {
        match usize::try_from(limit) {
            Ok(limit) => records.take(limit).collect(),
            Err(_) => records.collect(),
        }
    }
}

#[async_trait]
impl GlucoseRecordRepositoryTrait for InMemoryGlucoseRecordRepository {
    async fn create(&self, record: NewGlucoseRecordRow) -> Result<GlucoseRecordRow, RepositoryError> {
        self.check_available()?;
        let mut inner = self.inner.lock()?;

        inner.next_id += 1;
        let id = inner.next_id;
        let date = record.date.clone().unwrap_or_else(storage_now);
        let row = record.into_row(id, date);
        inner.records.insert(id, row.clone());

        Ok(row)
    }

    async fn list(&self, limit: i64) -> Result<Vec<GlucoseRecordRow>, RepositoryError> {
        self.check_available()?;
        let inner = self.inner.lock()?;
        Ok(Self::take(inner.records.values().cloned(), limit))
    }

    async fn list_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<GlucoseRecordRow>, RepositoryError> {
        self.check_available()?;
        let inner = self.inner.lock()?;
        let owned = inner.records.values().filter(|r| r.user_id == user_id).cloned();
        Ok(Self::take(owned, limit))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<GlucoseRecordRow>, RepositoryError> {
        self.check_available()?;
        let inner = self.inner.lock()?;
        Ok(inner.records.get(&id).cloned())
    }

    async fn update(&self, id: i64, record: NewGlucoseRecordRow) -> Result<GlucoseRecordRow, RepositoryError> {
        self.check_available()?;
        let mut inner = self.inner.lock()?;

        let existing = inner.records.get(&id).ok_or(RepositoryError::NotFound(id))?;
        let date = record.date.clone().unwrap_or_else(|| existing.date.clone());
        let row = record.into_row(id, date);
        inner.records.insert(id, row.clone());

        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut inner = self.inner.lock()?;
        inner.records.remove(&id).map(|_| ()).ok_or(RepositoryError::NotFound(id))
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        self.check_available()?;
        Ok(self.inner.lock()?.records.len())
    }
}
