use std::sync::Mutex;

use super::{AuditError, AuditFilter, AuditRecord, AuditStore};

/// Audit store that keeps records in process memory
///
/// Records live as long as the store; nothing is written to disk.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<AuditRecord>>, AuditError> {
        self.records
            .lock()
            .map_err(|e| AuditError::Storage(format!("audit store lock poisoned: {}", e)))
    }
}

impl AuditStore for InMemoryAuditStore {
    fn insert(&self, record: &AuditRecord) -> Result<i64, AuditError> {
        let mut records = self.lock()?;
        let id = records.len() as i64 + 1;
        let mut stored = record.clone();
        stored.id = id;
        records.push(stored);
        Ok(id)
    }

    /// Matching records, newest first.
    fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        let records = self.lock()?;
        let offset = filter.offset.max(0) as usize;
        let limit = filter.limit.max(0) as usize;
        Ok(records
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count(&self, filter: &AuditFilter) -> Result<i64, AuditError> {
        let records = self.lock()?;
        Ok(records.iter().filter(|r| filter.matches(r)).count() as i64)
    }
}
