use metrics_exporter_prometheus::PrometheusHandle;
use receipt_points::receipts::{ReceiptId, ReceiptRecord, ReceiptRepository, RepositoryError};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-lifetime receipt store.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReceiptRepository {
    records: Arc<Mutex<HashMap<ReceiptId, ReceiptRecord>>>,
}

impl InMemoryReceiptRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<ReceiptId, ReceiptRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("receipt store mutex poisoned".to_string()))
    }
}

impl ReceiptRepository for InMemoryReceiptRepository {
    fn insert(&self, record: ReceiptRecord) -> Result<ReceiptRecord, RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReceiptId) -> Result<Option<ReceiptRecord>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.get(id).cloned())
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.records()?.len())
    }
}
