use serde::{Deserialize, Serialize};

use super::domain::{Receipt, ReceiptId};

/// Repository record pairing a receipt with the identifier it was stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub id: ReceiptId,
    pub receipt: Receipt,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ReceiptRepository: Send + Sync {
    fn insert(&self, record: ReceiptRecord) -> Result<ReceiptRecord, RepositoryError>;
    fn fetch(&self, id: &ReceiptId) -> Result<Option<ReceiptRecord>, RepositoryError>;
    fn len(&self) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
