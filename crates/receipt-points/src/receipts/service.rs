use std::sync::Arc;

use tracing::info;

use super::domain::{Receipt, ReceiptId};
use super::repository::{ReceiptRecord, ReceiptRepository, RepositoryError};
use super::scoring::{ScoreBreakdown, ScoreError, ScoringEngine};
use crate::config::ScoringConfig;

/// Service composing receipt storage with the scoring engine.
pub struct ReceiptService<R> {
    repository: Arc<R>,
    engine: ScoringEngine,
}

impl<R> ReceiptService<R>
where
    R: ReceiptRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Self {
        Self::with_engine(repository, ScoringEngine::new(config.trace_rules))
    }

    pub fn with_engine(repository: Arc<R>, engine: ScoringEngine) -> Self {
        Self { repository, engine }
    }

    /// Store a receipt under a freshly generated identifier.
    pub fn process(&self, receipt: Receipt) -> Result<ReceiptRecord, ReceiptServiceError> {
        let record = ReceiptRecord {
            id: ReceiptId::generate(),
            receipt,
        };

        let stored = self.repository.insert(record)?;
        info!(receipt_id = %stored.id, retailer = %stored.receipt.retailer, "receipt stored");
        Ok(stored)
    }

    /// Fetch a stored receipt.
    pub fn get(&self, id: &ReceiptId) -> Result<ReceiptRecord, ReceiptServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Score a stored receipt.
    pub fn points(&self, id: &ReceiptId) -> Result<u64, ReceiptServiceError> {
        self.breakdown(id).map(|breakdown| breakdown.total)
    }

    /// Score a stored receipt, keeping the per-rule contributions.
    pub fn breakdown(&self, id: &ReceiptId) -> Result<ScoreBreakdown, ReceiptServiceError> {
        let record = self.get(id)?;
        let breakdown = self.engine.breakdown(&record.receipt)?;
        Ok(breakdown)
    }
}

/// Error raised by the receipt service.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Scoring(#[from] ScoreError),
}
