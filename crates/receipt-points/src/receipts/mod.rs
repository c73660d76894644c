//! Receipt intake, storage contracts, and reward-points scoring.
//!
//! The scoring engine is a pure function over a [`Receipt`]; the service and
//! router wrap it with identifier assignment, storage, and HTTP framing.

pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Item, Receipt, ReceiptId};
pub use repository::{ReceiptRecord, ReceiptRepository, RepositoryError};
pub use router::receipt_router;
pub use scoring::{
    score, RuleObserver, ScoreBreakdown, ScoreComponent, ScoreError, ScoringEngine, ScoringRule,
};
pub use service::{ReceiptService, ReceiptServiceError};
