use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::config::ScoringConfig;
use crate::receipts::domain::{Item, Receipt, ReceiptId};
use crate::receipts::repository::{ReceiptRecord, ReceiptRepository, RepositoryError};
use crate::receipts::router::receipt_router;
use crate::receipts::service::ReceiptService;

pub(super) fn target_receipt() -> Receipt {
    Receipt {
        retailer: "Target".to_string(),
        purchase_date: "2022-01-01".to_string(),
        purchase_time: "13:01".to_string(),
        total: "35.35".to_string(),
        items: vec![
            Item::new("Mountain Dew 12PK", "6.49"),
            Item::new("Emils Cheese Pizza", "12.25"),
            Item::new("Knorr Creamy Chicken", "1.26"),
            Item::new("Doritos Nacho Cheese", "3.35"),
            Item::new("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
        ],
    }
}

pub(super) fn corner_market_receipt() -> Receipt {
    Receipt {
        retailer: "M&M Corner Market".to_string(),
        purchase_date: "2022-03-20".to_string(),
        purchase_time: "14:33".to_string(),
        total: "9.00".to_string(),
        items: vec![Item::new("Gatorade", "2.25"); 4],
    }
}

/// Receipt where every rule but the retailer name scores zero.
pub(super) fn plain_receipt() -> Receipt {
    Receipt {
        retailer: "Shop".to_string(),
        purchase_date: "2022-03-20".to_string(),
        purchase_time: "09:15".to_string(),
        total: "1.10".to_string(),
        items: Vec::new(),
    }
}

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig { trace_rules: false }
}

pub(super) fn build_service() -> (ReceiptService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ReceiptService::new(repository.clone(), scoring_config());
    (service, repository)
}

pub(super) fn receipt_router_with_service(
    service: ReceiptService<MemoryRepository>,
) -> axum::Router {
    receipt_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ReceiptId, ReceiptRecord>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, id: &str, receipt: Receipt) -> ReceiptId {
        let id = ReceiptId(id.to_string());
        self.records.lock().expect("repository mutex poisoned").insert(
            id.clone(),
            ReceiptRecord {
                id: id.clone(),
                receipt,
            },
        );
        id
    }
}

impl ReceiptRepository for MemoryRepository {
    fn insert(&self, record: ReceiptRecord) -> Result<ReceiptRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReceiptId) -> Result<Option<ReceiptRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").len())
    }
}

pub(super) struct ConflictRepository;

impl ReceiptRepository for ConflictRepository {
    fn insert(&self, _record: ReceiptRecord) -> Result<ReceiptRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ReceiptId) -> Result<Option<ReceiptRecord>, RepositoryError> {
        Ok(None)
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        Ok(0)
    }
}

pub(super) struct UnavailableRepository;

impl ReceiptRepository for UnavailableRepository {
    fn insert(&self, _record: ReceiptRecord) -> Result<ReceiptRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &ReceiptId) -> Result<Option<ReceiptRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }

    fn len(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
