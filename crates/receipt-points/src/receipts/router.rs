use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use super::domain::{Receipt, ReceiptId};
use super::repository::{ReceiptRepository, RepositoryError};
use super::scoring::ScoreComponent;
use super::service::{ReceiptService, ReceiptServiceError};

#[derive(Debug, Serialize)]
pub(crate) struct ProcessedReceipt {
    pub(crate) id: ReceiptId,
}

#[derive(Debug, Serialize)]
pub(crate) struct PointsView {
    pub(crate) points: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct BreakdownView {
    pub(crate) id: ReceiptId,
    pub(crate) points: u64,
    pub(crate) components: Vec<ComponentView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ComponentView {
    pub(crate) rule: &'static str,
    pub(crate) points: u64,
    pub(crate) notes: String,
}

impl From<ScoreComponent> for ComponentView {
    fn from(component: ScoreComponent) -> Self {
        Self {
            rule: component.rule.label(),
            points: component.points,
            notes: component.notes,
        }
    }
}

/// Router builder exposing receipt intake and scoring endpoints.
pub fn receipt_router<R>(service: Arc<ReceiptService<R>>) -> Router
where
    R: ReceiptRepository + 'static,
{
    Router::new()
        .route("/receipts/process", post(process_handler::<R>))
        .route("/receipts/:id/points", get(points_handler::<R>))
        .route("/receipts/:id/breakdown", get(breakdown_handler::<R>))
        .with_state(service)
}

pub(crate) async fn process_handler<R>(
    State(service): State<Arc<ReceiptService<R>>>,
    payload: Result<Json<Receipt>, JsonRejection>,
) -> Response
where
    R: ReceiptRepository + 'static,
{
    let Json(receipt) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected receipt submission");
            let payload = json!({ "error": "invalid request body" });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.process(receipt) {
        Ok(record) => (StatusCode::OK, Json(ProcessedReceipt { id: record.id })).into_response(),
        Err(other) => service_error_response(&other),
    }
}

pub(crate) async fn points_handler<R>(
    State(service): State<Arc<ReceiptService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: ReceiptRepository + 'static,
{
    match service.points(&ReceiptId(id)) {
        Ok(points) => (StatusCode::OK, Json(PointsView { points })).into_response(),
        Err(other) => service_error_response(&other),
    }
}

pub(crate) async fn breakdown_handler<R>(
    State(service): State<Arc<ReceiptService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: ReceiptRepository + 'static,
{
    let id = ReceiptId(id);
    match service.breakdown(&id) {
        Ok(breakdown) => {
            let view = BreakdownView {
                id,
                points: breakdown.total,
                components: breakdown.components.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(other) => service_error_response(&other),
    }
}

fn service_error_response(err: &ReceiptServiceError) -> Response {
    match err {
        ReceiptServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "receipt not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        ReceiptServiceError::Scoring(score_error) => {
            error!(error = %score_error, "failed to calculate points");
            let payload = json!({ "error": "error calculating points" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "receipt storage failure");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
