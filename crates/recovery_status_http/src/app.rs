use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use recovery_status_contract::{ErrorBody, StatusRequest};
use recovery_status_core::{RecoveryRecords, StatusAssembler, StatusError};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Deserialize)]
struct StatusQuery {
    #[serde(rename = "asyncOperationId")]
    async_operation_id: Option<String>,
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

#[derive(Clone)]
pub struct AppState {
    pub assembler: StatusAssembler,
}

impl AppState {
    pub fn new(records: Arc<dyn RecoveryRecords>) -> Self {
        Self {
            assembler: StatusAssembler::new(records),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health/live", get(health_live))
        .route("/v1/granules/status", post(post_granule_status))
        .route("/v1/granules/{granule_id}/status", get(get_granule_status))
        .with_state(state)
}

async fn health_live() -> impl IntoResponse {
    Json(json!({
        "status": "live",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn get_granule_status(
    State(state): State<AppState>,
    Path(granule_id): Path<String>,
    Query(query): Query<StatusQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ErrorResponse> {
    let request_id = request_id(&headers);
    let report = state
        .assembler
        .get_status(Some(&granule_id), query.async_operation_id.as_deref())
        .await
        .map_err(|err| status_error(&request_id, err))?;

    Ok((StatusCode::OK, Json(report)))
}

async fn post_granule_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let request_id = request_id(&headers);
    let Json(request) = payload.map_err(|rejection| {
        warn!(request_id = %request_id, error = %rejection, "malformed status request");
        error_response(
            StatusCode::BAD_REQUEST,
            "BadRequest",
            &request_id,
            rejection.body_text(),
        )
    })?;

    let report = state
        .assembler
        .get_status(
            request.granule_id.as_deref(),
            request.async_operation_id.as_deref(),
        )
        .await
        .map_err(|err| status_error(&request_id, err))?;

    Ok((StatusCode::OK, Json(report)))
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

fn status_error(request_id: &str, error: StatusError) -> ErrorResponse {
    let (status, error_type) = match &error {
        StatusError::InvalidArgument { .. } => (StatusCode::BAD_REQUEST, "BadRequest"),
        StatusError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
        StatusError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
    };

    // store failures were already logged when they were translated
    if !matches!(error, StatusError::Database(_)) {
        warn!(request_id = %request_id, error = %error, "status request rejected");
    }

    error_response(status, error_type, request_id, error.to_string())
}

fn error_response(
    status: StatusCode,
    error_type: &str,
    request_id: &str,
    message: String,
) -> ErrorResponse {
    (
        status,
        Json(ErrorBody::new(error_type, status.as_u16(), request_id, message)),
    )
}
