pub mod approval;
pub mod auction;
pub mod bid;
pub mod payment;

use axum::{Json, http::StatusCode};

use crate::models::auction::ErrorResponse;
use crate::services::error::CoreError;

/// Map a core error onto an HTTP status plus the shared error envelope.
/// The core never sees HTTP; this is the only translation point.
pub(crate) fn error_response(err: CoreError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::InvalidState { .. } => StatusCode::CONFLICT,
        CoreError::Forbidden { .. } => StatusCode::FORBIDDEN,
        CoreError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
        CoreError::Conflict { .. } => StatusCode::CONFLICT,
        CoreError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        CoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ErrorResponse {
        error: err.to_string(),
        kind: err.kind_code().to_string(),
        code: err.reason_code().to_string(),
    };
    (status, Json(body))
}
