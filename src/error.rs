use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::gateway::GatewayError;

pub type AppResult<T> = Result<T, AppError>;

/// Every failure a request can end in. None of them is fatal: the caller may
/// fix the input (or re-query, for persistence failures) and try again.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Missing or malformed input. Nothing was written.
    #[display(fmt = "{}", _0)]
    Validation(String),
    /// Duplicate cedula or an illegal ENTRADA/SALIDA transition.
    #[display(fmt = "{}", _0)]
    Conflict(String),
    #[display(fmt = "{}", _0)]
    NotFound(String),
    /// Store failure. The effect is unknown to the caller; the detail is logged
    /// but never sent back.
    #[display(fmt = "Something went wrong, contact the system admin")]
    Persistence(String),
    #[display(fmt = "Internal Server Error")]
    Internal(String),
    #[display(fmt = "{}", _0)]
    Unauthorized(String),
    #[display(fmt = "{}", _0)]
    Forbidden(String),
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Conflict(message) => AppError::Conflict(message),
            GatewayError::Failure(message) => AppError::Persistence(message),
        }
    }
}
