//! Errors surfaced by the HTTP API.
//!
//! Every variant is rendered as `{"error": "<message>"}`. Storage failures are
//! logged and reported with a generic message.
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::balance::BalanceError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Balance(#[from] BalanceError),
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

impl ApiError {
    pub fn trip_not_found() -> Self {
        Self::NotFound("Trip not found".to_string())
    }

    pub fn expense_not_found() -> Self {
        Self::NotFound("Expense not found".to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Balance(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ApiError::Database(err) => {
                tracing::error!("database error: {err}");
                "Server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}
