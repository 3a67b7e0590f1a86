//! Typed errors and HTTP mapping.

use axum::response::{IntoResponse, Response};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::response::Envelope;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid id")]
    InvalidId(Vec<String>),
    #[error("invalid payload")]
    InvalidPayload(BTreeMap<String, Vec<String>>),
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let envelope = match self {
            AppError::InvalidId(errors) => {
                Envelope::new(400, "invalid id").with_errors(serde_json::json!(errors))
            }
            AppError::InvalidPayload(errors) => {
                Envelope::new(400, "invalid payload").with_errors(serde_json::json!(errors))
            }
            AppError::NotFound => Envelope::new(404, "not found"),
            AppError::BadRequest(message) => Envelope::new(400, message),
            AppError::Db(e) => {
                tracing::error!(error = %e, "storage failure");
                Envelope::new(500, "internal server error")
            }
        };
        envelope.into_response()
    }
}
