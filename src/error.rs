//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    #[error("invalid {var}: {message}")]
    Env { var: &'static str, message: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),
    #[error("malformed row: column {column}: {reason}")]
    MalformedRow { column: String, reason: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("{message}")]
    BadRequestAlert {
        message: String,
        app: String,
        entity: &'static str,
        key: &'static str,
    },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub(crate) fn malformed(column: &str, reason: impl Into<String>) -> Self {
        AppError::MalformedRow {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::UnsupportedQuery(_) => (StatusCode::BAD_REQUEST, "unsupported_query"),
            AppError::MalformedRow { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "malformed_row"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::BadRequestAlert { key, .. } => (StatusCode::BAD_REQUEST, *key),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let alert = match &self {
            AppError::BadRequestAlert { app, entity, key, .. } => {
                Some(crate::response::failure_alert(app, entity, key))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        let mut response = (status, Json(body)).into_response();
        if let Some(headers) = alert {
            response.headers_mut().extend(headers);
        }
        response
    }
}
