//! Application-level error type shared by all handlers.
//!
//! Validation problems surface as 4xx responses with a JSON body of the form
//! `{"Error": "<message>"}`. Infrastructure failures are logged once at the
//! conversion site and surface as an opaque 500.

use crate::services::{claims::TokenError, hotel_repo::RepoError, object_store::StorageError};
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

const UNAUTHORIZED_ADMIN: &str = "Unauthorized. Must be a member of Admin group.";

/// A lightweight wrapper for request errors that keeps the message local.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }

    /// 400 with a caller-facing reason.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    /// The exact 401 body the frontend matches on.
    pub fn unauthorized_admin() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED_ADMIN)
    }

    /// Opaque 500.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "Error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::bad_request(format!("invalid multipart body: {err}"))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidObjectKey => AppError::bad_request("invalid object key"),
            other => {
                tracing::error!("object store failure: {other}");
                AppError::internal()
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        tracing::error!("database failure: {err}");
        AppError::internal()
    }
}
