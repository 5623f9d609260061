/*
 * SPDX-FileCopyrightText: 2025 Atelier Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::Error as AnyhowError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use atelier_core::types::BaseResponse;
use sea_orm::DbErr;
use std::fmt;

#[derive(Debug)]
pub enum WebError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
    Database(DbErr),
    Internal(AnyhowError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            WebError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            WebError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            WebError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            WebError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            WebError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            WebError::Database(err) => write!(f, "Database error: {}", err),
            WebError::Internal(err) => write!(f, "Internal error: {}", err),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebError::Database(err) => Some(err),
            WebError::Internal(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<DbErr> for WebError {
    fn from(err: DbErr) -> Self {
        WebError::Database(err)
    }
}

impl From<AnyhowError> for WebError {
    fn from(err: AnyhowError) -> Self {
        WebError::Internal(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            WebError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            WebError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            WebError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            WebError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            WebError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            WebError::Internal(err) => {
                tracing::error!("Internal error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(BaseResponse {
            error: true,
            message: error_message,
        });

        (status, body).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

// Helper constructors for recurring error shapes
impl WebError {
    pub fn not_found(resource: &str) -> Self {
        WebError::NotFound(format!("{} not found", resource))
    }

    pub fn already_exists(resource: &str) -> Self {
        WebError::Conflict(format!("{} already exists", resource))
    }

    pub fn invalid_credentials() -> Self {
        WebError::Unauthorized("Invalid credentials".to_string())
    }

    pub fn registration_disabled() -> Self {
        WebError::BadRequest("Registration is disabled".to_string())
    }

    pub fn failed_to_generate_token() -> Self {
        WebError::InternalServerError("Failed to generate token".to_string())
    }
}
