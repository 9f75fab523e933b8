use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::contact::ContactError;
use crate::translate::TranslateError;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced by the HTTP endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Access denied")]
    AccessDenied,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Contact(#[from] ContactError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Translate(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Translate(_) | Self::Contact(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
