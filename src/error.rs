//! Error taxonomy shared by the HTTP handlers, the CLI and the monthly sync
//! core. Every failure is returned as a value and converted into a JSON body
//! at the request boundary.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::warning;

#[derive(Debug, Error)]
pub enum Error {
    /// No access token (or authorization code) was presented.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Anything the Spotify API or the accounts service rejected, including
    /// transport failures while talking to them.
    #[error("Spotify API error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid playlist identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// A query string or JSON body that does not match the endpoint.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingCredential(_) => StatusCode::UNAUTHORIZED,
            Error::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Error::InvalidIdentifier(_) | Error::InvalidMonth(_) | Error::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Error {
    fn rejected(text: String) -> Self {
        if text.contains("`identifier`") {
            Error::InvalidIdentifier(text)
        } else {
            Error::InvalidRequest(text)
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::rejected(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::rejected(rejection.body_text())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Unexpected(format!("cover rendering failed: {}", err))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warning!("{}", self);
        }

        // The body carries the bare message; the variant is implied by the status.
        let message = match self {
            Error::Upstream { message, .. } => message,
            Error::MissingCredential(msg)
            | Error::InvalidIdentifier(msg)
            | Error::InvalidMonth(msg)
            | Error::InvalidRequest(msg)
            | Error::Unexpected(msg) => msg,
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
