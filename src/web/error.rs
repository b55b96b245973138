use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::feddit::FedditError;
use crate::pipeline::PipelineError;

/// Error surfaced to HTTP callers. Carries the failure kind and the
/// subfeddit it concerns, never an internal trace.
#[derive(Debug, Error)]
#[error("{kind}: {details}")]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
    pub subfeddit: Option<String>,
    pub details: String,
}

impl ApiError {
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "InvalidRequest",
            message: "The request is invalid.".to_string(),
            subfeddit: None,
            details: details.into(),
        }
    }

    pub fn from_pipeline(subfeddit: &str, err: PipelineError) -> Self {
        match err {
            PipelineError::Feddit(e) => {
                let (status, message) = match &e {
                    FedditError::Unavailable(_) => (
                        StatusCode::BAD_GATEWAY,
                        "The comment source could not be reached.",
                    ),
                    FedditError::Malformed(_) => (
                        StatusCode::BAD_GATEWAY,
                        "The comment source returned an unexpected payload.",
                    ),
                    FedditError::SubfedditNotFound(_) => (
                        StatusCode::NOT_FOUND,
                        "The requested subfeddit could not be found.",
                    ),
                };
                Self {
                    status,
                    kind: e.kind(),
                    message: message.to_string(),
                    subfeddit: Some(subfeddit.to_string()),
                    details: e.to_string(),
                }
            }
            PipelineError::Task(details) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                kind: "Internal",
                message: "An unexpected error occurred.".to_string(),
                subfeddit: Some(subfeddit.to_string()),
                details,
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subfeddit: Option<&'a str>,
    details: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{} ({}): {}", self.message, self.kind, self.details);

        let body = Json(ErrorBody {
            message: &self.message,
            kind: self.kind,
            subfeddit: self.subfeddit.as_deref(),
            details: &self.details,
        });

        (self.status, body).into_response()
    }
}
