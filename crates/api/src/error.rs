use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vidgate_core::error::CoreError;
use vidgate_provider::ProviderError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ProviderError`] for remote
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`]
/// to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vidgate_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure talking to the generation provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, reasons) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound(id) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("Job {id} not found"),
                    None,
                ),
                CoreError::Validation(reasons) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Validation failed".to_string(),
                    Some(reasons.clone()),
                ),
                CoreError::NotReady(id) => (
                    StatusCode::CONFLICT,
                    "NOT_READY",
                    format!("Job {id} has no provider job yet; content is not ready"),
                    None,
                ),
            },

            // --- Provider errors ---
            AppError::Provider(provider) => match provider {
                ProviderError::MissingCredential => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "NO_CREDENTIAL",
                    "Provider API key is not configured".to_string(),
                    None,
                ),
                ProviderError::Api { status, body } => {
                    tracing::error!(upstream_status = status, "Provider rejected the request");
                    (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_ERROR",
                        format!("Provider returned {status}: {body}"),
                        None,
                    )
                }
                ProviderError::Request(err) => {
                    tracing::error!(error = %err, "Provider request failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        "PROVIDER_UNREACHABLE",
                        "Could not reach the generation provider".to_string(),
                        None,
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(reasons) = reasons {
            body["reasons"] = json!(reasons);
        }

        (status, axum::Json(body)).into_response()
    }
}
