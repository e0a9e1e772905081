//! Wire types for the provider's `/videos` endpoints.
//!
//! The provider's payloads have drifted across API revisions (status
//! vocabulary, fraction-vs-percentage progress, string-vs-number clip
//! lengths), so every field here is optional and lenient; translation
//! into the canonical domain model happens in
//! [`VideoJobResponse::status_update`].

use serde::{Deserialize, Deserializer, Serialize};

use vidgate_core::job::{normalize_progress, StatusUpdate};
use vidgate_core::status::{normalize_status, JobStatus};

/// Body for `POST /videos`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVideoRequest {
    pub prompt: String,
    pub model: String,
    pub size: String,
    /// The provider expects the clip length as a string.
    pub seconds: String,
}

/// Error object embedded in a job payload when generation failed.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderJobError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A job resource as the provider returns it, from both the creation and
/// the status endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoJobResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub seconds: Option<u32>,
    #[serde(default)]
    pub error: Option<ProviderJobError>,
    /// Everything else the provider sent; stored verbatim on the record.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VideoJobResponse {
    /// Translate this payload into a domain [`StatusUpdate`].
    ///
    /// Vocabulary and progress are normalized here; an embedded error
    /// object marks the job as failed regardless of the reported status.
    /// Unknown status strings are logged and leave the stored status
    /// unchanged.
    pub fn status_update(&self) -> StatusUpdate {
        let mut update = StatusUpdate {
            status: None,
            progress: self.progress.map(normalize_progress),
            size: self.size.clone(),
            seconds: self.seconds,
            error_message: None,
        };

        if let Some(raw) = &self.status {
            match normalize_status(raw) {
                Some(status) => update.status = Some(status),
                None => {
                    tracing::warn!(status = %raw, "Unknown provider status value; leaving job status unchanged");
                }
            }
        }

        if let Some(error) = &self.error {
            update.status = Some(JobStatus::Failed);
            update.error_message = Some(
                error
                    .message
                    .clone()
                    .unwrap_or_else(|| "Generation failed".to_string()),
            );
        }

        update
    }

    /// Unrecognized provider fields, as an opaque JSON object.
    pub fn metadata(&self) -> serde_json::Value {
        serde_json::Value::Object(self.extra.clone())
    }
}

/// Accept a clip length as a JSON string or number. Unparseable values
/// become `None` rather than failing the whole payload.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_u64().map(|n| n as u32),
        _ => None,
    }))
}
