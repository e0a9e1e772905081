//! The tracked job record and the mutations the store may apply to it.
//!
//! A [`JobRecord`] is created once per accepted submission and then only
//! advanced by [`JobRecord::apply_status`] / [`JobRecord::record_poll_error`]
//! until it reaches a terminal state, after which it is frozen.
//!
//! Wire shape is camelCase and carries both historical field-naming
//! schemes: `size`/`seconds` and their legacy mirrors
//! `resolution`/`durationSeconds` are always equal and both serialized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::status::JobStatus;
use crate::validation::ValidParams;

/// Normalize a provider progress value to the 0-100 scale.
///
/// The provider reports progress either as a 0-1 fraction or as a 0-100
/// percentage. Values at or below `1.0` are read as fractions (so a raw
/// `1` means 100%); everything is rounded and clamped to 0-100.
pub fn normalize_progress(raw: f64) -> u8 {
    if !raw.is_finite() || raw < 0.0 {
        return 0;
    }
    let scaled = if raw <= 1.0 { raw * 100.0 } else { raw };
    scaled.round().clamp(0.0, 100.0) as u8
}

/// Fields a provider status payload may overwrite on a record.
///
/// Built from a provider response with vocabulary and progress already
/// normalized; `None` fields leave the stored value untouched. A present
/// `error_message` marks a provider-reported job failure and forces the
/// record into `Failed`.
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<u8>,
    pub size: Option<String>,
    pub seconds: Option<u32>,
    pub error_message: Option<String>,
}

/// Raw submission body for a generation job.
///
/// Both historical input schemes are accepted: `size`/`seconds` and
/// `resolution`/`durationSeconds`. Fields default to empty so validation
/// can report every missing parameter at once instead of failing on the
/// first deserialization error. `seconds` arrives as a JSON string or
/// number; it is kept verbatim here and parsed during validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobParams {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, alias = "resolution")]
    pub size: String,
    #[serde(default, alias = "durationSeconds", deserialize_with = "string_or_number")]
    pub seconds: String,
}

/// Accept a JSON string or number and keep it as its string form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// One tracked video-generation job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Locally generated identifier, immutable.
    pub id: Uuid,
    /// Provider-assigned identifier; absent when the provider omitted one
    /// at creation, immutable once set.
    pub provider_job_id: Option<String>,
    pub status: JobStatus,
    /// 0-100.
    pub progress: u8,
    pub prompt: String,
    pub model: String,
    pub size: String,
    /// Legacy mirror of `size`, kept equal for pre-existing consumers.
    pub resolution: String,
    pub seconds: u32,
    /// Legacy mirror of `seconds`.
    pub duration_seconds: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Terminal provider-reported failure, if any.
    pub error_message: Option<String>,
    /// Most recent transient polling failure; never affects `status`.
    pub last_error: Option<String>,
    /// Opaque passthrough of unrecognized provider creation fields.
    pub metadata: serde_json::Value,
}

impl JobRecord {
    /// Build the initial record for an accepted submission.
    ///
    /// `creation` carries whatever the provider reported at creation time;
    /// missing fields fall back to `Queued` / 0 progress and the validated
    /// submission parameters. `created_at` and `updated_at` start equal.
    pub fn from_submission(
        id: Uuid,
        params: ValidParams,
        provider_job_id: Option<String>,
        creation: StatusUpdate,
        metadata: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        let size = creation.size.unwrap_or(params.size);
        let seconds = creation.seconds.unwrap_or(params.seconds);
        let status = creation.status.unwrap_or(JobStatus::Queued);
        Self {
            id,
            provider_job_id,
            status,
            progress: creation.progress.unwrap_or(0),
            prompt: params.prompt,
            model: params.model,
            resolution: size.clone(),
            size,
            duration_seconds: seconds,
            seconds,
            created_at: now,
            updated_at: now,
            error_message: creation.error_message,
            last_error: None,
            metadata,
        }
    }

    /// Apply a polled status update.
    ///
    /// Returns `false` without touching anything when the record is already
    /// terminal. A present `error_message` wins over any reported status
    /// and forces `Failed`.
    pub fn apply_status(&mut self, update: &StatusUpdate, now: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(progress) = update.progress {
            self.progress = progress;
        }
        if let Some(size) = &update.size {
            self.size = size.clone();
            self.resolution = size.clone();
        }
        if let Some(seconds) = update.seconds {
            self.seconds = seconds;
            self.duration_seconds = seconds;
        }
        if let Some(message) = &update.error_message {
            self.status = JobStatus::Failed;
            self.error_message = Some(message.clone());
        }
        self.updated_at = now;
        true
    }

    /// Record a transient polling failure.
    ///
    /// Sets `last_error` and bumps `updated_at`; the status is left alone
    /// so the job stays pollable. No-op on terminal records.
    pub fn record_poll_error(&mut self, message: &str, now: DateTime<Utc>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.last_error = Some(message.to_string());
        self.updated_at = now;
        true
    }
}
