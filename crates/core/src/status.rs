//! Canonical job lifecycle states and provider-vocabulary normalization.
//!
//! The provider's status strings have drifted over time (`in_progress` vs
//! `processing`, `pending` vs `queued`), so every inbound value is folded
//! into the four canonical states before it touches a record.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a tracked generation job.
///
/// `Completed` and `Failed` are terminal: once reached, the record is
/// frozen and no further polling occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Canonical wire string for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fold a provider status string into a canonical [`JobStatus`].
///
/// Returns `None` for vocabulary we do not recognize; callers should leave
/// the stored status unchanged and log the value rather than guess a
/// transition.
pub fn normalize_status(raw: &str) -> Option<JobStatus> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "queued" | "pending" => Some(JobStatus::Queued),
        "processing" | "in_progress" | "running" => Some(JobStatus::Processing),
        "completed" | "succeeded" | "done" => Some(JobStatus::Completed),
        "failed" | "error" | "errored" | "rejected" | "cancelled" | "canceled" => {
            Some(JobStatus::Failed)
        }
        _ => None,
    }
}
