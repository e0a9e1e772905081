//! In-memory job store -- the single source of truth for job state.
//!
//! The store is the only writer of record fields: the submission path
//! inserts, the poll scheduler applies updates, and nothing else mutates.
//! Every mutation happens inside one write-lock critical section with no
//! await points, so readers never observe a half-applied update. Callers
//! that awaited a provider call in between must re-fetch instead of
//! trusting a pre-await snapshot.
//!
//! Records are never deleted; retention is out of scope.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use vidgate_core::job::{JobRecord, StatusUpdate};

/// In-memory mapping from job id to record.
///
/// Created once at process start and injected via `AppState`; unit tests
/// build fresh instances.
#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, Entry>>,
    /// Monotonic insertion counter; breaks `created_at` ties so listing
    /// order is stable.
    seq: AtomicU64,
}

struct Entry {
    record: JobRecord,
    seq: u64,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the record for a newly accepted submission.
    pub async fn insert(&self, record: JobRecord) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.jobs
            .write()
            .await
            .insert(record.id, Entry { record, seq });
    }

    /// Snapshot of a single record.
    pub async fn get(&self, id: Uuid) -> Option<JobRecord> {
        self.jobs.read().await.get(&id).map(|e| e.record.clone())
    }

    /// Snapshot of all records, newest first (by creation time, then
    /// insertion order).
    pub async fn list(&self) -> Vec<JobRecord> {
        let jobs = self.jobs.read().await;
        let mut entries: Vec<_> = jobs
            .values()
            .map(|e| (e.record.created_at, e.seq, e.record.clone()))
            .collect();
        entries.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
        entries.into_iter().map(|(_, _, record)| record).collect()
    }

    /// Number of stored records.
    pub async fn count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Apply a polled status update to a record.
    ///
    /// Terminal records are frozen: the update is silently dropped and the
    /// unchanged record returned. Returns `None` when the job is gone.
    pub async fn apply_status(&self, id: Uuid, update: &StatusUpdate) -> Option<JobRecord> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs.get_mut(&id)?;
        entry.record.apply_status(update, Utc::now());
        Some(entry.record.clone())
    }

    /// Record a transient polling failure on a record.
    ///
    /// Sets `last_error` only; the status stays untouched so the job
    /// remains pollable. Returns `None` when the job is gone.
    pub async fn record_poll_error(&self, id: Uuid, message: &str) -> Option<JobRecord> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs.get_mut(&id)?;
        entry.record.record_poll_error(message, Utc::now());
        Some(entry.record.clone())
    }

    /// Remove a record. Not exposed over HTTP (records are never deleted
    /// in this design); used by tests to exercise the scheduler's
    /// job-vanished path.
    #[cfg(test)]
    pub(crate) async fn remove(&self, id: Uuid) -> Option<JobRecord> {
        self.jobs.write().await.remove(&id).map(|e| e.record)
    }
}
