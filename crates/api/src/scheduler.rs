//! Fixed-interval polling of in-flight jobs.
//!
//! One spawned task per in-flight job, registered by job id, so ticks for
//! a single job are strictly sequential while jobs poll independently of
//! each other. A task re-checks the store on every tick (state may have
//! changed while it slept) and stops itself when the job vanishes,
//! reaches a terminal state, or the scheduler shuts down.
//!
//! Transient status-fetch failures are recorded on the record and retried
//! at the same fixed interval, indefinitely; only a provider-reported job
//! failure terminates polling, through the `Failed` state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vidgate_provider::VideoApi;

use crate::store::JobStore;

/// Default delay between successive status checks for one job.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Schedules and owns the per-job polling tasks.
///
/// Created once at application startup; the returned `Arc` is cheaply
/// cloned into Axum state. At most one live polling task exists per job
/// id ([`PollScheduler::schedule`] is idempotent).
pub struct PollScheduler {
    /// Live polling tasks indexed by job id.
    tasks: RwLock<HashMap<Uuid, PollTask>>,
    store: Arc<JobStore>,
    provider: Arc<VideoApi>,
    interval: Duration,
    /// Master cancellation token -- cancelled during shutdown.
    cancel: CancellationToken,
}

/// Internal bookkeeping for a single job's polling task.
struct PollTask {
    handle: tokio::task::JoinHandle<()>,
    /// Per-job cancellation token (child of the master token).
    cancel: CancellationToken,
}

impl PollScheduler {
    /// Create a scheduler polling at `interval`.
    pub fn new(store: Arc<JobStore>, provider: Arc<VideoApi>, interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            tasks: RwLock::new(HashMap::new()),
            store,
            provider,
            interval,
            cancel: CancellationToken::new(),
        })
    }

    /// Begin polling a job.
    ///
    /// Idempotent: a job that already has a live polling task is left
    /// alone, so at most one pending check exists per job id. Entries
    /// whose task has already finished are replaced.
    pub async fn schedule(&self, job_id: Uuid) {
        let mut tasks = self.tasks.write().await;
        if let Some(existing) = tasks.get(&job_id) {
            if !existing.handle.is_finished() {
                return;
            }
        }

        let cancel = self.cancel.child_token();
        let task_cancel = cancel.clone();
        let store = Arc::clone(&self.store);
        let provider = Arc::clone(&self.provider);
        let interval = self.interval;
        let handle = tokio::spawn(async move {
            poll_loop(store, provider, interval, job_id, task_cancel).await;
        });

        tasks.insert(job_id, PollTask { handle, cancel });
        tracing::debug!(%job_id, "Polling scheduled");
    }

    /// Number of live polling tasks.
    pub async fn active_count(&self) -> usize {
        self.tasks
            .read()
            .await
            .values()
            .filter(|t| !t.handle.is_finished())
            .count()
    }

    /// Cancel every outstanding polling task and clear the registry.
    ///
    /// Safe to call when no tasks exist. Must run before any bulk
    /// re-scheduling so a job never ends up with two concurrent pollers.
    pub async fn cancel_all(&self) {
        let mut tasks = self.tasks.write().await;
        for (job_id, task) in tasks.drain() {
            task.cancel.cancel();
            task.handle.abort();
            tracing::debug!(%job_id, "Polling cancelled");
        }
    }

    /// Stop all polling permanently. Called during graceful shutdown.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.cancel_all().await;
    }
}

/// Per-job loop: sleep one interval, then run a tick; repeat until the
/// tick reports the job is done with polling or the task is cancelled.
async fn poll_loop(
    store: Arc<JobStore>,
    provider: Arc<VideoApi>,
    interval: Duration,
    job_id: Uuid,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(%job_id, "Polling stopped by cancellation");
                break;
            }
            _ = tokio::time::sleep(interval) => {
                if !tick(&store, &provider, job_id).await {
                    break;
                }
            }
        }
    }
}

/// One status check for one job. Returns whether to arm the next check.
async fn tick(store: &JobStore, provider: &VideoApi, job_id: Uuid) -> bool {
    // Re-fetch from the store: state may have changed while we slept.
    let Some(job) = store.get(job_id).await else {
        tracing::debug!(%job_id, "Job no longer in store; polling stops");
        return false;
    };
    if job.status.is_terminal() {
        return false;
    }
    let Some(provider_job_id) = job.provider_job_id else {
        tracing::warn!(%job_id, "Job has no provider job id; polling stops");
        return false;
    };

    match provider.fetch_status(&provider_job_id).await {
        Ok(response) => {
            let update = response.status_update();
            // The record may have terminated while the fetch was in
            // flight; apply_status drops the update in that case.
            let Some(updated) = store.apply_status(job_id, &update).await else {
                return false;
            };
            if updated.status.is_terminal() {
                tracing::info!(
                    %job_id,
                    status = %updated.status,
                    "Job reached terminal state; polling stops",
                );
                return false;
            }
            true
        }
        Err(e) => {
            // Transient: record it and retry on the next tick.
            tracing::warn!(%job_id, error = %e, "Status poll failed; will retry");
            store.record_poll_error(job_id, &e.to_string()).await;
            true
        }
    }
}
