use std::sync::Arc;

use vidgate_provider::VideoApi;

use crate::config::ServerConfig;
use crate::scheduler::PollScheduler;
use crate::store::JobStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Provider API client (read-only credential, fixed at startup).
    pub provider: Arc<VideoApi>,
    /// In-memory job store; single source of truth for job state.
    pub store: Arc<JobStore>,
    /// Per-job polling tasks.
    pub scheduler: Arc<PollScheduler>,
}
