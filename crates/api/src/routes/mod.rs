pub mod health;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /videos                    list, submit (GET, POST)
/// /videos/{id}               job status (GET)
/// /videos/{id}/content       asset relay (GET, range-aware)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Video generation job tracking and content relay.
        .nest("/videos", videos::router())
}
