//! Route definitions for video generation jobs.
//!
//! Mounted at `/videos`.
//!
//! ```text
//! GET  /                     list_videos
//! POST /                     submit_video
//! GET  /{id}                 get_video
//! GET  /{id}/content         stream_content
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list_videos).post(videos::submit_video))
        .route("/{id}", get(videos::get_video))
        .route("/{id}/content", get(videos::stream_content))
}
