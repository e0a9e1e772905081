//! Handlers for the `/videos` resource.
//!
//! Submission, status lookup, listing, and content relay for tracked
//! generation jobs. Submission validates before the provider is
//! contacted and begins background polling once a provider job id
//! exists; content relay forwards byte-range requests and streams the
//! asset through without buffering.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use vidgate_core::error::CoreError;
use vidgate_core::job::{CreateJobParams, JobRecord};
use vidgate_core::validation::validate_params;
use vidgate_provider::types::CreateVideoRequest;

use crate::error::{AppError, AppResult};
use crate::relay;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/videos
///
/// Validate generation parameters, create the job at the provider, store
/// the record, and begin polling. Returns 201 with the stored record.
/// Invalid input never reaches the provider.
pub async fn submit_video(
    State(state): State<AppState>,
    Json(input): Json<CreateJobParams>,
) -> AppResult<impl IntoResponse> {
    let params = validate_params(&input)?;

    let request = CreateVideoRequest {
        prompt: params.prompt.clone(),
        model: params.model.clone(),
        size: params.size.clone(),
        seconds: params.seconds.to_string(),
    };
    let created = state.provider.create_video(&request).await?;

    let job = JobRecord::from_submission(
        Uuid::new_v4(),
        params,
        created.id.clone(),
        created.status_update(),
        created.metadata(),
        Utc::now(),
    );
    let has_provider_id = job.provider_job_id.is_some();
    let terminal_at_creation = job.status.is_terminal();

    tracing::info!(
        job_id = %job.id,
        provider_job_id = ?job.provider_job_id,
        model = %job.model,
        "Video job submitted",
    );

    let job_id = job.id;
    state.store.insert(job.clone()).await;

    if !has_provider_id {
        // Without a provider id there is nothing to poll; the record
        // stays visible in whatever state the provider reported.
        tracing::warn!(job_id = %job_id, "Provider omitted a job id; job will not be polled");
    } else if !terminal_at_creation {
        state.scheduler.schedule(job_id).await;
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/videos
///
/// List all tracked jobs, newest first.
pub async fn list_videos(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let jobs = state.store.list().await;
    Ok(Json(DataResponse { data: jobs }))
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /api/v1/videos/{id}
///
/// Get a single job by ID.
pub async fn get_video(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .store
        .get(job_id)
        .await
        .ok_or(CoreError::NotFound(job_id))?;
    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Content relay
// ---------------------------------------------------------------------------

/// GET /api/v1/videos/{id}/content
///
/// Relay the rendered asset from the provider. An inbound `Range` header
/// is forwarded verbatim and the provider's range/length headers are
/// echoed back; provider error responses pass through with their
/// original status. Jobs that have no provider id yet are reported as
/// not ready without contacting the provider.
pub async fn stream_content(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let job = state
        .store
        .get(job_id)
        .await
        .ok_or(CoreError::NotFound(job_id))?;
    let Some(provider_job_id) = job.provider_job_id else {
        return Err(CoreError::NotReady(job_id).into());
    };

    let range = match headers.get(header::RANGE) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AppError::BadRequest("Invalid Range header".into()))?,
        ),
        None => None,
    };

    let upstream = state
        .provider
        .fetch_content(&provider_job_id, range)
        .await?;

    if !upstream.status().is_success() {
        return Ok(relay::relay_error(upstream).await);
    }

    tracing::debug!(
        job_id = %job_id,
        status = %upstream.status(),
        range = range.unwrap_or("-"),
        "Relaying video content",
    );

    Ok(relay::relay_success(upstream))
}
