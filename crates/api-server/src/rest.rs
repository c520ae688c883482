//! REST handlers for plan generation, media upload, launch, and status.

use adlaunch_core::types::{
    AdPlan, CreatedIds, EntityInfo, EntityStatus, LaunchRequest, MediaRef,
};
use adlaunch_core::{AppConfig, LaunchError};
use adlaunch_meta::{AdsApi, LaunchSequencer};
use adlaunch_planner::PlanGenerator;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub planner: Arc<PlanGenerator>,
    pub ads: Arc<dyn AdsApi>,
    pub sequencer: Arc<LaunchSequencer>,
    pub start_time: Instant,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: &LaunchError) -> ApiError {
    let (status, code) = match err {
        LaunchError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
        LaunchError::Config { .. } => (StatusCode::SERVICE_UNAVAILABLE, "not_configured"),
        LaunchError::RemoteApi { .. } => (StatusCode::BAD_GATEWAY, "meta_api_error"),
        LaunchError::PlanGeneration(_) => (StatusCode::BAD_GATEWAY, "plan_generation_failed"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: err.to_string(),
        }),
    )
}

/// Refuse any operation that would need absent credentials, before the
/// first network call rather than mid-sequence.
fn require_settings(config: &AppConfig) -> Result<(), ApiError> {
    let missing = config.missing_settings();
    if missing.is_empty() {
        return Ok(());
    }
    let err = LaunchError::Config { missing };
    warn!(error = %err, "Operation refused");
    Err(error_response(&err))
}

// ─── Plan ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PlanPrompt {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub plan: AdPlan,
}

/// POST /api/v1/plan — generate an ad plan from a free-text description.
pub async fn generate_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanPrompt>,
) -> Result<Json<PlanResponse>, ApiError> {
    require_settings(&state.config)?;
    let prompt = req.prompt.unwrap_or_default();

    match state.planner.generate(&prompt).await {
        Ok(plan) => {
            metrics::counter!("api.plans_generated").increment(1);
            info!(campaign = %plan.campaign_name, objective = %plan.objective, "Plan generated");
            Ok(Json(PlanResponse { plan }))
        }
        Err(e) => {
            error!(error = %e, "Plan generation failed");
            metrics::counter!("api.plan_errors").increment(1);
            Err(error_response(&e))
        }
    }
}

// ─── Media ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MediaResponse {
    pub media: MediaRef,
}

/// Video uploads are selected by an explicit `kind` field, with a fallback
/// to the declared MIME prefix. Everything else uploads as an image.
pub fn is_video_upload(kind: Option<&str>, mime: Option<&str>) -> bool {
    kind == Some("video") || mime.is_some_and(|m| m.starts_with("video/"))
}

/// POST /api/v1/media — upload one image or video, returning its media ref.
/// Multipart form: `file` (binary), `kind` (optional text, "image"|"video").
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MediaResponse>, ApiError> {
    require_settings(&state.config)?;

    let mut file: Option<(Vec<u8>, String, String)> = None;
    let mut kind: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_response(&LaunchError::Validation(format!("multipart error: {e}")))
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    error_response(&LaunchError::Validation(format!("file read error: {e}")))
                })?;
                file = Some((bytes.to_vec(), filename, mime));
            }
            "kind" => {
                kind = Some(field.text().await.map_err(|e| {
                    error_response(&LaunchError::Validation(format!("kind read error: {e}")))
                })?);
            }
            _ => {}
        }
    }

    let (bytes, filename, mime) = file.ok_or_else(|| {
        error_response(&LaunchError::Validation("missing file".into()))
    })?;

    let result = if is_video_upload(kind.as_deref(), Some(&mime)) {
        state
            .ads
            .upload_video(bytes, &filename, &mime)
            .await
            .map(|id| MediaRef {
                image_hash: None,
                video_id: Some(id),
            })
    } else {
        state
            .ads
            .upload_image(bytes, &filename, &mime)
            .await
            .map(|hash| MediaRef {
                image_hash: Some(hash),
                video_id: None,
            })
    };

    match result {
        Ok(media) => {
            metrics::counter!("api.media_uploaded").increment(1);
            Ok(Json(MediaResponse { media }))
        }
        Err(e) => {
            error!(error = %e, filename = %filename, "Media upload failed");
            metrics::counter!("api.media_errors").increment(1);
            Err(error_response(&e))
        }
    }
}

// ─── Launch ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LaunchResponse {
    pub ids: CreatedIds,
}

/// POST /api/v1/launch — run the full campaign -> ad set -> creative -> ad
/// sequence. A failure part-way through leaves already-created resources on
/// the platform; the response then carries only the failing step's error.
pub async fn launch_campaign(
    State(state): State<AppState>,
    Json(req): Json<LaunchRequest>,
) -> Result<Json<LaunchResponse>, ApiError> {
    require_settings(&state.config)?;

    match state.sequencer.launch(&req).await {
        Ok(ids) => {
            metrics::counter!("api.launches").increment(1);
            Ok(Json(LaunchResponse { ids }))
        }
        Err(e) => {
            error!(error = %e, campaign = %req.plan.campaign_name, "Launch failed");
            metrics::counter!("api.launch_errors").increment(1);
            Err(error_response(&e))
        }
    }
}

// ─── Status ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub data: EntityInfo,
}

/// GET /api/v1/status?id= — fetch id/name/status of any remote resource.
pub async fn entity_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    require_settings(&state.config)?;
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| error_response(&LaunchError::Validation("missing id".into())))?;

    match state.ads.entity_status(&id).await {
        Ok(data) => Ok(Json(StatusResponse { data })),
        Err(e) => {
            error!(error = %e, id = %id, "Status fetch failed");
            Err(error_response(&e))
        }
    }
}

#[derive(Serialize)]
pub struct AdStatusResponse {
    pub id: String,
    pub status: EntityStatus,
}

async fn set_ad_status(
    state: AppState,
    id: String,
    status: EntityStatus,
) -> Result<Json<AdStatusResponse>, ApiError> {
    require_settings(&state.config)?;
    match state.ads.set_ad_status(&id, status).await {
        Ok(()) => {
            info!(ad_id = %id, status = status.as_str(), "Ad status changed");
            Ok(Json(AdStatusResponse { id, status }))
        }
        Err(e) => {
            error!(error = %e, ad_id = %id, "Ad status change failed");
            Err(error_response(&e))
        }
    }
}

/// POST /api/v1/ads/:id/pause
pub async fn pause_ad(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdStatusResponse>, ApiError> {
    set_ad_status(state, id, EntityStatus::Paused).await
}

/// POST /api/v1/ads/:id/resume
pub async fn resume_ad(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdStatusResponse>, ApiError> {
    set_ad_status(state, id, EntityStatus::Active).await
}

// ─── Probes ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub configured: bool,
}

/// GET /health — health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        configured: state.config.missing_settings().is_empty(),
    })
}

/// GET /ready — readiness probe.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live — liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_detected_by_mime_prefix_without_explicit_kind() {
        assert!(is_video_upload(None, Some("video/mp4")));
        assert!(!is_video_upload(None, Some("image/png")));
        assert!(!is_video_upload(None, None));
    }

    #[test]
    fn test_explicit_kind_overrides_mime() {
        assert!(is_video_upload(Some("video"), Some("application/octet-stream")));
        assert!(!is_video_upload(Some("image"), None));
    }

    #[test]
    fn test_error_status_mapping() {
        let (status, _) = error_response(&LaunchError::Validation("x".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(&LaunchError::remote(400, "bad"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = error_response(&LaunchError::Config { missing: vec![] });
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = error_response(&LaunchError::PlanGeneration("x".into()));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }
}
