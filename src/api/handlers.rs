//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

use crate::{
    cooking::{SavedSteakInput, Steak, SteakInput},
    schedule::{target_duration, SchedulePlan},
    state::{format_clock, AppState},
};
use super::responses::{
    ApiError, ApiResponse, HealthResponse, PreferenceRequest, PreferenceResponse,
    SavedSteakInfoRequest, SavedSteakListResponse, SavedSteakResponse, StatusResponse,
    SteakListResponse, SteakResponse,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn steak_response(
    state: &AppState,
    changed: Option<Steak>,
    message: &str,
) -> SteakResponse {
    let steaks = state.list_steaks().await;
    let target_seconds = target_duration(&steaks);
    let (status, message) = match changed {
        Some(_) => ("ok".to_string(), message.to_string()),
        None => ("unchanged".to_string(), "Steak not found, nothing changed".to_string()),
    };
    SteakResponse {
        status,
        message,
        steak: changed,
        steaks,
        target_seconds,
    }
}

/// Handle GET /steaks - List steaks in grilling order
pub async fn list_steaks_handler(State(state): State<Arc<AppState>>) -> Json<SteakListResponse> {
    let steaks = state.list_steaks().await;
    let target_seconds = target_duration(&steaks);
    Json(SteakListResponse { steaks, target_seconds })
}

/// Handle POST /steaks - Add a steak
pub async fn add_steak_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SteakInput>,
) -> ApiResult<SteakResponse> {
    let steak = state.add_steak(input).await?;
    Ok(Json(steak_response(&state, Some(steak), "Steak added").await))
}

/// Handle PUT /steaks/:index - Replace a steak
pub async fn edit_steak_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Json(input): Json<SteakInput>,
) -> ApiResult<SteakResponse> {
    let edited = state.edit_steak(index, input).await?;
    Ok(Json(steak_response(&state, edited, "Steak updated").await))
}

/// Handle DELETE /steaks/:index - Remove a steak
pub async fn remove_steak_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<SteakResponse> {
    let removed = state.remove_steak(index).await?;
    Ok(Json(steak_response(&state, removed, "Steak removed").await))
}

/// Handle GET /schedule - Preview target, groups and notifications
pub async fn schedule_handler(State(state): State<Arc<AppState>>) -> Json<SchedulePlan> {
    Json(state.schedule_plan().await)
}

/// Handle POST /session/start - Start the synchronized countdown
pub async fn start_session_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let timer = state.start_session().await?;
    info!("Start endpoint called - cook session running");
    Ok(Json(ApiResponse::active(
        format!("Cook session started, done in {}", format_clock(timer.target_seconds)),
        timer,
    )))
}

/// Handle POST /session/stop - Stop the countdown and cancel notifications
pub async fn stop_session_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    let timer = state.stop_session().await?;
    info!("Stop endpoint called - cook session stopped");
    Ok(Json(ApiResponse::inactive(
        "Cook session stopped, notifications cancelled".to_string(),
        timer,
    )))
}

/// Handle GET /status - Return current countdown and steaks
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.timer_state();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        clock: format_clock(timer.display_seconds()),
        timer,
        steaks: state.list_steaks().await,
        notices: state.notices(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle POST /notices/clear - Dismiss pending notices
pub async fn clear_notices_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let cleared = state.clear_notices();
    info!("Dismissed {} notices", cleared);
    status_handler(State(state)).await
}

/// Handle GET /saved-steaks
pub async fn list_saved_steaks_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<SavedSteakListResponse> {
    Ok(Json(SavedSteakListResponse {
        saved_steaks: state.saved_steaks.list()?,
    }))
}

/// Handle POST /saved-steaks - Save a steak for reuse
pub async fn create_saved_steak_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<SavedSteakInput>,
) -> ApiResult<SavedSteakResponse> {
    let saved = state.saved_steaks.create(input)?;
    Ok(Json(SavedSteakResponse {
        status: "ok".to_string(),
        message: format!("Saved steak {}", saved.id),
        saved_steak: Some(saved),
    }))
}

/// Handle PUT /saved-steaks/:id
pub async fn update_saved_steak_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(input): Json<SavedSteakInput>,
) -> ApiResult<SavedSteakResponse> {
    let updated = state.saved_steaks.update(id, input)?;
    let (status, message) = match &updated {
        Some(_) => ("ok", format!("Updated saved steak {}", id)),
        None => ("unchanged", format!("Saved steak {} not found, nothing changed", id)),
    };
    Ok(Json(SavedSteakResponse {
        status: status.to_string(),
        message,
        saved_steak: updated,
    }))
}

/// Handle DELETE /saved-steaks/:id
pub async fn delete_saved_steak_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<SavedSteakResponse> {
    let deleted = state.saved_steaks.delete(id)?;
    let (status, message) = if deleted {
        ("ok", format!("Deleted saved steak {}", id))
    } else {
        ("unchanged", format!("Saved steak {} not found, nothing changed", id))
    };
    Ok(Json(SavedSteakResponse {
        status: status.to_string(),
        message,
        saved_steak: None,
    }))
}

/// Handle PUT /saved-steaks/:id/info - Attach notes to a saved steak
pub async fn set_saved_steak_info_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(request): Json<SavedSteakInfoRequest>,
) -> ApiResult<SavedSteakResponse> {
    state.saved_steaks.set_info(id, &request.info)?;
    Ok(Json(SavedSteakResponse {
        status: "ok".to_string(),
        message: format!("Info stored for saved steak {}", id),
        saved_steak: state.saved_steaks.get(id)?,
    }))
}

/// Handle POST /saved-steaks/:id/cook - Add a saved steak to the grill list
pub async fn cook_saved_steak_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<SteakResponse> {
    let steak = state.cook_saved_steak(id).await?;
    Ok(Json(steak_response(&state, Some(steak), "Saved steak added").await))
}

/// Handle GET /preferences/skip-intro
pub async fn get_skip_intro_handler(State(state): State<Arc<AppState>>) -> Json<PreferenceResponse> {
    Json(PreferenceResponse {
        skip_intro: state.skip_intro(),
    })
}

/// Handle PUT /preferences/skip-intro
pub async fn set_skip_intro_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PreferenceRequest>,
) -> ApiResult<PreferenceResponse> {
    state.set_skip_intro(request.skip_intro)?;
    Ok(Json(PreferenceResponse {
        skip_intro: state.skip_intro(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
