//! HTTP endpoint handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{session::SessionProvider, state::InteractionKind};
use super::responses::{ApiResponse, HealthResponse, StatusResponse};
use super::ApiContext;

/// Handle POST /login/:user - Start a session for the given user
pub async fn login_handler(
    State(ctx): State<ApiContext>,
    Path(user): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match ctx.provider.login(user) {
        Ok(session) => {
            info!("Login endpoint called for {}", session.user);
            Ok(Json(ApiResponse::signed_in(format!(
                "Session started for {}",
                session.user
            ))))
        }
        Err(e) => {
            error!("Failed to start session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /logout - End the current session
pub async fn logout_handler(State(ctx): State<ApiContext>) -> Result<Json<ApiResponse>, StatusCode> {
    match ctx.provider.sign_out().await {
        Ok(()) => {
            info!("Logout endpoint called, session ended");
            Ok(Json(ApiResponse::signed_out("Session ended".to_string())))
        }
        Err(e) => {
            error!("Failed to sign out: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /activity/:kind - Report a user interaction event
pub async fn activity_handler(
    State(ctx): State<ApiContext>,
    Path(kind): Path<String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let kind: InteractionKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            warn!("Rejected activity report: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    if let Err(e) = ctx.state.record_interaction(kind) {
        error!("Failed to record interaction: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let session_present = ctx.state.is_session_present().unwrap_or(false);
    Ok(Json(ApiResponse::accepted(
        format!("Recorded {} activity", kind),
        session_present,
    )))
}

/// Handle POST /extend - Continue the session from the warning dialog
pub async fn extend_handler(State(ctx): State<ApiContext>) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(e) = ctx.state.extend_session() {
        error!("Failed to extend session: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    info!("Extend endpoint called, idle timer restarted");
    let session_present = ctx.state.is_session_present().unwrap_or(false);
    Ok(Json(ApiResponse::accepted(
        "Session extended".to_string(),
        session_present,
    )))
}

/// Handle GET /status - Return current session and warning status
pub async fn status_handler(State(ctx): State<ApiContext>) -> Result<Json<StatusResponse>, StatusCode> {
    let warning = match ctx.state.get_warning_state() {
        Ok(warning) => warning,
        Err(e) => {
            error!("Failed to get warning state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let session_present = match ctx.state.is_session_present() {
        Ok(present) => present,
        Err(e) => {
            error!("Failed to get session presence: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_event, last_event_time) = ctx.state.get_last_event();

    Ok(Json(StatusResponse {
        session_present,
        warning,
        timeout_secs: ctx.state.policy.timeout.as_secs(),
        warning_secs: ctx.state.policy.warning.as_secs(),
        enabled: ctx.state.policy.enabled,
        login_path: ctx.state.policy.login_path.clone(),
        uptime: ctx.state.get_uptime(),
        port: ctx.port,
        host: ctx.host.clone(),
        last_event,
        last_event_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
