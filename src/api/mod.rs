//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{session::LocalSessionProvider, state::AppState};
use handlers::*;

/// Shared context handed to every endpoint handler
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
    pub provider: Arc<LocalSessionProvider>,
    pub host: String,
    pub port: u16,
}

/// Create the HTTP router with all endpoints
pub fn create_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/login/:user", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/activity/:kind", post(activity_handler))
        .route("/extend", post(extend_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
