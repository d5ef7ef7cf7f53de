//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HealthDto, RaceDebugDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto::ok())
}

/// Debug endpoint exposing the current session (for testing purposes)
pub async fn debug_race(State(state): State<Arc<AppState>>) -> Json<RaceDebugDto> {
    let race = state.session.race().await;
    Json(RaceDebugDto::from(&race))
}
