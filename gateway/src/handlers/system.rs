//! Health, metrics and identity endpoints.

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse
};
use rnd_core::Role;
use security::Principal;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::auth::Authenticated;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION")
    })
}

/// GET /metrics
///
/// Prometheus text exposition; empty when metrics are disabled.
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body
    )
}

/// GET /me
///
/// The caller's username and resolved roles.
pub async fn me(principal: Option<Extension<Principal>>) -> impl IntoResponse {
    match principal {
        Some(Extension(principal)) => (
            StatusCode::OK,
            Json(json!({
                "username": principal.username,
                "role": principal.roles
            }))
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "no authenticated user" }))
        )
    }
}

/// GET /test
///
/// Landing page of the testers' space.
pub async fn tester_space(user: Authenticated) -> Result<&'static str> {
    user.require(Role::Tester, "Only testers can access the testers space")?;
    Ok("welcome to testers space")
}
