use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection}
};
use rnd_core::{Process, ProcessApi, ProcessInput, Role};
use std::sync::Arc;

use super::{check_create, check_update, track};
use crate::auth::Authenticated;
use crate::envelope::{Reply, created, done, ok, ok_with_message};
use crate::error::Result;
use crate::state::AppState;

const ENTITY: &str = "process";

/// POST /rnd/process/
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    payload: std::result::Result<Json<ProcessInput>, JsonRejection>
) -> Result<Reply<Process>> {
    user.require(Role::Researcher, "Only researchers can add processes")?;
    let Json(input) = payload?;
    check_create(&input, "Invalid process")?;

    let process = track(ENTITY, "create", state.api.create_process(&input).await)?;
    tracing::info!(id = %process.id, username = user.username(), "Process created");
    Ok(created(process))
}

/// GET /rnd/process/
pub async fn list(
    State(state): State<Arc<AppState>>,
    _user: Authenticated
) -> Result<Reply<Vec<Process>>> {
    let processes = track(ENTITY, "list", state.api.list_processes().await)?;
    Ok(ok(processes))
}

/// GET /rnd/process/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    _user: Authenticated,
    Path(id): Path<String>
) -> Result<Reply<Process>> {
    let process = track(ENTITY, "get", state.api.get_process(&id).await)?;
    Ok(ok(process))
}

/// PUT /rnd/process/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ProcessInput>, JsonRejection>
) -> Result<Reply<Process>> {
    user.require(Role::Researcher, "Only researchers can modify processes")?;
    let Json(input) = payload?;
    check_update(&input, "Invalid process update")?;

    let process = track(ENTITY, "update", state.api.update_process(&id, &input).await)?;
    Ok(ok(process))
}

/// DELETE /rnd/process/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    Path(id): Path<String>
) -> Result<Reply<()>> {
    user.require(Role::Researcher, "Only researchers can delete processes")?;

    track(ENTITY, "delete", state.api.delete_process(&id).await)?;
    tracing::info!(id = %id, username = user.username(), "Process deleted");
    Ok(done("Process deleted successfully"))
}

/// PUT /rnd/process/{id}/validate
///
/// A tester's sign-off on the process.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    Path(id): Path<String>
) -> Result<Reply<Process>> {
    user.require(Role::Tester, "Only testers can validate processes")?;

    let process = track(ENTITY, "validate", state.api.validate_process(&id).await)?;
    tracing::info!(id = %id, username = user.username(), "Process validated");
    Ok(ok_with_message(process, "Process validated successfully"))
}
