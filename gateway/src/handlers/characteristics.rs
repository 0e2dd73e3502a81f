use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection}
};
use rnd_core::{Characteristic, CharacteristicInput, CharacteristicsApi, Role};
use std::sync::Arc;

use super::{check_create, check_update, track};
use crate::auth::Authenticated;
use crate::envelope::{Reply, created, done, ok};
use crate::error::Result;
use crate::state::AppState;

const ENTITY: &str = "characteristic";

/// POST /rnd/characteristic/
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    payload: std::result::Result<Json<CharacteristicInput>, JsonRejection>
) -> Result<Reply<Characteristic>> {
    user.require(Role::Researcher, "Only researchers can add characteristics")?;
    let Json(input) = payload?;
    check_create(&input, "Invalid characteristic")?;

    let characteristic = track(
        ENTITY,
        "create",
        state.api.create_characteristic(&input).await
    )?;
    tracing::info!(id = %characteristic.id, username = user.username(), "Characteristic created");
    Ok(created(characteristic))
}

/// GET /rnd/characteristic/
pub async fn list(
    State(state): State<Arc<AppState>>,
    _user: Authenticated
) -> Result<Reply<Vec<Characteristic>>> {
    let characteristics = track(ENTITY, "list", state.api.list_characteristics().await)?;
    Ok(ok(characteristics))
}

/// GET /rnd/characteristic/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    _user: Authenticated,
    Path(id): Path<String>
) -> Result<Reply<Characteristic>> {
    let characteristic = track(ENTITY, "get", state.api.find_characteristic(&id).await)?;
    Ok(ok(characteristic))
}

/// PUT /rnd/characteristic/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    Path(id): Path<String>,
    payload: std::result::Result<Json<CharacteristicInput>, JsonRejection>
) -> Result<Reply<Characteristic>> {
    user.require(Role::Researcher, "Only researchers can modify characteristics")?;
    let Json(input) = payload?;
    check_update(&input, "Invalid characteristic update")?;

    let characteristic = track(
        ENTITY,
        "update",
        state.api.update_characteristic(&id, &input).await
    )?;
    Ok(ok(characteristic))
}

/// DELETE /rnd/characteristic/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    Path(id): Path<String>
) -> Result<Reply<()>> {
    user.require(Role::Researcher, "Only researchers can delete characteristics")?;

    track(ENTITY, "delete", state.api.delete_characteristic(&id).await)?;
    tracing::info!(id = %id, username = user.username(), "Characteristic deleted");
    Ok(done("Characteristic deleted successfully"))
}
