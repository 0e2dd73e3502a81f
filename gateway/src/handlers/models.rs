use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection}
    }
};
use rnd_core::{Model, ModelInput, ModelsApi, Role};
use std::sync::Arc;

use super::{check_create, check_update, track};
use crate::auth::Authenticated;
use crate::envelope::{Reply, created, done, ok};
use crate::error::Result;
use crate::state::AppState;

const ENTITY: &str = "model";

type ModelId = std::result::Result<Path<i64>, PathRejection>;

/// POST /rnd/model/
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    payload: std::result::Result<Json<ModelInput>, JsonRejection>
) -> Result<Reply<Model>> {
    user.require(Role::Researcher, "Only researchers can add models")?;
    let Json(input) = payload?;
    check_create(&input, "Invalid product model")?;

    let model = track(ENTITY, "create", state.api.create_model(&input).await)?;
    tracing::info!(id = model.id, username = user.username(), "Model created");
    Ok(created(model))
}

/// GET /rnd/model/
pub async fn list(
    State(state): State<Arc<AppState>>,
    _user: Authenticated
) -> Result<Reply<Vec<Model>>> {
    let models = track(ENTITY, "list", state.api.list_models().await)?;
    Ok(ok(models))
}

/// GET /rnd/model/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    _user: Authenticated,
    id: ModelId
) -> Result<Reply<Model>> {
    let Path(id) = id?;
    let model = track(ENTITY, "get", state.api.get_model(id).await)?;
    Ok(ok(model))
}

/// PUT /rnd/model/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    id: ModelId,
    payload: std::result::Result<Json<ModelInput>, JsonRejection>
) -> Result<Reply<Model>> {
    user.require(Role::Researcher, "Only researchers can modify models")?;
    let Path(id) = id?;
    let Json(input) = payload?;
    check_update(&input, "Invalid model update")?;

    let model = track(ENTITY, "update", state.api.update_model(id, &input).await)?;
    Ok(ok(model))
}

/// DELETE /rnd/model/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    id: ModelId
) -> Result<Reply<()>> {
    user.require(Role::Researcher, "Only researchers can delete models")?;
    let Path(id) = id?;

    track(ENTITY, "delete", state.api.delete_model(id).await)?;
    tracing::info!(id, username = user.username(), "Model deleted");
    Ok(done("Model deleted successfully"))
}
