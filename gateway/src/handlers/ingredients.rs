use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection}
    }
};
use rnd_core::{Ingredient, IngredientInput, IngredientsApi, Role};
use std::sync::Arc;

use super::{check_create, check_update, track};
use crate::auth::Authenticated;
use crate::envelope::{Reply, created, ok};
use crate::error::Result;
use crate::state::AppState;

const ENTITY: &str = "ingredient";

/// POST /rnd/ingredient/
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    payload: std::result::Result<Json<IngredientInput>, JsonRejection>
) -> Result<Reply<Ingredient>> {
    user.require(Role::Researcher, "Only researchers can add ingredients")?;
    let Json(input) = payload?;
    check_create(&input, "Invalid ingredient")?;

    let ingredient = track(ENTITY, "create", state.api.create_ingredient(&input).await)?;
    tracing::info!(id = ingredient.id, username = user.username(), "Ingredient created");
    Ok(created(ingredient))
}

/// GET /ingredient/ (public)
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Reply<Vec<Ingredient>>> {
    let ingredients = track(ENTITY, "list", state.api.list_ingredients().await)?;
    Ok(ok(ingredients))
}

/// PUT /rnd/ingredient/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<IngredientInput>, JsonRejection>
) -> Result<Reply<Ingredient>> {
    user.require(Role::Researcher, "Only researchers can modify ingredients")?;
    let Path(id) = id?;
    let Json(input) = payload?;
    check_update(&input, "Invalid ingredient update")?;

    let ingredient = track(ENTITY, "update", state.api.update_ingredient(id, &input).await)?;
    Ok(ok(ingredient))
}
