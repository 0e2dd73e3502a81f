use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection}
    }
};
use rnd_core::{Role, Series, SeriesApi, SeriesInput};
use std::sync::Arc;

use super::{check_create, check_update, track};
use crate::auth::Authenticated;
use crate::envelope::{Reply, created, ok};
use crate::error::Result;
use crate::state::AppState;

const ENTITY: &str = "series";

/// POST /rnd/series/
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    payload: std::result::Result<Json<SeriesInput>, JsonRejection>
) -> Result<Reply<Series>> {
    user.require(Role::Researcher, "Only researchers can add series")?;
    let Json(input) = payload?;
    check_create(&input, "Invalid series")?;

    let series = track(ENTITY, "create", state.api.create_series(&input).await)?;
    tracing::info!(id = series.id, username = user.username(), "Series created");
    Ok(created(series))
}

/// GET /series (public)
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Reply<Vec<Series>>> {
    let series = track(ENTITY, "list", state.api.list_series().await)?;
    Ok(ok(series))
}

/// PUT /rnd/series/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    user: Authenticated,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<SeriesInput>, JsonRejection>
) -> Result<Reply<Series>> {
    user.require(Role::Researcher, "Only researchers can modify series")?;
    let Path(id) = id?;
    let Json(input) = payload?;
    check_update(&input, "Invalid series update")?;

    let series = track(ENTITY, "update", state.api.update_series(id, &input).await)?;
    Ok(ok(series))
}
