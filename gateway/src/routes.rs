//! Route definitions for the R&D gateway.

use axum::{
    Router, middleware,
    routing::{get, post, put}
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer
};

use crate::auth::identity_middleware;
use crate::handlers::{characteristics, ingredients, models, processes, series, system};
use crate::state::AppState;

/// Creates the Axum router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .route("/me", get(system::me))
        .route("/test", get(system::tester_space))
        // Public catalogues
        .route("/ingredient/", get(ingredients::list))
        .route("/series", get(series::list))
        .route(
            "/rnd/characteristic/",
            post(characteristics::create).get(characteristics::list)
        )
        .route(
            "/rnd/characteristic/{id}",
            get(characteristics::get)
                .put(characteristics::update)
                .delete(characteristics::delete)
        )
        .route("/rnd/ingredient/", post(ingredients::create))
        .route("/rnd/ingredient/{id}", put(ingredients::update))
        .route("/rnd/model/", post(models::create).get(models::list))
        .route(
            "/rnd/model/{id}",
            get(models::get).put(models::update).delete(models::delete)
        )
        .route("/rnd/process/", post(processes::create).get(processes::list))
        .route(
            "/rnd/process/{id}",
            get(processes::get)
                .put(processes::update)
                .delete(processes::delete)
        )
        .route("/rnd/process/{id}/validate", put(processes::validate))
        .route("/rnd/series/", post(series::create))
        .route("/rnd/series/{id}", put(series::update))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware
        ))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
