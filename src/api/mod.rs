pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use dto::AppState;
use handlers::ApiDoc;

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/plants", get(handlers::list_plants).post(handlers::create_plant))
        .route(
            "/plants/{id}",
            get(handlers::get_plant)
                .patch(handlers::update_plant)
                .delete(handlers::delete_plant),
        )
        .route("/plants/{id}/status", get(handlers::plant_status))
        .route("/readings", post(handlers::record_reading))
        .route("/readings/latest", get(handlers::latest_reading))
        .route("/readings/chart", get(handlers::reading_chart))
        .with_state(state)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
