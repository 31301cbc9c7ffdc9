use crate::handlers;
use crate::state::{SeriesState, SurfaceState};
use axum::{routing::{get, post}, Router};

pub fn surface_router(state: SurfaceState) -> Router {
    Router::new()
        .route("/", get(handlers::surface_index))
        .route("/healthz", get(handlers::healthz))
        .route("/api/surface", get(handlers::get_surface))
        .route("/api/surface/meta", get(handlers::get_surface_meta))
        .route("/api/lookup", post(handlers::lookup))
        .with_state(state)
}

pub fn series_router(state: SeriesState) -> Router {
    Router::new()
        .route("/", get(handlers::series_index))
        .route("/healthz", get(handlers::healthz))
        .route("/api/series", get(handlers::get_series))
        .route("/api/series/dates", get(handlers::get_series_dates))
        .with_state(state)
}
