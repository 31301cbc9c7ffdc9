use crate::errors::AppError;
use crate::figure::{empty_series_figure, series_figure, surface_figure, Figure};
use crate::models::{
    DataKind, DateOptionsQuery, DateOptionsResponse, LookupRequest, LookupResponse, Sensor,
    SeriesQuery, SurfaceMeta, SurfaceQuery,
};
use crate::state::{SeriesState, SurfaceState};
use crate::storage::{date_key, load_sensor_table, parse_date};
use crate::ui::{render_series_index, render_surface_index};
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::{debug, error};

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn surface_index(State(state): State<SurfaceState>) -> Html<String> {
    let default_date = state.data.dates.first().copied().map(date_key);
    Html(render_surface_index(default_date.as_deref().unwrap_or("")))
}

pub async fn get_surface_meta(State(state): State<SurfaceState>) -> Json<SurfaceMeta> {
    let dates = state.data.date_labels();
    Json(SurfaceMeta {
        default_date: dates.first().cloned(),
        dates,
        time_bins: state.data.time_bins.values.clone(),
        default_kind: DataKind::default(),
    })
}

pub async fn get_surface(
    State(state): State<SurfaceState>,
    Query(query): Query<SurfaceQuery>,
) -> Result<Json<Figure>, AppError> {
    let kind = parse_kind(query.kind.as_deref())?;
    debug!(%kind, "building surface figure");
    Ok(Json(surface_figure(&state.data, kind)))
}

pub async fn lookup(
    State(state): State<SurfaceState>,
    Json(payload): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, AppError> {
    let kind = parse_kind(Some(payload.kind.as_str()))?;
    let message = state.data.lookup(kind, payload.date.trim(), payload.time_bin);
    debug!(%kind, date = %payload.date, time_bin = ?payload.time_bin, "lookup: {message}");
    Ok(Json(LookupResponse { message }))
}

pub async fn series_index() -> Html<String> {
    Html(render_series_index(Sensor::default()))
}

pub async fn get_series_dates(
    State(state): State<SeriesState>,
    Query(query): Query<DateOptionsQuery>,
) -> Result<Json<DateOptionsResponse>, AppError> {
    let sensor = parse_sensor(&query.sensor)?;
    let table = load_sensor_table(&state.data_dir, sensor)
        .await
        .inspect_err(|err| error!("failed to load {sensor} table: {err}"))?;

    Ok(Json(DateOptionsResponse {
        sensor,
        dates: table.dates().into_iter().map(date_key).collect(),
    }))
}

pub async fn get_series(
    State(state): State<SeriesState>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Figure>, AppError> {
    let sensor = parse_sensor(&query.sensor)?;
    let dates: Vec<_> = query
        .dates
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(parse_date)
        .collect();

    if dates.is_empty() {
        return Ok(Json(empty_series_figure()));
    }

    let table = load_sensor_table(&state.data_dir, sensor)
        .await
        .inspect_err(|err| error!("failed to load {sensor} table: {err}"))?;
    let rows = table.select(&dates);
    debug!(%sensor, requested = dates.len(), found = rows.len(), "building series figure");

    Ok(Json(series_figure(sensor, &rows)))
}

fn parse_kind(value: Option<&str>) -> Result<DataKind, AppError> {
    match value {
        Some(raw) => raw.parse().map_err(AppError::bad_request),
        None => Ok(DataKind::default()),
    }
}

fn parse_sensor(value: &str) -> Result<Sensor, AppError> {
    value.parse().map_err(AppError::bad_request)
}
