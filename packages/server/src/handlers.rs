//! HTTP handler functions for the violence map API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use violence_map_dataset::Dataset;
use violence_map_incident_models::LEGEND;
use violence_map_query::{
    animation_frames, apply, default_filter, frame_map, layer_groups, to_map_points,
    to_timeline_events,
};
use violence_map_server_models::{
    ApiAnimation, ApiFacets, ApiHealth, ApiMap, ApiReload, ApiTimeline, FilterQueryParams,
};

use crate::AppState;

/// Returns the dataset, or the `503` response to send when it is not
/// loaded.
fn dataset(state: &AppState) -> Result<Arc<Dataset>, HttpResponse> {
    state.repository.load().map_err(|e| {
        log::error!("Dataset unavailable: {e}");
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": format!("Dataset not ready: {e}")
        }))
    })
}

/// `GET /api/health`
///
/// Does not trigger a load; `ready` reflects whether a dataset is cached.
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        ready: state.repository.cached().is_some(),
    })
}

/// `GET /api/summary`
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    match dataset(&state) {
        Ok(dataset) => HttpResponse::Ok().json(dataset.summary()),
        Err(resp) => resp,
    }
}

/// `GET /api/facets`
///
/// Returns the distinct filter values and the initial filter.
pub async fn facets(state: web::Data<AppState>) -> HttpResponse {
    match dataset(&state) {
        Ok(dataset) => HttpResponse::Ok().json(ApiFacets {
            facets: dataset.facets(),
            default_filter: default_filter(&dataset),
        }),
        Err(resp) => resp,
    }
}

/// `GET /api/legend`
pub async fn legend() -> HttpResponse {
    HttpResponse::Ok().json(LEGEND)
}

/// `GET /api/map`
///
/// Markers, framing, and layer groups for the filter in the query string.
pub async fn map(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let dataset = match dataset(&state) {
        Ok(dataset) => dataset,
        Err(resp) => return resp,
    };

    let spec = params.to_filter_spec(dataset.year_bounds());
    let view = apply(&dataset, &spec);

    HttpResponse::Ok().json(ApiMap {
        points: to_map_points(&view),
        frame: frame_map(&view),
        layers: layer_groups(&view),
        empty: view.is_empty(),
    })
}

/// `GET /api/timeline`
pub async fn timeline(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let dataset = match dataset(&state) {
        Ok(dataset) => dataset,
        Err(resp) => return resp,
    };

    let spec = params.to_filter_spec(dataset.year_bounds());
    let view = apply(&dataset, &spec);
    let events = to_timeline_events(&view);
    let empty = events.is_empty();

    HttpResponse::Ok().json(ApiTimeline { events, empty })
}

/// `GET /api/animation`
///
/// One frame per distinct year of the filtered view.
pub async fn animation(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let dataset = match dataset(&state) {
        Ok(dataset) => dataset,
        Err(resp) => return resp,
    };

    let spec = params.to_filter_spec(dataset.year_bounds());
    let view = apply(&dataset, &spec);

    HttpResponse::Ok().json(ApiAnimation {
        frames: animation_frames(&view),
    })
}

/// `POST /api/reload`
///
/// Drops the cached dataset and reads the source again.
pub async fn reload(state: web::Data<AppState>) -> HttpResponse {
    match state.repository.reload() {
        Ok(dataset) => {
            log::info!("Reloaded {} incidents", dataset.len());
            HttpResponse::Ok().json(ApiReload {
                incidents: dataset.len() as u64,
                report: *dataset.report(),
            })
        }
        Err(e) => {
            log::error!("Failed to reload dataset: {e}");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": format!("Failed to reload dataset: {e}")
            }))
        }
    }
}
