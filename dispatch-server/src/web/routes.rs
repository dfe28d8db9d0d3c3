//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::dispatch::{ServerEvent, Trip};

use super::dto::*;
use super::socket::ws_handler;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/map", get(map_summary))
        .route("/api/trip/request", post(request_trip))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Summary of the loaded map and connected devices.
async fn map_summary(State(state): State<AppState>) -> Json<MapSummary> {
    let graph = state.planner.graph();
    Json(MapSummary {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        places: graph.place_count(),
        heuristic: state.planner.config().heuristic.to_string(),
        connected_channels: state.registry.connected_count(),
        registered_cars: state.registry.registered_count(),
    })
}

/// Plan a trip and send it to the requested car.
async fn request_trip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TripResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: TripRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "unparseable trip request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let (start, destination) = req.endpoints().ok_or_else(|| AppError::BadRequest {
        message: "Missing destination or start location".to_string(),
    })?;
    info!(%start, %destination, car = ?req.car_id, "received trip request");

    // The search is CPU-bound and scales with the map, so keep it off the
    // async workers.
    let planner = Arc::clone(&state.planner);
    let (from, to) = (start.clone(), destination.clone());
    let route = tokio::task::spawn_blocking(move || planner.plan_detailed(&from, &to))
        .await
        .map_err(|e| AppError::Internal {
            message: format!("route search failed: {e}"),
        })?
        .ok_or_else(|| AppError::NotFound {
            message: format!("trip cancelled: no path from {start} to {destination}"),
        })?;

    let trip = Trip::new(start.clone(), destination.clone(), route.poses);
    let trip_id = trip.trip_id().clone();
    let delivery = state
        .registry
        .dispatch(req.car_id.as_ref(), ServerEvent::SubGoals(trip));
    info!(trip = %trip_id, length = route.length, ?delivery, "trip dispatched");

    Ok(Json(TripResponse {
        message: "Trip received and sent to car".to_string(),
        trip_id,
        delivery: delivery.into(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
