use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::AvailabilityQuery;
use crate::models::{Rental, VehicleId};
use crate::services::{AvailabilityReport, VehicleReview};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/:id/availability", get(get_availability))
        .route("/:id/schedule", get(get_schedule))
        .route("/:id/reviews", get(get_reviews))
}

async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<VehicleId>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityReport>, AppError> {
    let controller = VehicleController::new(state.booking.clone());
    let response = controller.availability(id, query).await?;
    Ok(Json(response))
}

async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<VehicleId>,
) -> Result<Json<Vec<Rental>>, AppError> {
    let controller = VehicleController::new(state.booking.clone());
    let response = controller.schedule(id).await?;
    Ok(Json(response))
}

async fn get_reviews(
    State(state): State<AppState>,
    Path(id): Path<VehicleId>,
) -> Result<Json<Vec<VehicleReview>>, AppError> {
    let controller = VehicleController::new(state.booking.clone());
    let response = controller.reviews(id).await?;
    Ok(Json(response))
}
