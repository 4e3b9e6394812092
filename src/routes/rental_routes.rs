use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::rental_controller::RentalController;
use crate::dto::rental_dto::{BookingResponse, CompleteRentalRequest, CreateRentalRequest};
use crate::dto::ApiResponse;
use crate::models::{CustomerId, Rental, RentalId};
use crate::services::CompletionOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rental_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_rental))
        .route("/", get(list_rentals))
        .route("/:id", get(get_rental))
        .route("/:id/complete", post(complete_rental))
        .route("/:id/cancel", post(cancel_rental))
}

pub fn create_customer_router() -> Router<AppState> {
    Router::new().route("/:id/rentals", get(list_customer_rentals))
}

async fn create_rental(
    State(state): State<AppState>,
    Json(request): Json<CreateRentalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), AppError> {
    let controller = RentalController::new(state.booking.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<RentalId>,
) -> Result<Json<Rental>, AppError> {
    let controller = RentalController::new(state.booking.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_rentals(
    State(state): State<AppState>,
) -> Result<Json<Vec<Rental>>, AppError> {
    let controller = RentalController::new(state.booking.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn list_customer_rentals(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<Vec<Rental>>, AppError> {
    let controller = RentalController::new(state.booking.clone());
    let response = controller.list_by_customer(id).await?;
    Ok(Json(response))
}

async fn complete_rental(
    State(state): State<AppState>,
    Path(id): Path<RentalId>,
    body: Bytes,
) -> Result<Json<ApiResponse<CompletionOutcome>>, AppError> {
    let request = CompleteRentalRequest::from_body(&body)?;
    let controller = RentalController::new(state.booking.clone());
    let response = controller.complete(id, request).await?;
    Ok(Json(response))
}

async fn cancel_rental(
    State(state): State<AppState>,
    Path(id): Path<RentalId>,
) -> Result<Json<ApiResponse<Rental>>, AppError> {
    let controller = RentalController::new(state.booking.clone());
    let response = controller.cancel(id).await?;
    Ok(Json(response))
}
