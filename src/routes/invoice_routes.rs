use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::invoice_dto::{PaymentRequest, RefundRequest};
use crate::dto::ApiResponse;
use crate::models::{Invoice, InvoiceId, RentalId};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_invoice_router() -> Router<AppState> {
    Router::new()
        .route("/:id", get(get_invoice))
        .route("/rental/:rental_id", get(get_invoice_by_rental))
        .route("/:id/pay", post(pay_invoice))
        .route("/:id/refund", post(refund_invoice))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
) -> Result<Json<Invoice>, AppError> {
    let controller = InvoiceController::new(state.booking.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn get_invoice_by_rental(
    State(state): State<AppState>,
    Path(rental_id): Path<RentalId>,
) -> Result<Json<Invoice>, AppError> {
    let controller = InvoiceController::new(state.booking.clone());
    let response = controller.get_by_rental(rental_id).await?;
    Ok(Json(response))
}

async fn pay_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let controller = InvoiceController::new(state.booking.clone());
    let response = controller.pay(id, request).await?;
    Ok(Json(response))
}

async fn refund_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
    request: Option<Json<RefundRequest>>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let controller = InvoiceController::new(state.booking.clone());
    let response = controller.refund(id, request).await?;
    Ok(Json(response))
}
