use std::sync::Arc;

use validator::Validate;

use crate::dto::invoice_dto::{PaymentRequest, RefundRequest};
use crate::dto::ApiResponse;
use crate::models::{Invoice, InvoiceId, RentalId};
use crate::state::FleetBookingService;
use crate::utils::errors::AppError;

pub struct InvoiceController {
    booking: Arc<FleetBookingService>,
}

impl InvoiceController {
    pub fn new(booking: Arc<FleetBookingService>) -> Self {
        Self { booking }
    }

    pub async fn get_by_id(&self, id: InvoiceId) -> Result<Invoice, AppError> {
        self.booking.find_invoice(id).await
    }

    pub async fn get_by_rental(&self, rental_id: RentalId) -> Result<Invoice, AppError> {
        self.booking.invoice_for_rental(rental_id).await
    }

    pub async fn pay(&self, id: InvoiceId, request: PaymentRequest) -> Result<ApiResponse<Invoice>, AppError> {
        request.validate()?;
        let invoice = self.booking.process_payment(id, request.method, request.reference).await?;
        Ok(ApiResponse::success_with_message(
            invoice,
            format!("Invoice #{} paid", id),
        ))
    }

    pub async fn refund(&self, id: InvoiceId, request: RefundRequest) -> Result<ApiResponse<Invoice>, AppError> {
        request.validate()?;
        let invoice = self.booking.refund_invoice(id, request.reason).await?;
        Ok(ApiResponse::success_with_message(
            invoice,
            format!("Invoice #{} refunded", id),
        ))
    }
}
