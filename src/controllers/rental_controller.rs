use std::sync::Arc;

use validator::Validate;

use crate::dto::rental_dto::{BookingResponse, CompleteRentalRequest, CreateRentalRequest};
use crate::dto::ApiResponse;
use crate::models::{CustomerId, Rental, RentalId};
use crate::services::CompletionOutcome;
use crate::state::FleetBookingService;
use crate::utils::errors::AppError;

pub struct RentalController {
    booking: Arc<FleetBookingService>,
}

impl RentalController {
    pub fn new(booking: Arc<FleetBookingService>) -> Self {
        Self { booking }
    }

    pub async fn create(&self, request: CreateRentalRequest) -> Result<ApiResponse<BookingResponse>, AppError> {
        request.validate()?;
        let outcome = self.booking.create_rental(request.into_booking_request()?).await?;

        let message = format!(
            "Rental #{} confirmed, invoice #{} issued",
            outcome.rental.id, outcome.invoice.id
        );
        Ok(ApiResponse::success_with_message(BookingResponse::from(outcome), message))
    }

    pub async fn get_by_id(&self, id: RentalId) -> Result<Rental, AppError> {
        self.booking.find_rental(id).await
    }

    pub async fn list(&self) -> Result<Vec<Rental>, AppError> {
        Ok(self.booking.list_rentals().await)
    }

    pub async fn list_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Rental>, AppError> {
        Ok(self.booking.rentals_for_customer(customer_id).await)
    }

    pub async fn complete(
        &self,
        id: RentalId,
        request: CompleteRentalRequest,
    ) -> Result<ApiResponse<CompletionOutcome>, AppError> {
        request.validate()?;
        let outcome = self.booking.complete_rental(id, request.into_completion()?).await?;
        Ok(ApiResponse::success_with_message(
            outcome,
            format!("Rental #{} completed", id),
        ))
    }

    pub async fn cancel(&self, id: RentalId) -> Result<ApiResponse<Rental>, AppError> {
        let rental = self.booking.cancel_rental(id).await?;
        Ok(ApiResponse::success_with_message(
            rental,
            format!("Rental #{} cancelled", id),
        ))
    }
}
