use std::sync::Arc;

use validator::Validate;

use crate::dto::vehicle_dto::AvailabilityQuery;
use crate::models::{Rental, VehicleId};
use crate::services::{AvailabilityReport, VehicleReview};
use crate::state::FleetBookingService;
use crate::utils::errors::AppError;

pub struct VehicleController {
    booking: Arc<FleetBookingService>,
}

impl VehicleController {
    pub fn new(booking: Arc<FleetBookingService>) -> Self {
        Self { booking }
    }

    pub async fn availability(
        &self,
        id: VehicleId,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityReport, AppError> {
        query.validate()?;
        let (start, end) = query.window()?;
        self.booking.check_availability(id, start, end).await
    }

    pub async fn schedule(&self, id: VehicleId) -> Result<Vec<Rental>, AppError> {
        self.booking.vehicle_schedule(id).await
    }

    pub async fn reviews(&self, id: VehicleId) -> Result<Vec<VehicleReview>, AppError> {
        self.booking.vehicle_reviews(id).await
    }
}
