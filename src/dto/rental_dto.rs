use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{
    CustomerId, Driver, Invoice, Rental, RentalFeedback, RentalPlan, RentalType, RouteId, VehicleId,
};
use crate::services::{BookingNotice, BookingOutcome, BookingRequest, CompletionRequest};
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::{parse_rental_time, validate_rental_time};

// Request para crear una reserva
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateRentalRequest {
    pub customer_id: CustomerId,
    pub vehicle_id: VehicleId,
    pub rental_type: RentalType,
    pub hours: Option<u32>,
    pub days: Option<u32>,
    pub route_id: Option<RouteId>,
    /// `YYYY-MM-DD HH:MM` (UTC); sin él empieza en el siguiente minuto
    #[validate(custom = "validate_rental_time")]
    pub start_time: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub promo_code: Option<String>,
    #[serde(default)]
    pub with_driver: bool,
}

impl CreateRentalRequest {
    pub fn plan(&self) -> AppResult<RentalPlan> {
        match self.rental_type {
            RentalType::Hourly => self
                .hours
                .map(|hours| RentalPlan::Hourly { hours })
                .ok_or_else(|| bad_request_error("hours is required for hourly rentals")),
            RentalType::Daily => self
                .days
                .map(|days| RentalPlan::Daily { days })
                .ok_or_else(|| bad_request_error("days is required for daily rentals")),
            RentalType::Route => self
                .route_id
                .map(|route_id| RentalPlan::Route { route_id })
                .ok_or_else(|| bad_request_error("route_id is required for route rentals")),
        }
    }

    pub fn into_booking_request(self) -> AppResult<BookingRequest> {
        let plan = self.plan()?;
        let start_time = self.start_time.as_deref().map(parse_rental_time).transpose()?;
        Ok(BookingRequest {
            customer_id: self.customer_id,
            vehicle_id: self.vehicle_id,
            plan,
            start_time,
            promo_code: self.promo_code,
            with_driver: self.with_driver,
        })
    }
}

// Request para completar un alquiler
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
pub struct CompleteRentalRequest {
    /// Fin real; si no encaja con `YYYY-MM-DD HH:MM` se conserva el estimado
    pub actual_end: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub vehicle_rating: Option<u8>,
    #[validate(range(min = 1, max = 5))]
    pub driver_rating: Option<u8>,
    pub comment: Option<String>,
}

impl CompleteRentalRequest {
    /// Un cuerpo vacío significa "sin valoración"; cualquier otro debe ser
    /// JSON válido para este request
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| bad_request_error(&format!("invalid completion body: {}", e)))
    }

    pub fn into_completion(self) -> AppResult<CompletionRequest> {
        let feedback = match (self.vehicle_rating, self.driver_rating) {
            (Some(vehicle_rating), Some(driver_rating)) => Some(RentalFeedback {
                vehicle_rating,
                driver_rating,
                comment: self.comment,
            }),
            (None, None) if self.comment.is_none() => None,
            (None, None) => {
                return Err(bad_request_error(
                    "comment requires both vehicle_rating and driver_rating",
                ))
            }
            _ => {
                return Err(bad_request_error(
                    "vehicle_rating and driver_rating must be given together",
                ))
            }
        };
        Ok(CompletionRequest {
            actual_end: self.actual_end,
            feedback,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct NoticeResponse {
    pub code: &'static str,
    pub message: String,
}

impl From<&BookingNotice> for NoticeResponse {
    fn from(notice: &BookingNotice) -> Self {
        Self {
            code: notice.code(),
            message: notice.to_string(),
        }
    }
}

// Response de una reserva confirmada
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub rental: Rental,
    pub invoice: Invoice,
    pub driver: Option<Driver>,
    pub notices: Vec<NoticeResponse>,
}

impl From<BookingOutcome> for BookingResponse {
    fn from(outcome: BookingOutcome) -> Self {
        Self {
            notices: outcome.notices.iter().map(NoticeResponse::from).collect(),
            rental: outcome.rental,
            invoice: outcome.invoice,
            driver: outcome.driver,
        }
    }
}
