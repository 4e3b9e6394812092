use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::errors::AppResult;
use crate::utils::validation::{parse_rental_time, validate_rental_time};
use chrono::{DateTime, Utc};

// Query de disponibilidad: ?start=YYYY-MM-DD HH:MM&end=YYYY-MM-DD HH:MM
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AvailabilityQuery {
    #[validate(custom = "validate_rental_time")]
    pub start: String,
    #[validate(custom = "validate_rental_time")]
    pub end: String,
}

impl AvailabilityQuery {
    pub fn window(&self) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((parse_rental_time(&self.start)?, parse_rental_time(&self.end)?))
    }
}
