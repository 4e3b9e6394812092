//! Modelo de Rental
//! 
//! El alquiler es la entidad central: nace `Active` cuando una reserva se
//! confirma y solo sale de ese estado por `complete` o `cancel`. Nunca se
//! borra, queda como historial.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CustomerId, DriverId, RentalId, RouteId, VehicleId};

/// Tipo de alquiler - fijo desde la creación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RentalType {
    Hourly,
    Daily,
    Route,
}

impl fmt::Display for RentalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RentalType::Hourly => "HOURLY",
            RentalType::Daily => "DAILY",
            RentalType::Route => "ROUTE",
        };
        f.write_str(label)
    }
}

/// Estado del alquiler. `Completed` y `Cancelled` son terminales.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Active,
    Completed,
    Cancelled,
}

impl RentalStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RentalStatus::Active)
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RentalStatus::Active => "ACTIVE",
            RentalStatus::Completed => "COMPLETED",
            RentalStatus::Cancelled => "CANCELLED",
        };
        f.write_str(label)
    }
}

/// Plan solicitado por el cliente, con sus parámetros propios de cada tipo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RentalPlan {
    Hourly { hours: u32 },
    Daily { days: u32 },
    Route { route_id: RouteId },
}

impl RentalPlan {
    pub fn rental_type(&self) -> RentalType {
        match self {
            RentalPlan::Hourly { .. } => RentalType::Hourly,
            RentalPlan::Daily { .. } => RentalType::Daily,
            RentalPlan::Route { .. } => RentalType::Route,
        }
    }

    pub fn route_id(&self) -> Option<RouteId> {
        match self {
            RentalPlan::Route { route_id } => Some(*route_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rental {
    pub id: RentalId,
    pub customer_id: CustomerId,
    pub vehicle_id: VehicleId,
    pub driver_id: Option<DriverId>,
    pub route_id: Option<RouteId>,
    pub rental_type: RentalType,
    pub status: RentalStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_cost: Decimal,
    pub vehicle_rating: Option<u8>,
    pub driver_rating: Option<u8>,
    pub comment: Option<String>,
}

impl Rental {
    pub fn is_active(&self) -> bool {
        self.status == RentalStatus::Active
    }

    /// Solapamiento semiabierto: `[start, end)` contra `[other_start, other_end)`
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end_time && end > self.start_time
    }

    pub fn has_feedback(&self) -> bool {
        self.vehicle_rating.is_some() || self.driver_rating.is_some()
    }
}

/// Valoración opcional que deja el cliente al completar el alquiler
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentalFeedback {
    pub vehicle_rating: u8,
    pub driver_rating: u8,
    pub comment: Option<String>,
}
