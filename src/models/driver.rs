//! Modelo de Driver
//! 
//! Conductores asignables a un alquiler. Un conductor está `Busy` mientras
//! tiene asignado un alquiler activo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{running_average, DriverId, VehicleCategory};

/// Estado del conductor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    Available,
    Busy,
    Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub category: VehicleCategory,
    pub status: DriverStatus,
    pub rating: f64,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub total_trips: u32,
    #[serde(default)]
    pub total_earnings: Decimal,
    #[serde(default)]
    pub last_active: Option<DateTime<Utc>>,
}

impl Driver {
    pub fn is_available_for(&self, category: VehicleCategory) -> bool {
        self.status == DriverStatus::Available && self.category == category
    }

    pub fn set_status(&mut self, status: DriverStatus, at: DateTime<Utc>) {
        self.status = status;
        self.last_active = Some(at);
    }

    pub fn add_rating(&mut self, rating: u8, at: DateTime<Utc>) {
        self.rating = running_average(self.rating, self.rating_count, rating);
        self.rating_count += 1;
        self.last_active = Some(at);
    }
}
