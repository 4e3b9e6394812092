//! Modelo de Vehicle
//! 
//! Este módulo contiene el struct Vehicle y su categoría. El flag `available`
//! es el indicador grueso de reserva: se apaga al confirmar un alquiler y se
//! vuelve a encender al completarlo o cancelarlo.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::VehicleId;

/// Categoría del vehículo - usada para emparejar conductores
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Car,
    Motorcycle,
    Truck,
    Van,
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VehicleCategory::Car => "CAR",
            VehicleCategory::Motorcycle => "MOTORCYCLE",
            VehicleCategory::Truck => "TRUCK",
            VehicleCategory::Van => "VAN",
        };
        f.write_str(label)
    }
}

/// Vehicle principal de la flota
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub category: VehicleCategory,
    pub rate_per_hour: Decimal,
    pub rate_per_day: Decimal,
    pub available: bool,
    pub active: bool,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rating_count: u32,
}

impl Vehicle {
    /// Texto usado en recibos: "marca modelo CATEGORIA"
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.make, self.model, self.category)
    }

    /// Incorpora una valoración nueva al promedio acumulado
    pub fn add_rating(&mut self, rating: u8) {
        self.average_rating = running_average(self.average_rating, self.rating_count, rating);
        self.rating_count += 1;
    }
}

/// `(promedio * n + nueva) / (n + 1)`
pub fn running_average(average: f64, count: u32, rating: u8) -> f64 {
    (average * f64::from(count) + f64::from(rating)) / f64::from(count + 1)
}
