//! Detector de conflictos
//!
//! Compara una ventana candidata con los alquileres activos de un vehículo.
//! Las ventanas son semiabiertas: una reserva que termina justo cuando
//! empieza otra no entra en conflicto.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CustomerId, Rental, RentalId, VehicleId};
use crate::utils::validation::format_rental_time;

/// Alquiler activo que se solapa con la ventana pedida
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentalConflict {
    pub rental_id: RentalId,
    pub customer_id: CustomerId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl RentalConflict {
    /// Línea legible para informar al cliente
    pub fn describe(&self, position: usize) -> String {
        format!(
            "Conflict #{}: Rental ID {} (Customer {}) - {} to {}",
            position,
            self.rental_id,
            self.customer_id,
            format_rental_time(&self.start_time),
            format_rental_time(&self.end_time),
        )
    }
}

impl From<&Rental> for RentalConflict {
    fn from(rental: &Rental) -> Self {
        Self {
            rental_id: rental.id,
            customer_id: rental.customer_id,
            start_time: rental.start_time,
            end_time: rental.end_time,
        }
    }
}

/// Todos los alquileres activos del vehículo que se solapan con `[start, end)`
pub fn find_conflicts(
    rentals: &[Rental],
    vehicle_id: VehicleId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<RentalConflict> {
    rentals
        .iter()
        .filter(|r| r.vehicle_id == vehicle_id && r.is_active())
        .filter(|r| r.overlaps(start, end))
        .map(RentalConflict::from)
        .collect()
}

pub fn is_available_for_window(
    rentals: &[Rental],
    vehicle_id: VehicleId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    find_conflicts(rentals, vehicle_id, start, end).is_empty()
}
