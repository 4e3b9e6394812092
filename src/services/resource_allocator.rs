//! Asignador de recursos
//!
//! Decide qué vehículo y qué conductor sostienen una reserva. Las funciones
//! de este módulo solo eligen; la reserva efectiva (vehículo no disponible,
//! conductor `Busy`) se escribe en el paso de confirmación del servicio de
//! reservas, de modo que una reserva rechazada no deja nada retenido.

use crate::models::{Driver, Vehicle, VehicleCategory, VehicleId};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Conductor libre de la categoría con la valoración estrictamente más alta.
/// Los empates se quedan con el primero encontrado.
pub fn select_driver(drivers: &[Driver], category: VehicleCategory) -> Option<&Driver> {
    drivers
        .iter()
        .filter(|d| d.is_available_for(category))
        .fold(None, |best: Option<&Driver>, candidate| match best {
            Some(current) if candidate.rating <= current.rating => Some(current),
            _ => Some(candidate),
        })
}

/// El vehículo debe existir, estar activo y libre
pub fn ensure_vehicle_bookable(vehicle: Option<Vehicle>, vehicle_id: VehicleId) -> AppResult<Vehicle> {
    let vehicle = vehicle.ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;
    if !vehicle.active {
        return Err(AppError::NotFound(format!("Vehicle #{} is inactive", vehicle_id)));
    }
    if !vehicle.available {
        return Err(AppError::NotFound(format!("Vehicle #{} is not available", vehicle_id)));
    }
    Ok(vehicle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DriverStatus;
    use rust_decimal::Decimal;

    fn driver(id: u32, category: VehicleCategory, rating: f64, status: DriverStatus) -> Driver {
        Driver {
            id,
            name: format!("Driver {}", id),
            phone: String::new(),
            category,
            status,
            rating,
            rating_count: 1,
            total_trips: 0,
            total_earnings: Decimal::ZERO,
            last_active: None,
        }
    }

    #[test]
    fn test_highest_rated_available_driver_wins() {
        let drivers = vec![
            driver(1, VehicleCategory::Car, 4.1, DriverStatus::Available),
            driver(2, VehicleCategory::Car, 4.9, DriverStatus::Busy),
            driver(3, VehicleCategory::Car, 4.7, DriverStatus::Available),
            driver(4, VehicleCategory::Van, 5.0, DriverStatus::Available),
            driver(5, VehicleCategory::Car, 4.8, DriverStatus::Offline),
        ];

        assert_eq!(select_driver(&drivers, VehicleCategory::Car).map(|d| d.id), Some(3));
        assert_eq!(select_driver(&drivers, VehicleCategory::Van).map(|d| d.id), Some(4));
        assert!(select_driver(&drivers, VehicleCategory::Truck).is_none());
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let drivers = vec![
            driver(7, VehicleCategory::Car, 4.5, DriverStatus::Available),
            driver(8, VehicleCategory::Car, 4.5, DriverStatus::Available),
        ];
        assert_eq!(select_driver(&drivers, VehicleCategory::Car).map(|d| d.id), Some(7));
    }

    #[test]
    fn test_unrated_driver_is_still_eligible() {
        let drivers = vec![driver(1, VehicleCategory::Motorcycle, 0.0, DriverStatus::Available)];
        assert_eq!(select_driver(&drivers, VehicleCategory::Motorcycle).map(|d| d.id), Some(1));
    }

    #[test]
    fn test_vehicle_must_be_active_and_available() {
        let vehicle = Vehicle {
            id: 3,
            make: "Honda".to_string(),
            model: "CB500".to_string(),
            category: VehicleCategory::Motorcycle,
            rate_per_hour: Decimal::from(5),
            rate_per_day: Decimal::from(25),
            available: true,
            active: true,
            average_rating: 0.0,
            rating_count: 0,
        };

        assert!(ensure_vehicle_bookable(Some(vehicle.clone()), 3).is_ok());
        assert_eq!(ensure_vehicle_bookable(None, 3).unwrap_err().code(), "NOT_FOUND");

        let unavailable = Vehicle { available: false, ..vehicle.clone() };
        let err = ensure_vehicle_bookable(Some(unavailable), 3).unwrap_err();
        assert!(err.to_string().contains("not available"));

        let inactive = Vehicle { active: false, ..vehicle };
        assert!(ensure_vehicle_bookable(Some(inactive), 3).unwrap_err().to_string().contains("inactive"));
    }
}
