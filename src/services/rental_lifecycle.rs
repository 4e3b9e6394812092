//! Ciclo de vida del alquiler
//!
//! `Active` → `Completed` | `Cancelled`. Ambas transiciones validan todo
//! antes de tocar nada: si el alquiler no existe, no está activo o la
//! valoración es inválida, ni el alquiler ni el vehículo ni el conductor
//! cambian.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RentalPolicy;
use crate::models::{DriverStatus, Rental, RentalFeedback, RentalId, RentalStatus};
use crate::repositories::FleetStore;
use crate::services::pricing_engine::driver_commission;
use crate::utils::errors::{invalid_state_error, not_found_error, validation_error, AppResult};
use crate::utils::validation::{
    is_fixed_width_timestamp, validate_max_chars, validate_rental_datetime, validate_star_rating,
};

/// Datos opcionales que acompañan la finalización
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// Fin real en formato `YYYY-MM-DD HH:MM`; si falta o no encaja se
    /// conserva el fin estimado
    pub actual_end: Option<String>,
    pub feedback: Option<RentalFeedback>,
}

/// Resumen de lo que cambió al completar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionOutcome {
    pub rental: Rental,
    pub driver_earnings: Option<Decimal>,
}

fn load_active_rental<S: FleetStore + ?Sized>(store: &S, rental_id: RentalId) -> AppResult<Rental> {
    let rental = store
        .find_rental_by_id(rental_id)
        .ok_or_else(|| not_found_error("Rental", rental_id))?;
    if rental.status.is_terminal() {
        return Err(invalid_state_error("Rental", rental.id, rental.status));
    }
    Ok(rental)
}

fn validate_feedback(feedback: &RentalFeedback, policy: &RentalPolicy) -> AppResult<()> {
    for (label, rating) in [("vehicle", feedback.vehicle_rating), ("driver", feedback.driver_rating)] {
        if validate_star_rating(rating).is_err() {
            return Err(validation_error(format!("{} rating must be between 1 and 5 (got {})", label, rating)));
        }
    }
    if let Some(comment) = &feedback.comment {
        if validate_max_chars(comment.trim(), policy.max_comment_chars).is_err() {
            return Err(validation_error(format!(
                "comment must be at most {} characters",
                policy.max_comment_chars
            )));
        }
    }
    Ok(())
}

fn resolve_actual_end(actual_end: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = actual_end?.trim();
    if !is_fixed_width_timestamp(raw) {
        debug!("⏱️ Fin real '{}' ignorado: formato no reconocido", raw);
        return None;
    }
    validate_rental_datetime(raw).ok()
}

fn release_vehicle<S: FleetStore + ?Sized>(store: &mut S, rental: &Rental) {
    if let Err(e) = store.mark_vehicle_availability(rental.vehicle_id, true) {
        warn!("⚠️ Alquiler #{}: no se pudo liberar el vehículo #{}: {}", rental.id, rental.vehicle_id, e);
    }
}

/// Completa un alquiler activo, registra la valoración y liquida al conductor
pub fn complete_rental<S: FleetStore + ?Sized>(
    store: &mut S,
    rental_id: RentalId,
    request: &CompletionRequest,
    policy: &RentalPolicy,
    now: DateTime<Utc>,
) -> AppResult<CompletionOutcome> {
    let mut rental = load_active_rental(store, rental_id)?;
    if let Some(feedback) = &request.feedback {
        validate_feedback(feedback, policy)?;
    }

    if let Some(actual_end) = resolve_actual_end(request.actual_end.as_deref()) {
        rental.end_time = actual_end;
    }
    rental.status = RentalStatus::Completed;
    release_vehicle(store, &rental);

    if let Some(feedback) = &request.feedback {
        rental.vehicle_rating = Some(feedback.vehicle_rating);
        rental.driver_rating = Some(feedback.driver_rating);
        rental.comment = feedback
            .comment
            .as_ref()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        if let Err(e) = store.record_vehicle_rating(rental.vehicle_id, feedback.vehicle_rating) {
            warn!("⚠️ Valoración del vehículo #{} no registrada: {}", rental.vehicle_id, e);
        }
        if let Some(driver_id) = rental.driver_id {
            if let Err(e) = store.record_driver_rating(driver_id, feedback.driver_rating, now) {
                warn!("⚠️ Valoración del conductor #{} no registrada: {}", driver_id, e);
            }
        }
    }

    let mut driver_earnings = None;
    if let Some(driver_id) = rental.driver_id {
        let earnings = driver_commission(rental.total_cost, policy.driver_commission_rate);
        let settled = store
            .credit_driver_earnings(driver_id, earnings, now)
            .and_then(|_| store.set_driver_status(driver_id, DriverStatus::Available, now));
        match settled {
            Ok(()) => driver_earnings = Some(earnings),
            Err(e) => warn!("⚠️ Conductor #{} no liquidado: {}", driver_id, e),
        }
    }

    store.update_rental(rental.clone())?;

    Ok(CompletionOutcome {
        rental,
        driver_earnings,
    })
}

/// Cancela un alquiler activo: sin comisión y sin valoración
pub fn cancel_rental<S: FleetStore + ?Sized>(
    store: &mut S,
    rental_id: RentalId,
    now: DateTime<Utc>,
) -> AppResult<Rental> {
    let mut rental = load_active_rental(store, rental_id)?;

    rental.end_time = now;
    rental.status = RentalStatus::Cancelled;
    release_vehicle(store, &rental);

    if let Some(driver_id) = rental.driver_id {
        if let Err(e) = store.set_driver_status(driver_id, DriverStatus::Available, now) {
            warn!("⚠️ Conductor #{} no liberado: {}", driver_id, e);
        }
    }

    store.update_rental(rental.clone())?;
    Ok(rental)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Driver, RentalType, Vehicle, VehicleCategory};
    use crate::repositories::{DriverRepository, InMemoryFleetStore, RentalRepository, VehicleRepository};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 15, 0, 0).unwrap()
    }

    fn store_with_active_rental(driver_id: Option<u32>) -> InMemoryFleetStore {
        let mut store = InMemoryFleetStore::default()
            .with_vehicle(Vehicle {
                id: 1,
                make: "Toyota".to_string(),
                model: "Corolla".to_string(),
                category: VehicleCategory::Car,
                rate_per_hour: Decimal::from(10),
                rate_per_day: Decimal::from(50),
                available: false,
                active: true,
                average_rating: 4.0,
                rating_count: 1,
            })
            .with_driver(Driver {
                id: 1,
                name: "Ana".to_string(),
                phone: String::new(),
                category: VehicleCategory::Car,
                status: DriverStatus::Busy,
                rating: 4.5,
                rating_count: 1,
                total_trips: 3,
                total_earnings: Decimal::from(100),
                last_active: None,
            });
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap();
        store.add_rental(Rental {
            id: 5001,
            customer_id: 9,
            vehicle_id: 1,
            driver_id,
            route_id: None,
            rental_type: RentalType::Hourly,
            status: RentalStatus::Active,
            start_time: start,
            end_time: start + Duration::hours(2),
            total_cost: Decimal::from(20),
            vehicle_rating: None,
            driver_rating: None,
            comment: None,
        });
        store
    }

    #[test]
    fn test_complete_settles_driver_and_frees_vehicle() {
        let mut store = store_with_active_rental(Some(1));
        let request = CompletionRequest {
            actual_end: Some("2026-05-04 14:10".to_string()),
            feedback: Some(RentalFeedback {
                vehicle_rating: 5,
                driver_rating: 4,
                comment: Some("  Smooth ride  ".to_string()),
            }),
        };

        let outcome = complete_rental(&mut store, 5001, &request, &RentalPolicy::default(), now()).unwrap();

        assert_eq!(outcome.rental.status, RentalStatus::Completed);
        assert_eq!(outcome.rental.end_time, Utc.with_ymd_and_hms(2026, 5, 4, 14, 10, 0).unwrap());
        assert_eq!(outcome.rental.comment.as_deref(), Some("Smooth ride"));
        assert_eq!(outcome.driver_earnings, Some(Decimal::from(6)));

        let vehicle = store.find_vehicle_by_id(1).unwrap();
        assert!(vehicle.available);
        assert_eq!(vehicle.rating_count, 2);
        assert!((vehicle.average_rating - 4.5).abs() < 1e-9);

        let driver = store.find_driver_by_id(1).unwrap();
        assert_eq!(driver.status, DriverStatus::Available);
        assert_eq!(driver.total_trips, 4);
        assert_eq!(driver.total_earnings, Decimal::from(106));
        assert!((driver.rating - 4.25).abs() < 1e-9);
        assert_eq!(driver.last_active, Some(now()));
    }

    #[test]
    fn test_malformed_actual_end_keeps_estimate() {
        let mut store = store_with_active_rental(None);
        let request = CompletionRequest {
            actual_end: Some("today at 2pm".to_string()),
            feedback: None,
        };

        let outcome = complete_rental(&mut store, 5001, &request, &RentalPolicy::default(), now()).unwrap();
        assert_eq!(outcome.rental.end_time, Utc.with_ymd_and_hms(2026, 5, 4, 14, 0, 0).unwrap());
        assert!(outcome.driver_earnings.is_none());
        assert!(!outcome.rental.has_feedback());
    }

    #[test]
    fn test_invalid_feedback_changes_nothing() {
        let mut store = store_with_active_rental(Some(1));
        let before = store.clone();
        let request = CompletionRequest {
            actual_end: None,
            feedback: Some(RentalFeedback {
                vehicle_rating: 6,
                driver_rating: 4,
                comment: None,
            }),
        };

        let err = complete_rental(&mut store, 5001, &request, &RentalPolicy::default(), now()).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(store.list_rentals(), before.list_rentals());
        assert_eq!(store.list_drivers(), before.list_drivers());
        assert_eq!(store.list_vehicles(), before.list_vehicles());
    }

    #[test]
    fn test_overlong_comment_changes_nothing() {
        let mut store = store_with_active_rental(Some(1));
        let before = store.clone();
        let policy = RentalPolicy::default();
        let request = CompletionRequest {
            actual_end: Some("2026-05-04 14:10".to_string()),
            feedback: Some(RentalFeedback {
                vehicle_rating: 5,
                driver_rating: 5,
                comment: Some("x".repeat(policy.max_comment_chars + 1)),
            }),
        };

        let err = complete_rental(&mut store, 5001, &request, &policy, now()).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("at most 50 characters"));
        assert_eq!(store.list_rentals(), before.list_rentals());
        assert_eq!(store.list_drivers(), before.list_drivers());
        assert_eq!(store.list_vehicles(), before.list_vehicles());

        // justo en el límite se acepta
        let at_limit = CompletionRequest {
            feedback: Some(RentalFeedback {
                vehicle_rating: 5,
                driver_rating: 5,
                comment: Some("x".repeat(policy.max_comment_chars)),
            }),
            ..request
        };
        assert!(complete_rental(&mut store, 5001, &at_limit, &policy, now()).is_ok());
    }

    #[test]
    fn test_cancel_releases_without_earnings() {
        let mut store = store_with_active_rental(Some(1));

        let rental = cancel_rental(&mut store, 5001, now()).unwrap();
        assert_eq!(rental.status, RentalStatus::Cancelled);
        assert_eq!(rental.end_time, now());

        assert!(store.find_vehicle_by_id(1).unwrap().available);
        let driver = store.find_driver_by_id(1).unwrap();
        assert_eq!(driver.status, DriverStatus::Available);
        assert_eq!(driver.total_trips, 3);
        assert_eq!(driver.total_earnings, Decimal::from(100));
    }

    #[test]
    fn test_second_transition_is_rejected_and_changes_nothing() {
        let mut store = store_with_active_rental(Some(1));
        cancel_rental(&mut store, 5001, now()).unwrap();
        let after_cancel = store.find_rental_by_id(5001).unwrap();

        let later = now() + Duration::hours(1);
        assert_eq!(cancel_rental(&mut store, 5001, later).unwrap_err().code(), "INVALID_STATE");
        let err = complete_rental(&mut store, 5001, &CompletionRequest::default(), &RentalPolicy::default(), later)
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE");

        assert_eq!(store.find_rental_by_id(5001).unwrap(), after_cancel);
    }

    #[test]
    fn test_unknown_rental_is_not_found() {
        let mut store = store_with_active_rental(None);
        assert_eq!(cancel_rental(&mut store, 4242, now()).unwrap_err().code(), "NOT_FOUND");
    }
}
