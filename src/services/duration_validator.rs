//! Validador de duración
//!
//! Predicado puro sobre `(tipo, inicio, fin, ahora)`. Los límites son
//! inclusivos en ambos extremos.

use chrono::{DateTime, Duration, Utc};

use crate::models::RentalType;
use crate::utils::errors::{validation_error, AppResult};

/// Duración mínima y máxima admitida para cada tipo de alquiler
pub fn duration_bounds(rental_type: RentalType) -> (Duration, Duration) {
    match rental_type {
        RentalType::Hourly => (Duration::hours(1), Duration::hours(24)),
        RentalType::Daily => (Duration::hours(24), Duration::days(30)),
        RentalType::Route => (Duration::minutes(5), Duration::hours(24)),
    }
}

pub fn validate_window(
    rental_type: RentalType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if start <= now {
        return Err(validation_error("rental must start in the future"));
    }
    if end <= start {
        return Err(validation_error("rental end must be after its start"));
    }

    let duration = end - start;
    let (min, max) = duration_bounds(rental_type);
    if duration < min || duration > max {
        return Err(validation_error(format!(
            "{} rental must last between {} and {} minutes (requested {})",
            rental_type,
            min.num_minutes(),
            max.num_minutes(),
            duration.num_minutes(),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap()
    }

    fn start() -> DateTime<Utc> {
        now() + Duration::hours(1)
    }

    fn check(rental_type: RentalType, length: Duration) -> bool {
        validate_window(rental_type, start(), start() + length, now()).is_ok()
    }

    #[test]
    fn test_hourly_bounds() {
        assert!(check(RentalType::Hourly, Duration::hours(1)));
        assert!(check(RentalType::Hourly, Duration::hours(24)));
        assert!(!check(RentalType::Hourly, Duration::minutes(59)));
        assert!(!check(RentalType::Hourly, Duration::hours(24) + Duration::minutes(1)));
    }

    #[test]
    fn test_daily_bounds() {
        assert!(check(RentalType::Daily, Duration::hours(24)));
        assert!(check(RentalType::Daily, Duration::days(30)));
        assert!(!check(RentalType::Daily, Duration::hours(23) + Duration::minutes(59)));
        assert!(!check(RentalType::Daily, Duration::days(30) + Duration::hours(1)));
    }

    #[test]
    fn test_route_bounds() {
        assert!(check(RentalType::Route, Duration::minutes(5)));
        assert!(check(RentalType::Route, Duration::hours(24)));
        assert!(!check(RentalType::Route, Duration::minutes(4)));
    }

    #[test]
    fn test_start_must_be_strictly_future() {
        let err = validate_window(RentalType::Hourly, now(), now() + Duration::hours(2), now()).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");

        let past = now() - Duration::minutes(1);
        assert!(validate_window(RentalType::Hourly, past, past + Duration::hours(2), now()).is_err());
    }

    #[test]
    fn test_end_must_follow_start() {
        assert!(validate_window(RentalType::Route, start(), start(), now()).is_err());
        assert!(validate_window(RentalType::Route, start(), start() - Duration::minutes(10), now()).is_err());
    }
}
