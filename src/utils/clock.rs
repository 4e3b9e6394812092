//! Reloj inyectable
//!
//! El núcleo nunca llama a `Utc::now()` directamente: recibe un `Clock`
//! para que las pruebas puedan fijar el instante actual.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, DurationRound, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Reloj manual; se puede avanzar desde las pruebas
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut guard) = self.instant.write() {
            *guard = instant;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.instant.write() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.instant.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Siguiente minuto entero estrictamente posterior a `now`
pub fn next_whole_minute(now: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = now.duration_trunc(Duration::minutes(1)).unwrap_or(now);
    truncated + Duration::minutes(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_whole_minute_is_strictly_future() {
        let on_the_minute = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(next_whole_minute(on_the_minute), Utc.with_ymd_and_hms(2026, 1, 1, 10, 1, 0).unwrap());

        let mid_minute = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 45).unwrap();
        assert_eq!(next_whole_minute(mid_minute), Utc.with_ymd_and_hms(2026, 1, 1, 10, 1, 0).unwrap());
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap());
        clock.advance(Duration::hours(3));
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2026, 1, 1, 13, 0, 0).unwrap());
    }
}
