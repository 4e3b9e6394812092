//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de fechas introducidas por el usuario.

use chrono::{DateTime, NaiveDateTime, Utc};
use validator::ValidationError;

use crate::utils::errors::{validation_error, AppError};

/// Formato de fecha-hora que aceptan las reservas: `YYYY-MM-DD HH:MM`
pub const RENTAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Comprueba la forma de ancho fijo `YYYY-MM-DD HH:MM` sin interpretar la fecha
pub fn is_fixed_width_timestamp(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 16 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        10 => *b == b' ',
        13 => *b == b':',
        _ => b.is_ascii_digit(),
    })
}

/// Validar y convertir texto `YYYY-MM-DD HH:MM` a un instante UTC
pub fn validate_rental_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    NaiveDateTime::parse_from_str(value.trim(), RENTAL_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"YYYY-MM-DD HH:MM".to_string());
            error
        })
}

/// Solo la forma, para `#[validate(custom = ...)]`
pub fn validate_rental_time(value: &str) -> Result<(), ValidationError> {
    validate_rental_datetime(value).map(|_| ())
}

/// Versión para el núcleo: el error ya viene en la taxonomía de la aplicación
pub fn parse_rental_time(value: &str) -> Result<DateTime<Utc>, AppError> {
    validate_rental_datetime(value)
        .map_err(|_| validation_error(format!("'{}' is not a valid date-time (expected YYYY-MM-DD HH:MM)", value)))
}

pub fn format_rental_time(instant: &DateTime<Utc>) -> String {
    instant.format(RENTAL_TIME_FORMAT).to_string()
}

/// Validar que una valoración esté entre 1 y 5 estrellas
pub fn validate_star_rating(value: u8) -> Result<(), ValidationError> {
    if !(1..=5).contains(&value) {
        let mut error = ValidationError::new("star_rating");
        error.add_param("value".into(), &value);
        error.add_param("range".into(), &"1-5".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar longitud máxima en caracteres
pub fn validate_max_chars(value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        let mut error = ValidationError::new("length");
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}
