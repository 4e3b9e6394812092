//! Modelo de Route
//! 
//! Trayectos predefinidos con tarifa fija y tiempo estimado, usados por los
//! alquileres de tipo `Route`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RouteId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub base_fare: Decimal,
    pub eta_minutes: u32,
    pub active: bool,
}
