//! Motor de precios
//!
//! Calcula el coste base según el plan y aplica el descuento promocional.
//! El impuesto no se suma aquí: lo calcula la factura sobre el subtotal
//! original y el `total_cost` del alquiler guarda el importe descontado
//! antes de impuestos.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Promo, RentalPlan, Route, Vehicle};
use crate::utils::errors::{not_found_error, validation_error, AppResult};

pub const MAX_HOURS: u32 = 24;
pub const MAX_DAYS: u32 = 30;

/// Coste base y duración estimada de un plan
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub base_cost: Decimal,
    pub estimated_duration: Duration,
}

/// Resultado de intentar aplicar un código promocional
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoOutcome {
    pub final_cost: Decimal,
    pub discount_amount: Decimal,
    pub applied_code: Option<String>,
}

pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Coste base del plan con las tarifas del vehículo o la tarifa fija de la ruta
pub fn price(plan: &RentalPlan, vehicle: &Vehicle, route: Option<&Route>) -> AppResult<PriceQuote> {
    match *plan {
        RentalPlan::Hourly { hours } => {
            if !(1..=MAX_HOURS).contains(&hours) {
                return Err(validation_error(format!("hours must be between 1 and {} (got {})", MAX_HOURS, hours)));
            }
            Ok(PriceQuote {
                base_cost: round_money(vehicle.rate_per_hour * Decimal::from(hours)),
                estimated_duration: Duration::hours(i64::from(hours)),
            })
        }
        RentalPlan::Daily { days } => {
            if !(1..=MAX_DAYS).contains(&days) {
                return Err(validation_error(format!("days must be between 1 and {} (got {})", MAX_DAYS, days)));
            }
            Ok(PriceQuote {
                base_cost: round_money(vehicle.rate_per_day * Decimal::from(days)),
                estimated_duration: Duration::days(i64::from(days)),
            })
        }
        RentalPlan::Route { route_id } => {
            let route = route
                .filter(|r| r.id == route_id)
                .ok_or_else(|| not_found_error("Route", route_id))?;
            Ok(PriceQuote {
                base_cost: round_money(route.base_fare),
                estimated_duration: Duration::minutes(i64::from(route.eta_minutes)),
            })
        }
    }
}

/// Aplica el descuento solo si la promoción está activa y su porcentaje es válido
pub fn apply_promo(base_cost: Decimal, promo: Option<&Promo>) -> PromoOutcome {
    let hundred = Decimal::ONE_HUNDRED;
    match promo {
        Some(promo)
            if promo.is_active && promo.discount_percent >= Decimal::ZERO && promo.discount_percent <= hundred =>
        {
            let discount_amount = round_money(base_cost * promo.discount_percent / hundred);
            PromoOutcome {
                final_cost: base_cost - discount_amount,
                discount_amount,
                applied_code: Some(promo.code.clone()),
            }
        }
        _ => PromoOutcome {
            final_cost: base_cost,
            discount_amount: Decimal::ZERO,
            applied_code: None,
        },
    }
}

/// Impuesto de la factura: siempre sobre el subtotal original
pub fn tax_amount(subtotal: Decimal, tax_rate: Decimal) -> Decimal {
    round_money(subtotal * tax_rate)
}

/// Parte del coste del alquiler que gana el conductor
pub fn driver_commission(total_cost: Decimal, commission_rate: Decimal) -> Decimal {
    round_money(total_cost * commission_rate)
}
