//! Política comercial de los alquileres
//!
//! Tasas y límites que el núcleo aplica al reservar, facturar y liquidar.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct RentalPolicy {
    /// Impuesto sobre el subtotal original (0.15 = 15%)
    pub tax_rate: Decimal,
    /// Parte del coste del alquiler que se acredita al conductor
    pub driver_commission_rate: Decimal,
    pub max_comment_chars: usize,
    pub first_rental_id: u32,
    pub first_invoice_id: u32,
}

impl Default for RentalPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(15, 2),
            driver_commission_rate: Decimal::new(30, 2),
            max_comment_chars: 50,
            first_rental_id: 5001,
            first_invoice_id: 6001,
        }
    }
}

impl RentalPolicy {
    pub fn from_env() -> Result<Self> {
        let mut policy = Self::default();

        if let Ok(raw) = env::var("TAX_RATE") {
            policy.tax_rate = Decimal::from_str(&raw)
                .with_context(|| format!("TAX_RATE must be a decimal, got '{}'", raw))?;
        }
        if let Ok(raw) = env::var("DRIVER_COMMISSION_RATE") {
            policy.driver_commission_rate = Decimal::from_str(&raw)
                .with_context(|| format!("DRIVER_COMMISSION_RATE must be a decimal, got '{}'", raw))?;
        }

        Ok(policy)
    }
}
