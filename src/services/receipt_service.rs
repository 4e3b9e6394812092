//! Recibos
//!
//! Texto del recibo que se entrega al cliente tras confirmar una reserva,
//! y el sumidero que lo recibe.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::models::Invoice;

const RULE: &str = "================================================================";

/// Factura terminada más los nombres para mostrar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub invoice: Invoice,
    pub customer_name: String,
    pub vehicle_info: String,
    pub driver_name: Option<String>,
}

impl Receipt {
    pub fn render(&self) -> String {
        let inv = &self.invoice;
        let mut lines = vec![
            RULE.to_string(),
            "FLEET RENTAL - RECEIPT".to_string(),
            RULE.to_string(),
            format!("Invoice ID: {}", inv.id),
            format!("Date: {}", inv.created_at.format("%Y-%m-%d %H:%M UTC")),
            format!("Customer: {} (#{})", self.customer_name, inv.customer_id),
            format!("Rental ID: {}", inv.rental_id),
            format!("Vehicle: {}", self.vehicle_info),
        ];
        if inv.driver_id.is_some() {
            lines.push(format!("Driver: {}", self.driver_name.as_deref().unwrap_or("Assigned")));
        }
        lines.push(RULE.to_string());
        lines.push(format!("Subtotal: ${:.2}", inv.subtotal));
        if inv.discount_amount > Decimal::ZERO {
            lines.push(format!(
                "Discount ({}): -${:.2}",
                inv.promo_code.as_deref().unwrap_or("promo"),
                inv.discount_amount
            ));
        }
        lines.push(format!("Tax: ${:.2}", inv.tax_amount));
        lines.push(format!("TOTAL: ${:.2}", inv.total_amount));
        lines.push(format!("Status: {}", inv.status));
        lines.push(RULE.to_string());
        lines.join("\n")
    }
}

#[async_trait]
pub trait ReceiptSink: Send + Sync {
    async fn deliver(&self, receipt: &Receipt);
}

/// Emite el recibo por el log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReceiptSink;

#[async_trait]
impl ReceiptSink for TracingReceiptSink {
    async fn deliver(&self, receipt: &Receipt) {
        info!("🧾 Recibo generado:\n{}", receipt.render());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InvoiceStatus;
    use chrono::{TimeZone, Utc};

    fn receipt(discount: Decimal, driver_id: Option<u32>) -> Receipt {
        Receipt {
            invoice: Invoice {
                id: 6001,
                rental_id: 5001,
                customer_id: 2,
                driver_id,
                subtotal: Decimal::from(150),
                discount_amount: discount,
                tax_amount: Decimal::new(2250, 2),
                total_amount: Decimal::from(150) - discount + Decimal::new(2250, 2),
                status: InvoiceStatus::Pending,
                payment_method: None,
                payment_reference: None,
                promo_code: if discount > Decimal::ZERO { Some("SAVE10".to_string()) } else { None },
                created_at: Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap(),
                paid_at: None,
            },
            customer_name: "Lucía".to_string(),
            vehicle_info: "Toyota Corolla CAR".to_string(),
            driver_name: None,
        }
    }

    #[test]
    fn test_render_with_discount_and_driver() {
        let text = receipt(Decimal::from(15), Some(4)).render();
        assert!(text.contains("Discount (SAVE10): -$15.00"));
        assert!(text.contains("Driver: Assigned"));
        assert!(text.contains("TOTAL: $157.50"));
    }

    #[test]
    fn test_render_without_discount_or_driver() {
        let text = receipt(Decimal::ZERO, None).render();
        assert!(!text.contains("Discount"));
        assert!(!text.contains("Driver:"));
        assert!(text.contains("Tax: $22.50"));
    }
}
