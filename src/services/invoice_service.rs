//! Facturación
//!
//! Construye la factura de un alquiler recién confirmado y gestiona su
//! cobro y reembolso. El cobro en sí lo hace un sistema externo; aquí solo
//! se registra el resultado.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::RentalPolicy;
use crate::models::{Invoice, InvoiceId, InvoiceStatus, NewInvoice, PaymentMethod, Rental};
use crate::repositories::InvoiceRepository;
use crate::services::pricing_engine::tax_amount;
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Datos de factura para un alquiler: impuesto sobre el subtotal original
pub fn build_invoice(
    rental: &Rental,
    subtotal: Decimal,
    discount_amount: Decimal,
    promo_code: Option<String>,
    policy: &RentalPolicy,
    now: DateTime<Utc>,
) -> NewInvoice {
    NewInvoice {
        rental_id: rental.id,
        customer_id: rental.customer_id,
        driver_id: rental.driver_id,
        subtotal,
        discount_amount,
        tax_amount: tax_amount(subtotal, policy.tax_rate),
        promo_code,
        created_at: now,
    }
}

/// Registra el pago de una factura pendiente
pub fn process_payment<S: InvoiceRepository + ?Sized>(
    store: &mut S,
    invoice_id: InvoiceId,
    method: PaymentMethod,
    reference: Option<String>,
    now: DateTime<Utc>,
) -> AppResult<Invoice> {
    let mut invoice = store
        .find_invoice_by_id(invoice_id)
        .ok_or_else(|| not_found_error("Invoice", invoice_id))?;

    match invoice.status {
        InvoiceStatus::Pending => {}
        InvoiceStatus::Paid => {
            return Err(AppError::InvalidState(format!("Invoice #{} is already paid", invoice_id)));
        }
        other => {
            return Err(AppError::InvalidState(format!(
                "Invoice #{} cannot be paid (current status: {})",
                invoice_id, other
            )));
        }
    }

    invoice.status = InvoiceStatus::Paid;
    invoice.payment_method = Some(method);
    invoice.payment_reference = reference.filter(|r| !r.trim().is_empty());
    invoice.paid_at = Some(now);
    store.update_invoice(invoice.clone())?;

    info!("💳 Factura #{} pagada ({})", invoice.id, method);
    Ok(invoice)
}

/// Reembolsa una factura pagada
pub fn refund_invoice<S: InvoiceRepository + ?Sized>(
    store: &mut S,
    invoice_id: InvoiceId,
    reason: Option<&str>,
) -> AppResult<Invoice> {
    let mut invoice = store
        .find_invoice_by_id(invoice_id)
        .ok_or_else(|| not_found_error("Invoice", invoice_id))?;

    if invoice.status != InvoiceStatus::Paid {
        return Err(AppError::InvalidState(format!(
            "Invoice #{} is not paid, cannot refund (current status: {})",
            invoice_id, invoice.status
        )));
    }

    invoice.status = InvoiceStatus::Refunded;
    store.update_invoice(invoice.clone())?;

    info!(
        "↩️ Factura #{} reembolsada. Motivo: {}",
        invoice.id,
        reason.unwrap_or("No reason provided")
    );
    Ok(invoice)
}
