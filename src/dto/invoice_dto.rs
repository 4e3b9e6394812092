use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PaymentMethod;

// Request para registrar un pago
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    #[validate(length(max = 64))]
    pub reference: Option<String>,
}

// Request para reembolsar una factura pagada
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct RefundRequest {
    #[validate(length(max = 200))]
    pub reason: Option<String>,
}
