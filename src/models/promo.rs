use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Código promocional - solo lectura desde el núcleo de reservas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Promo {
    pub code: String,
    pub discount_percent: Decimal,
    pub is_active: bool,
}
