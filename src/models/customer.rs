use serde::{Deserialize, Serialize};

use super::CustomerId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}
