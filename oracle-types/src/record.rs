use crate::principal::Principal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OracleRegistration {
    pub principal: Principal,
    pub registered_at: u64,
}

/// Latest published quote for one symbol. `price` is a fixed-point magnitude
/// scaled by `10^decimals`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PriceRecord {
    pub symbol: String,
    pub price: u128,
    pub decimals: u8,
    pub source: String,
    pub updated_at: u64,
    pub updated_by: Principal,
}
