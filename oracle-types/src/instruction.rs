use serde::{Deserialize, Serialize};

/// Mutating oracle calls carried by a transaction. Reads are not
/// instructions; they go straight to the service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum OracleInstruction {
    RegisterOracle,
    UpdatePrice {
        symbol: String,
        price: u128,
        decimals: u32,
        source: String,
    },
}

impl OracleInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            OracleInstruction::RegisterOracle => "register-oracle",
            OracleInstruction::UpdatePrice { .. } => "update-price",
        }
    }
}
