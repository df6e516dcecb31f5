pub mod error;

pub use error::OracleError;

use oracle_types::instruction::OracleInstruction;
use oracle_types::principal::Principal;
use oracle_types::record::PriceRecord;
use oracle_types::state::OracleState;
use tracing::{debug, info, warn};

pub const MAX_DECIMALS: u32 = 18;

/// Per-call facts supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallContext {
    pub caller: Principal,
    pub height: u64,
}

/// Owns the registry and price store; the only path that mutates either.
#[derive(Debug, Clone, Default)]
pub struct OracleService {
    state: OracleState,
}

impl OracleService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: OracleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &OracleState {
        &self.state
    }

    pub fn into_state(self) -> OracleState {
        self.state
    }

    pub fn register_oracle(&mut self, ctx: &CallContext) -> Result<bool, OracleError> {
        if self.state.registry.is_registered(&ctx.caller) {
            debug!("Oracle {} already registered", ctx.caller);
        } else {
            info!("Registered oracle {} at height {}", ctx.caller, ctx.height);
        }
        Ok(self.state.registry.register(ctx.caller, ctx.height))
    }

    pub fn update_price(
        &mut self,
        ctx: &CallContext,
        symbol: &str,
        price: u128,
        decimals: u32,
        source: &str,
    ) -> Result<bool, OracleError> {
        if !self.state.registry.is_registered(&ctx.caller) {
            warn!("Rejected price update for {} from unregistered {}", symbol, ctx.caller);
            return Err(OracleError::NotAuthorized);
        }

        let decimals = validate(symbol, decimals, source).map_err(|e| {
            warn!("Rejected price update for {:?} from {}: {}", symbol, ctx.caller, e);
            e
        })?;

        let record = PriceRecord {
            symbol: symbol.to_string(),
            price,
            decimals,
            source: source.to_string(),
            updated_at: ctx.height,
            updated_by: ctx.caller,
        };
        self.state.prices.put(symbol.to_string(), record);
        info!(
            "Price {} = {} (decimals {}) from {} by {} at height {}",
            symbol, price, decimals, source, ctx.caller, ctx.height
        );
        Ok(true)
    }

    pub fn get_price(&self, symbol: &str) -> Option<&PriceRecord> {
        self.state.prices.get(symbol)
    }

    pub fn is_registered(&self, principal: &Principal) -> bool {
        self.state.registry.is_registered(principal)
    }

    pub fn execute(&mut self, ctx: &CallContext, si: &OracleInstruction) -> Result<bool, OracleError> {
        match si {
            OracleInstruction::RegisterOracle => self.register_oracle(ctx),
            OracleInstruction::UpdatePrice {
                symbol,
                price,
                decimals,
                source,
            } => self.update_price(ctx, symbol, *price, *decimals, source),
        }
    }
}

fn validate(symbol: &str, decimals: u32, source: &str) -> Result<u8, OracleError> {
    if symbol.is_empty() {
        return Err(OracleError::InvalidInput("empty symbol".into()));
    }
    if source.is_empty() {
        return Err(OracleError::InvalidInput("empty source".into()));
    }
    if decimals > MAX_DECIMALS {
        return Err(OracleError::InvalidInput(format!(
            "decimals {} exceeds {}",
            decimals, MAX_DECIMALS
        )));
    }
    // decimals <= 18 here
    Ok(decimals as u8)
}

#[cfg(test)]
mod tests;
