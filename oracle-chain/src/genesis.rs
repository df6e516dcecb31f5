use oracle_types::principal::Principal;
use oracle_types::state::ChainState;
use serde::{Deserialize, Serialize};

/// Height of the genesis state; the first mined block is one above it.
pub const GENESIS_HEIGHT: u64 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GenesisConfig {
    /// Principals registered as oracles at the genesis height.
    #[serde(default)]
    pub oracles: Vec<Principal>,
}

pub fn create_genesis_state(config: &GenesisConfig) -> ChainState {
    let mut state = ChainState {
        height: GENESIS_HEIGHT,
        ..ChainState::default()
    };
    for oracle in &config.oracles {
        state.oracle.registry.register(*oracle, GENESIS_HEIGHT);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_registers_oracles() {
        let config = GenesisConfig {
            oracles: vec![Principal([1u8; 32]), Principal([2u8; 32]), Principal([1u8; 32])],
        };
        let state = create_genesis_state(&config);
        assert_eq!(state.height, GENESIS_HEIGHT);
        assert_eq!(state.oracle.registry.len(), 2);
        assert_eq!(
            state.oracle.registry.registration(&Principal([2u8; 32])).unwrap().registered_at,
            GENESIS_HEIGHT
        );
        assert!(state.oracle.prices.is_empty());
    }
}
