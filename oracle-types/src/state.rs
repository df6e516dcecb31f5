use crate::principal::Principal;
use crate::record::{OracleRegistration, PriceRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Principals allowed to publish prices. Entries are never removed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AuthorizationRegistry {
    oracles: BTreeMap<Principal, OracleRegistration>,
}

impl AuthorizationRegistry {
    /// Registering twice keeps the first registration.
    pub fn register(&mut self, principal: Principal, height: u64) -> bool {
        self.oracles
            .entry(principal)
            .or_insert(OracleRegistration {
                principal,
                registered_at: height,
            });
        true
    }

    pub fn is_registered(&self, principal: &Principal) -> bool {
        self.oracles.contains_key(principal)
    }

    pub fn registration(&self, principal: &Principal) -> Option<&OracleRegistration> {
        self.oracles.get(principal)
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OracleRegistration> {
        self.oracles.values()
    }
}

/// Latest record per symbol. Performs no validation of its own.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PriceStore {
    records: BTreeMap<String, PriceRecord>,
}

impl PriceStore {
    pub fn put(&mut self, symbol: String, record: PriceRecord) {
        self.records.insert(symbol, record);
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceRecord> {
        self.records.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OracleState {
    pub registry: AuthorizationRegistry,
    pub prices: PriceStore,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct AccountState {
    pub nonce: u64,
}

/// Everything the host persists between batches.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ChainState {
    pub height: u64,
    pub tip_hash: [u8; 32],
    pub accounts: BTreeMap<Principal, AccountState>,
    pub oracle: OracleState,
}

impl ChainState {
    /// Commitment over accounts and oracle data; excludes the tip so it can
    /// be placed in the header of the block that produces it.
    pub fn root_hash(&self) -> [u8; 32] {
        #[derive(Serialize)]
        struct Committed<'a> {
            accounts: &'a BTreeMap<Principal, AccountState>,
            oracle: &'a OracleState,
        }

        let committed = Committed {
            accounts: &self.accounts,
            oracle: &self.oracle,
        };
        let bytes = bincode::serialize(&committed).expect("state serialization");
        *blake3::hash(&bytes).as_bytes()
    }
}
