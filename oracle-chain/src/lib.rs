pub mod genesis;

pub use genesis::{create_genesis_state, GenesisConfig, GENESIS_HEIGHT};

use anyhow::{Context, Result};
use oracle_crypto::signatures::{sign_transaction, verify_transaction, SigningKey};
use oracle_execution::{CallContext, OracleService};
use oracle_storage::StateStore;
use oracle_types::block::{Block, BlockHeader, Receipt, TxOutcome};
use oracle_types::instruction::OracleInstruction;
use oracle_types::principal::Principal;
use oracle_types::record::PriceRecord;
use oracle_types::state::{AccountState, ChainState};
use oracle_types::transaction::Transaction;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Host for the oracle: admits signed transactions, runs them in order as
/// one block, and tracks height.
#[derive(Debug, Clone)]
pub struct Chain {
    service: OracleService,
    accounts: BTreeMap<Principal, AccountState>,
    height: u64,
    tip_hash: [u8; 32],
}

impl Chain {
    pub fn new(genesis: &GenesisConfig) -> Self {
        Self::from_snapshot(create_genesis_state(genesis))
    }

    pub fn from_snapshot(state: ChainState) -> Self {
        Self {
            service: OracleService::from_state(state.oracle),
            accounts: state.accounts,
            height: state.height,
            tip_hash: state.tip_hash,
        }
    }

    /// Resumes from the store, or starts from genesis when it is empty.
    pub fn load_or_genesis(store: &dyn StateStore, genesis: &GenesisConfig) -> Result<Self> {
        match store.load_state().context("load_state")? {
            Some(state) => {
                info!("Resuming chain at height {}", state.height);
                Ok(Self::from_snapshot(state))
            }
            None => {
                info!("No stored state, starting from genesis with {} oracles", genesis.oracles.len());
                Ok(Self::new(genesis))
            }
        }
    }

    pub fn snapshot(&self) -> ChainState {
        ChainState {
            height: self.height,
            tip_hash: self.tip_hash,
            accounts: self.accounts.clone(),
            oracle: self.service.state().clone(),
        }
    }

    /// Persists the state produced by `block`, then the block itself. A
    /// failed state write leaves the store at the previous tip.
    pub fn commit(&self, store: &dyn StateStore, block: &Block) -> Result<()> {
        store.save_state(&self.snapshot()).context("save_state")?;
        store.save_block(block).context("save_block")?;
        Ok(())
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn tip_hash(&self) -> [u8; 32] {
        self.tip_hash
    }

    pub fn service(&self) -> &OracleService {
        &self.service
    }

    pub fn get_price(&self, symbol: &str) -> Option<&PriceRecord> {
        self.service.get_price(symbol)
    }

    pub fn is_registered(&self, principal: &Principal) -> bool {
        self.service.is_registered(principal)
    }

    /// Next nonce expected from `principal`.
    pub fn nonce(&self, principal: &Principal) -> u64 {
        self.accounts.get(principal).map(|a| a.nonce).unwrap_or(0)
    }

    pub fn mine_block(&mut self, transactions: Vec<Transaction>) -> Block {
        let height = self.height + 1;
        let receipts: Vec<Receipt> = transactions
            .iter()
            .map(|tx| Receipt {
                tx_id: tx.id(),
                outcome: self.apply_transaction(tx, height),
            })
            .collect();

        let block = Block {
            header: BlockHeader {
                height,
                prev_hash: self.tip_hash,
                transactions_root: Block::transactions_root(&transactions),
                state_root: self.snapshot().root_hash(),
                timestamp: now_secs(),
            },
            transactions,
            receipts,
        };

        self.height = height;
        self.tip_hash = block.hash();
        info!(
            "Committed block {} with {} txs ({} ok)",
            height,
            block.transactions.len(),
            block.receipts.iter().filter(|r| r.outcome.is_ok()).count()
        );
        block
    }

    /// Executes a batch against a copy of the chain and throws the copy away.
    pub fn dry_run(&self, transactions: Vec<Transaction>) -> Vec<Receipt> {
        let mut scratch = self.clone();
        scratch.mine_block(transactions).receipts
    }

    fn apply_transaction(&mut self, tx: &Transaction, height: u64) -> TxOutcome {
        if let Err(e) = verify_transaction(tx) {
            warn!("Rejected tx {}: {}", hex::encode(tx.id()), e);
            return TxOutcome::Rejected(e.to_string());
        }

        let expected = self.nonce(&tx.sender);
        if tx.nonce != expected {
            warn!("Rejected tx {}: bad nonce", hex::encode(tx.id()));
            return TxOutcome::Rejected(format!(
                "Invalid nonce: expected {}, got {}",
                expected, tx.nonce
            ));
        }
        self.accounts.entry(tx.sender).or_default().nonce = expected + 1;

        let ctx = CallContext {
            caller: tx.sender,
            height,
        };
        match self.service.execute(&ctx, &tx.instruction) {
            Ok(value) => TxOutcome::Ok(value),
            Err(e) => TxOutcome::Err(e.code()),
        }
    }
}

/// Builds and signs a transaction from `key`.
pub fn build_transaction(
    key: &SigningKey,
    nonce: u64,
    instruction: OracleInstruction,
) -> Result<Transaction> {
    let mut tx = Transaction {
        sender: Principal(key.verifying_key().to_bytes()),
        nonce,
        instruction,
        signature: Vec::new(),
    };
    sign_transaction(key, &mut tx)?;
    Ok(tx)
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
