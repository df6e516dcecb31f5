use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;

fn hash_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BlockHeader {
    pub height: u64,
    pub prev_hash: [u8; 32],
    pub transactions_root: [u8; 32],
    pub state_root: [u8; 32],
    pub timestamp: u64,
}

/// Result of one transaction within a block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    Ok(bool),
    /// Stable oracle error code.
    Err(u32),
    /// Refused by the host before reaching the oracle (signature, nonce).
    Rejected(String),
}

impl TxOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, TxOutcome::Ok(_))
    }
}

impl fmt::Display for TxOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxOutcome::Ok(v) => write!(f, "(ok {})", v),
            TxOutcome::Err(code) => write!(f, "(err u{})", code),
            TxOutcome::Rejected(reason) => write!(f, "(rejected {})", reason),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Receipt {
    pub tx_id: [u8; 32],
    pub outcome: TxOutcome,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
    pub receipts: Vec<Receipt>,
}

impl Block {
    pub fn transactions_root(txs: &[Transaction]) -> [u8; 32] {
        if txs.is_empty() {
            return [0u8; 32];
        }

        let mut level: Vec<[u8; 32]> = txs.iter().map(|tx| tx.id()).collect();
        while level.len() > 1 {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);
            let mut i = 0;
            while i < level.len() {
                let left = level[i];
                let right = if i + 1 < level.len() {
                    level[i + 1]
                } else {
                    left
                };
                next.push(hash_concat(&left, &right));
                i += 2;
            }
            level = next;
        }
        level[0]
    }

    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&bincode::serialize(&self.header).expect("block header serialization"));
        *hasher.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::OracleInstruction;
    use crate::principal::Principal;

    fn tx(nonce: u64) -> Transaction {
        Transaction {
            sender: Principal([1u8; 32]),
            nonce,
            instruction: OracleInstruction::RegisterOracle,
            signature: vec![],
        }
    }

    #[test]
    fn test_transactions_root() {
        assert_eq!(Block::transactions_root(&[]), [0u8; 32]);

        let one = tx(0);
        assert_eq!(Block::transactions_root(&[one.clone()]), one.id());

        let pair = Block::transactions_root(&[tx(0), tx(1)]);
        let swapped = Block::transactions_root(&[tx(1), tx(0)]);
        assert_ne!(pair, swapped);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(TxOutcome::Ok(true).to_string(), "(ok true)");
        assert_eq!(TxOutcome::Err(100).to_string(), "(err u100)");
    }
}
