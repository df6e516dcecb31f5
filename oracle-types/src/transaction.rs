use crate::instruction::OracleInstruction;
use crate::principal::Principal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub sender: Principal,
    pub nonce: u64,
    pub instruction: OracleInstruction,
    pub signature: Vec<u8>,
}

impl Transaction {
    pub fn signing_bytes(&self) -> Vec<u8> {
        #[derive(Serialize)]
        struct SigningTx<'a> {
            sender: &'a Principal,
            nonce: u64,
            instruction: &'a OracleInstruction,
        }

        let signing = SigningTx {
            sender: &self.sender,
            nonce: self.nonce,
            instruction: &self.instruction,
        };

        bincode::serialize(&signing).expect("tx signing serialization")
    }

    pub fn id(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.signing_bytes());
        hasher.update(&self.signature);
        *hasher.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_excluded_from_signing_bytes() {
        let mut tx = Transaction {
            sender: Principal([1u8; 32]),
            nonce: 0,
            instruction: OracleInstruction::RegisterOracle,
            signature: vec![0u8; 64],
        };
        let bytes = tx.signing_bytes();
        let id = tx.id();

        tx.signature = vec![1u8; 64];
        assert_eq!(tx.signing_bytes(), bytes);
        assert_ne!(tx.id(), id);
    }
}
