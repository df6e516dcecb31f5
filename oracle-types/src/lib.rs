pub mod block;
pub mod instruction;
pub mod principal;
pub mod record;
pub mod state;
pub mod transaction;

pub use block::{Block, Receipt, TxOutcome};
pub use instruction::OracleInstruction;
pub use principal::Principal;
pub use record::{OracleRegistration, PriceRecord};
pub use state::{AuthorizationRegistry, ChainState, OracleState, PriceStore};
pub use transaction::Transaction;
