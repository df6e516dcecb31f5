#[cfg(feature = "rocksdb")]
pub mod db;
pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use anyhow::Result;
use oracle_types::block::Block;
use oracle_types::state::ChainState;

/// Persistent substrate for chain state and committed blocks.
pub trait StateStore {
    fn save_state(&self, state: &ChainState) -> Result<()>;

    /// `None` when nothing has been saved yet.
    fn load_state(&self) -> Result<Option<ChainState>>;

    fn save_block(&self, block: &Block) -> Result<()>;

    fn load_block_by_height(&self, height: u64) -> Result<Option<Block>>;
}
