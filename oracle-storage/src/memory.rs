use crate::StateStore;
use anyhow::{anyhow, Result};
use oracle_types::block::Block;
use oracle_types::state::ChainState;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Volatile store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<Option<ChainState>>,
    blocks: RwLock<BTreeMap<u64, Block>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn save_state(&self, state: &ChainState) -> Result<()> {
        let mut guard = self.state.write().map_err(|_| anyhow!("state lock poisoned"))?;
        *guard = Some(state.clone());
        Ok(())
    }

    fn load_state(&self) -> Result<Option<ChainState>> {
        let guard = self.state.read().map_err(|_| anyhow!("state lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save_block(&self, block: &Block) -> Result<()> {
        let mut guard = self.blocks.write().map_err(|_| anyhow!("block lock poisoned"))?;
        guard.insert(block.header.height, block.clone());
        Ok(())
    }

    fn load_block_by_height(&self, height: u64) -> Result<Option<Block>> {
        let guard = self.blocks.read().map_err(|_| anyhow!("block lock poisoned"))?;
        Ok(guard.get(&height).cloned())
    }
}
