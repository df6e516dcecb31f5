use crate::StateStore;
use anyhow::{anyhow, Result};
use oracle_types::block::Block;
use oracle_types::state::ChainState;
use rocksdb::{Options, DB};

pub struct RocksStore {
    pub db: DB,
}

impl RocksStore {
    pub fn new(path: &str) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path).map_err(|e| anyhow!("Failed to open DB: {}", e))?;
        Ok(Self { db })
    }
}

impl StateStore for RocksStore {
    fn save_state(&self, state: &ChainState) -> Result<()> {
        let encoded = bincode::serialize(state).map_err(|e| anyhow!("Serialization error: {}", e))?;
        self.db
            .put(b"chain_state", encoded)
            .map_err(|e| anyhow!("DB write error: {}", e))?;
        Ok(())
    }

    fn load_state(&self) -> Result<Option<ChainState>> {
        match self.db.get(b"chain_state") {
            Ok(Some(value)) => {
                let decoded = bincode::deserialize(&value)
                    .map_err(|e| anyhow!("Deserialization error: {}", e))?;
                Ok(Some(decoded))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(anyhow!("DB read error: {}", e)),
        }
    }

    fn save_block(&self, block: &Block) -> Result<()> {
        let key = format!("block_height_{}", block.header.height);
        let encoded = bincode::serialize(block).map_err(|e| anyhow!("Serialization error: {}", e))?;
        self.db
            .put(key.as_bytes(), &encoded)
            .map_err(|e| anyhow!("DB height-index error: {}", e))?;
        Ok(())
    }

    fn load_block_by_height(&self, height: u64) -> Result<Option<Block>> {
        let key = format!("block_height_{}", height);
        match self.db.get(key.as_bytes())? {
            Some(v) => Ok(Some(bincode::deserialize(&v)?)),
            None => Ok(None),
        }
    }
}
