use crate::StateStore;
use anyhow::{Context, Result};
use oracle_types::block::Block;
use oracle_types::state::ChainState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const STATE_FILE: &str = "state.bin";
const BLOCKS_DIR: &str = "blocks";

/// Bincode snapshots under a data directory:
/// `state.bin` and `blocks/<height>.bin`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join(BLOCKS_DIR))
            .with_context(|| format!("Failed to create data dir {}", root.display()))?;
        Ok(Self { root })
    }

    fn block_path(&self, height: u64) -> PathBuf {
        self.root.join(BLOCKS_DIR).join(format!("{}.bin", height))
    }
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let encoded = bincode::serialize(value).context("Serialization error")?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, encoded).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move {} into place", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read(path) {
        Ok(bytes) => {
            let decoded = bincode::deserialize(&bytes)
                .with_context(|| format!("Corrupt snapshot {}", path.display()))?;
            Ok(Some(decoded))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

impl StateStore for FileStore {
    fn save_state(&self, state: &ChainState) -> Result<()> {
        write_atomic(&self.root.join(STATE_FILE), state)
    }

    fn load_state(&self) -> Result<Option<ChainState>> {
        read_optional(&self.root.join(STATE_FILE))
    }

    fn save_block(&self, block: &Block) -> Result<()> {
        write_atomic(&self.block_path(block.header.height), block)
    }

    fn load_block_by_height(&self, height: u64) -> Result<Option<Block>> {
        read_optional(&self.block_path(height))
    }
}
