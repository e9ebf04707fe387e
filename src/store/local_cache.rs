use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::CacheError;
use crate::models::TradeSet;

pub const DEFAULT_CACHE_KEY: &str = "smtTrades";

/// Client-local slot holding the last known trade set as one JSON blob.
///
/// The slot lives at `<dir>/<key>.json`. Every write replaces the whole
/// blob through a temporary sibling file and a rename, so a reader sees
/// either the previous set or the new one.
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(&cfg.cache_dir, &cfg.cache_key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached set in canonical order. A missing or blank slot is
    /// an empty set; a blob that is not a list of trades is
    /// [`CacheError::Corrupt`].
    pub fn read(&self) -> Result<TradeSet, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(TradeSet::default()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(TradeSet::default());
        }

        let mut trades: TradeSet =
            serde_json::from_str(&content).map_err(|e| CacheError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        trades.sort_canonical();
        debug!("Read {} trades from {}", trades.len(), self.path.display());
        Ok(trades)
    }

    /// Like [`read`](Self::read), but an unreadable slot counts as empty.
    pub fn read_or_empty(&self) -> TradeSet {
        match self.read() {
            Ok(trades) => trades,
            Err(e) => {
                warn!("Ignoring local cache: {}", e);
                TradeSet::default()
            }
        }
    }

    pub fn write(&self, trades: &TradeSet) -> Result<(), CacheError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(trades)?;
        // One uniquely named sibling per write, renamed over the slot.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| CacheError::Io(e.error))?;

        debug!("Wrote {} trades to {}", trades.len(), self.path.display());
        Ok(())
    }
}
