//! Memoised dataset loading
//!
//! Preparing the table is cheap but not free, and every consumer should see
//! the same `Arc<Table>` for the same file content. Entries are keyed by a
//! hash of the file bytes, so editing the file yields a fresh table on the
//! next load while unchanged content is served from memory.

use crate::dataset::{Table, load_csv_from_reader};
use crate::error::{FinChatError, Result};
use cached::{Cached, UnboundCache};
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

struct CacheState {
    tables: UnboundCache<u64, Arc<Table>>,
    /// Content hash last seen for each path
    paths: HashMap<PathBuf, u64>,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            tables: UnboundCache::new(),
            paths: HashMap::new(),
        }
    }
}

/// Thread-safe cache of prepared tables
#[derive(Clone, Default)]
pub struct DatasetCache {
    state: Arc<Mutex<CacheState>>,
}

impl DatasetCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheState>> {
        self.state
            .lock()
            .map_err(|_| FinChatError::Other("dataset cache lock poisoned".to_string()))
    }

    /// Return the prepared table for `path`, loading it only if this content
    /// has not been seen before
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Result<Arc<Table>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FinChatError::DataLoad {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let key = content_hash(&bytes);

        {
            let mut state = self.lock()?;
            state.paths.insert(path.to_path_buf(), key);
            if let Some(table) = state.tables.cache_get(&key) {
                tracing::debug!(path = %path.display(), "Dataset cache hit");
                return Ok(Arc::clone(table));
            }
        }

        tracing::debug!(path = %path.display(), "Dataset cache miss");
        let table = Arc::new(load_csv_from_reader(
            bytes.as_slice(),
            &path.display().to_string(),
        )?);
        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            companies = table.companies().len(),
            "Loaded financial dataset"
        );

        let mut state = self.lock()?;
        state.tables.cache_set(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop the entry last loaded from `path`. Returns whether one existed.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> Result<bool> {
        let mut state = self.lock()?;
        let Some(key) = state.paths.remove(path.as_ref()) else {
            return Ok(false);
        };
        Ok(state.tables.cache_remove(&key).is_some())
    }

    /// Clear all cached tables
    pub fn clear(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.tables.cache_clear();
        state.paths.clear();
        Ok(())
    }

    /// Number of cached tables
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.tables.cache_size())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn content_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}
