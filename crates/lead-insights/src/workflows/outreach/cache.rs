use super::domain::LeadTable;
use super::loader::{LeadLoader, LoadError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Memoizes parsed tables keyed by source path. Entries live until they are
/// invalidated explicitly.
pub trait TableCache: Send + Sync {
    fn get(&self, source: &Path) -> Option<Arc<LeadTable>>;
    fn insert(&self, source: PathBuf, table: Arc<LeadTable>);
    /// Returns whether an entry was removed.
    fn invalidate(&self, source: &Path) -> bool;
    fn clear(&self);
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryTableCache {
    tables: Arc<Mutex<HashMap<PathBuf, Arc<LeadTable>>>>,
}

impl InMemoryTableCache {
    pub fn len(&self) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TableCache for InMemoryTableCache {
    fn get(&self, source: &Path) -> Option<Arc<LeadTable>> {
        let guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(source).cloned()
    }

    fn insert(&self, source: PathBuf, table: Arc<LeadTable>) {
        let mut guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(source, table);
    }

    fn invalidate(&self, source: &Path) -> bool {
        let mut guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(source).is_some()
    }

    fn clear(&self) {
        let mut guard = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clear();
    }
}

/// Loader fronted by an injectable cache. Failed loads are never cached.
#[derive(Debug, Clone)]
pub struct LeadTableSource<C: TableCache> {
    loader: LeadLoader,
    cache: C,
}

impl<C: TableCache> LeadTableSource<C> {
    pub fn new(loader: LeadLoader, cache: C) -> Self {
        Self { loader, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn load(&self, source: &Path) -> Result<Arc<LeadTable>, LoadError> {
        if let Some(table) = self.cache.get(source) {
            debug!(path = %source.display(), "lead table served from cache");
            return Ok(table);
        }

        let table = Arc::new(self.loader.load(source)?);
        self.cache.insert(source.to_path_buf(), table.clone());
        Ok(table)
    }

    /// Drops any memoized copy and reads the source again.
    pub fn reload(&self, source: &Path) -> Result<Arc<LeadTable>, LoadError> {
        self.invalidate(source);
        self.load(source)
    }

    pub fn invalidate(&self, source: &Path) -> bool {
        let removed = self.cache.invalidate(source);
        if removed {
            debug!(path = %source.display(), "lead table cache invalidated");
        }
        removed
    }
}
