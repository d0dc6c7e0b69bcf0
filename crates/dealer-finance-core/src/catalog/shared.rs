use parking_lot::RwLock;
use std::sync::Arc;

use super::resolver::Catalog;

/// Cloneable handle to the current catalog.
///
/// Readers take an `Arc` snapshot and never hold the lock while they work.
/// A refresh swaps in a whole new catalog, so a reader sees either the old
/// catalog or the new one, never a mix.
#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<RwLock<Arc<Catalog>>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        Arc::clone(&*self.inner.read())
    }

    /// Install `catalog` and return the one it replaced.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let entries = catalog.len();
        let previous = std::mem::replace(&mut *self.inner.write(), Arc::new(catalog));
        tracing::debug!(
            previous_entries = previous.len(),
            entries,
            "catalog replaced"
        );
        previous
    }
}
