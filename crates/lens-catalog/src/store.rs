//! Shared catalog holder with atomic reload.
//!
//! Readers take an `Arc<PatternCatalog>` snapshot and never hold a lock
//! while matching. A reload parses the new catalog first and swaps the
//! reference only on success, so a bad file never replaces a good catalog.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::{CatalogError, PatternCatalog};

/// Where [`CatalogStore::reload`] gets its next catalog from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    /// Handed in by the caller; there is nothing to re-read.
    Memory,
    Builtin,
    File(PathBuf),
}

/// Owner of the current catalog snapshot.
#[derive(Debug)]
pub struct CatalogStore {
    /// Serializes reloads and records where the current catalog came from.
    reload_lock: Mutex<Origin>,
    current: RwLock<Arc<PatternCatalog>>,
}

impl CatalogStore {
    /// Create a store holding `catalog`.
    #[must_use]
    pub fn new(catalog: PatternCatalog) -> Self {
        Self::with_origin(catalog, Origin::Memory)
    }

    /// Create a store from a catalog file; [`CatalogStore::reload`] re-reads it.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let catalog = PatternCatalog::load(path)?;
        Ok(Self::with_origin(catalog, Origin::File(path.to_path_buf())))
    }

    fn with_origin(catalog: PatternCatalog, origin: Origin) -> Self {
        Self {
            reload_lock: Mutex::new(origin),
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// File the current catalog was loaded from, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal `Mutex` is poisoned.
    #[must_use]
    pub fn source(&self) -> Option<PathBuf> {
        match &*self.reload_lock.lock().unwrap() {
            Origin::File(path) => Some(path.clone()),
            Origin::Memory | Origin::Builtin => None,
        }
    }

    /// Current catalog snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get(&self) -> Arc<PatternCatalog> {
        Arc::clone(&self.current.read().unwrap())
    }

    /// Swap in `catalog` and return the new snapshot.
    ///
    /// A later [`CatalogStore::reload`] keeps this catalog.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn replace(&self, catalog: PatternCatalog) -> Arc<PatternCatalog> {
        let mut origin = self.reload_lock.lock().unwrap();
        *origin = Origin::Memory;
        self.swap(catalog)
    }

    /// Re-read the catalog from where the current one came from.
    ///
    /// File-backed catalogs are loaded again and the bundled catalog is
    /// rebuilt. A catalog handed in directly stays as it is. On error the
    /// previous catalog stays current.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload(&self) -> Result<Arc<PatternCatalog>, CatalogError> {
        let origin = self.reload_lock.lock().unwrap();
        let catalog = match &*origin {
            Origin::File(path) => PatternCatalog::load(path)?,
            Origin::Builtin => PatternCatalog::builtin(),
            Origin::Memory => return Ok(self.get()),
        };
        Ok(self.swap(catalog))
    }

    /// Load `path` and swap it in; later reloads re-read `path`.
    ///
    /// On error the previous catalog and its source stay current.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload_from(&self, path: &Path) -> Result<Arc<PatternCatalog>, CatalogError> {
        let mut origin = self.reload_lock.lock().unwrap();
        let catalog = PatternCatalog::load(path)?;
        *origin = Origin::File(path.to_path_buf());
        Ok(self.swap(catalog))
    }

    fn swap(&self, catalog: PatternCatalog) -> Arc<PatternCatalog> {
        let catalog = Arc::new(catalog);
        *self.current.write().unwrap() = Arc::clone(&catalog);
        tracing::info!(
            patterns = catalog.patterns().len(),
            warnings = catalog.warnings().len(),
            "Catalog swapped"
        );
        catalog
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::with_origin(PatternCatalog::builtin(), Origin::Builtin)
    }
}
