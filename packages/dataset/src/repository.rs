//! Process-wide cached access to the dataset.
//!
//! The dataset is loaded on first access and shared read-only afterwards
//! through an [`Arc`]. A failed load is not cached, so the next access
//! retries. [`Repository::invalidate`] drops the cached copy.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use violence_map_source::columns::ColumnMapping;

use crate::{Dataset, LoadError};

/// Handle owning the source location and the cached dataset.
#[derive(Debug)]
pub struct Repository {
    source: PathBuf,
    mapping: ColumnMapping,
    cache: Mutex<Option<Arc<Dataset>>>,
}

impl Repository {
    /// Creates a repository for the CSV file at `source`. Nothing is read
    /// until the first [`Self::load`].
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, mapping: ColumnMapping) -> Self {
        Self {
            source: source.into(),
            mapping,
            cache: Mutex::new(None),
        }
    }

    /// Returns the dataset, loading it on first call.
    ///
    /// Concurrent callers wait for a single load rather than each reading
    /// the file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the source cannot be loaded. Nothing is
    /// cached in that case.
    pub fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        let mut cache = self.lock();
        if let Some(dataset) = cache.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(Dataset::load(&self.source, &self.mapping)?);
        *cache = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Returns the cached dataset without loading.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<Dataset>> {
        self.lock().clone()
    }

    /// Drops the cached dataset. Holders of an existing [`Arc`] keep their
    /// copy.
    pub fn invalidate(&self) {
        if self.lock().take().is_some() {
            log::info!("Invalidated cached dataset for {}", self.source.display());
        }
    }

    /// Invalidates and loads again.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the source cannot be loaded. The cache is
    /// left empty in that case.
    pub fn reload(&self) -> Result<Arc<Dataset>, LoadError> {
        self.invalidate();
        self.load()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<Dataset>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
