//! Schema loading and caching
//!
//! Parsed schema models are immutable, so a model loaded once can serve any
//! number of generation runs, on any thread. [`SchemaCache`] keys models by
//! canonical file path and parses each path at most once, also when several
//! threads ask for the same schema at the same time. Failed loads are not
//! cached.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use once_cell::sync::{Lazy, OnceCell};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::SchemaModel;

type Slot = Arc<OnceCell<Arc<SchemaModel>>>;

/// Read-through cache of parsed schemas keyed by canonical path
#[derive(Debug, Default)]
pub struct SchemaCache {
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl SchemaCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the schema at `path`, parsing it on first use
    pub fn get_or_load(&self, path: impl AsRef<Path>) -> Result<Arc<SchemaModel>> {
        self.get_or_load_with(path, |key| SchemaModel::from_file(key))
    }

    /// Get the schema at `path`, building it with `load` on first use.
    ///
    /// Concurrent callers for the same path wait for the first load instead
    /// of starting their own.
    pub fn get_or_load_with<F>(&self, path: impl AsRef<Path>, load: F) -> Result<Arc<SchemaModel>>
    where
        F: FnOnce(&Path) -> Result<SchemaModel>,
    {
        let key = canonical_key(path.as_ref())?;
        let slot = self.slot(&key)?;

        if let Some(schema) = slot.get() {
            debug!(path = %key.display(), "schema cache hit");
            return Ok(schema.clone());
        }

        let schema = slot.get_or_try_init(|| {
            debug!(path = %key.display(), "loading schema");
            load(&key).map(Arc::new)
        })?;
        Ok(schema.clone())
    }

    /// Whether a parsed schema is cached for `path`
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let Ok(key) = canonical_key(path.as_ref()) else {
            return false;
        };
        self.slots
            .lock()
            .map(|slots| slots.get(&key).is_some_and(|slot| slot.get().is_some()))
            .unwrap_or(false)
    }

    /// Number of cached schemas
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .map(|slots| slots.values().filter(|slot| slot.get().is_some()).count())
            .unwrap_or(0)
    }

    /// Check if no schema is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached schema
    pub fn clear(&self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.clear();
        }
    }

    fn slot(&self, key: &Path) -> Result<Slot> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| Error::Resource("schema cache lock poisoned".to_string()))?;
        Ok(slots.entry(key.to_path_buf()).or_default().clone())
    }
}

fn canonical_key(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path)
        .map_err(|e| Error::Resource(format!("cannot open schema '{}': {}", path.display(), e)))
}

static GLOBAL_CACHE: Lazy<SchemaCache> = Lazy::new(SchemaCache::new);

/// Process-wide schema cache
pub fn global_cache() -> &'static SchemaCache {
    &GLOBAL_CACHE
}

/// Load a schema through the process-wide cache
pub fn load_schema(path: impl AsRef<Path>) -> Result<Arc<SchemaModel>> {
    global_cache().get_or_load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    const SCHEMA: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
        <xs:element name="note" type="xs:string"/>
    </xs:schema>"#;

    fn schema_file(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", text).unwrap();
        file
    }

    #[test]
    fn test_second_load_is_cached() {
        let file = schema_file(SCHEMA);
        let cache = SchemaCache::new();

        let first = cache.get_or_load(file.path()).unwrap();
        let second = cache.get_or_load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains(file.path()));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_first_access_parses_once() {
        let file = schema_file(SCHEMA);
        let cache = SchemaCache::new();
        let parses = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    cache
                        .get_or_load_with(file.path(), |path| {
                            parses.fetch_add(1, Ordering::SeqCst);
                            SchemaModel::from_file(path)
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(parses.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_not_cached() {
        let file = schema_file("<not-a-schema/>");
        let cache = SchemaCache::new();
        assert!(cache.get_or_load(file.path()).is_err());
        assert!(!cache.contains(file.path()));

        let reloaded = cache.get_or_load_with(file.path(), |_| SchemaModel::from_str(SCHEMA));
        assert!(reloaded.is_ok());
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let cache = SchemaCache::new();
        assert!(matches!(
            cache.get_or_load("/nonexistent/schema.xsd"),
            Err(Error::Resource(_))
        ));
    }
}
