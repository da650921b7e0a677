/// MaterialRegistry - load-by-name deduplication through weak handles
///
/// The registry never keeps a material alive. Callers own the strong
/// `SharedMaterial` handles; once the last one is dropped the entry expires
/// and the next load for that name builds a fresh instance. Expired entries
/// are reaped when looked up and whenever a new entry is inserted.

use std::sync::{Arc, Mutex, Weak};

use rustc_hash::FxHashMap;

use crate::error::{self, Result};
use crate::material::Material;
use crate::engine_trace;

const LOG_SOURCE: &str = "kit::MaterialRegistry";

/// Shared handle to a registered material
pub type SharedMaterial = Arc<Mutex<Material>>;

/// Weak map from material name to live instance
#[derive(Default)]
pub struct MaterialRegistry {
    entries: Mutex<FxHashMap<String, Weak<Mutex<Material>>>>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live instance registered under `name`
    pub fn get(&self, name: &str) -> Result<Option<SharedMaterial>> {
        let mut entries = error::lock(&self.entries, LOG_SOURCE, "registry")?;
        Ok(Self::lookup(&mut entries, name))
    }

    /// Live instance for `name`, or the result of `create` registered under it
    ///
    /// The registry lock is held while `create` runs, so concurrent calls for
    /// the same name never produce two instances. When `create` fails nothing
    /// is registered. `create` must not call back into this registry.
    pub fn get_or_try_insert_with<F>(&self, name: &str, create: F) -> Result<SharedMaterial>
    where
        F: FnOnce() -> Result<Material>,
    {
        let mut entries = error::lock(&self.entries, LOG_SOURCE, "registry")?;
        if let Some(material) = Self::lookup(&mut entries, name) {
            engine_trace!(LOG_SOURCE, "'{}' already loaded", name);
            return Ok(material);
        }

        let material = Arc::new(Mutex::new(create()?));
        entries.retain(|_, weak| weak.strong_count() > 0);
        entries.insert(name.to_string(), Arc::downgrade(&material));
        Ok(material)
    }

    /// Number of names resolving to a live instance
    pub fn live_count(&self) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.values().filter(|weak| weak.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn reap(&self) -> usize {
        match self.entries.lock() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|_, weak| weak.strong_count() > 0);
                before - entries.len()
            }
            Err(_) => 0,
        }
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(
        entries: &mut FxHashMap<String, Weak<Mutex<Material>>>,
        name: &str,
    ) -> Option<SharedMaterial> {
        let material = entries.get(name)?.upgrade();
        if material.is_none() {
            entries.remove(name);
        }
        material
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
