//! Hydrate-once, write-through collection shared by the favorites, likes
//! and comments stores.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::app::Result;
use crate::store::SharedStorage;

struct CollectionState<T> {
    items: Vec<T>,
    /// Stored entries that did not fit `T`; written back untouched.
    unreadable: Vec<Value>,
    initialized: bool,
}

pub struct Collection<T> {
    key: &'static str,
    label: &'static str,
    storage: Option<SharedStorage>,
    state: Mutex<CollectionState<T>>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    pub fn new(key: &'static str, label: &'static str, storage: Option<SharedStorage>) -> Self {
        Self {
            key,
            label,
            storage,
            state: Mutex::new(CollectionState {
                items: Vec::new(),
                unreadable: Vec::new(),
                initialized: false,
            }),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Load the collection from storage unless that already happened.
    /// Unreadable or corrupt data leaves the collection empty.
    pub fn hydrate(&self) {
        let mut state = self.lock();
        self.hydrate_locked(&mut state);
    }

    /// Write the whole collection to storage.
    pub fn persist(&self) -> Result<()> {
        let state = self.lock();
        self.persist_locked(&state)
    }

    /// Apply `f` to the hydrated items; persist when it reports a change.
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<T>) -> (R, bool)) -> Result<R> {
        let mut state = self.lock();
        self.hydrate_locked(&mut state);

        let (result, changed) = f(&mut state.items);
        if changed {
            self.persist_locked(&state)?;
        }
        Ok(result)
    }

    /// Read the in-memory items without hydrating.
    pub fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let state = self.lock();
        f(&state.items)
    }

    fn lock(&self) -> MutexGuard<'_, CollectionState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hydrate_locked(&self, state: &mut CollectionState<T>) {
        if state.initialized {
            return;
        }

        let Some(storage) = &self.storage else {
            state.initialized = true;
            return;
        };

        let entries = match storage.get(self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!("Failed to load {} from storage: {}", self.label, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!("Failed to read {} from storage: {}", self.label, e);
                Vec::new()
            }
        };

        for entry in entries {
            match serde_json::from_value::<T>(entry.clone()) {
                Ok(item) => state.items.push(item),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", self.label, e);
                    state.unreadable.push(entry);
                }
            }
        }
        state.initialized = true;
        tracing::debug!("Hydrated {} {}", state.items.len(), self.label);
    }

    fn persist_locked(&self, state: &CollectionState<T>) -> Result<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let mut entries = state
            .items
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        entries.extend(state.unreadable.iter().cloned());
        let raw = serde_json::to_string(&entries)?;
        storage.set(self.key, &raw)
    }
}
