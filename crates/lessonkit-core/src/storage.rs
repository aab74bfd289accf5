// Copyright 2026 The lessonkit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Autosave. The whole lesson is written under one key after every change;
//! the last write wins.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::export::snapshot::PersistenceError;
use crate::export::snapshot::ProjectFile;
use crate::wizard::Wizard;

pub const AUTOSAVE_KEY: &str = "lessonkit_lesson_v1";

/// A string key-value store: SQLite natively, `localStorage` in the browser.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// In-memory store for tests and for running without a database.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Read the autosaved lesson. Storage errors and unreadable payloads are
/// logged and yield `None`, so the caller starts fresh.
pub fn restore(store: &impl KeyValueStore) -> Option<ProjectFile> {
    let text = match store.get(AUTOSAVE_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Could not read autosave: {e}");
            return None;
        }
    };
    match ProjectFile::from_json(&text) {
        Ok(project) => Some(project),
        Err(e) => {
            log::warn!("Ignoring autosave: {e}");
            None
        }
    }
}

/// Build a wizard from the autosave, or a fresh one.
pub fn resume(store: &impl KeyValueStore, seed: u64) -> Wizard {
    match restore(store) {
        Some(project) => {
            log::debug!("Resuming autosaved lesson");
            Wizard::restore(project, seed)
        }
        None => Wizard::new(seed),
    }
}

pub fn persist(store: &impl KeyValueStore, wizard: &Wizard) -> Result<(), PersistenceError> {
    let text = wizard
        .snapshot()
        .to_json()
        .map_err(|e| PersistenceError::Storage(e.message().to_string()))?;
    store.set(AUTOSAVE_KEY, &text)
}

pub fn clear(store: &impl KeyValueStore) -> Result<(), PersistenceError> {
    store.remove(AUTOSAVE_KEY)
}
