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


//! Autosave over the browser's localStorage.

use lessonkit_core::PersistenceError;
use lessonkit_core::storage::KeyValueStore;
use wasm_bindgen::JsValue;
use web_sys::Storage as WebStorage;

/// localStorage, or nothing when the browser refuses access (private
/// windows, disabled storage). Without it reads find nothing and writes are
/// dropped.
pub struct Storage {
    inner: Option<WebStorage>,
}

fn storage_error(e: JsValue) -> PersistenceError {
    PersistenceError::Storage(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

impl Storage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        Self { inner }
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match &self.inner {
            Some(storage) => storage.get_item(key).map_err(storage_error),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        match &self.inner {
            // Quota errors surface here.
            Some(storage) => storage.set_item(key, value).map_err(storage_error),
            None => Ok(()),
        }
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        match &self.inner {
            Some(storage) => storage.remove_item(key).map_err(storage_error),
            None => Ok(()),
        }
    }
}
