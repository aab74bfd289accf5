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


use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use lessonkit_core::error::ErrorReport;
use lessonkit_core::error::Fallible;
use lessonkit_core::export::ExportOptions;
use lessonkit_core::gateway::Gateway;
use lessonkit_core::storage;
use lessonkit_core::wizard::Wizard;

use crate::db::Database;
use crate::player::Playable;
use crate::player::Player;

pub struct ServerState<T> {
    pub mutable: Arc<Mutex<MutableState>>,
    pub gateway: Arc<Gateway<T>>,
    pub export_options: Arc<ExportOptions>,
}

impl<T> Clone for ServerState<T> {
    fn clone(&self) -> Self {
        Self {
            mutable: Arc::clone(&self.mutable),
            gateway: Arc::clone(&self.gateway),
            export_options: Arc::clone(&self.export_options),
        }
    }
}

impl<T> ServerState<T> {
    pub fn lock(&self) -> Fallible<MutexGuard<'_, MutableState>> {
        self.mutable
            .lock()
            .map_err(|_| ErrorReport::new("server state is poisoned"))
    }
}

pub struct MutableState {
    pub wizard: Wizard,
    pub db: Database,
    pub player: Player,
}

impl MutableState {
    /// Write the autosave and stop autoplay if the deck ran out. Called after
    /// every change to the lesson. Storage failures are logged, not returned.
    pub fn settle(&mut self) {
        if self.wizard.all_words().is_empty() {
            self.player.stop();
        }
        if let Err(e) = storage::persist(&self.db, &self.wizard) {
            log::warn!("Autosave failed: {e}");
        }
    }

    /// Start over and forget the autosave.
    pub fn forget(&mut self) {
        self.player.stop();
        if let Err(e) = storage::clear(&self.db) {
            log::warn!("Could not delete autosave: {e}");
        }
    }
}

impl Playable for MutableState {
    fn player(&mut self) -> &mut Player {
        &mut self.player
    }

    fn advance(&mut self) -> bool {
        let len = self.wizard.all_words().len();
        if len == 0 {
            return false;
        }
        self.wizard.cursor_mut().next(len);
        true
    }
}
