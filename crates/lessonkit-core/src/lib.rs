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


//! lessonkit-core: the lesson model and wizard behind lessonkit.
//!
//! No I/O happens here, so the same code runs natively and in the browser.
//! The provider is reached through a [`gateway::Transport`] and autosave
//! through a [`storage::KeyValueStore`], both supplied by the host.

pub mod error;
pub mod export;
pub mod gateway;
pub mod highlight;
pub mod rng;
pub mod storage;
pub mod types;
pub mod views;
pub mod wizard;

pub use error::{ErrorReport, Fallible, fail};
pub use export::snapshot::{PersistenceError, ProjectFile};
pub use gateway::{Gateway, GenerationError, Transport};
pub use types::lesson::{LessonMode, LessonState};
pub use types::step::Step;
pub use types::timestamp::Timestamp;
pub use wizard::{Command, GenerationKind, ValidationError, Wizard};
