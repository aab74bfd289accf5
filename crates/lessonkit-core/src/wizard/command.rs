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


use serde::Deserialize;
use serde::Serialize;

use crate::types::category::CategoryId;
use crate::types::grade::GradeLevel;
use crate::types::lesson::LessonMode;
use crate::types::step::Step;

/// A user edit. Every change to the lesson that does not come from the
/// provider goes through [`crate::wizard::Wizard::dispatch`] as one of these.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "action", content = "args", rename_all = "snake_case")]
pub enum Command {
    SetMode(LessonMode),
    SetTopic(String),
    SetSourceText(String),
    SetGradeLevel(GradeLevel),
    SetNikud(bool),
    AddCategory(String),
    RemoveCategory(CategoryId),
    AddWord { category: CategoryId, word: String },
    RemoveWord { category: CategoryId, word: String },
    SetText(String),
    ClearText,
    ToggleDefinitionWord(String),
    ToggleAlphabeticalWord(String),
    /// Store the alphabetical selection as the lesson's ordering exercise.
    CommitAlphabetical,
    RemoveWordImage(String),
    RemoveFillBlank(usize),
    Next,
    Back,
    JumpTo(Step),
    DismissNotice,
    Reset,
}
