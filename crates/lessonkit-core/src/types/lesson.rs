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


use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::rng::RandomSource;
use crate::types::artifacts::DefinitionMatch;
use crate::types::artifacts::DualWordSet;
use crate::types::artifacts::OddOneOutSet;
use crate::types::artifacts::WordImage;
use crate::types::category::CategoryId;
use crate::types::category::WordCategory;
use crate::types::grade::GradeLevel;
use crate::types::null_as_default;

/// Where the word network comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum LessonMode {
    #[default]
    #[serde(rename = "topic")]
    ByTopic,
    #[serde(rename = "text")]
    ByText,
}

/// The lesson being built. Every list may be empty.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LessonState {
    pub mode: LessonMode,
    #[serde(deserialize_with = "null_as_default")]
    pub topic: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_text: String,
    pub grade_level: GradeLevel,
    #[serde(deserialize_with = "null_as_default")]
    pub with_nikud: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<WordCategory>,
    #[serde(deserialize_with = "null_as_default")]
    pub word_images: Vec<WordImage>,
    #[serde(deserialize_with = "null_as_default")]
    pub odd_one_out_sets: Vec<OddOneOutSet>,
    #[serde(deserialize_with = "null_as_default")]
    pub definition_matches: Vec<DefinitionMatch>,
    #[serde(deserialize_with = "null_as_default")]
    pub alphabetical_words: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub dual_word_sets: Vec<DualWordSet>,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    /// Free-form lesson description. Carried through files, never edited here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Words already placed in the text. Carried through files, never edited here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_words: Option<Vec<String>>,
}

impl LessonState {
    /// Whether the intake step has what the active mode needs.
    pub fn intake_ready(&self) -> bool {
        match self.mode {
            LessonMode::ByTopic => !self.topic.trim().is_empty(),
            LessonMode::ByText => !self.source_text.trim().is_empty(),
        }
    }

    pub fn category(&self, id: &CategoryId) -> Option<&WordCategory> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn category_mut(&mut self, id: &CategoryId) -> Option<&mut WordCategory> {
        self.categories.iter_mut().find(|c| &c.id == id)
    }

    /// Mint an identifier no current category uses.
    pub fn mint_category_id(&self, name: &str, rng: &mut impl RandomSource) -> CategoryId {
        loop {
            let id = CategoryId::mint(name, rng.next_u64());
            if self.category(&id).is_none() {
                return id;
            }
        }
    }

    /// Append an empty category. Blank names are ignored.
    pub fn add_category(&mut self, name: &str, rng: &mut impl RandomSource) -> Option<CategoryId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.mint_category_id(name, rng);
        self.categories.push(WordCategory::new(id.clone(), name));
        Some(id)
    }

    pub fn remove_category(&mut self, id: &CategoryId) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| &c.id != id);
        self.categories.len() != before
    }

    pub fn add_word(&mut self, id: &CategoryId, word: &str) -> bool {
        match self.category_mut(id) {
            Some(category) => category.insert_word(word),
            None => false,
        }
    }

    pub fn remove_word(&mut self, id: &CategoryId, word: &str) -> bool {
        match self.category_mut(id) {
            Some(category) => category.remove_word(word),
            None => false,
        }
    }

    /// Every word of every category, in display order. A word filed under two
    /// categories appears twice.
    pub fn all_words(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|c| c.words().iter().cloned())
            .collect()
    }

    pub fn has_image(&self, word: &str) -> bool {
        self.word_images.iter().any(|img| img.word == word)
    }

    /// Restore the category invariants on state that came from outside:
    /// missing and repeated identifiers are minted and repeated words dropped.
    pub fn normalize(&mut self, rng: &mut impl RandomSource) {
        let mut seen: HashSet<CategoryId> = HashSet::new();
        for i in 0..self.categories.len() {
            let words = self.categories[i].words().to_vec();
            self.categories[i].replace_words(words);
            let id = &self.categories[i].id;
            if id.is_blank() || !seen.insert(id.clone()) {
                let fresh = loop {
                    let id = CategoryId::mint(&self.categories[i].name, rng.next_u64());
                    if !seen.contains(&id) && self.category(&id).is_none() {
                        break id;
                    }
                };
                seen.insert(fresh.clone());
                self.categories[i].id = fresh;
            }
        }
    }
}
