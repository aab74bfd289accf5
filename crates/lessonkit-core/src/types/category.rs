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


use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::types::null_as_default;

/// Opaque identifier of a word category.
///
/// Minted from the category name and a random salt, so identifiers of deleted
/// categories are not handed out again.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn mint(name: &str, salt: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(name.as_bytes());
        hasher.update(&salt.to_le_bytes());
        let hex = hasher.finalize().to_hex();
        CategoryId(hex[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only a category read from a file missing its id has an empty one.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        CategoryId(value.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        CategoryId(value)
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named group of related vocabulary words.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct WordCategory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: CategoryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    words: Vec<String>,
}

impl WordCategory {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            words: Vec::new(),
        }
    }

    /// Build a category from an untrusted word list, dropping blanks and
    /// repeated words.
    pub fn with_words(
        id: CategoryId,
        name: impl Into<String>,
        words: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut category = Self::new(id, name);
        for word in words {
            category.insert_word(&word);
        }
        category
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Append `word` unless it is blank or already present. Returns whether
    /// the category changed.
    pub fn insert_word(&mut self, word: &str) -> bool {
        let word = word.trim();
        if word.is_empty() || self.contains(word) {
            return false;
        }
        self.words.push(word.to_string());
        true
    }

    pub fn remove_word(&mut self, word: &str) -> bool {
        let before = self.words.len();
        self.words.retain(|w| w != word);
        self.words.len() != before
    }

    /// Swap each word for its revised form, in place. Words with no revision
    /// are kept, and revisions of words no longer present are ignored.
    pub fn revise_words(&mut self, revisions: impl IntoIterator<Item = (String, String)>) {
        let revisions: HashMap<String, String> = revisions.into_iter().collect();
        let words: Vec<String> = self
            .words
            .iter()
            .map(|w| revisions.get(w).cloned().unwrap_or_else(|| w.clone()))
            .collect();
        self.replace_words(words);
    }

    /// Replace the word list wholesale, keeping the set semantics.
    pub fn replace_words(&mut self, words: impl IntoIterator<Item = String>) {
        self.words.clear();
        for word in words {
            self.insert_word(&word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_is_stable_per_salt() {
        assert_eq!(CategoryId::mint("חיות", 1), CategoryId::mint("חיות", 1));
        assert_ne!(CategoryId::mint("חיות", 1), CategoryId::mint("חיות", 2));
        assert_eq!(CategoryId::mint("חיות", 1).as_str().len(), 16);
    }

    #[test]
    fn test_insert_word_dedups() {
        let mut category = WordCategory::new("c".into(), "פירות");
        assert!(category.insert_word("תפוח"));
        assert!(!category.insert_word("תפוח"));
        assert!(!category.insert_word(" תפוח "));
        assert!(!category.insert_word("   "));
        assert_eq!(category.words(), ["תפוח"]);
    }

    #[test]
    fn test_insert_word_is_case_sensitive() {
        let mut category = WordCategory::new("c".into(), "letters");
        assert!(category.insert_word("a"));
        assert!(category.insert_word("A"));
        assert_eq!(category.words().len(), 2);
    }

    #[test]
    fn test_with_words_keeps_first_occurrence_order() {
        let words = ["b", "a", "b", "", "c", "a"].map(String::from);
        let category = WordCategory::with_words("c".into(), "x", words);
        assert_eq!(category.words(), ["b", "a", "c"]);
    }

    #[test]
    fn test_revise_words_in_place() {
        let words = ["a", "b", "c"].map(String::from);
        let mut category = WordCategory::with_words("c".into(), "x", words);
        category.revise_words([
            ("a".to_string(), "á".to_string()),
            ("c".to_string(), "b".to_string()),
            ("gone".to_string(), "g".to_string()),
        ]);
        assert_eq!(category.words(), ["á", "b"]);
    }

    #[test]
    fn test_remove_missing_word() {
        let mut category = WordCategory::new("c".into(), "x");
        category.insert_word("a");
        assert!(!category.remove_word("z"));
        assert!(category.remove_word("a"));
        assert!(category.words().is_empty());
    }
}
