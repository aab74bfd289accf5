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


//! Display projections of a lesson. Nothing here is saved.

use crate::rng::RandomSource;
use crate::rng::shuffle;
use crate::types::artifacts::DefinitionMatch;
use crate::types::lesson::LessonState;

/// A shuffled copy of a list, reshuffled only when the list changes.
#[derive(Debug)]
struct Memo<T> {
    source: Vec<T>,
    shuffled: Vec<T>,
}

impl<T: Clone + PartialEq> Memo<T> {
    fn new() -> Self {
        Self {
            source: Vec::new(),
            shuffled: Vec::new(),
        }
    }

    fn get(&mut self, source: &[T], rng: &mut impl RandomSource) -> &[T] {
        if self.source != source {
            self.source = source.to_vec();
            self.shuffled = shuffle(source.to_vec(), rng);
        }
        &self.shuffled
    }
}

/// The shuffled projections shown on screen and printed on the worksheet.
/// Both stay put between renders until their backing list changes.
#[derive(Debug)]
pub struct DerivedViews<R> {
    rng: R,
    definitions: Memo<DefinitionMatch>,
    image_words: Memo<String>,
}

impl<R: RandomSource> DerivedViews<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            definitions: Memo::new(),
            image_words: Memo::new(),
        }
    }

    /// The definition matches in random order. Printed next to the words in
    /// their original order, position by position.
    pub fn shuffled_definitions(&mut self, lesson: &LessonState) -> &[DefinitionMatch] {
        self.definitions
            .get(&lesson.definition_matches, &mut self.rng)
    }

    /// The words that have an illustration, in random order.
    pub fn shuffled_image_word_bank(&mut self, lesson: &LessonState) -> &[String] {
        let words: Vec<String> = lesson.word_images.iter().map(|i| i.word.clone()).collect();
        self.image_words.get(&words, &mut self.rng)
    }
}

/// Position in the flashcard word list. Steps wrap around both ends.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FlashcardCursor {
    index: usize,
}

impl FlashcardCursor {
    /// The current position in a list of `len` words, `None` when empty. The
    /// list may have shrunk since the cursor last moved.
    pub fn position(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.index % len)
        }
    }

    pub fn next(&mut self, len: usize) {
        self.index = match self.position(len) {
            Some(i) => (i + 1) % len,
            None => 0,
        };
    }

    pub fn prev(&mut self, len: usize) {
        self.index = match self.position(len) {
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn current<'a>(&self, words: &'a [String]) -> Option<&'a str> {
        self.position(words.len()).map(|i| words[i].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::TinyRng;
    use crate::types::artifacts::WordImage;

    fn definitions(words: &[&str]) -> Vec<DefinitionMatch> {
        words
            .iter()
            .map(|w| DefinitionMatch {
                word: w.to_string(),
                definition: format!("{w}!"),
            })
            .collect()
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let mut cursor = FlashcardCursor::default();
        cursor.prev(3);
        assert_eq!(cursor.position(3), Some(2));
        cursor.next(3);
        assert_eq!(cursor.position(3), Some(0));
        cursor.next(3);
        cursor.next(3);
        cursor.next(3);
        assert_eq!(cursor.position(3), Some(0));
    }

    #[test]
    fn test_cursor_on_empty_list() {
        let mut cursor = FlashcardCursor::default();
        cursor.next(0);
        assert_eq!(cursor.position(0), None);
        assert_eq!(cursor.current(&[]), None);
    }

    #[test]
    fn test_cursor_survives_shrinking_list() {
        let words: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let mut cursor = FlashcardCursor::default();
        cursor.prev(4);
        assert_eq!(cursor.current(&words), Some("d"));
        assert_eq!(cursor.current(&words[..2]), Some("b"));
    }

    #[test]
    fn test_definitions_shuffle_is_stable_until_change() {
        let mut views = DerivedViews::new(TinyRng::from_seed(11));
        let mut lesson = LessonState {
            definition_matches: definitions(&["a", "b", "c", "d", "e", "f"]),
            ..Default::default()
        };
        let first = views.shuffled_definitions(&lesson).to_vec();
        let second = views.shuffled_definitions(&lesson).to_vec();
        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort_by(|a, b| a.word.cmp(&b.word));
        assert_eq!(sorted, lesson.definition_matches);

        lesson.definition_matches = definitions(&["x"]);
        assert_eq!(views.shuffled_definitions(&lesson), definitions(&["x"]).as_slice());
    }

    #[test]
    fn test_image_word_bank() {
        let mut views = DerivedViews::new(TinyRng::from_seed(2));
        let lesson = LessonState {
            word_images: vec![
                WordImage {
                    word: "ים".to_string(),
                    url: "data:,".to_string(),
                },
                WordImage {
                    word: "עץ".to_string(),
                    url: "data:,".to_string(),
                },
            ],
            ..Default::default()
        };
        let mut bank = views.shuffled_image_word_bank(&lesson).to_vec();
        bank.sort();
        assert_eq!(bank, ["ים", "עץ"]);
    }
}
