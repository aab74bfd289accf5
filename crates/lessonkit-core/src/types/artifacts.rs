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


//! Generated exercise content attached to a lesson.

use serde::Deserialize;
use serde::Serialize;

/// An illustration for a vocabulary word.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct WordImage {
    pub word: String,
    /// A `data:` URI or a remote URL.
    pub url: String,
}

/// Number of options in an odd-one-out row.
pub const ODD_ONE_OUT_OPTIONS: usize = 4;

/// Four words, three of which share a theme.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct OddOneOutSet {
    pub options: Vec<String>,
    pub answer: String,
    pub reason: String,
}

impl OddOneOutSet {
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == ODD_ONE_OUT_OPTIONS && self.options.contains(&self.answer)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DefinitionMatch {
    pub word: String,
    pub definition: String,
}

/// Two words the student must use together in one sentence.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualWordSet {
    pub word_a: String,
    pub word_b: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_one_out_well_formed() {
        let set = OddOneOutSet {
            options: ["כלב", "חתול", "פרה", "שולחן"].map(String::from).to_vec(),
            answer: "שולחן".to_string(),
            reason: "שולחן הוא רהיט".to_string(),
        };
        assert!(set.is_well_formed());

        let wrong_answer = OddOneOutSet {
            answer: "כיסא".to_string(),
            ..set.clone()
        };
        assert!(!wrong_answer.is_well_formed());

        let three = OddOneOutSet {
            options: set.options[..3].to_vec(),
            answer: "כלב".to_string(),
            ..set
        };
        assert!(!three.is_well_formed());
    }

    #[test]
    fn test_dual_word_field_names() {
        let pair = DualWordSet {
            word_a: "ים".to_string(),
            word_b: "גל".to_string(),
        };
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"{"wordA":"ים","wordB":"גל"}"#);
    }
}
