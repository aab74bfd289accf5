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


//! Reading provider replies into lesson data.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::gateway::Completion;
use crate::gateway::GenerationError;
use crate::types::artifacts::ODD_ONE_OUT_OPTIONS;
use crate::types::artifacts::OddOneOutSet;

/// The placeholder that stands for the withheld word in a fill-in sentence.
pub const BLANK: &str = "________";

/// Shortest run of underscores accepted as a blank.
const MIN_BLANK_RUN: usize = 3;

/// A category as the provider suggests it. Identifiers are minted locally, so
/// any `id` in the reply is ignored.
#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct SuggestedCategory {
    pub name: String,
    #[serde(default)]
    pub words: Vec<String>,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct TextNetwork {
    pub topic: String,
    pub categories: Vec<SuggestedCategory>,
}

/// The reply text, trimmed. Missing or blank text is an error.
pub fn text(completion: &Completion) -> Result<&str, GenerationError> {
    match completion.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(GenerationError::EmptyResponse),
    }
}

/// Models occasionally wrap JSON in a Markdown code fence despite the schema.
fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub fn structured<T: DeserializeOwned>(completion: &Completion) -> Result<T, GenerationError> {
    let body = strip_fence(text(completion)?);
    serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))
}

/// Rewrite the single blank of `sentence` into [`BLANK`]. Returns `None`
/// unless the sentence has exactly one run of underscores long enough to be a
/// blank.
pub fn normalize_blank(sentence: &str) -> Option<String> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, c) in sentence.char_indices() {
        match (c == '_', start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, sentence.len()));
    }
    let blanks: Vec<(usize, usize)> = runs
        .into_iter()
        .filter(|(s, e)| e - s >= MIN_BLANK_RUN)
        .collect();
    match blanks.as_slice() {
        [(s, e)] => Some(format!("{}{BLANK}{}", &sentence[..*s], &sentence[*e..])),
        _ => None,
    }
}

pub fn fill_blanks(sentences: Vec<String>) -> Result<Vec<String>, GenerationError> {
    sentences
        .into_iter()
        .map(|sentence| {
            normalize_blank(sentence.trim()).ok_or_else(|| {
                GenerationError::Malformed(format!(
                    "sentence does not contain exactly one blank: {sentence}"
                ))
            })
        })
        .collect()
}

pub fn odd_one_out(sets: Vec<OddOneOutSet>) -> Result<Vec<OddOneOutSet>, GenerationError> {
    for set in sets.iter() {
        if set.options.len() != ODD_ONE_OUT_OPTIONS {
            return Err(GenerationError::Malformed(format!(
                "odd-one-out set has {} options, expected {ODD_ONE_OUT_OPTIONS}",
                set.options.len()
            )));
        }
        if !set.is_well_formed() {
            return Err(GenerationError::Malformed(format!(
                "odd-one-out answer '{}' is not one of the options",
                set.answer
            )));
        }
    }
    Ok(sets)
}

/// The first inline image as a `data:` URI.
pub fn first_image(completion: &Completion) -> Option<String> {
    completion.images.first().map(|img| img.data_uri())
}

/// The vocalized text, or `original` when the reply has none.
pub fn vocalized(original: &str, completion: &Completion) -> String {
    match text(completion) {
        Ok(text) => {
            let unquoted = text
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .filter(|_| !original.trim_start().starts_with('"'));
            unquoted.unwrap_or(text).to_string()
        }
        Err(_) => {
            log::warn!("Vocalization reply had no text, keeping the original");
            original.to_string()
        }
    }
}
