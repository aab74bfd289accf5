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


//! One [`Operation`] per artifact kind.

use crate::gateway::Completion;
use crate::gateway::GenerationError;
use crate::gateway::GenerationRequest;
use crate::gateway::Model;
use crate::gateway::Operation;
use crate::gateway::parse;
use crate::gateway::parse::SuggestedCategory;
use crate::gateway::parse::TextNetwork;
use crate::gateway::prompt;
use crate::gateway::schema;
use crate::types::artifacts::DefinitionMatch;
use crate::types::artifacts::DualWordSet;
use crate::types::artifacts::OddOneOutSet;
use crate::types::category::WordCategory;
use crate::types::grade::GradeLevel;

fn json_request(prompt: String, schema: serde_json::Value) -> GenerationRequest {
    GenerationRequest {
        model: Model::Text,
        prompt,
        schema: Some(schema),
    }
}

fn text_request(prompt: String) -> GenerationRequest {
    GenerationRequest {
        model: Model::Text,
        prompt,
        schema: None,
    }
}

/// The single reply of a one-request operation.
fn only(completions: Vec<Completion>) -> Result<Completion, GenerationError> {
    completions
        .into_iter()
        .next()
        .ok_or(GenerationError::EmptyResponse)
}

#[derive(Clone, Debug)]
pub struct SuggestNetwork {
    pub topic: String,
    pub grade: GradeLevel,
    pub nikud: bool,
}

impl Operation for SuggestNetwork {
    type Output = Vec<SuggestedCategory>;

    fn requests(&self) -> Vec<GenerationRequest> {
        vec![json_request(
            prompt::suggest_network(&self.topic, self.grade, self.nikud),
            schema::network(),
        )]
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        parse::structured(&only(completions)?)
    }
}

#[derive(Clone, Debug)]
pub struct NetworkFromText {
    pub source_text: String,
    pub grade: GradeLevel,
    pub nikud: bool,
}

impl Operation for NetworkFromText {
    type Output = TextNetwork;

    fn requests(&self) -> Vec<GenerationRequest> {
        vec![json_request(
            prompt::network_from_text(&self.source_text, self.grade, self.nikud),
            schema::network_from_text(),
        )]
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        parse::structured(&only(completions)?)
    }
}

#[derive(Clone, Debug)]
pub struct FillBlanks {
    pub words: Vec<String>,
    pub topic: String,
    pub nikud: bool,
    pub context: Option<String>,
}

impl Operation for FillBlanks {
    type Output = Vec<String>;

    fn requests(&self) -> Vec<GenerationRequest> {
        vec![json_request(
            prompt::fill_blanks(&self.words, &self.topic, self.nikud, self.context.as_deref()),
            schema::sentences(),
        )]
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        parse::fill_blanks(parse::structured(&only(completions)?)?)
    }
}

#[derive(Clone, Debug)]
pub struct Definitions {
    pub words: Vec<String>,
    pub topic: String,
    pub grade: GradeLevel,
    pub nikud: bool,
    pub context: Option<String>,
}

impl Operation for Definitions {
    type Output = Vec<DefinitionMatch>;

    fn requests(&self) -> Vec<GenerationRequest> {
        vec![json_request(
            prompt::definitions(
                &self.words,
                &self.topic,
                self.grade,
                self.nikud,
                self.context.as_deref(),
            ),
            schema::definitions(),
        )]
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        parse::structured(&only(completions)?)
    }
}

#[derive(Clone, Debug)]
pub struct OddOneOut {
    pub categories: Vec<WordCategory>,
    pub topic: String,
    pub nikud: bool,
}

impl Operation for OddOneOut {
    type Output = Vec<OddOneOutSet>;

    fn requests(&self) -> Vec<GenerationRequest> {
        vec![json_request(
            prompt::odd_one_out(&self.categories, &self.topic, self.nikud),
            schema::odd_one_out(),
        )]
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        parse::odd_one_out(parse::structured(&only(completions)?)?)
    }
}

#[derive(Clone, Debug)]
pub struct DualWords {
    pub words: Vec<String>,
    pub topic: String,
    pub grade: GradeLevel,
    pub nikud: bool,
    pub context: Option<String>,
}

impl Operation for DualWords {
    type Output = Vec<DualWordSet>;

    fn requests(&self) -> Vec<GenerationRequest> {
        vec![json_request(
            prompt::dual_words(
                &self.words,
                &self.topic,
                self.grade,
                self.nikud,
                self.context.as_deref(),
            ),
            schema::dual_words(),
        )]
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        parse::structured(&only(completions)?)
    }
}

#[derive(Clone, Debug)]
pub struct Illustration {
    pub word: String,
    pub topic: String,
}

impl Operation for Illustration {
    /// `None` when the provider answered without an image.
    type Output = Option<String>;

    fn requests(&self) -> Vec<GenerationRequest> {
        vec![GenerationRequest {
            model: Model::Image,
            prompt: prompt::illustration(&self.word, &self.topic),
            schema: None,
        }]
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        Ok(parse::first_image(&only(completions)?))
    }
}

#[derive(Clone, Debug)]
pub struct NarrativeText {
    pub topic: String,
    pub grade: GradeLevel,
    pub words: Vec<String>,
    pub nikud: bool,
}

impl Operation for NarrativeText {
    type Output = String;

    fn requests(&self) -> Vec<GenerationRequest> {
        vec![text_request(prompt::narrative_text(
            &self.topic,
            self.grade,
            &self.words,
            self.nikud,
        ))]
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        Ok(parse::text(&only(completions)?)?.to_string())
    }
}

/// Vocalize each item independently. Blank items are passed through without a
/// request; items whose reply has no text keep their original form.
#[derive(Clone, Debug)]
pub struct Vocalize {
    pub items: Vec<String>,
}

impl Operation for Vocalize {
    type Output = Vec<String>;

    fn requests(&self) -> Vec<GenerationRequest> {
        self.items
            .iter()
            .filter(|item| !item.trim().is_empty())
            .map(|item| text_request(prompt::vocalize(item)))
            .collect()
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError> {
        let mut completions = completions.into_iter();
        let mut out = Vec::with_capacity(self.items.len());
        for item in self.items.iter() {
            if item.trim().is_empty() {
                out.push(item.clone());
                continue;
            }
            match completions.next() {
                Some(completion) => out.push(parse::vocalized(item, &completion)),
                None => out.push(item.clone()),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocalize_skips_blank_items() {
        let op = Vocalize {
            items: vec!["א".to_string(), " ".to_string(), "ב".to_string()],
        };
        assert_eq!(op.requests().len(), 2);
        let out = op
            .parse(vec![Completion::text("אָ"), Completion::default()])
            .unwrap();
        assert_eq!(out, ["אָ", " ", "ב"]);
    }

    #[test]
    fn test_illustration_uses_image_model() {
        let op = Illustration {
            word: "ים".to_string(),
            topic: "טבע".to_string(),
        };
        let requests = op.requests();
        assert_eq!(requests[0].model, Model::Image);
        assert!(requests[0].schema.is_none());
    }

    #[test]
    fn test_network_ignores_reply_ids() {
        let op = SuggestNetwork {
            topic: "ים".to_string(),
            grade: GradeLevel::Unset,
            nikud: false,
        };
        let reply = r#"[{"id": "1", "name": "יצורים", "words": ["דג"]}, {"name": "כלים"}]"#;
        let out = op.parse(vec![Completion::text(reply)]).unwrap();
        assert_eq!(out[0].words, ["דג"]);
        assert!(out[1].words.is_empty());
    }

    #[test]
    fn test_narrative_requires_text() {
        let op = NarrativeText {
            topic: "ים".to_string(),
            grade: GradeLevel::Unset,
            words: vec![],
            nikud: false,
        };
        assert_eq!(
            op.parse(vec![Completion::default()]),
            Err(GenerationError::EmptyResponse)
        );
    }
}
