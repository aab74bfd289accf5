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


//! Generation requests that have passed the wizard's checks and hold an
//! in-flight slot until their result is handed back.

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::gateway::Completion;
use crate::gateway::Definitions;
use crate::gateway::DualWords;
use crate::gateway::FillBlanks;
use crate::gateway::Gateway;
use crate::gateway::GenerationError;
use crate::gateway::GenerationRequest;
use crate::gateway::Illustration;
use crate::gateway::NarrativeText;
use crate::gateway::NetworkFromText;
use crate::gateway::OddOneOut;
use crate::gateway::Operation;
use crate::gateway::SuggestNetwork;
use crate::gateway::Transport;
use crate::gateway::Vocalize;
use crate::gateway::parse::SuggestedCategory;
use crate::gateway::parse::TextNetwork;
use crate::types::artifacts::DefinitionMatch;
use crate::types::artifacts::DualWordSet;
use crate::types::artifacts::OddOneOutSet;
use crate::types::category::CategoryId;

/// The independent in-flight slots. Two requests of the same concern cannot
/// run at once; requests of different concerns can.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    /// Word network suggestions and the reading text.
    Network,
    /// The five exercise generators.
    Exercise,
    Image,
    Vocalization,
}

impl Concern {
    pub const ALL: [Concern; 4] = [
        Concern::Network,
        Concern::Exercise,
        Concern::Image,
        Concern::Vocalization,
    ];
}

impl Display for Concern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Concern::Network => write!(f, "network"),
            Concern::Exercise => write!(f, "exercise"),
            Concern::Image => write!(f, "image"),
            Concern::Vocalization => write!(f, "vocalization"),
        }
    }
}

/// Which content a vocalize-all pass rewrites.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocalizeTarget {
    /// Category names and their words.
    Words,
    /// The fill-in-the-blank sentences.
    Exercises,
    Text,
}

/// What the user asked the provider for.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationKind {
    Network,
    NarrativeText,
    FillBlanks,
    Definitions,
    OddOneOut,
    DualWords,
    Illustration { word: String },
    Vocalize { target: VocalizeTarget },
}

impl GenerationKind {
    pub fn concern(&self) -> Concern {
        match self {
            GenerationKind::Network | GenerationKind::NarrativeText => Concern::Network,
            GenerationKind::FillBlanks
            | GenerationKind::Definitions
            | GenerationKind::OddOneOut
            | GenerationKind::DualWords => Concern::Exercise,
            GenerationKind::Illustration { .. } => Concern::Image,
            GenerationKind::Vocalize { .. } => Concern::Vocalization,
        }
    }
}

/// Identifies one in-flight request. A result is applied only while its
/// ticket still holds the slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Ticket {
    pub concern: Concern,
    pub id: u64,
}

/// A prepared generation: the operation plus what is needed to apply its
/// result.
#[derive(Clone, Debug)]
pub(crate) enum Task {
    Network(SuggestNetwork),
    TextNetwork(NetworkFromText),
    Narrative(NarrativeText),
    FillBlanks(FillBlanks),
    Definitions(Definitions),
    OddOneOut(OddOneOut),
    DualWords(DualWords),
    Illustration(Illustration),
    /// Items are laid out as each category's name followed by its words.
    VocalizeWords {
        layout: Vec<(CategoryId, Vec<String>)>,
        op: Vocalize,
    },
    VocalizeExercises(Vocalize),
    VocalizeText(Vocalize),
}

/// A successful generation, ready to be written into the lesson.
#[derive(Clone, PartialEq, Debug)]
pub enum Artifact {
    Network(Vec<SuggestedCategory>),
    TextNetwork(TextNetwork),
    Narrative(String),
    FillBlanks(Vec<String>),
    Definitions(Vec<DefinitionMatch>),
    OddOneOut(Vec<OddOneOutSet>),
    DualWords(Vec<DualWordSet>),
    Illustration { word: String, url: Option<String> },
    VocalizedWords(Vec<VocalizedCategory>),
    VocalizedExercises(Vec<String>),
    VocalizedText(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct VocalizedCategory {
    pub id: CategoryId,
    pub name: String,
    /// Each word as it was sent, paired with its vocalized form.
    pub words: Vec<(String, String)>,
}

impl Operation for Task {
    type Output = Artifact;

    fn requests(&self) -> Vec<GenerationRequest> {
        match self {
            Task::Network(op) => op.requests(),
            Task::TextNetwork(op) => op.requests(),
            Task::Narrative(op) => op.requests(),
            Task::FillBlanks(op) => op.requests(),
            Task::Definitions(op) => op.requests(),
            Task::OddOneOut(op) => op.requests(),
            Task::DualWords(op) => op.requests(),
            Task::Illustration(op) => op.requests(),
            Task::VocalizeWords { op, .. } => op.requests(),
            Task::VocalizeExercises(op) => op.requests(),
            Task::VocalizeText(op) => op.requests(),
        }
    }

    fn parse(&self, completions: Vec<Completion>) -> Result<Artifact, GenerationError> {
        let artifact = match self {
            Task::Network(op) => Artifact::Network(op.parse(completions)?),
            Task::TextNetwork(op) => Artifact::TextNetwork(op.parse(completions)?),
            Task::Narrative(op) => Artifact::Narrative(op.parse(completions)?),
            Task::FillBlanks(op) => Artifact::FillBlanks(op.parse(completions)?),
            Task::Definitions(op) => Artifact::Definitions(op.parse(completions)?),
            Task::OddOneOut(op) => Artifact::OddOneOut(op.parse(completions)?),
            Task::DualWords(op) => Artifact::DualWords(op.parse(completions)?),
            Task::Illustration(op) => Artifact::Illustration {
                word: op.word.clone(),
                url: op.parse(completions)?,
            },
            Task::VocalizeWords { layout, op } => {
                let mut items = op.parse(completions)?.into_iter();
                let mut out = Vec::with_capacity(layout.len());
                for (id, sent) in layout {
                    let name = items.next().unwrap_or_default();
                    let words = sent.iter().cloned().zip(items.by_ref()).collect();
                    out.push(VocalizedCategory {
                        id: id.clone(),
                        name,
                        words,
                    });
                }
                Artifact::VocalizedWords(out)
            }
            Task::VocalizeExercises(op) => Artifact::VocalizedExercises(op.parse(completions)?),
            Task::VocalizeText(op) => {
                let text = op.parse(completions)?.into_iter().next().unwrap_or_default();
                Artifact::VocalizedText(text)
            }
        };
        Ok(artifact)
    }
}

/// A generation that holds an in-flight slot. Either [`Job::run`] it against
/// a gateway, or send [`Job::requests`] elsewhere and feed the replies to
/// [`Job::resolve`]. Hand the [`Finished`] back to the wizard in both cases.
#[derive(Clone, Debug)]
pub struct Job {
    pub(crate) ticket: Ticket,
    pub(crate) task: Task,
}

/// The outcome of a [`Job`].
#[derive(Clone, PartialEq, Debug)]
pub struct Finished {
    pub ticket: Ticket,
    pub result: Result<Artifact, GenerationError>,
}

impl Job {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.task.requests()
    }

    pub fn resolve(&self, completions: Vec<Completion>) -> Finished {
        self.finish(self.task.parse(completions))
    }

    /// The job failed before all replies arrived.
    pub fn fail(&self, error: GenerationError) -> Finished {
        self.finish(Err(error))
    }

    pub async fn run<T: Transport + Sync>(&self, gateway: &Gateway<T>) -> Finished {
        self.finish(gateway.run(&self.task).await)
    }

    fn finish(&self, result: Result<Artifact, GenerationError>) -> Finished {
        Finished {
            ticket: self.ticket,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concerns() {
        assert_eq!(GenerationKind::NarrativeText.concern(), Concern::Network);
        assert_eq!(GenerationKind::DualWords.concern(), Concern::Exercise);
        assert_eq!(
            GenerationKind::Illustration {
                word: "ים".to_string()
            }
            .concern(),
            Concern::Image
        );
    }

    #[test]
    fn test_vocalized_words_follow_layout() {
        let task = Task::VocalizeWords {
            layout: vec![
                (
                    CategoryId::from("a"),
                    vec!["כלב".to_string(), "חתול".to_string()],
                ),
                (CategoryId::from("b"), vec![]),
            ],
            op: Vocalize {
                items: vec![
                    "חי".to_string(),
                    "כלב".to_string(),
                    "חתול".to_string(),
                    "צומח".to_string(),
                ],
            },
        };
        let replies = vec![
            Completion::text("חַי"),
            Completion::text("כֶּלֶב"),
            Completion::default(),
            Completion::text("צוֹמֵחַ"),
        ];
        let Artifact::VocalizedWords(out) = task.parse(replies).unwrap() else {
            panic!("expected vocalized words");
        };
        assert_eq!(out[0].name, "חַי");
        assert_eq!(
            out[0].words,
            [
                ("כלב".to_string(), "כֶּלֶב".to_string()),
                ("חתול".to_string(), "חתול".to_string())
            ]
        );
        assert_eq!(out[1].name, "צוֹמֵחַ");
        assert!(out[1].words.is_empty());
    }

    #[test]
    fn test_kind_wire_shape() {
        let kind: GenerationKind =
            serde_json::from_str(r#"{"kind": "vocalize", "target": "exercises"}"#).unwrap();
        assert_eq!(
            kind,
            GenerationKind::Vocalize {
                target: VocalizeTarget::Exercises
            }
        );
    }
}
