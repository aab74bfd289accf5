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


//! The portable project file, also used as the autosave payload.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::lesson::LessonState;
use crate::types::null_as_default;
use crate::types::step::Step;
use crate::types::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// The saved text is not a project file.
    Unreadable(String),
    /// The storage backend failed.
    Storage(String),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Unreadable(msg) => write!(f, "unreadable project file: {msg}"),
            PersistenceError::Storage(msg) => write!(f, "storage failure: {msg}"),
        }
    }
}

impl Error for PersistenceError {}

/// Everything needed to resume a lesson. The selection sets, notices and
/// shuffled orderings are not part of it.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub state: LessonState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fill_blanks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_step: Step,
    /// Set on explicit exports, absent in autosaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<Timestamp>,
}

impl ProjectFile {
    pub fn from_json(text: &str) -> Result<ProjectFile, PersistenceError> {
        serde_json::from_str(text).map_err(|e| PersistenceError::Unreadable(e.to_string()))
    }

    pub fn to_json(&self) -> Fallible<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn stamped(self, date: Timestamp) -> Self {
        Self {
            export_date: Some(date),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::rng::TinyRng;
    use crate::types::artifacts::DualWordSet;
    use crate::types::artifacts::OddOneOutSet;
    use crate::types::category::CategoryId;
    use crate::types::grade::GradeLevel;

    #[test]
    fn test_round_trip() -> Fallible<()> {
        let mut state = LessonState {
            topic: "ט\"ו בשבט".to_string(),
            grade_level: GradeLevel::Grades3To4,
            with_nikud: true,
            text: "**עץ** גדל".to_string(),
            odd_one_out_sets: vec![OddOneOutSet {
                options: vec!["א".into(), "ב".into(), "ג".into(), "ד".into()],
                answer: "ד".to_string(),
                reason: "r".to_string(),
            }],
            dual_word_sets: vec![DualWordSet {
                word_a: "עץ".to_string(),
                word_b: "פרי".to_string(),
            }],
            ..Default::default()
        };
        let id = state.add_category("צמחים", &mut TinyRng::from_seed(5)).unwrap();
        state.add_word(&id, "שקד");
        let project = ProjectFile {
            state,
            fill_blanks: vec!["ה________ פורח".to_string()],
            current_step: Step::ExerciseStudio,
            export_date: Some(Timestamp::try_from("2026-01-05T10:00:00.000Z".to_string())?),
        };
        let json = project.to_json()?;
        assert!(json.contains("\"fillBlanks\""));
        assert!(json.contains("\"exportDate\": \"2026-01-05T10:00:00.000Z\""));
        assert_eq!(ProjectFile::from_json(&json)?, project);
        Ok(())
    }

    #[test]
    fn test_autosave_shape_has_no_export_date() -> Fallible<()> {
        let project = ProjectFile {
            state: LessonState::default(),
            fill_blanks: vec![],
            current_step: Step::Intake,
            export_date: None,
        };
        assert!(!project.to_json()?.contains("exportDate"));
        Ok(())
    }

    #[test]
    fn test_sparse_file_defaults() -> Fallible<()> {
        let project = ProjectFile::from_json(r#"{"state": {"topic": "ים"}}"#)?;
        assert_eq!(project.state.topic, "ים");
        assert!(project.fill_blanks.is_empty());
        assert_eq!(project.current_step, Step::Intake);
        assert!(project.state.categories.is_empty());
        Ok(())
    }

    #[test]
    fn test_nulls_and_missing_ids_load() -> Fallible<()> {
        let json = r#"{
            "state": {
                "topic": "ים",
                "categories": [
                    {"name": "דגים", "words": ["כריש", "לוויתן"]},
                    {"id": null, "name": "סירות", "words": null},
                    {"id": "k1", "name": "חופים"}
                ],
                "wordImages": null,
                "oddOneOutSets": null,
                "definitionMatches": null,
                "alphabeticalWords": null,
                "dualWordSets": null
            },
            "fillBlanks": null
        }"#;
        let mut project = ProjectFile::from_json(json)?;
        assert!(project.fill_blanks.is_empty());
        assert!(project.state.word_images.is_empty());
        assert!(project.state.dual_word_sets.is_empty());
        assert!(project.state.categories[1].words().is_empty());

        project.state.normalize(&mut TinyRng::from_seed(11));
        let ids: Vec<_> = project.state.categories.iter().map(|c| c.id.clone()).collect();
        assert!(ids.iter().all(|id| !id.is_blank()));
        assert_ne!(ids[0], ids[1]);
        assert_eq!(ids[2], CategoryId::from("k1"));
        assert_eq!(project.state.all_words(), ["כריש", "לוויתן"]);
        Ok(())
    }

    #[test]
    fn test_passthrough_fields_survive() -> Fallible<()> {
        let json = r#"{
            "state": {
                "topic": "ים",
                "description": "שיעור על הים",
                "usedWords": ["גל", "חול"]
            }
        }"#;
        let project = ProjectFile::from_json(json)?;
        assert_eq!(project.state.description.as_deref(), Some("שיעור על הים"));
        let again = ProjectFile::from_json(&project.to_json()?)?;
        assert_eq!(again.state.used_words, Some(vec!["גל".to_string(), "חול".to_string()]));
        assert!(project.to_json()?.contains("\"usedWords\""));

        let bare = ProjectFile::from_json(r#"{"state": {}}"#)?.to_json()?;
        assert!(!bare.contains("description"));
        assert!(!bare.contains("usedWords"));
        Ok(())
    }

    #[test]
    fn test_missing_state_is_unreadable() {
        assert!(matches!(
            ProjectFile::from_json(r#"{"fillBlanks": []}"#),
            Err(PersistenceError::Unreadable(_))
        ));
        assert!(ProjectFile::from_json("not json").is_err());
    }
}
