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


use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use lessonkit_core::types::category::CategoryId;
use lessonkit_core::types::grade::GradeLevel;
use lessonkit_core::types::lesson::LessonMode;
use lessonkit_core::types::step::Step;
use lessonkit_core::wizard::Command;
use lessonkit_core::wizard::Notice;
use lessonkit_core::wizard::Wizard;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;

#[derive(Deserialize)]
pub struct ActionForm {
    action: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    word: Option<String>,
    /// Set by the intake form, whose fields are applied before `action`.
    #[serde(default)]
    intake: Option<String>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    source_text: Option<String>,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default)]
    nikud: Option<String>,
}

pub async fn post_handler<T>(
    State(state): State<ServerState<T>>,
    Form(form): Form<ActionForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let mut mutable = state
        .lock()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let mut commands = Vec::new();
    if form.intake.is_some() {
        commands.extend(intake_commands(&mutable.wizard, &form));
    }
    let is_reset = form.action == "Reset";
    match parse_action(&form) {
        Some(command) => commands.push(command),
        None if form.action == "Save" => {}
        None => {
            log::debug!("Ignoring unknown action {:?}", form.action);
        }
    }
    let mut changed = false;
    for command in commands {
        log::debug!("Dispatching {command:?}");
        match mutable.wizard.dispatch(command) {
            Ok(c) => changed |= c,
            Err(e) => {
                mutable.wizard.show(Notice::info(e.to_string()));
                break;
            }
        }
    }
    if is_reset {
        mutable.forget();
    } else if changed {
        mutable.settle();
    }
    Ok(Redirect::to("/"))
}

/// The intake form submits every field at once; only the ones that apply to
/// the current mode are kept.
fn intake_commands(wizard: &Wizard, form: &ActionForm) -> Vec<Command> {
    let mut commands = Vec::new();
    match wizard.lesson().mode {
        LessonMode::ByTopic => {
            if let Some(topic) = &form.topic {
                commands.push(Command::SetTopic(topic.trim().to_string()));
            }
        }
        LessonMode::ByText => {
            if let Some(text) = &form.source_text {
                commands.push(Command::SetSourceText(text.clone()));
            }
        }
    }
    if let Some(grade) = &form.grade {
        commands.push(Command::SetGradeLevel(GradeLevel::from(grade.clone())));
    }
    // Unchecked checkboxes are not submitted at all.
    commands.push(Command::SetNikud(form.nikud.is_some()));
    commands
}

fn parse_action(form: &ActionForm) -> Option<Command> {
    let value = form.value.clone().unwrap_or_default();
    let word = form.word.clone().unwrap_or_default();
    let category = || form.category.as_deref().map(CategoryId::from);
    let command = match form.action.as_str() {
        "SetMode" => match value.as_str() {
            "topic" => Command::SetMode(LessonMode::ByTopic),
            "text" => Command::SetMode(LessonMode::ByText),
            _ => return None,
        },
        "AddCategory" => {
            let name = value.trim();
            if name.is_empty() {
                return None;
            }
            Command::AddCategory(name.to_string())
        }
        "RemoveCategory" => Command::RemoveCategory(category()?),
        "AddWord" => {
            let word = word.trim();
            if word.is_empty() {
                return None;
            }
            Command::AddWord {
                category: category()?,
                word: word.to_string(),
            }
        }
        "RemoveWord" => Command::RemoveWord {
            category: category()?,
            word,
        },
        "SetText" => Command::SetText(value),
        "ClearText" => Command::ClearText,
        "ToggleDefinitionWord" => Command::ToggleDefinitionWord(word),
        "ToggleAlphabeticalWord" => Command::ToggleAlphabeticalWord(word),
        "CommitAlphabetical" => Command::CommitAlphabetical,
        "RemoveWordImage" => Command::RemoveWordImage(word),
        "RemoveFillBlank" => Command::RemoveFillBlank(value.parse().ok()?),
        "Next" => Command::Next,
        "Back" => Command::Back,
        "JumpTo" => Command::JumpTo(Step::new(value.parse().ok()?)?),
        "DismissNotice" => Command::DismissNotice,
        "Reset" => Command::Reset,
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(action: &str, value: Option<&str>) -> ActionForm {
        ActionForm {
            action: action.to_string(),
            value: value.map(str::to_string),
            category: Some("c1".to_string()),
            word: Some(" ים ".to_string()),
            intake: None,
            topic: None,
            source_text: None,
            grade: None,
            nikud: None,
        }
    }

    #[test]
    fn test_parse_action() {
        assert_eq!(
            parse_action(&form("SetMode", Some("text"))),
            Some(Command::SetMode(LessonMode::ByText))
        );
        assert_eq!(
            parse_action(&form("AddWord", None)),
            Some(Command::AddWord {
                category: CategoryId::from("c1"),
                word: "ים".to_string()
            })
        );
        assert_eq!(
            parse_action(&form("JumpTo", Some("4"))),
            Some(Command::JumpTo(Step::NarrativeText))
        );
        assert_eq!(parse_action(&form("JumpTo", Some("7"))), None);
        assert_eq!(parse_action(&form("AddCategory", Some("  "))), None);
        assert_eq!(parse_action(&form("Explode", None)), None);
    }

    #[test]
    fn test_intake_commands_follow_mode() {
        let wizard = Wizard::new(1);
        let mut f = form("Save", None);
        f.intake = Some("1".to_string());
        f.topic = Some(" חיות ".to_string());
        f.source_text = Some("ignored".to_string());
        f.grade = Some("ג-ד".to_string());
        assert_eq!(
            intake_commands(&wizard, &f),
            vec![
                Command::SetTopic("חיות".to_string()),
                Command::SetGradeLevel(GradeLevel::Grades3To4),
                Command::SetNikud(false),
            ]
        );
    }
}
