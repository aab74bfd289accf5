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


//! Documents produced from a finished lesson.

use serde::Deserialize;
use serde::Serialize;

pub mod deck;
pub mod snapshot;
pub mod worksheet;

use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use crate::wizard::Wizard;
use worksheet::Worksheet;
use worksheet::WorksheetMode;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// The worksheet, printing itself once opened.
    Worksheet,
    /// The worksheet as a Word document.
    Doc,
    /// The worksheet as plain HTML.
    Html,
    Flashcards,
    Project,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Worksheet,
        ExportFormat::Doc,
        ExportFormat::Html,
        ExportFormat::Flashcards,
        ExportFormat::Project,
    ];

    /// The route segment the format is served under.
    pub fn route_name(self) -> &'static str {
        match self {
            ExportFormat::Worksheet => "worksheet.html",
            ExportFormat::Doc => "worksheet.doc",
            ExportFormat::Html => "lesson.html",
            ExportFormat::Flashcards => "flashcards.html",
            ExportFormat::Project => "project.json",
        }
    }

    pub fn from_route_name(name: &str) -> Option<ExportFormat> {
        ExportFormat::ALL.into_iter().find(|f| f.route_name() == name)
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Worksheet | ExportFormat::Html | ExportFormat::Flashcards => {
                "text/html; charset=utf-8"
            }
            ExportFormat::Doc => "application/msword",
            ExportFormat::Project => "application/json",
        }
    }

    /// Suggested download name. The print view is opened rather than saved.
    pub fn file_name(self, topic: &str) -> Option<String> {
        let topic = topic.trim();
        let or = |fallback: &str| {
            if topic.is_empty() {
                fallback.to_string()
            } else {
                topic.replace(['/', '\\'], "_")
            }
        };
        match self {
            ExportFormat::Worksheet => None,
            ExportFormat::Doc => Some(format!("דף_עבודה_{}.doc", or("שיעור"))),
            ExportFormat::Html => Some(format!("דף_עבודה_{}.html", or("שיעור"))),
            ExportFormat::Flashcards => Some(format!("כרטיסי_הברקה_{}.html", or("שיעור"))),
            ExportFormat::Project => Some(format!("פרויקט_{}.json", or("חדש"))),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct ExportOptions {
    /// Named in the worksheet footer and the deck header.
    pub author: Option<String>,
}

/// A rendered document.
#[derive(Clone, PartialEq, Debug)]
pub struct Export {
    pub format: ExportFormat,
    pub file_name: Option<String>,
    pub body: String,
}

/// Render the wizard's lesson as `format`. `now` stamps project files and
/// dates the worksheet footer.
pub fn render(
    wizard: &mut Wizard,
    format: ExportFormat,
    options: &ExportOptions,
    now: Timestamp,
) -> Fallible<Export> {
    let author = options.author.as_deref();
    let body = match format {
        ExportFormat::Worksheet | ExportFormat::Doc | ExportFormat::Html => {
            let mode = match format {
                ExportFormat::Doc => WorksheetMode::Doc,
                ExportFormat::Html => WorksheetMode::Html,
                _ => WorksheetMode::Print,
            };
            let definitions = wizard.shuffled_definitions().to_vec();
            let image_word_bank = wizard.shuffled_image_word_bank().to_vec();
            Worksheet {
                lesson: wizard.lesson(),
                fill_blanks: wizard.fill_blanks(),
                shuffled_definitions: &definitions,
                image_word_bank: &image_word_bank,
                author,
                year: now.year(),
            }
            .render(mode)
        }
        ExportFormat::Flashcards => {
            deck::render_deck(&wizard.lesson().topic, &wizard.all_words(), author)?
        }
        ExportFormat::Project => wizard.snapshot().stamped(now).to_json()?,
    };
    log::debug!("Rendered {} export", format.route_name());
    Ok(Export {
        format,
        file_name: format.file_name(&wizard.lesson().topic),
        body,
    })
}
