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


use std::fmt::Display;
use std::fmt::Formatter;
use std::fs::read_to_string;
use std::fs::write;
use std::path::Path;

use clap::ValueEnum;
use lessonkit_core::ProjectFile;
use lessonkit_core::Timestamp;
use lessonkit_core::error::Fallible;
use lessonkit_core::error::fail;
use lessonkit_core::export;
use lessonkit_core::export::ExportFormat;
use lessonkit_core::wizard::Wizard;

use crate::config::Config;
use crate::utils::clock_seed;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum ExportKind {
    /// The worksheet as a Word document.
    Doc,
    /// The worksheet as a standalone HTML page.
    Html,
    /// The worksheet, printing itself when opened.
    Worksheet,
    /// A self-contained flashcard deck.
    Flashcards,
    /// The project file, with a fresh export date.
    Project,
}

impl Display for ExportKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Doc => write!(f, "doc"),
            ExportKind::Html => write!(f, "html"),
            ExportKind::Worksheet => write!(f, "worksheet"),
            ExportKind::Flashcards => write!(f, "flashcards"),
            ExportKind::Project => write!(f, "project"),
        }
    }
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Doc => ExportFormat::Doc,
            ExportKind::Html => ExportFormat::Html,
            ExportKind::Worksheet => ExportFormat::Worksheet,
            ExportKind::Flashcards => ExportFormat::Flashcards,
            ExportKind::Project => ExportFormat::Project,
        }
    }
}

/// Render a saved project without starting the server.
pub fn export_project(
    project: &Path,
    kind: ExportKind,
    output: Option<String>,
    config: &Config,
) -> Fallible<()> {
    if !project.exists() {
        return fail(format!("project file {} does not exist.", project.display()));
    }
    let text = read_to_string(project)?;
    let project = ProjectFile::from_json(&text)?;
    let mut wizard = Wizard::restore(project, clock_seed());
    let export = export::render(
        &mut wizard,
        kind.into(),
        &config.export_options(),
        Timestamp::now(),
    )?;
    match output {
        Some(path) => {
            write(&path, export.body)?;
            log::info!("Wrote {kind} export to {path}");
        }
        None => {
            if let Some(name) = &export.file_name {
                log::debug!("Suggested file name: {name}");
            }
            print!("{}", export.body);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    const PROJECT: &str = r#"{
        "state": {
            "mode": "topic",
            "topic": "חורף",
            "gradeLevel": "ג-ד",
            "categories": [{"id": "c1", "name": "בגדים", "words": ["מעיל", "צעיף"]}]
        },
        "fillBlanks": ["בחורף לובשים ________ חם."],
        "currentStep": 6
    }"#;

    #[test]
    fn test_export_missing_project() {
        let result = export_project(
            Path::new("./derpherp.json"),
            ExportKind::Doc,
            None,
            &Config::default(),
        );
        assert_eq!(
            result.err().unwrap().to_string(),
            "error: project file ./derpherp.json does not exist."
        );
    }

    #[test]
    fn test_export_doc_to_file() -> Fallible<()> {
        let dir = tempdir()?;
        let project = dir.path().join("project.json");
        write(&project, PROJECT)?;
        let output = dir.path().join("out.doc");
        export_project(
            &project,
            ExportKind::Doc,
            Some(output.display().to_string()),
            &Config::default(),
        )?;
        let doc = read_to_string(&output)?;
        assert!(doc.starts_with('\u{feff}'));
        assert!(doc.contains("צעיף"));
        assert!(doc.contains("השלמת משפטים"));
        assert!(!doc.contains("כל הזכויות שמורות"));
        Ok(())
    }

    #[test]
    fn test_export_rejects_malformed_project() -> Fallible<()> {
        let dir = tempdir()?;
        let project = dir.path().join("project.json");
        write(&project, "[1, 2, 3]")?;
        let result = export_project(&project, ExportKind::Project, None, &Config::default());
        assert!(result.is_err());
        Ok(())
    }
}
