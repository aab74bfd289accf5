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


//! The six-step lesson wizard.
//!
//! [`Wizard`] owns the lesson. User edits arrive as [`Command`]s through
//! [`Wizard::dispatch`]; generation goes through [`Wizard::prepare`], which
//! checks preconditions and takes the concern's in-flight slot, and
//! [`Wizard::complete`], which releases it and applies the result. The
//! provider call happens in between, outside the wizard, so a caller can
//! release its lock while waiting.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

pub mod command;
pub mod job;

pub use command::Command;
pub use job::Artifact;
pub use job::Concern;
pub use job::Finished;
pub use job::GenerationKind;
pub use job::Job;
pub use job::Ticket;
pub use job::VocalizeTarget;

use crate::export::snapshot::ProjectFile;
use crate::gateway::Definitions;
use crate::gateway::DualWords;
use crate::gateway::FillBlanks;
use crate::gateway::GenerationError;
use crate::gateway::Illustration;
use crate::gateway::NarrativeText;
use crate::gateway::NetworkFromText;
use crate::gateway::OddOneOut;
use crate::gateway::SuggestNetwork;
use crate::gateway::Vocalize;
use crate::gateway::parse::SuggestedCategory;
use crate::rng::RandomSource;
use crate::rng::TinyRng;
use crate::types::artifacts::DefinitionMatch;
use crate::types::artifacts::WordImage;
use crate::types::category::WordCategory;
use crate::types::lesson::LessonMode;
use crate::types::lesson::LessonState;
use crate::types::step::Step;
use crate::views::DerivedViews;
use crate::views::FlashcardCursor;
use job::Task;

/// Minimum number of categories for the odd-one-out exercise.
pub const MIN_ODD_ONE_OUT_CATEGORIES: usize = 2;

const DEFAULT_CREDENTIAL_HINT: &str = "Check that a valid API key is configured.";

/// An action refused before it touched the lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingTopic,
    MissingSourceText,
    /// The mode cannot change while the lesson has a word network.
    ModeLocked,
    NoWordsSelected,
    NotEnoughCategories,
    NoWords,
    NoText,
    NoExercises,
    ImageExists,
    UnknownCategory,
    Busy(Concern),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingTopic => write!(f, "נא להזין נושא"),
            ValidationError::MissingSourceText => write!(f, "נא להזין טקסט"),
            ValidationError::ModeLocked => {
                write!(f, "לא ניתן להחליף מצב לאחר יצירת רשת מילים. אפסו את השיעור קודם")
            }
            ValidationError::NoWordsSelected => write!(f, "נא לבחור מילים מהמחסן קודם"),
            ValidationError::NotEnoughCategories => {
                write!(f, "דרושות לפחות 2 קטגוריות ליצירת התרגיל")
            }
            ValidationError::NoWords => write!(f, "אין מילים ברשת המילים"),
            ValidationError::NoText => write!(f, "אין טקסט"),
            ValidationError::NoExercises => write!(f, "אין משפטים להשלמה"),
            ValidationError::ImageExists => write!(f, "למילה זו כבר יש תמונה"),
            ValidationError::UnknownCategory => write!(f, "הקטגוריה לא נמצאה"),
            ValidationError::Busy(concern) => write!(f, "בקשה מסוג {concern} כבר מתבצעת"),
        }
    }
}

impl Error for ValidationError {}

/// The one message shown to the user at a time.
#[derive(Clone, PartialEq, Debug)]
pub struct Notice {
    pub message: String,
    /// How to fix a rejected API key.
    pub hint: Option<String>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }
}

/// Words picked for the definitions and alphabetical exercises. Not saved.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Selection {
    pub definitions: Vec<String>,
    pub alphabetical: Vec<String>,
}

fn toggle(list: &mut Vec<String>, word: String) {
    if let Some(pos) = list.iter().position(|w| *w == word) {
        list.remove(pos);
    } else {
        list.push(word);
    }
}

pub struct Wizard {
    lesson: LessonState,
    fill_blanks: Vec<String>,
    step: Step,
    selection: Selection,
    in_flight: HashMap<Concern, u64>,
    next_ticket: u64,
    notice: Option<Notice>,
    credential_hint: String,
    revision: u64,
    rng: TinyRng,
    views: DerivedViews<TinyRng>,
    cursor: FlashcardCursor,
}

impl Wizard {
    /// A fresh lesson. `seed` drives category identifiers and shuffles.
    pub fn new(seed: u64) -> Self {
        let mut rng = TinyRng::from_seed(seed);
        let views = DerivedViews::new(TinyRng::from_seed(rng.next_u64()));
        Self {
            lesson: LessonState::default(),
            fill_blanks: Vec::new(),
            step: Step::Intake,
            selection: Selection::default(),
            in_flight: HashMap::new(),
            next_ticket: 1,
            notice: None,
            credential_hint: DEFAULT_CREDENTIAL_HINT.to_string(),
            revision: 0,
            rng,
            views,
            cursor: FlashcardCursor::default(),
        }
    }

    /// Resume from a saved project.
    pub fn restore(project: ProjectFile, seed: u64) -> Self {
        let mut wizard = Wizard::new(seed);
        wizard.load(project);
        wizard
    }

    /// The hint attached to notices about a rejected API key.
    pub fn set_credential_hint(&mut self, hint: impl Into<String>) {
        self.credential_hint = hint.into();
    }

    pub fn lesson(&self) -> &LessonState {
        &self.lesson
    }

    pub fn fill_blanks(&self) -> &[String] {
        &self.fill_blanks
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Incremented on every change to saved state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_busy(&self, concern: Concern) -> bool {
        self.in_flight.contains_key(&concern)
    }

    pub fn all_words(&self) -> Vec<String> {
        self.lesson.all_words()
    }

    pub fn shuffled_definitions(&mut self) -> &[DefinitionMatch] {
        self.views.shuffled_definitions(&self.lesson)
    }

    pub fn shuffled_image_word_bank(&mut self) -> &[String] {
        self.views.shuffled_image_word_bank(&self.lesson)
    }

    pub fn cursor(&self) -> FlashcardCursor {
        self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut FlashcardCursor {
        &mut self.cursor
    }

    /// Show `notice`, replacing the current one.
    pub fn show(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// The saved form of the lesson, without an export date.
    pub fn snapshot(&self) -> ProjectFile {
        ProjectFile {
            state: self.lesson.clone(),
            fill_blanks: self.fill_blanks.clone(),
            current_step: self.step,
            export_date: None,
        }
    }

    /// Replace the lesson with a loaded project. In-flight requests keep their
    /// slots; their results apply to the loaded lesson.
    pub fn load(&mut self, project: ProjectFile) {
        let mut state = project.state;
        state.normalize(&mut self.rng);
        self.lesson = state;
        self.fill_blanks = project.fill_blanks;
        self.step = project.current_step;
        self.selection = Selection::default();
        self.cursor.reset();
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Apply a user edit. Returns whether the saved state changed; refused
    /// actions leave everything as it was.
    pub fn dispatch(&mut self, command: Command) -> Result<bool, ValidationError> {
        let changed = match command {
            Command::SetMode(mode) => {
                if mode == self.lesson.mode {
                    false
                } else if !self.lesson.categories.is_empty() {
                    return Err(ValidationError::ModeLocked);
                } else {
                    self.lesson.mode = mode;
                    true
                }
            }
            Command::SetTopic(topic) => replace(&mut self.lesson.topic, topic),
            Command::SetSourceText(text) => replace(&mut self.lesson.source_text, text),
            Command::SetGradeLevel(grade) => replace(&mut self.lesson.grade_level, grade),
            Command::SetNikud(nikud) => replace(&mut self.lesson.with_nikud, nikud),
            Command::AddCategory(name) => self.lesson.add_category(&name, &mut self.rng).is_some(),
            Command::RemoveCategory(id) => self.lesson.remove_category(&id),
            Command::AddWord { category, word } => {
                if self.lesson.category(&category).is_none() {
                    return Err(ValidationError::UnknownCategory);
                }
                self.lesson.add_word(&category, &word)
            }
            Command::RemoveWord { category, word } => self.lesson.remove_word(&category, &word),
            Command::SetText(text) => replace(&mut self.lesson.text, text),
            Command::ClearText => replace(&mut self.lesson.text, String::new()),
            Command::ToggleDefinitionWord(word) => {
                toggle(&mut self.selection.definitions, word);
                false
            }
            Command::ToggleAlphabeticalWord(word) => {
                toggle(&mut self.selection.alphabetical, word);
                false
            }
            Command::CommitAlphabetical => {
                if self.selection.alphabetical.is_empty() {
                    return Err(ValidationError::NoWordsSelected);
                }
                let words = self.selection.alphabetical.clone();
                replace(&mut self.lesson.alphabetical_words, words)
            }
            Command::RemoveWordImage(word) => {
                let before = self.lesson.word_images.len();
                self.lesson.word_images.retain(|img| img.word != word);
                self.lesson.word_images.len() != before
            }
            Command::RemoveFillBlank(index) => {
                if index < self.fill_blanks.len() {
                    self.fill_blanks.remove(index);
                    true
                } else {
                    false
                }
            }
            Command::Next => {
                if self.step == Step::Intake && !self.lesson.intake_ready() {
                    return Err(self.missing_intake());
                }
                match self.step.next() {
                    Some(step) => replace(&mut self.step, step),
                    None => false,
                }
            }
            Command::Back => match self.step.prev() {
                Some(step) => replace(&mut self.step, step),
                None => false,
            },
            Command::JumpTo(step) => replace(&mut self.step, step),
            Command::DismissNotice => {
                self.notice = None;
                false
            }
            Command::Reset => {
                self.reset();
                true
            }
        };
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    fn missing_intake(&self) -> ValidationError {
        match self.lesson.mode {
            LessonMode::ByTopic => ValidationError::MissingTopic,
            LessonMode::ByText => ValidationError::MissingSourceText,
        }
    }

    /// Start over. Results of requests started before the reset are dropped.
    fn reset(&mut self) {
        self.lesson = LessonState::default();
        self.fill_blanks.clear();
        self.step = Step::Intake;
        self.selection = Selection::default();
        self.in_flight.clear();
        self.notice = None;
        self.cursor.reset();
    }

    /// The reading text, or nothing when it is blank. Passed to the exercise
    /// generators as context.
    fn context(&self) -> Option<String> {
        let text = self.lesson.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(self.lesson.text.clone())
        }
    }

    /// Check the preconditions of `kind` and take its concern's slot.
    pub fn prepare(&mut self, kind: GenerationKind) -> Result<Job, ValidationError> {
        let concern = kind.concern();
        if self.is_busy(concern) {
            return Err(ValidationError::Busy(concern));
        }
        let task = self.task(kind)?;
        let ticket = Ticket {
            concern,
            id: self.next_ticket,
        };
        self.next_ticket += 1;
        self.in_flight.insert(concern, ticket.id);
        self.notice = None;
        log::debug!("Started {concern} request #{}", ticket.id);
        Ok(Job { ticket, task })
    }

    fn task(&self, kind: GenerationKind) -> Result<Task, ValidationError> {
        let lesson = &self.lesson;
        let topic = lesson.topic.clone();
        let grade = lesson.grade_level;
        let nikud = lesson.with_nikud;
        let words = lesson.all_words();
        let task = match kind {
            GenerationKind::Network => {
                if !lesson.intake_ready() {
                    return Err(self.missing_intake());
                }
                match lesson.mode {
                    LessonMode::ByTopic => Task::Network(SuggestNetwork {
                        topic,
                        grade,
                        nikud,
                    }),
                    LessonMode::ByText => Task::TextNetwork(NetworkFromText {
                        source_text: lesson.source_text.clone(),
                        grade,
                        nikud,
                    }),
                }
            }
            GenerationKind::NarrativeText => {
                if words.is_empty() {
                    return Err(ValidationError::NoWords);
                }
                Task::Narrative(NarrativeText {
                    topic,
                    grade,
                    words,
                    nikud,
                })
            }
            GenerationKind::FillBlanks => {
                if words.is_empty() {
                    return Err(ValidationError::NoWords);
                }
                Task::FillBlanks(FillBlanks {
                    words,
                    topic,
                    nikud,
                    context: self.context(),
                })
            }
            GenerationKind::Definitions => {
                if self.selection.definitions.is_empty() {
                    return Err(ValidationError::NoWordsSelected);
                }
                Task::Definitions(Definitions {
                    words: self.selection.definitions.clone(),
                    topic,
                    grade,
                    nikud,
                    context: self.context(),
                })
            }
            GenerationKind::OddOneOut => {
                if lesson.categories.len() < MIN_ODD_ONE_OUT_CATEGORIES {
                    return Err(ValidationError::NotEnoughCategories);
                }
                Task::OddOneOut(OddOneOut {
                    categories: lesson.categories.clone(),
                    topic,
                    nikud,
                })
            }
            GenerationKind::DualWords => {
                if words.is_empty() {
                    return Err(ValidationError::NoWords);
                }
                Task::DualWords(DualWords {
                    words,
                    topic,
                    grade,
                    nikud,
                    context: self.context(),
                })
            }
            GenerationKind::Illustration { word } => {
                let word = word.trim().to_string();
                if word.is_empty() {
                    return Err(ValidationError::NoWords);
                }
                if lesson.has_image(&word) {
                    return Err(ValidationError::ImageExists);
                }
                Task::Illustration(Illustration { word, topic })
            }
            GenerationKind::Vocalize { target } => match target {
                VocalizeTarget::Words => {
                    if lesson.categories.is_empty() {
                        return Err(ValidationError::NoWords);
                    }
                    let mut layout = Vec::new();
                    let mut items = Vec::new();
                    for category in lesson.categories.iter() {
                        layout.push((category.id.clone(), category.words().to_vec()));
                        items.push(category.name.clone());
                        items.extend(category.words().iter().cloned());
                    }
                    Task::VocalizeWords {
                        layout,
                        op: Vocalize { items },
                    }
                }
                VocalizeTarget::Exercises => {
                    if self.fill_blanks.is_empty() {
                        return Err(ValidationError::NoExercises);
                    }
                    Task::VocalizeExercises(Vocalize {
                        items: self.fill_blanks.clone(),
                    })
                }
                VocalizeTarget::Text => {
                    if lesson.text.trim().is_empty() {
                        return Err(ValidationError::NoText);
                    }
                    Task::VocalizeText(Vocalize {
                        items: vec![lesson.text.clone()],
                    })
                }
            },
        };
        Ok(task)
    }

    /// Release the slot taken by [`Wizard::prepare`] and apply the outcome.
    /// Success replaces the affected content wholesale; failure leaves the
    /// lesson as it was and shows one notice. Returns whether saved state
    /// changed. Results whose slot was cleared by a reset are dropped.
    pub fn complete(&mut self, finished: Finished) -> bool {
        let Finished { ticket, result } = finished;
        if self.in_flight.get(&ticket.concern) != Some(&ticket.id) {
            log::warn!(
                "Dropping stale {} result #{}",
                ticket.concern,
                ticket.id
            );
            return false;
        }
        self.in_flight.remove(&ticket.concern);
        match result {
            Ok(artifact) => {
                log::debug!("Applying {} result #{}", ticket.concern, ticket.id);
                let changed = self.apply(artifact);
                if changed {
                    self.touch();
                }
                changed
            }
            Err(error) => {
                log::warn!("{} request #{} failed: {error}", ticket.concern, ticket.id);
                self.notice = Some(self.failure_notice(&error));
                false
            }
        }
    }

    fn failure_notice(&self, error: &GenerationError) -> Notice {
        Notice {
            message: error.to_string(),
            hint: error
                .is_credential_related()
                .then(|| self.credential_hint.clone()),
        }
    }

    fn categories_from(&mut self, suggested: Vec<SuggestedCategory>) -> Vec<WordCategory> {
        let mut out: Vec<WordCategory> = Vec::with_capacity(suggested.len());
        for category in suggested {
            let name = category.name.trim();
            if name.is_empty() {
                continue;
            }
            let id = loop {
                let id = self.lesson.mint_category_id(name, &mut self.rng);
                if out.iter().all(|c| c.id != id) {
                    break id;
                }
            };
            out.push(WordCategory::with_words(id, name, category.words));
        }
        out
    }

    fn apply(&mut self, artifact: Artifact) -> bool {
        match artifact {
            Artifact::Network(suggested) => {
                self.lesson.categories = self.categories_from(suggested);
            }
            Artifact::TextNetwork(network) => {
                self.lesson.categories = self.categories_from(network.categories);
                self.lesson.topic = network.topic;
                self.lesson.text = self.lesson.source_text.clone();
            }
            Artifact::Narrative(text) => self.lesson.text = text,
            Artifact::FillBlanks(sentences) => self.fill_blanks = sentences,
            Artifact::Definitions(matches) => self.lesson.definition_matches = matches,
            Artifact::OddOneOut(sets) => self.lesson.odd_one_out_sets = sets,
            Artifact::DualWords(pairs) => self.lesson.dual_word_sets = pairs,
            Artifact::Illustration { word, url } => match url {
                Some(url) => {
                    if self.lesson.has_image(&word) {
                        return false;
                    }
                    self.lesson.word_images.push(WordImage { word, url });
                }
                None => {
                    self.notice = Some(Notice::info(format!("לא נוצרה תמונה עבור \"{word}\"")));
                    return false;
                }
            },
            Artifact::VocalizedWords(vocalized) => {
                for category in vocalized {
                    if let Some(target) = self.lesson.category_mut(&category.id) {
                        if !category.name.trim().is_empty() {
                            target.name = category.name;
                        }
                        target.revise_words(category.words);
                    }
                }
            }
            Artifact::VocalizedExercises(sentences) => self.fill_blanks = sentences,
            Artifact::VocalizedText(text) => self.lesson.text = text,
        }
        true
    }
}

/// Assign `value` and report whether it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Completion;
    use crate::gateway::Gateway;
    use crate::gateway::testing::ScriptedTransport;
    use crate::gateway::testing::block_on;
    use crate::types::category::CategoryId;

    fn wizard_with_network() -> (Wizard, CategoryId, CategoryId) {
        let mut wizard = Wizard::new(42);
        wizard.dispatch(Command::SetTopic("חיות".to_string())).unwrap();
        wizard.dispatch(Command::AddCategory("בית".to_string())).unwrap();
        wizard.dispatch(Command::AddCategory("בר".to_string())).unwrap();
        let a = wizard.lesson().categories[0].id.clone();
        let b = wizard.lesson().categories[1].id.clone();
        for (id, word) in [(&a, "כלב"), (&a, "חתול"), (&b, "אריה"), (&b, "זאב")] {
            wizard
                .dispatch(Command::AddWord {
                    category: id.clone(),
                    word: word.to_string(),
                })
                .unwrap();
        }
        (wizard, a, b)
    }

    fn text(reply: &str) -> Vec<Completion> {
        vec![Completion::text(reply)]
    }

    #[test]
    fn test_next_requires_intake() {
        let mut wizard = Wizard::new(1);
        assert_eq!(wizard.dispatch(Command::Next), Err(ValidationError::MissingTopic));
        assert_eq!(wizard.step(), Step::Intake);
        wizard.dispatch(Command::SetTopic("   ".to_string())).unwrap();
        assert!(wizard.dispatch(Command::Next).is_err());
        wizard.dispatch(Command::SetTopic("ים".to_string())).unwrap();
        assert_eq!(wizard.dispatch(Command::Next), Ok(true));
        assert_eq!(wizard.step(), Step::WordNetwork);
    }

    #[test]
    fn test_next_by_text_mode() {
        let mut wizard = Wizard::new(1);
        wizard.dispatch(Command::SetMode(LessonMode::ByText)).unwrap();
        wizard.dispatch(Command::SetTopic("ים".to_string())).unwrap();
        assert_eq!(
            wizard.dispatch(Command::Next),
            Err(ValidationError::MissingSourceText)
        );
        wizard
            .dispatch(Command::SetSourceText("היה היה".to_string()))
            .unwrap();
        assert_eq!(wizard.dispatch(Command::Next), Ok(true));
    }

    #[test]
    fn test_back_and_bounds() {
        let mut wizard = Wizard::new(1);
        assert_eq!(wizard.dispatch(Command::Back), Ok(false));
        for step in Step::ALL {
            assert!(wizard.dispatch(Command::JumpTo(step)).is_ok());
            assert_eq!(wizard.step(), step);
        }
        assert_eq!(wizard.dispatch(Command::Next), Ok(false));
        assert_eq!(wizard.step(), Step::Summary);
        assert_eq!(wizard.dispatch(Command::Back), Ok(true));
        assert_eq!(wizard.step(), Step::ExerciseStudio);
    }

    #[test]
    fn test_mode_locked_once_network_exists() {
        let (mut wizard, _, _) = wizard_with_network();
        assert_eq!(
            wizard.dispatch(Command::SetMode(LessonMode::ByText)),
            Err(ValidationError::ModeLocked)
        );
        assert_eq!(wizard.lesson().mode, LessonMode::ByTopic);
    }

    #[test]
    fn test_word_edits() {
        let (mut wizard, a, _) = wizard_with_network();
        let revision = wizard.revision();
        let add = Command::AddWord {
            category: a.clone(),
            word: "כלב".to_string(),
        };
        assert_eq!(wizard.dispatch(add), Ok(false));
        let blank = Command::AddWord {
            category: a.clone(),
            word: "  ".to_string(),
        };
        assert_eq!(wizard.dispatch(blank), Ok(false));
        let missing = Command::RemoveCategory(CategoryId::from("nope"));
        assert_eq!(wizard.dispatch(missing), Ok(false));
        assert_eq!(wizard.revision(), revision);
        assert_eq!(wizard.all_words(), ["כלב", "חתול", "אריה", "זאב"]);
    }

    #[test]
    fn test_network_replaces_categories() {
        let mut wizard = Wizard::new(5);
        wizard.dispatch(Command::SetTopic("ים".to_string())).unwrap();
        let job = wizard.prepare(GenerationKind::Network).unwrap();
        assert!(wizard.is_busy(Concern::Network));
        let reply = r#"[{"name": "יצורים", "words": ["דג", "דג", "לוויתן"]}, {"name": " "}, {"name": "כלים", "words": []}]"#;
        assert!(wizard.complete(job.resolve(text(reply))));
        assert!(!wizard.is_busy(Concern::Network));
        let categories = &wizard.lesson().categories;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].words(), ["דג", "לוויתן"]);
        assert_ne!(categories[0].id, categories[1].id);
    }

    #[test]
    fn test_text_network_sets_topic_and_text() {
        let mut wizard = Wizard::new(5);
        wizard.dispatch(Command::SetMode(LessonMode::ByText)).unwrap();
        wizard
            .dispatch(Command::SetSourceText("הדג שחה בים".to_string()))
            .unwrap();
        let job = wizard.prepare(GenerationKind::Network).unwrap();
        let reply = r#"{"topic": "הים", "categories": [{"name": "יצורים", "words": ["דג"]}]}"#;
        wizard.complete(job.resolve(text(reply)));
        assert_eq!(wizard.lesson().topic, "הים");
        assert_eq!(wizard.lesson().text, "הדג שחה בים");
        assert_eq!(wizard.all_words(), ["דג"]);
    }

    #[test]
    fn test_same_concern_is_refused() {
        let (mut wizard, _, _) = wizard_with_network();
        let _fill = wizard.prepare(GenerationKind::FillBlanks).unwrap();
        assert_eq!(
            wizard.prepare(GenerationKind::DualWords).unwrap_err(),
            ValidationError::Busy(Concern::Exercise)
        );
        assert!(wizard.prepare(GenerationKind::NarrativeText).is_ok());
        assert!(
            wizard
                .prepare(GenerationKind::Illustration {
                    word: "כלב".to_string()
                })
                .is_ok()
        );
    }

    #[test]
    fn test_failed_definitions_leave_state() {
        let (mut wizard, _, _) = wizard_with_network();
        assert_eq!(
            wizard.prepare(GenerationKind::Definitions).unwrap_err(),
            ValidationError::NoWordsSelected
        );
        wizard
            .dispatch(Command::ToggleDefinitionWord("כלב".to_string()))
            .unwrap();
        let job = wizard.prepare(GenerationKind::Definitions).unwrap();
        let reply = r#"[{"word": "כלב", "definition": "חיה נובחת"}]"#;
        wizard.complete(job.resolve(text(reply)));
        let before = wizard.snapshot();

        let job = wizard.prepare(GenerationKind::Definitions).unwrap();
        let changed = wizard.complete(job.fail(GenerationError::Provider {
            status: 500,
            message: "boom".to_string(),
        }));
        assert!(!changed);
        assert_eq!(wizard.snapshot(), before);
        assert_eq!(wizard.lesson().definition_matches.len(), 1);
        let notice = wizard.notice().unwrap();
        assert!(notice.message.contains("500"));
        assert_eq!(notice.hint, None);
        assert!(!wizard.is_busy(Concern::Exercise));
    }

    #[test]
    fn test_credential_failure_has_hint() {
        let (mut wizard, _, _) = wizard_with_network();
        wizard.set_credential_hint("Set GEMINI_API_KEY");
        let job = wizard.prepare(GenerationKind::FillBlanks).unwrap();
        wizard.complete(job.fail(GenerationError::Credentials("denied".to_string())));
        assert_eq!(
            wizard.notice().and_then(|n| n.hint.as_deref()),
            Some("Set GEMINI_API_KEY")
        );
        wizard.dispatch(Command::DismissNotice).unwrap();
        assert_eq!(wizard.notice(), None);
    }

    #[test]
    fn test_malformed_odd_one_out_is_rejected() {
        let (mut wizard, _, _) = wizard_with_network();
        let job = wizard.prepare(GenerationKind::OddOneOut).unwrap();
        let reply = r#"[{"options": ["a", "b", "c"], "answer": "a", "reason": "r"}]"#;
        assert!(!wizard.complete(job.resolve(text(reply))));
        assert!(wizard.lesson().odd_one_out_sets.is_empty());
        assert!(wizard.notice().is_some());
    }

    #[test]
    fn test_odd_one_out_needs_two_categories() {
        let mut wizard = Wizard::new(3);
        wizard.dispatch(Command::AddCategory("x".to_string())).unwrap();
        assert_eq!(
            wizard.prepare(GenerationKind::OddOneOut).unwrap_err(),
            ValidationError::NotEnoughCategories
        );
        assert!(!wizard.is_busy(Concern::Exercise));
    }

    #[test]
    fn test_illustration() {
        let (mut wizard, _, _) = wizard_with_network();
        let job = wizard
            .prepare(GenerationKind::Illustration {
                word: "כלב".to_string(),
            })
            .unwrap();
        let gateway = Gateway::new(ScriptedTransport::new(vec![Ok(Completion {
            text: None,
            images: vec![crate::gateway::InlineImage {
                mime_type: "image/png".to_string(),
                data: "AAAA".to_string(),
            }],
        })]));
        assert!(wizard.complete(block_on(job.run(&gateway))));
        assert_eq!(wizard.lesson().word_images[0].url, "data:image/png;base64,AAAA");
        assert_eq!(
            wizard
                .prepare(GenerationKind::Illustration {
                    word: "כלב".to_string()
                })
                .unwrap_err(),
            ValidationError::ImageExists
        );
        wizard
            .dispatch(Command::RemoveWordImage("כלב".to_string()))
            .unwrap();
        assert!(wizard.lesson().word_images.is_empty());
    }

    #[test]
    fn test_no_image_is_not_an_error() {
        let (mut wizard, _, _) = wizard_with_network();
        let job = wizard
            .prepare(GenerationKind::Illustration {
                word: "זאב".to_string(),
            })
            .unwrap();
        assert!(!wizard.complete(job.resolve(text("no image today"))));
        assert!(wizard.lesson().word_images.is_empty());
        assert!(wizard.notice().unwrap().hint.is_none());
    }

    #[test]
    fn test_vocalize_words_by_id() {
        let (mut wizard, a, b) = wizard_with_network();
        let job = wizard
            .prepare(GenerationKind::Vocalize {
                target: VocalizeTarget::Words,
            })
            .unwrap();
        assert_eq!(job.requests().len(), 6);
        wizard.dispatch(Command::RemoveCategory(b)).unwrap();
        let replies = ["בַּיִת", "כֶּלֶב", "חָתוּל", "בָּר", "אַרְיֵה", "זְאֵב"]
            .iter()
            .map(|s| Completion::text(*s))
            .collect();
        assert!(wizard.complete(job.resolve(replies)));
        let lesson = wizard.lesson();
        assert_eq!(lesson.categories.len(), 1);
        assert_eq!(lesson.categories[0].id, a);
        assert_eq!(lesson.categories[0].name, "בַּיִת");
        assert_eq!(lesson.categories[0].words(), ["כֶּלֶב", "חָתוּל"]);
    }

    #[test]
    fn test_vocalize_words_keeps_later_edits() {
        let (mut wizard, a, _) = wizard_with_network();
        let job = wizard
            .prepare(GenerationKind::Vocalize {
                target: VocalizeTarget::Words,
            })
            .unwrap();
        for command in [
            Command::AddWord {
                category: a.clone(),
                word: "פרה".to_string(),
            },
            Command::RemoveWord {
                category: a.clone(),
                word: "חתול".to_string(),
            },
        ] {
            wizard.dispatch(command).unwrap();
        }
        let replies = ["בַּיִת", "כֶּלֶב", "חָתוּל", "בָּר", "אַרְיֵה", "זְאֵב"]
            .iter()
            .map(|s| Completion::text(*s))
            .collect();
        assert!(wizard.complete(job.resolve(replies)));
        let lesson = wizard.lesson();
        assert_eq!(lesson.categories[0].words(), ["כֶּלֶב", "פרה"]);
        assert_eq!(lesson.categories[1].words(), ["אַרְיֵה", "זְאֵב"]);
    }

    #[test]
    fn test_vocalize_text_fails_closed() {
        let mut wizard = Wizard::new(1);
        wizard.dispatch(Command::SetText("שלום".to_string())).unwrap();
        let job = wizard
            .prepare(GenerationKind::Vocalize {
                target: VocalizeTarget::Text,
            })
            .unwrap();
        wizard.complete(job.resolve(vec![Completion::default()]));
        assert_eq!(wizard.lesson().text, "שלום");
        assert_eq!(wizard.notice(), None);
    }

    #[test]
    fn test_reset_drops_late_results() {
        let (mut wizard, _, _) = wizard_with_network();
        let job = wizard.prepare(GenerationKind::FillBlanks).unwrap();
        wizard.dispatch(Command::Reset).unwrap();
        assert!(!wizard.complete(job.resolve(text(r#"["a ____ b"]"#))));
        assert!(wizard.fill_blanks().is_empty());
        assert_eq!(wizard.lesson(), &LessonState::default());
    }

    #[test]
    fn test_late_result_applies_after_navigation() {
        let (mut wizard, _, _) = wizard_with_network();
        wizard.dispatch(Command::JumpTo(Step::ExerciseStudio)).unwrap();
        let job = wizard.prepare(GenerationKind::FillBlanks).unwrap();
        wizard.dispatch(Command::JumpTo(Step::Summary)).unwrap();
        assert!(wizard.complete(job.resolve(text(r#"["ה___ נובח"]"#))));
        assert_eq!(wizard.fill_blanks(), ["ה________ נובח"]);
    }

    #[test]
    fn test_alphabetical_commit() {
        let (mut wizard, _, _) = wizard_with_network();
        assert_eq!(
            wizard.dispatch(Command::CommitAlphabetical),
            Err(ValidationError::NoWordsSelected)
        );
        for word in ["זאב", "אריה", "זאב", "כלב"] {
            wizard
                .dispatch(Command::ToggleAlphabeticalWord(word.to_string()))
                .unwrap();
        }
        assert_eq!(wizard.dispatch(Command::CommitAlphabetical), Ok(true));
        assert_eq!(wizard.lesson().alphabetical_words, ["אריה", "כלב"]);
    }

    #[test]
    fn test_restore_round_trip() {
        let (mut wizard, _, _) = wizard_with_network();
        wizard.dispatch(Command::JumpTo(Step::NarrativeText)).unwrap();
        let project = wizard.snapshot();
        let restored = Wizard::restore(project.clone(), 99);
        assert_eq!(restored.snapshot(), project);
    }
}
