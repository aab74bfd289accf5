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


use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use lessonkit_core::highlight;
use lessonkit_core::types::grade::GradeLevel;
use lessonkit_core::types::lesson::LessonMode;
use lessonkit_core::types::step::Step;
use lessonkit_core::wizard::Concern;
use lessonkit_core::wizard::Wizard;
use maud::Markup;
use maud::html;

use crate::cmd::serve::state::MutableState;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::action_button;
use crate::cmd::serve::template::generate_button;
use crate::cmd::serve::template::page_template;
use crate::cmd::serve::template::value_button;
use crate::player::MAX_SECONDS;
use crate::player::Player;

pub async fn get_handler<T>(State(state): State<ServerState<T>>) -> (StatusCode, Html<String>) {
    let mut mutable = match state.lock() {
        Ok(m) => m,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(e.message().to_string()),
            );
        }
    };
    let body = render_page(&mut mutable);
    (StatusCode::OK, Html(page_template(body).into_string()))
}

fn render_page(m: &mut MutableState) -> Markup {
    let step = m.wizard.step();
    let content = match step {
        Step::Intake => render_intake(&m.wizard),
        Step::WordNetwork => render_network(&m.wizard),
        Step::Flashcards => render_flashcards(&m.wizard, &m.player),
        Step::NarrativeText => render_text(&m.wizard),
        Step::ExerciseStudio => render_exercises(&mut m.wizard),
        Step::Summary => render_summary(&m.wizard),
    };
    html! {
        header {
            h1 { "lessonkit" }
            div.toolbar {
                a.button href="/export/project.json" { "שמור פרויקט" }
                label.button for="import-file" { "טען פרויקט" }
                input id="import-file" type="file" accept=".json" hidden;
                (action_button("Reset", "איפוס"))
            }
        }
        (render_notice(&m.wizard))
        nav.steps {
            @for s in Step::ALL {
                @let class = if s == step { "step current" } else { "step" };
                (value_button("JumpTo", &s.number().to_string(), &format!("{}. {}", s.number(), s.label()), class))
            }
        }
        main {
            (content)
        }
        footer.nav {
            @if step.prev().is_some() {
                (action_button("Back", "הקודם"))
            }
            @if step.next().is_some() {
                (action_button("Next", "הבא"))
            }
        }
    }
}

fn render_notice(wizard: &Wizard) -> Markup {
    html! {
        @if let Some(notice) = wizard.notice() {
            div.notice {
                p { (notice.message) }
                @if let Some(hint) = &notice.hint {
                    p.hint { (hint) }
                }
                (action_button("DismissNotice", "סגור"))
            }
        }
    }
}

fn render_intake(wizard: &Wizard) -> Markup {
    let lesson = wizard.lesson();
    let locked = !lesson.categories.is_empty();
    html! {
        h2 { "הגדרת השיעור" }
        div.modes {
            @for (mode, value, label) in [(LessonMode::ByTopic, "topic", "לפי נושא"), (LessonMode::ByText, "text", "לפי טקסט")] {
                @let class = if lesson.mode == mode { "mode current" } else { "mode" };
                @if locked && lesson.mode != mode {
                    span.mode.disabled { (label) }
                } @else {
                    (value_button("SetMode", value, label, class))
                }
            }
        }
        form.intake action="/" method="post" {
            input type="hidden" name="intake" value="1";
            @match lesson.mode {
                LessonMode::ByTopic => {
                    label { "נושא השיעור" input type="text" name="topic" value=(lesson.topic); }
                }
                LessonMode::ByText => {
                    label { "טקסט מקור" textarea name="source_text" rows="8" { (lesson.source_text) } }
                }
            }
            label {
                "שכבת גיל"
                select name="grade" {
                    @for grade in GradeLevel::ALL {
                        option value=(grade.code()) selected[grade == lesson.grade_level] { (grade.label()) }
                    }
                }
            }
            label {
                input type="checkbox" name="nikud" checked[lesson.with_nikud];
                "עם ניקוד"
            }
            button type="submit" name="action" value="Save" { "שמור" }
            button type="submit" name="action" value="Next" { "המשך" }
        }
    }
}

fn render_network(wizard: &Wizard) -> Markup {
    let lesson = wizard.lesson();
    let busy = wizard.is_busy(Concern::Network);
    let title = if lesson.topic.is_empty() { "רשת המילים" } else { lesson.topic.as_str() };
    html! {
        h2 { "🎯 " (title) }
        div.actions {
            (generate_button("network", None, "הצע רשת מילים", busy))
            (generate_button("vocalize", Some(("target", "words")), "נקד הכל", wizard.is_busy(Concern::Vocalization)))
        }
        div.categories {
            @for category in &lesson.categories {
                div.category {
                    h3 {
                        "📂 " (category.name)
                        form.inline action="/" method="post" {
                            input type="hidden" name="action" value="RemoveCategory";
                            input type="hidden" name="category" value=(category.id.as_str());
                            input.remove type="submit" value="✕";
                        }
                    }
                    ul {
                        @for word in category.words() {
                            li {
                                (word)
                                form.inline action="/" method="post" {
                                    input type="hidden" name="action" value="RemoveWord";
                                    input type="hidden" name="category" value=(category.id.as_str());
                                    input type="hidden" name="word" value=(word);
                                    input.remove type="submit" value="✕";
                                }
                            }
                        }
                    }
                    form action="/" method="post" {
                        input type="hidden" name="action" value="AddWord";
                        input type="hidden" name="category" value=(category.id.as_str());
                        input type="text" name="word" placeholder="מילה חדשה";
                        input type="submit" value="הוסף";
                    }
                }
            }
        }
        form action="/" method="post" {
            input type="hidden" name="action" value="AddCategory";
            input type="text" name="value" placeholder="קטגוריה חדשה";
            input type="submit" value="הוסף קטגוריה";
        }
    }
}

fn render_flashcards(wizard: &Wizard, player: &Player) -> Markup {
    let words = wizard.all_words();
    let cursor = wizard.cursor();
    html! {
        h2 { "כרטיסי הברקה" }
        @match cursor.current(&words) {
            None => { p.empty { "אין מילים ברשת המילים" } }
            Some(word) => {
                div.flashcard { (word) }
                p.counter {
                    (cursor.position(words.len()).unwrap_or(0) + 1) " / " (words.len())
                }
                div.actions {
                    (flashcard_button("Prev", "קודם"))
                    @if player.is_playing() {
                        (flashcard_button("Pause", "עצור"))
                    } @else {
                        (flashcard_button("Play", "נגן"))
                    }
                    (flashcard_button("Next", "הבא"))
                }
                form.inline action="/flashcards" method="post" {
                    input type="hidden" name="action" value="Interval";
                    label { "שניות לכרטיס" input type="number" name="value" min="1" max=(MAX_SECONDS) value=(player.seconds()); }
                    input type="submit" value="עדכן";
                }
                a.button href="/export/flashcards.html" { "הורד כרטיסים" }
            }
        }
    }
}

fn flashcard_button(action: &str, label: &str) -> Markup {
    html! {
        form.inline action="/flashcards" method="post" {
            input type="hidden" name="action" value=(action);
            input type="submit" value=(label);
        }
    }
}

fn render_text(wizard: &Wizard) -> Markup {
    let lesson = wizard.lesson();
    html! {
        h2 { "הטקסט הלימודי" }
        div.actions {
            (generate_button("narrative_text", None, "כתוב טקסט", wizard.is_busy(Concern::Network)))
            (generate_button("vocalize", Some(("target", "text")), "נקד הכל", wizard.is_busy(Concern::Vocalization)))
            (action_button("ClearText", "נקה"))
        }
        form action="/" method="post" {
            input type="hidden" name="action" value="SetText";
            textarea name="value" rows="12" { (lesson.text) }
            input type="submit" value="שמור טקסט";
        }
        @if !lesson.text.trim().is_empty() {
            div.preview { (highlight::to_markup(&lesson.text)) }
        }
    }
}

fn word_chip(action: &str, word: &str, selected: bool) -> Markup {
    let class = if selected { "chip selected" } else { "chip" };
    html! {
        form.inline action="/" method="post" {
            input type="hidden" name="action" value=(action);
            input type="hidden" name="word" value=(word);
            input class=(class) type="submit" value=(word);
        }
    }
}

fn render_exercises(wizard: &mut Wizard) -> Markup {
    let busy = wizard.is_busy(Concern::Exercise);
    let image_busy = wizard.is_busy(Concern::Image);
    let vocalize_busy = wizard.is_busy(Concern::Vocalization);
    let words = wizard.all_words();
    let definitions = wizard.shuffled_definitions().to_vec();
    let lesson = wizard.lesson();
    let selection = wizard.selection();
    html! {
        h2 { "מחולל התרגילים" }
        section.exercise {
            h3 { "השלמת משפטים" }
            (generate_button("fill_blanks", None, "הפק משפטים", busy))
            (generate_button("vocalize", Some(("target", "exercises")), "נקד הכל", vocalize_busy))
            ol {
                @for (i, sentence) in wizard.fill_blanks().iter().enumerate() {
                    li {
                        (sentence)
                        (value_button("RemoveFillBlank", &i.to_string(), "✕", "remove"))
                    }
                }
            }
        }
        section.exercise {
            h3 { "התאמת תמונה למילה" }
            div.images {
                @for word in &words {
                    div.image-slot {
                        @match lesson.word_images.iter().find(|img| &img.word == word) {
                            Some(image) => {
                                img src=(image.url) alt=(word);
                                form.inline action="/" method="post" {
                                    input type="hidden" name="action" value="RemoveWordImage";
                                    input type="hidden" name="word" value=(word);
                                    input.remove type="submit" value="✕";
                                }
                            }
                            None => {
                                (generate_button("illustration", Some(("word", word.as_str())), "צור תמונה", image_busy))
                            }
                        }
                        span { (word) }
                    }
                }
            }
        }
        section.exercise {
            h3 { "הגדרות ופירושים" }
            p { "בחרו מילים להגדרה מתוך מחסן המילים:" }
            div.chips {
                @for word in &words {
                    (word_chip("ToggleDefinitionWord", word, selection.definitions.contains(word)))
                }
            }
            (generate_button("definitions", None, "הפק הגדרות", busy))
            @for (item, shuffled) in lesson.definition_matches.iter().zip(definitions.iter()) {
                div.definition-row {
                    span.def-word { (item.word) }
                    span.def-text { (shuffled.definition) }
                }
            }
        }
        section.exercise {
            h3 { "סדר א\"ב" }
            div.chips {
                @for word in &words {
                    (word_chip("ToggleAlphabeticalWord", word, selection.alphabetical.contains(word)))
                }
            }
            (action_button("CommitAlphabetical", "שמור בחירה"))
            @if !lesson.alphabetical_words.is_empty() {
                p { @for word in &lesson.alphabetical_words { span.chip { (word) } } }
            }
        }
        section.exercise {
            h3 { "מי יוצא דופן?" }
            (generate_button("odd_one_out", None, "הפק תרגיל", busy))
            @for set in &lesson.odd_one_out_sets {
                div.odd-row {
                    @for option in &set.options {
                        @let class = if *option == set.answer { "chip answer" } else { "chip" };
                        span class=(class) { (option) }
                    }
                    p.reason { (set.reason) }
                }
            }
        }
        section.exercise {
            h3 { "משפט עם זוג מילים" }
            (generate_button("dual_words", None, "הפק זוגות", busy))
            ul {
                @for pair in &lesson.dual_word_sets {
                    li { (pair.word_a) " + " (pair.word_b) }
                }
            }
        }
    }
}

fn render_summary(wizard: &Wizard) -> Markup {
    let lesson = wizard.lesson();
    html! {
        h2 { "סיכום המהלך והורדה" }
        ul.summary {
            li { "קטגוריות: " (lesson.categories.len()) }
            li { "מילים: " (wizard.all_words().len()) }
            li { "משפטי השלמה: " (wizard.fill_blanks().len()) }
            li { "תמונות: " (lesson.word_images.len()) }
        }
        div.downloads {
            a.button href="/export/worksheet.html" target="_blank" { "הדפס דף עבודה" }
            a.button href="/export/worksheet.doc" { "הורד קובץ Word" }
            a.button href="/export/lesson.html" { "הורד HTML" }
            a.button href="/export/flashcards.html" { "הורד כרטיסי הברקה" }
            a.button href="/export/project.json" { "שמור קובץ פרויקט (.json)" }
        }
    }
}
