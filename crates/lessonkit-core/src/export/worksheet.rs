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


//! The printable worksheet.

use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::highlight;
use crate::types::artifacts::DefinitionMatch;
use crate::types::grade::GradeLevel;
use crate::types::lesson::LessonState;

/// Prepended to Word documents so the Hebrew text is read as UTF-8.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WorksheetMode {
    /// Opens the print dialog once loaded.
    Print,
    /// A `.doc` file for word processors.
    Doc,
    Html,
}

/// Type sizes for a grade level. Early grades get larger, airier text.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Layout {
    pub body_size: &'static str,
    pub title_size: &'static str,
    pub line_height: &'static str,
}

impl Layout {
    pub fn for_grade(grade: GradeLevel) -> Self {
        if grade.is_early() {
            Layout {
                body_size: "18pt",
                title_size: "24pt",
                line_height: "2.5",
            }
        } else {
            Layout {
                body_size: "14pt",
                title_size: "20pt",
                line_height: "1.8",
            }
        }
    }
}

const PRINT_SCRIPT: &str = "window.onload = () => { setTimeout(() => window.print(), 500); };";

/// Everything a worksheet shows. The shuffled lists come from the derived
/// views so the printout matches what was on screen.
pub struct Worksheet<'a> {
    pub lesson: &'a LessonState,
    pub fill_blanks: &'a [String],
    pub shuffled_definitions: &'a [DefinitionMatch],
    pub image_word_bank: &'a [String],
    pub author: Option<&'a str>,
    pub year: i32,
}

impl Worksheet<'_> {
    pub fn render(&self, mode: WorksheetMode) -> String {
        let markup = self.page(mode).into_string();
        match mode {
            WorksheetMode::Doc => format!("{BYTE_ORDER_MARK}{markup}"),
            WorksheetMode::Print | WorksheetMode::Html => markup,
        }
    }

    /// The sections that have content, in worksheet order, numbered from one.
    pub fn sections(&self) -> Vec<(&'static str, Markup)> {
        let candidates = [
            ("מפת המילים", self.word_map()),
            ("טקסט קריאה", self.reading_text()),
            ("התאמת תמונה למילה", self.image_match()),
            ("הגדרות ופירושים", self.definitions()),
            ("סדר א\"ב", self.alphabetical()),
            ("השלמת משפטים", self.fill_in()),
            ("מי יוצא דופן?", self.odd_one_out()),
            ("משפט עם זוג מילים", self.word_pairs()),
        ];
        candidates
            .into_iter()
            .filter_map(|(title, body)| body.map(|body| (title, body)))
            .collect()
    }

    fn page(&self, mode: WorksheetMode) -> Markup {
        let topic = &self.lesson.topic;
        html! {
            (DOCTYPE)
            html lang="he" dir="rtl" {
                head {
                    meta charset="utf-8";
                    title { "דף עבודה - " (topic) }
                    style { (PreEscaped(styles(Layout::for_grade(self.lesson.grade_level)))) }
                }
                body {
                    h1 { (topic) }
                    p { "שם התלמיד/ה: _________________________ | תאריך: _________________" }
                    @for (i, (title, body)) in self.sections().into_iter().enumerate() {
                        section {
                            h2 { (i + 1) ". " (title) }
                            (body)
                        }
                    }
                    @if let Some(author) = self.author {
                        div.copyright { "כל הזכויות שמורות ל" (author) " © " (self.year) }
                    }
                    @if mode == WorksheetMode::Print {
                        script { (PreEscaped(PRINT_SCRIPT)) }
                    }
                }
            }
        }
    }

    fn word_map(&self) -> Option<Markup> {
        let categories = &self.lesson.categories;
        if categories.is_empty() {
            return None;
        }
        Some(html! {
            div.categories-container {
                @for category in categories {
                    div.category-box {
                        strong.category-name { (category.name) }
                        @for word in category.words() {
                            "• " (word) br;
                        }
                    }
                }
            }
        })
    }

    fn reading_text(&self) -> Option<Markup> {
        let text = &self.lesson.text;
        if text.trim().is_empty() {
            return None;
        }
        Some(html! {
            div.text-box { (highlight::to_markup(text)) }
        })
    }

    fn image_match(&self) -> Option<Markup> {
        let images = &self.lesson.word_images;
        if images.is_empty() {
            return None;
        }
        Some(html! {
            div.word-bank {
                @for word in self.image_word_bank {
                    span.word-bank-item { (word) }
                }
            }
            div.images {
                @for image in images {
                    div.image-item {
                        img src=(image.url);
                        div.blank-line {}
                    }
                }
            }
        })
    }

    fn definitions(&self) -> Option<Markup> {
        let matches = &self.lesson.definition_matches;
        if matches.is_empty() {
            return None;
        }
        Some(html! {
            @for (i, item) in matches.iter().enumerate() {
                div.definition-row {
                    div.def-word { (item.word) }
                    div.def-line {}
                    div.def-text {
                        @if let Some(shuffled) = self.shuffled_definitions.get(i) {
                            (shuffled.definition)
                        }
                    }
                }
            }
        })
    }

    fn alphabetical(&self) -> Option<Markup> {
        let words = &self.lesson.alphabetical_words;
        if words.is_empty() {
            return None;
        }
        Some(html! {
            p { "סדרו את המילים הבאות לפי סדר הא\"ב:" }
            div.word-bank.abc-bank {
                @for word in words {
                    span.word-bank-item { (word) }
                }
            }
            @for i in 1..=words.len() {
                div.abc-row {
                    span.abc-number { (i) "." }
                    div.abc-line {}
                }
            }
        })
    }

    fn fill_in(&self) -> Option<Markup> {
        if self.fill_blanks.is_empty() {
            return None;
        }
        Some(html! {
            ol {
                @for sentence in self.fill_blanks {
                    li.sentence { (sentence) }
                }
            }
        })
    }

    fn odd_one_out(&self) -> Option<Markup> {
        let sets = &self.lesson.odd_one_out_sets;
        if sets.is_empty() {
            return None;
        }
        Some(html! {
            p { "בכל שורה הקיפו את המילה שאינה שייכת והסבירו מדוע:" }
            @for (i, set) in sets.iter().enumerate() {
                div.odd-row {
                    div {
                        strong { (i + 1) "." } " "
                        @for option in &set.options {
                            span.odd-option { (option) }
                        }
                    }
                    div.odd-question {
                        "שאלה: מדוע המילה שבחרתם יוצאת דופן?" br;
                        "תשובה: __________________________________________________________________"
                    }
                }
            }
        })
    }

    fn word_pairs(&self) -> Option<Markup> {
        let pairs = &self.lesson.dual_word_sets;
        if pairs.is_empty() {
            return None;
        }
        Some(html! {
            p { "כתבו משפט אחד הכולל את שתי המילים המופיעות בכל סעיף:" }
            @for (i, pair) in pairs.iter().enumerate() {
                div.pair-row {
                    strong { (i + 1) ". " (pair.word_a) " + " (pair.word_b) }
                    div.blank-line {}
                    div.blank-line {}
                }
            }
        })
    }
}

fn styles(layout: Layout) -> String {
    format!(
        "body {{ font-family: 'Assistant', 'Heebo', sans-serif; direction: rtl; padding: 40px; max-width: 900px; margin: 0 auto; line-height: {line_height}; font-size: {body}; }}
h1 {{ font-size: {title}; text-align: center; border-bottom: 3px solid #2563eb; padding-bottom: 10px; margin-bottom: 30px; }}
{COMMON_STYLES}",
        line_height = layout.line_height,
        body = layout.body_size,
        title = layout.title_size,
    )
}

const COMMON_STYLES: &str = "h2 { font-size: 1.4em; border-bottom: 2px solid #ddd; margin-top: 40px; padding-bottom: 5px; }
.categories-container { display: flex; flex-wrap: wrap; gap: 15px; margin: 20px 0; }
.category-box { border: 1px solid #2563eb; border-radius: 10px; padding: 15px; width: calc(50% - 10px); box-sizing: border-box; background: #f8fbff; page-break-inside: avoid; }
.category-name { color: #1e40af; border-bottom: 1px solid #2563eb; display: block; margin-bottom: 8px; }
.text-box { border: 2px solid #000; padding: 25px; border-radius: 12px; margin: 20px 0; background: #fafafa; white-space: pre-wrap; }
.images { text-align: center; }
.image-item { border: 1px solid #ddd; padding: 10px; border-radius: 10px; display: inline-block; width: 30%; margin: 1%; text-align: center; page-break-inside: avoid; }
.image-item img { max-width: 100%; height: 120px; object-fit: contain; }
.blank-line { border-bottom: 1.5px dashed #000; width: 100%; height: 35px; margin-top: 5px; }
.word-bank { border: 2px solid #7c3aed; padding: 15px; border-radius: 10px; text-align: center; margin-bottom: 20px; background: #f5f3ff; }
.abc-bank { border-color: #10b981; background: #f0fdf4; }
.word-bank-item { display: inline-block; margin: 0 10px; font-weight: bold; }
.definition-row { display: flex; align-items: center; gap: 15px; margin-bottom: 15px; page-break-inside: avoid; }
.def-word { border: 1px solid #333; padding: 5px 15px; border-radius: 8px; font-weight: bold; min-width: 120px; text-align: center; }
.def-line { flex: 1; border-bottom: 1px dashed #999; }
.def-text { border: 1px solid #eee; padding: 8px; border-radius: 8px; flex: 2; background: #fff; }
.abc-row { margin-bottom: 15px; display: flex; align-items: flex-end; gap: 10px; }
.abc-number { font-weight: bold; color: #999; }
.abc-line { flex: 1; border-bottom: 1px dashed #000; height: 10px; }
.sentence { margin-bottom: 15px; }
.odd-row { margin-bottom: 25px; page-break-inside: avoid; }
.odd-option { border: 1px solid #ccc; padding: 5px 15px; border-radius: 20px; margin: 5px; display: inline-block; font-weight: bold; }
.odd-question { font-size: 0.9em; margin-top: 10px; }
.pair-row { margin-bottom: 30px; }
.copyright { margin-top: 50px; text-align: center; font-size: 10pt; color: #999; border-top: 1px solid #eee; padding-top: 10px; }
@media print {
  .category-box { width: calc(50% - 10px) !important; display: block !important; }
  .categories-container { display: flex !important; flex-wrap: wrap !important; }
}";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::TinyRng;
    use crate::types::artifacts::OddOneOutSet;

    fn lesson() -> LessonState {
        let mut lesson = LessonState {
            topic: "הים".to_string(),
            text: "ה**דג** שוחה & צולל".to_string(),
            ..Default::default()
        };
        let id = lesson.add_category("יצורים", &mut TinyRng::from_seed(1)).unwrap();
        lesson.add_word(&id, "דג");
        lesson
    }

    fn render(lesson: &LessonState, fill_blanks: &[String], mode: WorksheetMode) -> String {
        Worksheet {
            lesson,
            fill_blanks,
            shuffled_definitions: &lesson.definition_matches,
            image_word_bank: &[],
            author: None,
            year: 2026,
        }
        .render(mode)
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let html = render(&lesson(), &[], WorksheetMode::Html);
        assert!(html.contains("1. מפת המילים"));
        assert!(html.contains("2. טקסט קריאה"));
        assert!(!html.contains("מי יוצא דופן"));
        assert!(!html.contains("השלמת משפטים"));
        assert!(!html.contains("copyright"));
        assert!(!html.contains("window.print"));
    }

    #[test]
    fn test_sections_numbered_in_order() {
        let mut lesson = lesson();
        lesson.odd_one_out_sets = vec![OddOneOutSet {
            options: vec!["דג".into(), "לוויתן".into(), "כריש".into(), "עץ".into()],
            answer: "עץ".to_string(),
            reason: "לא חי בים".to_string(),
        }];
        let html = render(&lesson, &["ה________ שוחה".to_string()], WorksheetMode::Print);
        assert!(html.contains("3. השלמת משפטים"));
        assert!(html.contains("4. מי יוצא דופן?"));
        assert!(html.contains("window.print"));
        assert!(!html.contains("לא חי בים"));
    }

    #[test]
    fn test_reading_text_highlight_and_escaping() {
        let html = render(&lesson(), &[], WorksheetMode::Html);
        assert!(html.contains("ה<b>דג</b> שוחה &amp; צולל"));
    }

    #[test]
    fn test_doc_mode_has_bom() {
        let html = render(&lesson(), &[], WorksheetMode::Doc);
        assert!(html.starts_with(BYTE_ORDER_MARK));
        assert!(html[BYTE_ORDER_MARK.len_utf8()..].starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_layout_presets() {
        let mut lesson = lesson();
        lesson.grade_level = GradeLevel::Kindergarten;
        assert!(render(&lesson, &[], WorksheetMode::Html).contains("font-size: 18pt"));
        lesson.grade_level = GradeLevel::Grades5To6;
        assert!(render(&lesson, &[], WorksheetMode::Html).contains("font-size: 14pt"));
    }

    #[test]
    fn test_definitions_pair_by_position() {
        let mut lesson = lesson();
        lesson.definition_matches = vec![
            DefinitionMatch {
                word: "דג".to_string(),
                definition: "שוחה במים".to_string(),
            },
            DefinitionMatch {
                word: "ציפור".to_string(),
                definition: "עפה באוויר".to_string(),
            },
        ];
        let shuffled: Vec<DefinitionMatch> = lesson.definition_matches.iter().rev().cloned().collect();
        let html = Worksheet {
            lesson: &lesson,
            fill_blanks: &[],
            shuffled_definitions: &shuffled,
            image_word_bank: &[],
            author: Some("צוות"),
            year: 2026,
        }
        .render(WorksheetMode::Html);
        let first_row = html.find("<div class=\"def-word\">דג</div>").unwrap();
        let flown = html.find("עפה באוויר").unwrap();
        let swim = html.find("שוחה במים").unwrap();
        assert!(first_row < flown && flown < swim);
        assert!(html.contains("כל הזכויות שמורות לצוות © 2026"));
    }
}
