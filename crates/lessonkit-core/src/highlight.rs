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


//! The keyword highlight convention of reading texts: a keyword is wrapped in
//! double asterisks, as in `the **river** flows`. A delimiter pair never spans
//! a line break.

use maud::Markup;
use maud::html;

const DELIMITER: &str = "**";

#[derive(Debug, PartialEq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Highlight(&'a str),
}

/// Split `text` into plain runs and highlighted keywords. Unpaired delimiters
/// are kept as plain text.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;
    while let Some(rel) = text[cursor..].find(DELIMITER) {
        let open = cursor + rel;
        let body_start = open + DELIMITER.len();
        match text[body_start..].find(DELIMITER) {
            Some(rel_close) if !text[body_start..body_start + rel_close].contains('\n') => {
                let close = body_start + rel_close;
                if open > plain_start {
                    out.push(Segment::Plain(&text[plain_start..open]));
                }
                out.push(Segment::Highlight(&text[body_start..close]));
                cursor = close + DELIMITER.len();
                plain_start = cursor;
            }
            _ => cursor = open + 1,
        }
    }
    if plain_start < text.len() {
        out.push(Segment::Plain(&text[plain_start..]));
    }
    out
}

/// The highlighted keywords, in order of appearance.
pub fn keywords(text: &str) -> Vec<&str> {
    segments(text)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Highlight(k) => Some(k),
            Segment::Plain(_) => None,
        })
        .collect()
}

/// Render `text` with keywords in bold. Everything else is escaped.
pub fn to_markup(text: &str) -> Markup {
    html! {
        @for segment in segments(text) {
            @match segment {
                Segment::Plain(s) => { (s) }
                Segment::Highlight(k) => { b { (k) } }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(segments("no marks"), vec![Segment::Plain("no marks")]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_keywords() {
        let text = "ה**נהר** זורם אל ה**ים**.";
        assert_eq!(keywords(text), ["נהר", "ים"]);
        assert_eq!(
            segments(text),
            vec![
                Segment::Plain("ה"),
                Segment::Highlight("נהר"),
                Segment::Plain(" זורם אל ה"),
                Segment::Highlight("ים"),
                Segment::Plain("."),
            ]
        );
    }

    #[test]
    fn test_unpaired_delimiter_is_plain() {
        assert_eq!(segments("a ** b"), vec![Segment::Plain("a ** b")]);
    }

    #[test]
    fn test_pair_does_not_span_lines() {
        let text = "**a\n**b**";
        assert_eq!(
            segments(text),
            vec![Segment::Plain("**a\n"), Segment::Highlight("b")]
        );
    }

    #[test]
    fn test_markup_escapes() {
        let html = to_markup("<i>x</i> **y**").into_string();
        assert_eq!(html, "&lt;i&gt;x&lt;/i&gt; <b>y</b>");
    }
}
