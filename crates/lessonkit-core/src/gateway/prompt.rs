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


//! Instructions sent to the provider. Replies are requested in Hebrew; the
//! instructions themselves are in English, which the models follow more
//! reliably.

use crate::gateway::parse::BLANK;
use crate::types::category::WordCategory;
use crate::types::grade::GradeLevel;

pub fn nikud_instruction(nikud: bool) -> &'static str {
    if nikud {
        "IMPORTANT: Write every Hebrew word and sentence with full Nikud (vowel marks)."
    } else {
        "Write standard Hebrew without Nikud."
    }
}

fn grade(grade: GradeLevel) -> &'static str {
    match grade {
        GradeLevel::Unset => "elementary school",
        other => other.code(),
    }
}

pub fn suggest_network(topic: &str, level: GradeLevel, nikud: bool) -> String {
    format!(
        "Build a semantic word network about the topic \"{topic}\" for students at grade level \"{}\".\n\
         Create 4-5 relevant categories and list 5-8 words for each category.\n\
         {}\n\
         Respond in Hebrew.",
        grade(level),
        nikud_instruction(nikud)
    )
}

pub fn network_from_text(source_text: &str, level: GradeLevel, nikud: bool) -> String {
    format!(
        "Read the following Hebrew text and build a semantic word network for students at grade level \"{}\".\n\
         1. Name the central topic of the text in a few words.\n\
         2. Create 4-5 categories that appear in the text and list 5-8 words taken from the text for each.\n\
         {}\n\
         Text: \"{source_text}\"",
        grade(level),
        nikud_instruction(nikud)
    )
}

pub fn fill_blanks(words: &[String], topic: &str, nikud: bool, context: Option<&str>) -> String {
    let base = match context {
        Some(context) => format!(
            "Based on this text: \"{context}\", write 4-5 educational Hebrew sentences about \"{topic}\".\n\
             Use words from this list: {}.",
            words.join(", ")
        ),
        None => format!(
            "Using some of these words: {}, write 4-5 educational Hebrew sentences about \"{topic}\".",
            words.join(", ")
        ),
    };
    format!(
        "{base}\n\
         Each sentence must contain exactly one blank written as \"{BLANK}\" where one of the listed words fits.\n\
         {}",
        nikud_instruction(nikud)
    )
}

pub fn definitions(
    words: &[String],
    topic: &str,
    level: GradeLevel,
    nikud: bool,
    context: Option<&str>,
) -> String {
    let lead = match context {
        Some(context) => format!("In the context of this text: \"{context}\", for"),
        None => "For".to_string(),
    };
    format!(
        "{lead} the following Hebrew words related to \"{topic}\", write a clear and simple Hebrew definition \
         suitable for grade level \"{}\": {}.\n\
         {}",
        grade(level),
        words.join(", "),
        nikud_instruction(nikud)
    )
}

pub fn odd_one_out(categories: &[WordCategory], topic: &str, nikud: bool) -> String {
    let network: Vec<String> = categories
        .iter()
        .map(|c| format!("{}: {}", c.name, c.words().join(", ")))
        .collect();
    format!(
        "These word categories belong to the topic \"{topic}\":\n\
         {}\n\n\
         Create 3 distinct \"odd one out\" exercises in Hebrew.\n\
         Each exercise has exactly 4 words: 3 that share a clear common theme and 1 outlier from a different \
         category or meaning. The answer must be one of the 4 words.\n\
         The logic must be clear and solvable for students.\n\
         Add a short Hebrew explanation of why the outlier does not belong.\n\
         {}",
        network.join("\n"),
        nikud_instruction(nikud)
    )
}

pub fn dual_words(
    words: &[String],
    topic: &str,
    level: GradeLevel,
    nikud: bool,
    context: Option<&str>,
) -> String {
    let lead = match context {
        Some(context) => format!(
            "Based on this text: \"{context}\", from the words {}, pick 3 pairs of words that appear together \
             or fit naturally in one sentence about \"{topic}\".",
            words.join(", ")
        ),
        None => format!(
            "From the words {}, pick 3 pairs of words that fit naturally in one sentence about \"{topic}\".",
            words.join(", ")
        ),
    };
    format!(
        "{lead}\n\
         The students are at grade level \"{}\".\n\
         {}\n\
         Respond in Hebrew.",
        grade(level),
        nikud_instruction(nikud)
    )
}

pub fn illustration(word: &str, topic: &str) -> String {
    format!(
        "A clear, simple, high-quality flat illustration of \"{word}\" in the context of \"{topic}\". \
         Minimalist educational clip-art style on a white background, with no text in the image."
    )
}

pub fn narrative_text(topic: &str, level: GradeLevel, words: &[String], nikud: bool) -> String {
    format!(
        "Write a short, engaging educational Hebrew text (about 100-150 words) about \"{topic}\" for grade \
         level \"{}\".\n\
         Include as many of these keywords as fit naturally: {}.\n\
         Mark every keyword you use by wrapping it in double asterisks, like **keyword**.\n\
         {}\n\
         Keep the tone educational and encouraging.",
        grade(level),
        words.join(", "),
        nikud_instruction(nikud)
    )
}

pub fn vocalize(text: &str) -> String {
    format!(
        "Add full Hebrew Nikud (vowel marks) to the following text. Reply ONLY with the vocalized text, \
         without any explanation:\n\"{text}\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nikud_flag_is_threaded() {
        let with = suggest_network("ים", GradeLevel::Kindergarten, true);
        let without = suggest_network("ים", GradeLevel::Kindergarten, false);
        assert!(with.contains(nikud_instruction(true)));
        assert!(without.contains(nikud_instruction(false)));
        assert!(with.contains("גן"));
    }

    #[test]
    fn test_context_changes_prompt() {
        let words = vec!["גשם".to_string(), "ענן".to_string()];
        let plain = fill_blanks(&words, "חורף", false, None);
        let grounded = fill_blanks(&words, "חורף", false, Some("ירד גשם"));
        assert!(!plain.contains("ירד גשם"));
        assert!(grounded.contains("ירד גשם"));
        assert!(grounded.contains(BLANK));
    }
}
