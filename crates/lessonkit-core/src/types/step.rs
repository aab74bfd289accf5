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

use serde::Deserialize;
use serde::Serialize;

/// One of the six wizard stages, in order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Step {
    #[default]
    Intake = 1,
    WordNetwork = 2,
    Flashcards = 3,
    NarrativeText = 4,
    ExerciseStudio = 5,
    Summary = 6,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Intake,
        Step::WordNetwork,
        Step::Flashcards,
        Step::NarrativeText,
        Step::ExerciseStudio,
        Step::Summary,
    ];

    /// The step numbered `n`, if `n` is in [1, 6].
    pub fn new(n: u8) -> Option<Step> {
        Step::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Step> {
        Step::new(self.number() + 1)
    }

    pub fn prev(self) -> Option<Step> {
        Step::new(self.number() - 1)
    }

    /// Short label shown in the step indicator.
    pub fn label(self) -> &'static str {
        match self {
            Step::Intake => "נושא",
            Step::WordNetwork => "רשת מילים",
            Step::Flashcards => "הברקה",
            Step::NarrativeText => "טקסט",
            Step::ExerciseStudio => "תרגילים",
            Step::Summary => "סיכום",
        }
    }
}

/// Lenient conversion used when loading saved lessons: out-of-range values are
/// clamped into [1, 6].
impl From<u8> for Step {
    fn from(value: u8) -> Self {
        Step::new(value.clamp(1, 6)).unwrap_or_default()
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> u8 {
        step.number()
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(Step::Intake.prev(), None);
        assert_eq!(Step::Summary.next(), None);
        assert_eq!(Step::Flashcards.next(), Some(Step::NarrativeText));
        assert_eq!(Step::Flashcards.prev(), Some(Step::WordNetwork));
    }

    #[test]
    fn test_new() {
        assert_eq!(Step::new(0), None);
        assert_eq!(Step::new(7), None);
        assert_eq!(Step::new(5), Some(Step::ExerciseStudio));
    }

    #[test]
    fn test_deserialize_clamps() {
        let step: Step = serde_json::from_str("9").unwrap();
        assert_eq!(step, Step::Summary);
        let step: Step = serde_json::from_str("0").unwrap();
        assert_eq!(step, Step::Intake);
        assert_eq!(serde_json::to_string(&Step::NarrativeText).unwrap(), "4");
    }
}
