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


use serde::Deserialize;
use serde::Serialize;

/// The class a lesson is aimed at. Serialized with the short Hebrew codes used
/// in saved project files; anything unrecognised loads as [`GradeLevel::Unset`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GradeLevel {
    #[default]
    Unset,
    Kindergarten,
    Grades1To2,
    Grades3To4,
    Grades5To6,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 5] = [
        GradeLevel::Unset,
        GradeLevel::Kindergarten,
        GradeLevel::Grades1To2,
        GradeLevel::Grades3To4,
        GradeLevel::Grades5To6,
    ];

    pub fn code(self) -> &'static str {
        match self {
            GradeLevel::Unset => "",
            GradeLevel::Kindergarten => "גן",
            GradeLevel::Grades1To2 => "א-ב",
            GradeLevel::Grades3To4 => "ג-ד",
            GradeLevel::Grades5To6 => "ה-ו",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradeLevel::Unset => "בחר שכבת גיל",
            GradeLevel::Kindergarten => "גן",
            GradeLevel::Grades1To2 => "א' - ב'",
            GradeLevel::Grades3To4 => "ג' - ד'",
            GradeLevel::Grades5To6 => "ה' - ו'",
        }
    }

    /// Early readers get the larger print layout.
    pub fn is_early(self) -> bool {
        matches!(self, GradeLevel::Kindergarten | GradeLevel::Grades1To2)
    }
}

impl From<String> for GradeLevel {
    fn from(value: String) -> Self {
        GradeLevel::ALL
            .into_iter()
            .find(|g| g.code() == value.trim())
            .unwrap_or_default()
    }
}

impl From<GradeLevel> for String {
    fn from(grade: GradeLevel) -> String {
        grade.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for grade in GradeLevel::ALL {
            assert_eq!(GradeLevel::from(String::from(grade)), grade);
        }
    }

    #[test]
    fn test_unknown_code_is_unset() {
        let grade: GradeLevel = serde_json::from_str("\"ז-ח\"").unwrap();
        assert_eq!(grade, GradeLevel::Unset);
    }

    #[test]
    fn test_early() {
        assert!(GradeLevel::Kindergarten.is_early());
        assert!(GradeLevel::Grades1To2.is_early());
        assert!(!GradeLevel::Grades3To4.is_early());
        assert!(!GradeLevel::Unset.is_early());
    }
}
