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

use chrono::Datelike;
use chrono::NaiveDateTime;
use chrono::SubsecRound;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// A UTC timestamp with millisecond precision, written in the same shape as
/// JavaScript's `Date.prototype.toISOString`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(ndt: NaiveDateTime) -> Self {
        Self(ndt.trunc_subsecs(3))
    }

    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self(chrono::Utc::now().naive_utc().trunc_subsecs(3))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.strip_suffix('Z').unwrap_or(&value);
        let ndt = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|_| ErrorReport::new(format!("Failed to parse timestamp: '{value}'.")))?;
        Ok(Timestamp::new(ndt))
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> String {
        ts.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_iso_string() {
        let ts = Timestamp::try_from("2025-03-01T08:15:30.250Z".to_string()).unwrap();
        assert_eq!(ts.to_string(), "2025-03-01T08:15:30.250Z");
        assert_eq!(ts.year(), 2025);
    }

    #[test]
    fn test_accepts_missing_zone_suffix() {
        let ts = Timestamp::try_from("2024-12-31T23:59:59.000".to_string()).unwrap();
        assert_eq!(ts.to_string(), "2024-12-31T23:59:59.000Z");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Timestamp::try_from("yesterday".to_string()).is_err());
    }
}
