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


//! Response schemas, in the provider's OpenAPI subset.

use serde_json::Value;
use serde_json::json;

fn category() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "name": { "type": "STRING", "description": "Category name in Hebrew" },
            "words": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Words in Hebrew"
            }
        },
        "required": ["id", "name", "words"]
    })
}

pub fn network() -> Value {
    json!({ "type": "ARRAY", "items": category() })
}

pub fn network_from_text() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING", "description": "Topic name in Hebrew" },
            "categories": { "type": "ARRAY", "items": category() }
        },
        "required": ["topic", "categories"]
    })
}

pub fn sentences() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

pub fn definitions() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "word": { "type": "STRING" },
                "definition": { "type": "STRING" }
            },
            "required": ["word", "definition"]
        }
    })
}

pub fn odd_one_out() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "answer": { "type": "STRING" },
                "reason": { "type": "STRING" }
            },
            "required": ["options", "answer", "reason"]
        }
    })
}

pub fn dual_words() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "wordA": { "type": "STRING" },
                "wordB": { "type": "STRING" }
            },
            "required": ["wordA", "wordB"]
        }
    })
}
