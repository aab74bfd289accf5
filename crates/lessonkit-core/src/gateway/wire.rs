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


//! The provider's `generateContent` REST format. Shared by the native client
//! and the browser bindings, which only differ in who performs the HTTP call.

use serde::Deserialize;
use serde::Serialize;

use crate::gateway::Completion;
use crate::gateway::GenerationError;
use crate::gateway::GenerationRequest;
use crate::gateway::InlineImage;
use crate::gateway::Model;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Model names per [`Model`].
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Models {
    pub text: String,
    pub image: String,
}

impl Default for Models {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_MODEL.to_string(),
            image: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl Models {
    pub fn name(&self, model: Model) -> &str {
        match model {
            Model::Text => &self.text,
            Model::Image => &self.image,
        }
    }

    pub fn url(&self, endpoint: &str, model: Model) -> String {
        format!(
            "{}/models/{}:generateContent",
            endpoint.trim_end_matches('/'),
            self.name(model)
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl From<&GenerationRequest> for RequestBody {
    fn from(request: &GenerationRequest) -> Self {
        let generation_config = match (request.model, &request.schema) {
            (Model::Image, _) => Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: "1:1".to_string(),
                }),
                ..Default::default()
            }),
            (Model::Text, Some(schema)) => Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema.clone()),
                ..Default::default()
            }),
            (Model::Text, None) => None,
        };
        RequestBody {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                    inline_data: None,
                }],
            }],
            generation_config,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

#[derive(Deserialize, Debug, Default)]
pub struct ResponseBody {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl From<ResponseBody> for Completion {
    /// Text parts of the first candidate are concatenated; inline images are
    /// kept in order.
    fn from(body: ResponseBody) -> Self {
        let mut text: Option<String> = None;
        let mut images = Vec::new();
        let parts = body
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts)
            .unwrap_or_default();
        for part in parts {
            if let Some(t) = part.text {
                text.get_or_insert_with(String::new).push_str(&t);
            }
            if let Some(data) = part.inline_data {
                images.push(InlineImage {
                    mime_type: data.mime_type,
                    data: data.data,
                });
            }
        }
        Completion { text, images }
    }
}

/// Read a successful reply body.
pub fn parse_response(body: &str) -> Result<Completion, GenerationError> {
    let body: ResponseBody =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;
    Ok(body.into())
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Classify an error reply. Key problems come back as 401/403, or as a 400
/// whose message mentions the key.
pub fn classify_error(status: u16, body: &str) -> GenerationError {
    let (message, code) = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => (parsed.error.message, parsed.error.status),
        Err(_) => (body.trim().to_string(), String::new()),
    };
    let key_problem = status == 401
        || status == 403
        || code == "UNAUTHENTICATED"
        || code == "PERMISSION_DENIED"
        || (status == 400 && message.contains("API key"));
    if key_problem {
        GenerationError::Credentials(message)
    } else {
        GenerationError::Provider { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_request_body() {
        let request = GenerationRequest {
            model: Model::Text,
            prompt: "p".to_string(),
            schema: Some(json!({"type": "ARRAY"})),
        };
        let body = serde_json::to_value(RequestBody::from(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"parts": [{"text": "p"}]}],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "ARRAY"}
                }
            })
        );
    }

    #[test]
    fn test_plain_text_request_has_no_config() {
        let request = GenerationRequest {
            model: Model::Text,
            prompt: "p".to_string(),
            schema: None,
        };
        let body = serde_json::to_value(RequestBody::from(&request)).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_image_request_body() {
        let request = GenerationRequest {
            model: Model::Image,
            prompt: "p".to_string(),
            schema: None,
        };
        let body = serde_json::to_value(RequestBody::from(&request)).unwrap();
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "1:1");
    }

    #[test]
    fn test_parse_response_parts() {
        let body = r#"{"candidates": [{"content": {"parts": [
            {"text": "hello "},
            {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
            {"text": "world"}
        ]}}]}"#;
        let completion = parse_response(body).unwrap();
        assert_eq!(completion.text.as_deref(), Some("hello world"));
        assert_eq!(completion.images[0].data_uri(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let completion = parse_response("{}").unwrap();
        assert_eq!(completion, Completion::default());
    }

    #[test]
    fn test_classify_error() {
        let bad_key = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert!(classify_error(400, bad_key).is_credential_related());
        assert!(classify_error(403, "forbidden").is_credential_related());
        let overloaded = r#"{"error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}}"#;
        assert_eq!(
            classify_error(503, overloaded),
            GenerationError::Provider {
                status: 503,
                message: "overloaded".to_string()
            }
        );
    }

    #[test]
    fn test_models_url() {
        let models = Models::default();
        assert_eq!(
            models.url("https://example.test/v1beta/", Model::Text),
            format!("https://example.test/v1beta/models/{DEFAULT_TEXT_MODEL}:generateContent")
        );
    }
}
