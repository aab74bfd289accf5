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


//! The provider's REST API over `reqwest`.

use std::future::Future;

use lessonkit_core::gateway::Completion;
use lessonkit_core::gateway::GenerationError;
use lessonkit_core::gateway::GenerationRequest;
use lessonkit_core::gateway::Transport;
use lessonkit_core::gateway::wire;
use lessonkit_core::gateway::wire::Models;
use lessonkit_core::gateway::wire::RequestBody;
use reqwest::Client;

use crate::config::ProviderConfig;

pub struct GeminiTransport {
    client: Client,
    endpoint: String,
    models: Models,
    api_key: Option<String>,
}

impl GeminiTransport {
    pub fn new(config: &ProviderConfig) -> Self {
        let api_key = config.api_key();
        if api_key.is_none() {
            log::warn!(
                "No API key found in {}; generation requests will fail",
                config.api_key_env
            );
        }
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            models: config.models(),
            api_key,
        }
    }
}

impl Transport for GeminiTransport {
    fn complete(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<Completion, GenerationError>> + Send {
        let client = self.client.clone();
        let url = self.models.url(&self.endpoint, request.model);
        let body = RequestBody::from(request);
        let api_key = self.api_key.clone();
        async move {
            let Some(api_key) = api_key else {
                return Err(GenerationError::Credentials(
                    "no API key is configured".to_string(),
                ));
            };
            log::debug!("POST {url}");
            let response = client
                .post(&url)
                .header(wire::API_KEY_HEADER, api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| GenerationError::Transport(e.to_string()))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| GenerationError::Transport(e.to_string()))?;
            if !status.is_success() {
                return Err(wire::classify_error(status.as_u16(), &text));
            }
            wire::parse_response(&text)
        }
    }
}
