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


//! Typed contracts with the generative content provider.
//!
//! Each artifact kind is an [`Operation`]: it knows which requests to send and
//! how to turn the provider's replies into lesson data. The [`Transport`] is
//! the only part that touches the network, so the native server, the browser
//! bindings and the tests can each plug in their own.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::future::Future;

use serde::Deserialize;
use serde::Serialize;

pub mod ops;
pub mod parse;
pub mod prompt;
pub mod schema;
pub mod wire;

pub use ops::Definitions;
pub use ops::DualWords;
pub use ops::FillBlanks;
pub use ops::Illustration;
pub use ops::NarrativeText;
pub use ops::NetworkFromText;
pub use ops::OddOneOut;
pub use ops::SuggestNetwork;
pub use ops::Vocalize;

use crate::types::artifacts::DefinitionMatch;
use crate::types::artifacts::DualWordSet;
use crate::types::artifacts::OddOneOutSet;
use crate::types::category::WordCategory;
use crate::types::grade::GradeLevel;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// The request never got a reply.
    Transport(String),
    /// The provider rejected the API key, or none is configured.
    Credentials(String),
    /// The provider answered with an error status.
    Provider { status: u16, message: String },
    /// The reply carried no usable content.
    EmptyResponse,
    /// The reply did not have the requested shape.
    Malformed(String),
}

impl GenerationError {
    /// Whether re-entering the API key is a plausible fix.
    pub fn is_credential_related(&self) -> bool {
        matches!(self, GenerationError::Credentials(_))
    }
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::Transport(msg) => write!(f, "could not reach the provider: {msg}"),
            GenerationError::Credentials(msg) => write!(f, "the provider rejected the API key: {msg}"),
            GenerationError::Provider { status, message } => {
                write!(f, "the provider returned status {status}: {message}")
            }
            GenerationError::EmptyResponse => write!(f, "the provider returned no content"),
            GenerationError::Malformed(msg) => write!(f, "malformed provider response: {msg}"),
        }
    }
}

impl Error for GenerationError {}

/// Which of the configured models serves a request.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    Text,
    Image,
}

impl Display for Model {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::Text => write!(f, "text"),
            Model::Image => write!(f, "image"),
        }
    }
}

/// One call to the provider: an instruction plus, for structured replies, the
/// JSON schema the reply must follow.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: Model,
    pub prompt: String,
    pub schema: Option<serde_json::Value>,
}

/// An image returned inline, base64-encoded.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// What the provider sent back for one request.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Completion {
    pub text: Option<String>,
    #[serde(default)]
    pub images: Vec<InlineImage>,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            images: Vec::new(),
        }
    }
}

/// Sends a request to the provider.
pub trait Transport {
    fn complete(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<Completion, GenerationError>> + Send;
}

/// A generative step: the requests it needs and how to read the replies.
pub trait Operation {
    type Output;

    fn requests(&self) -> Vec<GenerationRequest>;

    /// `completions` has one entry per request, in order.
    fn parse(&self, completions: Vec<Completion>) -> Result<Self::Output, GenerationError>;
}

/// The provider, seen as one typed method per artifact kind.
pub struct Gateway<T> {
    transport: T,
}

impl<T: Transport + Sync> Gateway<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send every request of `op` in order, then parse. The first failed call
    /// fails the operation; nothing is parsed from a partial set of replies.
    pub async fn run<O: Operation + Sync>(&self, op: &O) -> Result<O::Output, GenerationError> {
        let requests = op.requests();
        let mut completions = Vec::with_capacity(requests.len());
        for request in requests.iter() {
            log::debug!("Sending {} request to provider", request.model);
            completions.push(self.transport.complete(request).await?);
        }
        op.parse(completions)
    }

    pub async fn suggest_network(
        &self,
        topic: &str,
        grade: GradeLevel,
        nikud: bool,
    ) -> Result<Vec<parse::SuggestedCategory>, GenerationError> {
        self.run(&SuggestNetwork {
            topic: topic.to_string(),
            grade,
            nikud,
        })
        .await
    }

    pub async fn suggest_network_from_text(
        &self,
        source_text: &str,
        grade: GradeLevel,
        nikud: bool,
    ) -> Result<parse::TextNetwork, GenerationError> {
        self.run(&NetworkFromText {
            source_text: source_text.to_string(),
            grade,
            nikud,
        })
        .await
    }

    pub async fn generate_fill_blanks(
        &self,
        categories: &[WordCategory],
        topic: &str,
        nikud: bool,
        context: Option<&str>,
    ) -> Result<Vec<String>, GenerationError> {
        self.run(&FillBlanks {
            words: categories.iter().flat_map(|c| c.words().iter().cloned()).collect(),
            topic: topic.to_string(),
            nikud,
            context: context.map(str::to_string),
        })
        .await
    }

    pub async fn generate_definitions(
        &self,
        words: &[String],
        topic: &str,
        grade: GradeLevel,
        nikud: bool,
        context: Option<&str>,
    ) -> Result<Vec<DefinitionMatch>, GenerationError> {
        self.run(&Definitions {
            words: words.to_vec(),
            topic: topic.to_string(),
            grade,
            nikud,
            context: context.map(str::to_string),
        })
        .await
    }

    pub async fn generate_odd_one_out(
        &self,
        categories: &[WordCategory],
        topic: &str,
        nikud: bool,
    ) -> Result<Vec<OddOneOutSet>, GenerationError> {
        self.run(&OddOneOut {
            categories: categories.to_vec(),
            topic: topic.to_string(),
            nikud,
        })
        .await
    }

    pub async fn generate_dual_words(
        &self,
        words: &[String],
        topic: &str,
        grade: GradeLevel,
        nikud: bool,
        context: Option<&str>,
    ) -> Result<Vec<DualWordSet>, GenerationError> {
        self.run(&DualWords {
            words: words.to_vec(),
            topic: topic.to_string(),
            grade,
            nikud,
            context: context.map(str::to_string),
        })
        .await
    }

    pub async fn generate_illustration(
        &self,
        word: &str,
        topic: &str,
    ) -> Result<Option<String>, GenerationError> {
        self.run(&Illustration {
            word: word.to_string(),
            topic: topic.to_string(),
        })
        .await
    }

    pub async fn generate_narrative_text(
        &self,
        topic: &str,
        grade: GradeLevel,
        words: &[String],
        nikud: bool,
    ) -> Result<String, GenerationError> {
        self.run(&NarrativeText {
            topic: topic.to_string(),
            grade,
            words: words.to_vec(),
            nikud,
        })
        .await
    }

    /// Add vowel marks to `text`. Falls back to `text` itself when the reply
    /// has no readable text.
    pub async fn apply_vocalization(&self, text: &str) -> Result<String, GenerationError> {
        let mut out = self
            .run(&Vocalize {
                items: vec![text.to_string()],
            })
            .await?;
        Ok(out.pop().unwrap_or_else(|| text.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays canned replies in order and records every request it saw.
    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<Completion, GenerationError>>>,
        pub seen: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedTransport {
        pub fn new(replies: Vec<Result<Completion, GenerationError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<GenerationRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn complete(
            &self,
            request: &GenerationRequest,
        ) -> impl Future<Output = Result<Completion, GenerationError>> + Send {
            self.seen.lock().unwrap().push(request.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(GenerationError::Transport("no scripted reply".to_string())));
            async move { reply }
        }
    }

    /// Drive a future that never actually waits.
    pub fn block_on<F: Future>(future: F) -> F::Output {
        use std::pin::pin;
        use std::task::Context;
        use std::task::Poll;
        use std::task::Waker;

        let mut future = pin!(future);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(out) = future.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }
}
