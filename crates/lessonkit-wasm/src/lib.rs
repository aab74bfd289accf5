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


//! WASM bindings for lessonkit - runs the lesson wizard in the browser.
//!
//! The page calls the provider itself: [`LessonApp::prepare`] hands out the
//! request URLs and bodies, and the replies come back through
//! [`LessonApp::complete`] or [`LessonApp::fail`].

use std::collections::HashMap;

use lessonkit_core::ProjectFile;
use lessonkit_core::Timestamp;
use lessonkit_core::export;
use lessonkit_core::export::ExportFormat;
use lessonkit_core::export::ExportOptions;
use lessonkit_core::gateway::Completion;
use lessonkit_core::gateway::GenerationError;
use lessonkit_core::gateway::wire;
use lessonkit_core::gateway::wire::DEFAULT_ENDPOINT;
use lessonkit_core::gateway::wire::Models;
use lessonkit_core::gateway::wire::RequestBody;
use lessonkit_core::storage;
use lessonkit_core::wizard::Command;
use lessonkit_core::wizard::Concern;
use lessonkit_core::wizard::Finished;
use lessonkit_core::wizard::GenerationKind;
use lessonkit_core::wizard::Job;
use lessonkit_core::wizard::Notice;
use lessonkit_core::wizard::Wizard;
use serde_json::json;
use wasm_bindgen::prelude::*;
use web_sys::console;

mod local_storage;

use local_storage::Storage;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"lessonkit WASM initialized".into());
}

fn js_error(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn random_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(_) => js_sys::Date::now() as u64,
    }
}

fn now() -> Result<Timestamp, JsValue> {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    Timestamp::try_from(iso).map_err(js_error)
}

/// Read the provider's reply bodies. The first unreadable one fails the job.
fn completions(responses: &[String]) -> Result<Vec<Completion>, GenerationError> {
    responses.iter().map(|body| wire::parse_response(body)).collect()
}

/// The wizard as driven from JavaScript.
#[wasm_bindgen]
pub struct LessonApp {
    wizard: Wizard,
    storage: Storage,
    /// Prepared jobs by ticket id, waiting for their replies.
    jobs: HashMap<u64, Job>,
    endpoint: String,
    models: Models,
    options: ExportOptions,
}

#[wasm_bindgen]
impl LessonApp {
    /// Resume the autosaved lesson, or start a new one.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let storage = Storage::new();
        let wizard = storage::resume(&storage, random_seed());
        Self {
            wizard,
            storage,
            jobs: HashMap::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            models: Models::default(),
            options: ExportOptions::default(),
        }
    }

    /// Override the provider endpoint and models, and name the worksheet
    /// author. Empty strings keep the defaults.
    #[wasm_bindgen]
    pub fn configure(
        &mut self,
        endpoint: &str,
        text_model: &str,
        image_model: &str,
        author: Option<String>,
    ) {
        if !endpoint.trim().is_empty() {
            self.endpoint = endpoint.trim().to_string();
        }
        if !text_model.trim().is_empty() {
            self.models.text = text_model.trim().to_string();
        }
        if !image_model.trim().is_empty() {
            self.models.image = image_model.trim().to_string();
        }
        self.options.author = author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
    }

    #[wasm_bindgen]
    pub fn set_credential_hint(&mut self, hint: &str) {
        self.wizard.set_credential_hint(hint);
    }

    /// Everything the page renders, as JSON.
    #[wasm_bindgen]
    pub fn state_json(&mut self) -> Result<String, JsValue> {
        let definitions = self.wizard.shuffled_definitions().to_vec();
        let image_word_bank = self.wizard.shuffled_image_word_bank().to_vec();
        let words = self.wizard.all_words();
        let busy: Vec<Concern> = Concern::ALL
            .into_iter()
            .filter(|c| self.wizard.is_busy(*c))
            .collect();
        let notice = self
            .wizard
            .notice()
            .map(|n| json!({ "message": n.message, "hint": n.hint }));
        let selection = self.wizard.selection();
        let state = json!({
            "lesson": self.wizard.lesson(),
            "fillBlanks": self.wizard.fill_blanks(),
            "step": self.wizard.step(),
            "notice": notice,
            "busy": busy,
            "selection": {
                "definitions": selection.definitions,
                "alphabetical": selection.alphabetical,
            },
            "shuffledDefinitions": definitions,
            "imageWordBank": image_word_bank,
            "currentCard": self.wizard.cursor().current(&words),
            "cardPosition": self.wizard.cursor().position(words.len()),
            "cardCount": words.len(),
        });
        serde_json::to_string(&state).map_err(js_error)
    }

    /// Apply a user edit. Refused edits show a notice and return the reason
    /// as an error.
    #[wasm_bindgen]
    pub fn dispatch(&mut self, command_json: &str) -> Result<bool, JsValue> {
        let command: Command = serde_json::from_str(command_json)
            .map_err(|e| js_error(format!("Failed to parse command: {e}")))?;
        let is_reset = command == Command::Reset;
        match self.wizard.dispatch(command) {
            Ok(changed) => {
                if is_reset {
                    self.jobs.clear();
                    if let Err(e) = storage::clear(&self.storage) {
                        console::warn_1(&format!("Could not delete autosave: {e}").into());
                    }
                } else if changed {
                    self.save();
                }
                Ok(changed)
            }
            Err(e) => {
                self.wizard.show(Notice::info(e.to_string()));
                Err(js_error(e))
            }
        }
    }

    /// Start a generation. Returns the ticket id, the API key header name and
    /// one `{url, body}` per request to send.
    #[wasm_bindgen]
    pub fn prepare(&mut self, kind_json: &str) -> Result<String, JsValue> {
        let kind: GenerationKind = serde_json::from_str(kind_json)
            .map_err(|e| js_error(format!("Failed to parse generation kind: {e}")))?;
        let job = match self.wizard.prepare(kind) {
            Ok(job) => job,
            Err(e) => {
                self.wizard.show(Notice::info(e.to_string()));
                return Err(js_error(e));
            }
        };
        let requests: Vec<serde_json::Value> = job
            .requests()
            .iter()
            .map(|request| {
                json!({
                    "url": self.models.url(&self.endpoint, request.model),
                    "body": RequestBody::from(request),
                })
            })
            .collect();
        let id = job.ticket().id;
        self.jobs.insert(id, job);
        let prepared = json!({
            "ticket": id,
            "apiKeyHeader": wire::API_KEY_HEADER,
            "requests": requests,
        });
        serde_json::to_string(&prepared).map_err(js_error)
    }

    /// Hand back the reply bodies of a prepared job, in request order.
    /// Returns whether the lesson changed.
    #[wasm_bindgen]
    pub fn complete(&mut self, ticket: u64, responses_json: &str) -> Result<bool, JsValue> {
        let responses: Vec<String> = serde_json::from_str(responses_json)
            .map_err(|e| js_error(format!("Failed to parse responses: {e}")))?;
        let job = self.take_job(ticket)?;
        let finished = match completions(&responses) {
            Ok(completions) => job.resolve(completions),
            Err(e) => job.fail(e),
        };
        Ok(self.finish(finished))
    }

    /// Report a failed request: an error status with its body, or status 0
    /// when the request never got a reply.
    #[wasm_bindgen]
    pub fn fail(&mut self, ticket: u64, status: u16, body: &str) -> Result<bool, JsValue> {
        let job = self.take_job(ticket)?;
        let error = if status == 0 {
            GenerationError::Transport(body.to_string())
        } else {
            wire::classify_error(status, body)
        };
        Ok(self.finish(job.fail(error)))
    }

    /// Render an export. Returns `{fileName, contentType, body}`.
    #[wasm_bindgen]
    pub fn export(&mut self, route_name: &str) -> Result<String, JsValue> {
        let format = ExportFormat::from_route_name(route_name)
            .ok_or_else(|| js_error(format!("Unknown export: {route_name}")))?;
        let rendered = match export::render(&mut self.wizard, format, &self.options, now()?) {
            Ok(rendered) => rendered,
            Err(e) => {
                self.wizard.show(Notice::info(e.message()));
                return Err(js_error(e.message()));
            }
        };
        let out = json!({
            "fileName": rendered.file_name,
            "contentType": format.content_type(),
            "body": rendered.body,
        });
        serde_json::to_string(&out).map_err(js_error)
    }

    /// Replace the lesson with a project file. Malformed files leave the
    /// current lesson untouched.
    #[wasm_bindgen]
    pub fn import_project(&mut self, json: &str) -> Result<(), JsValue> {
        let project = ProjectFile::from_json(json).map_err(js_error)?;
        self.wizard.load(project);
        self.save();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn next_card(&mut self) {
        let len = self.wizard.all_words().len();
        self.wizard.cursor_mut().next(len);
    }

    #[wasm_bindgen]
    pub fn prev_card(&mut self) {
        let len = self.wizard.all_words().len();
        self.wizard.cursor_mut().prev(len);
    }

    /// Incremented on every change to saved state.
    #[wasm_bindgen]
    pub fn revision(&self) -> u64 {
        self.wizard.revision()
    }

    fn take_job(&mut self, ticket: u64) -> Result<Job, JsValue> {
        self.jobs
            .remove(&ticket)
            .ok_or_else(|| js_error(format!("Unknown ticket: {ticket}")))
    }

    fn finish(&mut self, finished: Finished) -> bool {
        let changed = self.wizard.complete(finished);
        if changed {
            self.save();
        }
        changed
    }

    fn save(&self) {
        if let Err(e) = storage::persist(&self.storage, &self.wizard) {
            console::warn_1(&format!("Autosave failed: {e}").into());
        }
    }
}

impl Default for LessonApp {
    fn default() -> Self {
        Self::new()
    }
}
