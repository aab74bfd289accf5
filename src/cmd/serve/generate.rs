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


use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Redirect;
use lessonkit_core::gateway::Transport;
use lessonkit_core::wizard::GenerationKind;
use lessonkit_core::wizard::Notice;
use lessonkit_core::wizard::VocalizeTarget;
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;

#[derive(Deserialize)]
pub struct GenerateForm {
    kind: String,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    target: Option<VocalizeTarget>,
}

impl GenerateForm {
    fn kind(self) -> Option<GenerationKind> {
        let kind = match self.kind.as_str() {
            "network" => GenerationKind::Network,
            "narrative_text" => GenerationKind::NarrativeText,
            "fill_blanks" => GenerationKind::FillBlanks,
            "definitions" => GenerationKind::Definitions,
            "odd_one_out" => GenerationKind::OddOneOut,
            "dual_words" => GenerationKind::DualWords,
            "illustration" => GenerationKind::Illustration { word: self.word? },
            "vocalize" => GenerationKind::Vocalize {
                target: self.target?,
            },
            _ => return None,
        };
        Some(kind)
    }
}

/// Runs one provider request. The state lock is released while the provider
/// is working, so other pages and other concerns stay usable.
pub async fn generate_handler<T: Transport + Send + Sync + 'static>(
    State(state): State<ServerState<T>>,
    Form(form): Form<GenerateForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let Some(kind) = form.kind() else {
        return Err((StatusCode::BAD_REQUEST, "Unknown generation kind".to_string()));
    };
    let prepared = {
        let mut mutable = state
            .lock()
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
        let prepared = mutable.wizard.prepare(kind);
        if let Err(e) = &prepared {
            mutable.wizard.show(Notice::info(e.to_string()));
        }
        prepared
    };
    let Ok(job) = prepared else {
        return Ok(Redirect::to("/"));
    };
    log::debug!("Running {:?}", job.ticket());
    let finished = job.run(&*state.gateway).await;
    let mut mutable = state
        .lock()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if mutable.wizard.complete(finished) {
        mutable.settle();
    }
    Ok(Redirect::to("/"))
}
