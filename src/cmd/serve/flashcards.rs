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
use serde::Deserialize;

use crate::cmd::serve::state::ServerState;

#[derive(Deserialize)]
pub struct FlashcardForm {
    action: String,
    #[serde(default)]
    value: Option<String>,
}

/// Card navigation and autoplay. None of this is saved.
pub async fn flashcards_handler<T>(
    State(state): State<ServerState<T>>,
    Form(form): Form<FlashcardForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let mut guard = state
        .lock()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let mutable = &mut *guard;
    let len = mutable.wizard.all_words().len();
    match form.action.as_str() {
        "Next" => mutable.wizard.cursor_mut().next(len),
        "Prev" => mutable.wizard.cursor_mut().prev(len),
        "Play" => {
            if len > 0 {
                mutable.player.start(&state.mutable);
            }
        }
        "Pause" => mutable.player.stop(),
        "Interval" => {
            let seconds = form.value.as_deref().and_then(|v| v.trim().parse().ok());
            match seconds {
                Some(seconds) => mutable.player.set_seconds(seconds, &state.mutable),
                None => return Err((StatusCode::BAD_REQUEST, "Invalid interval".to_string())),
            }
        }
        other => {
            return Err((StatusCode::BAD_REQUEST, format!("Unknown action {other:?}")));
        }
    }
    Ok(Redirect::to("/"))
}
