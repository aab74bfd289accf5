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


use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use axum::response::Redirect;
use lessonkit_core::ProjectFile;
use lessonkit_core::Timestamp;
use lessonkit_core::export;
use lessonkit_core::export::ExportFormat;
use lessonkit_core::wizard::Notice;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

use crate::cmd::serve::state::ServerState;

type HandlerError = (StatusCode, String);

fn internal(e: impl ToString) -> HandlerError {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// `attachment` with an RFC 5987 encoded name, so Hebrew file names survive.
pub fn content_disposition(file_name: &str) -> String {
    let encoded = utf8_percent_encode(file_name, NON_ALPHANUMERIC);
    format!("attachment; filename*=UTF-8''{encoded}")
}

pub async fn export_handler<T>(
    State(state): State<ServerState<T>>,
    Path(name): Path<String>,
) -> Result<(StatusCode, HeaderMap, String), HandlerError> {
    let Some(format) = ExportFormat::from_route_name(&name) else {
        return Err((StatusCode::NOT_FOUND, "Not Found".to_string()));
    };
    let mut mutable = state.lock().map_err(internal)?;
    let export = match export::render(
        &mut mutable.wizard,
        format,
        &state.export_options,
        Timestamp::now(),
    ) {
        Ok(export) => export,
        Err(e) => {
            // Nothing to export yet: tell the user on the page instead.
            mutable.wizard.show(Notice::info(e.message()));
            return Err((StatusCode::UNPROCESSABLE_ENTITY, e.message().to_string()));
        }
    };
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(format.content_type()));
    if let Some(file_name) = &export.file_name {
        let value = HeaderValue::from_str(&content_disposition(file_name)).map_err(internal)?;
        headers.insert(CONTENT_DISPOSITION, value);
    }
    log::info!("Exported {}", format.route_name());
    Ok((StatusCode::OK, headers, export.body))
}

/// Replace the lesson with an uploaded project file. Malformed files are
/// rejected and the current lesson is kept.
pub async fn import_handler<T>(
    State(state): State<ServerState<T>>,
    body: String,
) -> Result<Redirect, HandlerError> {
    let project = ProjectFile::from_json(&body).map_err(|e| {
        log::warn!("Rejected project import: {e}");
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;
    let mut mutable = state.lock().map_err(internal)?;
    mutable.player.stop();
    mutable.wizard.load(project);
    mutable.settle();
    log::info!("Imported project");
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_encodes_hebrew() {
        assert_eq!(
            content_disposition("פרויקט_חדש.json"),
            "attachment; filename*=UTF-8''%D7%A4%D7%A8%D7%95%D7%99%D7%A7%D7%98%5F%D7%97%D7%93%D7%A9%2Ejson"
        );
    }
}
