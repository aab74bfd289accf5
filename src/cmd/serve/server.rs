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


use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use lessonkit_core::error::Fallible;
use lessonkit_core::gateway::Gateway;
use lessonkit_core::gateway::Transport;
use lessonkit_core::storage;
use tokio::net::TcpListener;
use tokio::signal;

use crate::cmd::serve::download::export_handler;
use crate::cmd::serve::download::import_handler;
use crate::cmd::serve::flashcards::flashcards_handler;
use crate::cmd::serve::generate::generate_handler;
use crate::cmd::serve::get::get_handler;
use crate::cmd::serve::post::post_handler;
use crate::cmd::serve::state::MutableState;
use crate::cmd::serve::state::ServerState;
use crate::config::Config;
use crate::db::Database;
use crate::player::Player;
use crate::utils::CACHE_CONTROL_IMMUTABLE;
use crate::utils::clock_seed;

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub config: Config,
}

pub async fn start_server<T>(config: ServerConfig, transport: T) -> Fallible<()>
where
    T: Transport + Send + Sync + 'static,
{
    let ServerConfig { host, port, config } = config;
    let db = Database::open(&config.autosave.path)?;
    let mut wizard = storage::resume(&db, clock_seed());
    wizard.set_credential_hint(config.provider.credential_hint());
    log::debug!("Resumed lesson at step {}", wizard.step().number());

    let state = ServerState {
        mutable: Arc::new(Mutex::new(MutableState {
            wizard,
            db,
            player: Player::new(config.flashcards.seconds_per_card),
        })),
        gateway: Arc::new(Gateway::new(transport)),
        export_options: Arc::new(config.export_options()),
    };
    let app = Router::new()
        .route("/", get(get_handler::<T>).post(post_handler::<T>))
        .route("/generate", post(generate_handler::<T>))
        .route("/flashcards", post(flashcards_handler::<T>))
        .route("/export/{name}", get(export_handler::<T>))
        .route("/import", post(import_handler::<T>))
        .route("/style.css", get(style_handler))
        .fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{host}:{port}");
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            log::warn!("Could not listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
