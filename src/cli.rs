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


use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use lessonkit_core::error::Fallible;
use tokio::spawn;

use crate::cmd::export::ExportKind;
use crate::cmd::export::export_project;
use crate::cmd::serve::server::ServerConfig;
use crate::cmd::serve::server::start_server;
use crate::config::Config;
use crate::provider::GeminiTransport;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Build a lesson through the web wizard.
    Serve {
        /// Path to the configuration file. By default, `lessonkit.toml` in the working directory is used if present.
        #[arg(long)]
        config: Option<PathBuf>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
    /// Render a saved project file.
    Export {
        /// Path to the project file.
        project: PathBuf,
        /// Which document to produce.
        #[arg(long, default_value_t = ExportKind::Doc)]
        format: ExportKind,
        /// Optional path to the output file. By default, the output is printed to stdout.
        #[arg(long)]
        output: Option<String>,
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            config,
            host,
            port,
            open_browser,
        } => {
            let config = Config::load(config.as_deref())?;
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let transport = GeminiTransport::new(&config.provider);
            let config = ServerConfig { host, port, config };
            start_server(config, transport).await
        }
        Command::Export {
            project,
            format,
            output,
            config,
        } => {
            let config = Config::load(config.as_deref())?;
            export_project(&project, format, output, &config)
        }
    }
}
