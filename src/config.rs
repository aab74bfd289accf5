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


//! `lessonkit.toml`. Every key is optional.

use std::path::Path;
use std::path::PathBuf;

use lessonkit_core::error::Fallible;
use lessonkit_core::error::fail;
use lessonkit_core::export::ExportOptions;
use lessonkit_core::gateway::wire::DEFAULT_ENDPOINT;
use lessonkit_core::gateway::wire::Models;
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "lessonkit.toml";

/// Checked when the configured variable is unset.
const FALLBACK_API_KEY_ENV: &str = "API_KEY";

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub provider: ProviderConfig,
    pub autosave: AutosaveConfig,
    pub flashcards: FlashcardConfig,
    pub worksheet: WorksheetConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub text_model: String,
    pub image_model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let models = Models::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            text_model: models.text,
            image_model: models.image,
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn models(&self) -> Models {
        Models {
            text: self.text_model.clone(),
            image: self.image_model.clone(),
        }
    }

    pub fn api_key(&self) -> Option<String> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    /// Shown next to errors caused by a missing or rejected key.
    pub fn credential_hint(&self) -> String {
        format!(
            "Set the {} environment variable to a valid API key and restart lessonkit.",
            self.api_key_env
        )
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AutosaveConfig {
    pub path: PathBuf,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lessonkit.db"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FlashcardConfig {
    pub seconds_per_card: u64,
}

impl Default for FlashcardConfig {
    fn default() -> Self {
        Self {
            seconds_per_card: 2,
        }
    }
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WorksheetConfig {
    pub author: Option<String>,
}

impl Config {
    /// Load `path`, or `lessonkit.toml` in the working directory if it exists.
    pub fn load(path: Option<&Path>) -> Fallible<Config> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    return fail(format!("config file {} does not exist.", path.display()));
                }
                path.to_path_buf()
            }
            None => {
                let default = PathBuf::from(CONFIG_FILE_NAME);
                if !default.exists() {
                    log::debug!("No {CONFIG_FILE_NAME}, using defaults");
                    return Ok(Config::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path)?;
        Config::parse(&text)
    }

    pub fn parse(text: &str) -> Fallible<Config> {
        match toml::from_str(text) {
            Ok(config) => Ok(config),
            Err(e) => fail(format!("invalid configuration: {e}")),
        }
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            author: self
                .worksheet
                .author
                .as_ref()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_empty_config_is_default() -> Fallible<()> {
        let config = Config::parse("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.flashcards.seconds_per_card, 2);
        assert_eq!(config.provider.api_key_env, "GEMINI_API_KEY");
        Ok(())
    }

    #[test]
    fn test_partial_config() -> Fallible<()> {
        let config = Config::parse(
            r#"
            [provider]
            text_model = "some-model"

            [worksheet]
            author = "  צוות בית הספר  "
            "#,
        )?;
        assert_eq!(config.provider.models().text, "some-model");
        assert_eq!(config.provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(
            config.export_options().author.as_deref(),
            Some("צוות בית הספר")
        );
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::parse("[provider]\nmodel = \"x\"").unwrap_err();
        assert!(err.message().starts_with("invalid configuration"));
    }

    #[test]
    fn test_load_from_file() -> Fallible<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[flashcards]\nseconds_per_card = 5")?;
        let config = Config::load(Some(file.path()))?;
        assert_eq!(config.flashcards.seconds_per_card, 5);
        assert!(Config::load(Some(Path::new("./no-such-file.toml"))).is_err());
        Ok(())
    }
}
