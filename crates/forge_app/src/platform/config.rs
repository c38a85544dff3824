use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use forge_core::{BlockSelection, FailurePolicy, SessionSettings, Stack, Theme};
use forge_engine::{CompletionSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use forge_logging::forge_info;
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = "uiforge";
const CONFIG_FILENAME: &str = "config.ron";

/// User settings as stored in the RON config file. Every field is optional in
/// the file; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    pub default_stack: String,
    pub theme: ThemeSetting,
    pub output_dir: PathBuf,
    pub failure_policy: FailurePolicySetting,
    pub block_selection: BlockSelectionSetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeSetting {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FailurePolicySetting {
    #[default]
    ReplaceWithSentinel,
    KeepPrevious,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BlockSelectionSetting {
    #[default]
    First,
    Largest,
}

/// Command-line values that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
            max_response_bytes: 4 * 1024 * 1024,
            default_stack: Stack::default().value().to_string(),
            theme: ThemeSetting::default(),
            output_dir: PathBuf::from("uiforge-preview"),
            failure_policy: FailurePolicySetting::default(),
            block_selection: BlockSelectionSetting::default(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
    }

    /// Loads `explicit` if given (it must exist), else the default path if it
    /// exists, else the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()));
            }
        };
        let settings =
            Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        forge_info!("Loaded config from {:?}", path);
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let settings: Settings = ron::from_str(text)?;
        settings.default_stack()?;
        Ok(settings)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        self
    }

    pub fn default_stack(&self) -> Result<Stack> {
        self.default_stack
            .parse()
            .map_err(|err| anyhow!("default_stack: {err}"))
    }

    pub fn session_settings(&self, stack: Option<Stack>) -> Result<SessionSettings> {
        Ok(SessionSettings {
            stack: match stack {
                Some(stack) => stack,
                None => self.default_stack()?,
            },
            theme: match self.theme {
                ThemeSetting::Light => Theme::Light,
                ThemeSetting::Dark => Theme::Dark,
            },
            failure_policy: match self.failure_policy {
                FailurePolicySetting::ReplaceWithSentinel => FailurePolicy::ReplaceWithSentinel,
                FailurePolicySetting::KeepPrevious => FailurePolicy::KeepPrevious,
            },
            block_selection: match self.block_selection {
                BlockSelectionSetting::First => BlockSelection::First,
                BlockSelectionSetting::Largest => BlockSelection::Largest,
            },
        })
    }

    pub fn completion_settings(&self, api_key: Option<String>) -> CompletionSettings {
        CompletionSettings {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            api_key,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }

    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
