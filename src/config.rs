//! Client configuration.
//!
//! A [`ClientConfig`] is an explicit value handed to [`ChatClient`] and
//! [`ImageClient`]. [`ClientConfig::load`] layers, lowest priority first:
//!
//! 1. built-in defaults
//! 2. `<config_dir>/promptline/config.json`, if it exists
//! 3. environment variables (`PROMPTLINE_*`, `OPENAI_API_KEY`)
//!
//! [`ChatClient`]: crate::chat::ChatClient
//! [`ImageClient`]: crate::images::ImageClient

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::chat::Backend;
use crate::error::ChatError;
use crate::models::{ImageModel, ImageSize};

const CONFIG_DIR: &str = "promptline";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_CHAT_URL: &str =
    "https://langflow.encap.ai/api/v1/run/23ad6eee-ca2a-44b9-998b-70ce5548ec3d";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

pub const ENV_CHAT_URL: &str = "PROMPTLINE_CHAT_URL";
pub const ENV_BACKEND: &str = "PROMPTLINE_BACKEND";
pub const ENV_CHAT_API_KEY: &str = "PROMPTLINE_CHAT_API_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "PROMPTLINE_OPENAI_BASE_URL";
pub const ENV_IMAGE_MODEL: &str = "PROMPTLINE_IMAGE_MODEL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "PROMPTLINE_REQUEST_TIMEOUT_SECS";

/// Preferred output size for each image model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageSizes {
    #[serde(rename = "dall-e-2", default)]
    pub dall_e_2: ImageSize,
    #[serde(rename = "dall-e-3", default)]
    pub dall_e_3: ImageSize,
}

impl Default for ImageSizes {
    fn default() -> Self {
        Self {
            dall_e_2: ImageSize::Square1024,
            dall_e_3: ImageSize::Square1024,
        }
    }
}

impl ImageSizes {
    pub fn for_model(&self, model: ImageModel) -> ImageSize {
        match model {
            ImageModel::DallE2 => self.dall_e_2,
            ImageModel::DallE3 => self.dall_e_3,
        }
    }

    pub fn set(&mut self, model: ImageModel, size: ImageSize) {
        match model {
            ImageModel::DallE2 => self.dall_e_2 = size,
            ImageModel::DallE3 => self.dall_e_3 = size,
        }
    }
}

/// Configuration for the chat and image clients.
///
/// # Example
///
/// ```ignore
/// use promptline::chat::Backend;
/// use promptline::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_chat_url("http://localhost:7860/api/v1/run/my-flow")
///     .with_backend(Backend::JsonReply);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Chat flow run endpoint
    pub chat_url: String,
    pub backend: Backend,
    /// Sent as a bearer token to the chat endpoint when set
    pub chat_api_key: Option<String>,
    /// Required for image generation and model listing
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub image_model: ImageModel,
    pub image_sizes: ImageSizes,
    /// Connect timeout applied to every request
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chat_url: DEFAULT_CHAT_URL.to_string(),
            backend: Backend::EventStream,
            chat_api_key: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            image_model: ImageModel::DallE3,
            image_sizes: ImageSizes::default(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_url(mut self, url: impl Into<String>) -> Self {
        self.chat_url = url.into();
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_chat_api_key(mut self, key: impl Into<String>) -> Self {
        self.chat_api_key = Some(key.into());
        self
    }

    pub fn with_openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Set the image API base URL, without the `/v1` suffix.
    pub fn with_openai_base_url(mut self, url: impl Into<String>) -> Self {
        self.openai_base_url = url.into();
        self
    }

    pub fn with_image_model(mut self, model: ImageModel) -> Self {
        self.image_model = model;
        self
    }

    pub fn with_image_size(mut self, model: ImageModel, size: ImageSize) -> Self {
        self.image_sizes.set(model, size);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = Some(timeout.as_secs());
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// `<openai_base_url>/v1/<path>`, tolerating a trailing slash on the base.
    pub fn openai_url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}",
            self.openai_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Defaults, then the default config file, then the environment.
    pub fn load() -> Result<Self, ChatError> {
        let config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env()
    }

    /// Read a config file. A missing file yields the defaults.
    ///
    /// Fields absent from the file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self, ChatError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let file = File::open(path).map_err(|e| {
            ChatError::Config(format!("cannot open {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            ChatError::Config(format!("cannot parse {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ChatError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup. Empty values are ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_CHAT_URL) {
            self.chat_url = url;
        }
        if let Some(backend) = get(ENV_BACKEND) {
            self.backend = backend
                .parse()
                .map_err(|e| ChatError::Config(format!("{}: {}", ENV_BACKEND, e)))?;
        }
        if let Some(key) = get(ENV_CHAT_API_KEY) {
            self.chat_api_key = Some(key);
        }
        if let Some(key) = get(ENV_OPENAI_API_KEY) {
            self.openai_api_key = Some(key);
        }
        if let Some(url) = get(ENV_OPENAI_BASE_URL) {
            self.openai_base_url = url;
        }
        if let Some(model) = get(ENV_IMAGE_MODEL) {
            self.image_model = model
                .parse()
                .map_err(|e| ChatError::Config(format!("{}: {}", ENV_IMAGE_MODEL, e)))?;
        }
        if let Some(secs) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                ChatError::Config(format!(
                    "{}: expected whole seconds, got '{}'",
                    ENV_REQUEST_TIMEOUT_SECS, secs
                ))
            })?;
            self.request_timeout_secs = Some(secs);
        }
        Ok(self)
    }
}
