use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GatewayError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Deployment environment name; `development` turns on debug mode.
    pub environment: String,
    /// Request body cap in bytes; unset means unlimited.
    pub max_body_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            environment: "production".to_string(),
            max_body_bytes: None,
        }
    }
}

impl ServerConfig {
    pub fn debug_mode(&self) -> bool {
        self.environment == "development"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: None,
            system_prompt: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub backend: ChatBackend,
}

/// What `/chat` does with a validated prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatBackend {
    #[default]
    Echo,
    Completion,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub debug: bool,
}

impl Settings {
    /// Loads the optional config file, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut settings = match Self::find_config_file() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = toml::from_str(&content).map_err(|e| {
            GatewayError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.completion.timeout_secs == 0 {
            return Err(GatewayError::Config(
                "completion.timeout_secs must be greater than 0".into(),
            ));
        }
        if self.server.max_body_bytes == Some(0) {
            return Err(GatewayError::Config(
                "server.max_body_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Applies environment overrides read through `lookup`. Blank values are
    /// treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| GatewayError::Config(format!("PORT is not a valid port: {port}")))?;
        }
        // FLASK_ENV is still honoured for deployments that predate APP_ENV.
        if let Some(environment) = get("APP_ENV").or_else(|| get("FLASK_ENV")) {
            self.server.environment = environment;
        }
        if let Some(debug) = get("DEBUG") {
            self.logging.debug = matches!(debug.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(limit) = get("MAX_BODY_BYTES") {
            self.server.max_body_bytes = Some(limit.parse().map_err(|_| {
                GatewayError::Config(format!("MAX_BODY_BYTES is not a byte count: {limit}"))
            })?);
        }

        if let Some(key) = get("OPENAI_KEY") {
            self.completion.api_key = Some(key);
        }
        if let Some(base_url) = get("OPENAI_BASE_URL") {
            self.completion.base_url = base_url;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.completion.model = model;
        }
        if let Some(backend) = get("CHAT_BACKEND") {
            self.chat.backend = match backend.to_ascii_lowercase().as_str() {
                "echo" => ChatBackend::Echo,
                "completion" => ChatBackend::Completion,
                other => {
                    return Err(GatewayError::Config(format!(
                        "CHAT_BACKEND must be `echo` or `completion`, got `{other}`"
                    )));
                }
            };
        }

        if self
            .completion
            .api_key
            .as_deref()
            .is_some_and(|k| k.trim().is_empty())
        {
            self.completion.api_key = None;
        }

        self.validate()
    }

    /// Debug logging is on when either `DEBUG` is set or the server runs in
    /// the development environment.
    pub fn verbose_logging(&self) -> bool {
        self.logging.debug || self.server.debug_mode()
    }

    fn find_config_file() -> Option<&'static str> {
        ["custom-config.toml", "config.toml"]
            .into_iter()
            .find(|name| Path::new(name).exists())
    }
}
