use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::logging::LogFormat;

/// Upper bound on the composer height, in CSS pixels
pub const DEFAULT_MAX_INPUT_HEIGHT_PX: u32 = 200;

/// Element ids, selectors and limits the page helpers rely on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PageConfig {
    /// Id of the container that receives rendered chat messages
    pub messages_id: String,
    /// Id of the multi-line composer
    pub input_id: String,
    /// Id of the control clicked on Enter
    pub submit_id: String,
    /// Selector for the hidden raw-text copy inside each message
    pub hidden_selector: String,
    /// Composer never grows past this height
    pub max_input_height_px: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            messages_id: "messages".to_string(),
            input_id: "input".to_string(),
            submit_id: "btnSubmit".to_string(),
            hidden_selector: "div.hidden".to_string(),
            max_input_height_px: DEFAULT_MAX_INPUT_HEIGHT_PX,
        }
    }
}

impl PageConfig {
    /// Check that every id and selector is usable
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("messages_id", &self.messages_id),
            ("input_id", &self.input_id),
            ("submit_id", &self.submit_id),
            ("hidden_selector", &self.hidden_selector),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::Config(ConfigError::EmptyField(name.to_string()).to_string()));
            }
        }

        if self.max_input_height_px == 0 {
            return Err(Error::Config(ConfigError::ZeroHeight.to_string()));
        }

        Ok(())
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Filter directive used when no env override is set
    pub level: String,
    /// Output format for native hosts; the browser console ignores it
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: LogFormat::default() }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Root configuration structure for chatline.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatlineConfig {
    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChatlineConfig {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: ChatlineConfig =
            toml::from_str(toml_str).map_err(|e| Error::Config(ConfigError::from(e).to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::config_file(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.page.validate()
    }

    /// Example configuration with every default spelled out
    pub fn example() -> &'static str {
        r#"# chatline configuration

[page]
# Container that htmx swaps new messages into
messages_id = "messages"
# Composer textarea and the button pressed on Enter
input_id = "input"
submit_id = "btnSubmit"
# Hidden raw-text copy inside each rendered message
hidden_selector = "div.hidden"
max_input_height_px = 200

[logging]
level = "warn"
# pretty | json | compact
format = "pretty"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An id or selector was blank
    #[error("field must not be empty: {0}")]
    EmptyField(String),

    /// Height limit of zero would collapse the composer
    #[error("max_input_height_px must be greater than zero")]
    ZeroHeight,

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::TomlParse(err.to_string())
    }
}
