pub mod config;
pub mod error;
pub mod logging;
pub mod request;
pub mod transcript;

pub use config::{ChatlineConfig, ConfigError, LoggingConfig, PageConfig};
pub use error::{DomError, Error, Result};
pub use logging::LogFormat;
pub use request::ChatRequest;
pub use transcript::{ChatTurn, Role, TranscriptStore};
