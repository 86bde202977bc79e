pub mod settings;

pub use settings::{ChatBackend, ChatConfig, CompletionConfig, LoggingConfig, ServerConfig, Settings};
