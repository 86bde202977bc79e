pub mod openai;

pub use openai::OpenAIProvider;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion API key not configured")]
    MissingApiKey,

    #[error("Completion API error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API error: upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion API error: {0}")]
    InvalidRequest(#[from] async_openai::error::OpenAIError),

    #[error("Completion API error: response contained no completion")]
    EmptyResponse,
}

/// One round trip to a hosted text-generation endpoint.
#[async_trait]
pub trait CompletionService {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, CompletionError>;
}
