use std::time::Duration;

use async_trait::async_trait;

use crate::config::CompletionConfig;
use crate::http_client::client_for_url_with_timeout;
use crate::providers::{CompletionError, CompletionService};

use super::types::{
    ChatCompletionRequest, ChatCompletionRequestArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionResponse,
};

const MAX_ERROR_BODY: usize = 512;

/// Client for any OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAIProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    system_prompt: Option<String>,
    max_tokens: Option<u32>,
}

impl OpenAIProvider {
    pub fn from_config(config: &CompletionConfig) -> Result<Self, reqwest::Error> {
        let client = client_for_url_with_timeout(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    // Accepts both `https://host` and `https://host/v1` as base URL.
    pub fn chat_completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    pub fn build_request(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<ChatCompletionRequest, CompletionError> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);
        if let Some(system) = self.system_prompt.as_deref() {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into(),
        );

        let mut builder = ChatCompletionRequestArgs::default();
        builder.model(model).messages(messages).temperature(temperature);
        // Local OpenAI-compatible servers only understand `max_tokens`.
        if let Some(max_tokens) = self.max_tokens {
            #[allow(deprecated)]
            builder.max_tokens(max_tokens);
        }
        Ok(builder.build()?)
    }

    pub async fn chat_completions(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CompletionError> {
        let response = self
            .client
            .post(self.chat_completions_url())
            .bearer_auth(api_key)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: upstream_error_message(&body),
            });
        }

        Ok(response.json::<ChatCompletionResponse>().await?)
    }

    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;
        let request = self.build_request(prompt, model, temperature)?;
        let response = self.chat_completions(api_key, &request).await?;
        first_completion_text(response)
    }
}

#[async_trait]
impl CompletionService for OpenAIProvider {
    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        match self.complete(prompt, model, temperature).await {
            Ok(text) => {
                tracing::info!("Successfully generated response with {}", model);
                Ok(text)
            }
            Err(e) => {
                tracing::error!("Completion API error (Prompt: {}): {}", prompt, e);
                Err(e)
            }
        }
    }
}

fn first_completion_text(response: ChatCompletionResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or(CompletionError::EmptyResponse)
}

// OpenAI-style error bodies carry `{"error": {"message": ...}}`; anything
// else is passed through, truncated.
fn upstream_error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    if let Some(message) = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}
