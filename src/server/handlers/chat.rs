use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::HeaderMap,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::config::ChatBackend;
use crate::error::GatewayError;
use crate::server::AppState;
use crate::server::util::{parse_json_body, preview, read_body};

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub status: &'static str,
    pub response: String,
}

/// Prompt text: string values as-is, anything else as compact JSON.
fn prompt_text(data: &Value) -> Option<String> {
    match data.as_object()?.get("prompt")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub async fn chat(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, GatewayError> {
    let data = parse_json_body(&headers, &read_body(body)?)?;

    let Some(prompt) = prompt_text(&data) else {
        tracing::error!("Missing 'prompt' field in request");
        return Err(GatewayError::bad_request("Missing required field: prompt"));
    };

    let response = match app_state.config.chat.backend {
        ChatBackend::Echo => format!("You said: {}", prompt),
        ChatBackend::Completion => {
            let completion = &app_state.config.completion;
            app_state
                .completion
                .generate(&prompt, &completion.model, completion.temperature)
                .await?
        }
    };

    tracing::info!("Sending response for prompt: {}", preview(&prompt, 50));
    Ok(Json(ChatResponse {
        status: "ok",
        response,
    }))
}
