use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::HeaderMap,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::models::{AdaptiveLearningRequest, HabitatAnalysisRequest, Model};
use crate::server::AppState;
use crate::server::util::{parse_json_body, read_body};

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub status: &'static str,
    pub response: String,
    pub model: String,
}

async fn forward(app_state: &AppState, prompt: &str) -> Result<Json<AnalysisResponse>, GatewayError> {
    let completion = &app_state.config.completion;
    let response = app_state
        .completion
        .generate(prompt, &completion.model, completion.temperature)
        .await?;
    Ok(Json(AnalysisResponse {
        status: "ok",
        response,
        model: completion.model.clone(),
    }))
}

pub async fn habitat_analysis(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResponse>, GatewayError> {
    let data = parse_json_body(&headers, &read_body(body)?)?;
    let request = HabitatAnalysisRequest::from_value(data)?;
    let prompt = request
        .prompt()
        .ok_or_else(|| GatewayError::bad_request("Missing required field: region"))?;
    tracing::info!(
        "Habitat analysis for region {}",
        request.region.as_deref().unwrap_or_default()
    );
    forward(&app_state, &prompt).await
}

pub async fn adaptive_learning(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResponse>, GatewayError> {
    let data = parse_json_body(&headers, &read_body(body)?)?;
    let request = AdaptiveLearningRequest::from_value(data)?;
    let prompt = request
        .prompt()
        .ok_or_else(|| GatewayError::bad_request("Missing required field: model_type"))?;
    tracing::info!(
        "Adaptive learning plan for model type {}",
        request.model_type.as_deref().unwrap_or_default()
    );
    forward(&app_state, &prompt).await
}

#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::providers::CompletionError;
    use crate::server::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn habitat_analysis_forwards_prompt() {
        let fake = FakeCompletion::replying("Risk level HIGH.");
        let router = app_with(Settings::default(), fake.clone());
        let body = json!({
            "region": "Lagos",
            "satellite_image_url": "https://img.example.com/lagos.png",
            "environmental_data": {"temperature": 31, "humidity": 0.8}
        })
        .to_string();

        let (status, response) = send(router, json_post("/analysis/habitat", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response,
            json!({"status": "ok", "response": "Risk level HIGH.", "model": "gpt-3.5-turbo"})
        );

        let prompts = fake.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("region Lagos"));
        assert!(prompts[0].contains("\"temperature\":31"));
    }

    #[tokio::test]
    async fn habitat_analysis_requires_region() {
        let fake = FakeCompletion::replying("unused");
        let router = app_with(Settings::default(), fake.clone());
        let (status, body) = send(
            router,
            json_post("/analysis/habitat", r#"{"satellite_image_url": "x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing required field: region");
        assert!(fake.prompts().is_empty());
    }

    #[tokio::test]
    async fn habitat_analysis_rejects_mistyped_fields() {
        let (status, body) = send(
            app(),
            json_post("/analysis/habitat", r#"{"region": "Kano", "environmental_data": 5}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body")
        );
    }

    #[tokio::test]
    async fn adaptive_learning_forwards_prompt() {
        let fake = FakeCompletion::replying("Retrain weekly.");
        let router = app_with(Settings::default(), fake.clone());
        let (status, body) = send(
            router,
            json_post("/analysis/adaptive-learning", r#"{"model_type": "lstm"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Retrain weekly.");
        assert!(fake.prompts()[0].contains("lstm"));
    }

    #[tokio::test]
    async fn adaptive_learning_requires_model_type() {
        let (status, body) = send(app(), json_post("/analysis/adaptive-learning", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing required field: model_type");
    }

    #[tokio::test]
    async fn analysis_surfaces_upstream_errors() {
        let router = app_with(
            Settings::default(),
            FakeCompletion::failing(|| CompletionError::Status {
                status: 500,
                body: "upstream exploded".into(),
            }),
        );
        let (status, body) = send(
            router,
            json_post("/analysis/adaptive-learning", r#"{"model_type": "cnn"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["message"].as_str().unwrap().contains("upstream exploded"));
    }
}
