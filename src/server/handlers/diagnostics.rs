use axum::{Json, extract::State, http::Method};
use serde::Serialize;
use std::sync::Arc;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub method: String,
}

pub async fn health_check(State(app_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Server is running",
        environment: app_state.config.server.environment.clone(),
    })
}

pub async fn test(method: Method) -> Json<TestResponse> {
    Json(TestResponse {
        status: "ok",
        message: "Test endpoint working",
        method: method.to_string(),
    })
}
