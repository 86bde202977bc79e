pub mod handlers;
pub(crate) mod request_logging;
pub(crate) mod util;

use crate::config::Settings;
use crate::error::Result as AppResult;
use crate::providers::{CompletionService, OpenAIProvider};
use axum::{Router, extract::DefaultBodyLimit, middleware};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Settings,
    pub completion: Arc<dyn CompletionService + Send + Sync>,
}

pub fn create_app(config: Settings) -> AppResult<Router> {
    let provider = OpenAIProvider::from_config(&config.completion)?;
    if provider.has_api_key() {
        tracing::info!(
            "Completion API key configured: {}",
            config
                .completion
                .api_key
                .as_deref()
                .map(util::mask_key)
                .unwrap_or_default()
        );
    } else {
        tracing::warn!("OPENAI_KEY environment variable not set");
    }
    tracing::info!(
        "Completion upstream: {} (model {}, /chat backend {:?})",
        provider.chat_completions_url(),
        config.completion.model,
        config.chat.backend
    );

    tracing::info!("Registered routes:");
    for endpoint in handlers::ENDPOINTS {
        tracing::info!("{}: {:?} {}", endpoint.name, endpoint.methods, endpoint.path);
    }

    let app_state = AppState {
        config,
        completion: Arc::new(provider),
    };
    Ok(build_router(app_state))
}

/// Router with all routes, the error fallbacks and the middleware stack.
pub fn build_router(app_state: AppState) -> Router {
    let body_limit = match app_state.config.server.max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };
    let mut app = handlers::routes()
        .with_state(Arc::new(app_state))
        .layer(body_limit);

    use axum::http::{Method, header};
    use tower_http::cors::{Any, CorsLayer};
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_origin(Any);

    app = app
        .layer(CatchPanicLayer::custom(handlers::fallback::handle_panic))
        .layer(middleware::from_fn(request_logging::log_request))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    app
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::providers::CompletionError;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Completion service double that records prompts.
    pub struct FakeCompletion {
        pub reply: std::result::Result<String, fn() -> CompletionError>,
        pub calls: Mutex<Vec<(String, String, f32)>>,
    }

    impl FakeCompletion {
        pub fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn failing(err: fn() -> CompletionError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub fn prompts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(prompt, _, _)| prompt.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CompletionService for FakeCompletion {
        async fn generate(
            &self,
            prompt: &str,
            model: &str,
            temperature: f32,
        ) -> std::result::Result<String, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), model.to_string(), temperature));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    pub fn app_with(config: Settings, completion: Arc<FakeCompletion>) -> Router {
        build_router(AppState { config, completion })
    }

    pub fn app() -> Router {
        app_with(Settings::default(), FakeCompletion::replying("unused"))
    }

    pub fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}
