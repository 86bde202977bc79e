use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::server::AppState;

mod analysis;
mod chat;
mod diagnostics;
pub(crate) mod fallback;
mod home;

/// A registered route, as reported by `GET /`.
#[derive(Debug)]
pub struct Endpoint {
    pub name: &'static str,
    pub path: &'static str,
    pub methods: &'static [&'static str],
}

/// HEAD comes with every GET route; OPTIONS is answered for every path.
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint { name: "home", path: "/", methods: &["GET", "HEAD", "OPTIONS"] },
    Endpoint { name: "health_check", path: "/health", methods: &["GET", "HEAD", "OPTIONS"] },
    Endpoint { name: "test", path: "/test", methods: &["GET", "HEAD", "POST", "OPTIONS"] },
    Endpoint { name: "chat", path: "/chat", methods: &["POST", "OPTIONS"] },
    Endpoint {
        name: "habitat_analysis",
        path: "/analysis/habitat",
        methods: &["POST", "OPTIONS"],
    },
    Endpoint {
        name: "adaptive_learning",
        path: "/analysis/adaptive-learning",
        methods: &["POST", "OPTIONS"],
    },
];

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home::home).options(fallback::allowed_methods))
        .route(
            "/health",
            get(diagnostics::health_check).options(fallback::allowed_methods),
        )
        .route(
            "/test",
            get(diagnostics::test)
                .post(diagnostics::test)
                .options(fallback::allowed_methods),
        )
        .route("/chat", post(chat::chat).options(fallback::allowed_methods))
        .route(
            "/analysis/habitat",
            post(analysis::habitat_analysis).options(fallback::allowed_methods),
        )
        .route(
            "/analysis/adaptive-learning",
            post(analysis::adaptive_learning).options(fallback::allowed_methods),
        )
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::method_not_allowed)
}
