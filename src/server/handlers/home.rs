use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use super::ENDPOINTS;

#[derive(Debug, Serialize)]
pub struct EndpointOut {
    pub url: &'static str,
    pub methods: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: BTreeMap<&'static str, EndpointOut>,
}

pub async fn home() -> Json<HomeResponse> {
    let endpoints = ENDPOINTS
        .iter()
        .map(|e| {
            (
                e.name,
                EndpointOut {
                    url: e.path,
                    methods: e.methods,
                },
            )
        })
        .collect();

    Json(HomeResponse {
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

#[cfg(test)]
mod tests {
    use crate::server::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn home_lists_registered_routes() {
        let (status, body) = send(app(), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["endpoints"]["chat"]["url"], "/chat");
        assert_eq!(
            body["endpoints"]["chat"]["methods"],
            serde_json::json!(["POST", "OPTIONS"])
        );
        assert_eq!(body["endpoints"]["health_check"]["url"], "/health");
        assert_eq!(
            body["endpoints"]["test"]["methods"],
            serde_json::json!(["GET", "HEAD", "POST", "OPTIONS"])
        );
    }
}
