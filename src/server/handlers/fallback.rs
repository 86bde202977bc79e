use std::any::Any;

use axum::{
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

use super::ENDPOINTS;
use crate::error::GatewayError;

/// Plain `OPTIONS` answer: the route's methods in an `Allow` header.
pub async fn allowed_methods(uri: Uri) -> Response {
    let allow = ENDPOINTS
        .iter()
        .find(|e| e.path == uri.path())
        .map(|e| e.methods.join(", "))
        .unwrap_or_default();
    let mut response = StatusCode::OK.into_response();
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

pub async fn not_found(uri: Uri) -> GatewayError {
    tracing::error!("404 error: {}", uri);
    let path = urlencoding::decode(uri.path())
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| uri.path().to_string());
    GatewayError::NotFound(path)
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> GatewayError {
    tracing::error!("405 error: {} {}", method, uri);
    GatewayError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

/// Turns a handler panic into the generic 500 envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    GatewayError::Internal(detail).into_response()
}
