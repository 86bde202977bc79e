use axum::{
    body::{Body, HttpBody, to_bytes},
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{Instrument, Level};
use uuid::Uuid;

use crate::error::GatewayError;
use crate::server::util::redacted_headers;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Bodies above this size are not buffered for debug logging.
const MAX_LOGGED_BODY: usize = 2 * 1024 * 1024;

/// Logs method and path of every request (headers and body at debug level)
/// and tags the request with an `x-request-id`.
pub async fn log_request(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!("request", id = %request_id);
    async move {
        let mut req = req;
        tracing::info!("Received {} request to {}", req.method(), req.uri().path());

        if tracing::enabled!(Level::DEBUG) {
            tracing::debug!("Headers: {:?}", redacted_headers(req.headers()));
            req = match log_body(req).await {
                Ok(req) => req,
                Err(response) => return response,
            };
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            req.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let mut response = next.run(req).await;

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

/// Logs the body when its size is known and small enough to buffer.
/// Anything else passes through untouched for the handler to read.
async fn log_body(req: Request) -> Result<Request, Response> {
    let size = req.body().size_hint().upper();
    match size {
        Some(0) => return Ok(req),
        Some(len) if len <= MAX_LOGGED_BODY as u64 => {}
        Some(len) => {
            tracing::debug!("Request data: {} bytes, not logged", len);
            return Ok(req);
        }
        None => {
            tracing::debug!("Request data: unknown length, not logged");
            return Ok(req);
        }
    }

    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, MAX_LOGGED_BODY).await.map_err(|e| {
        tracing::warn!("Failed to buffer request body: {}", e);
        GatewayError::bad_request("Request body could not be read").into_response()
    })?;
    tracing::debug!("Request data: {}", String::from_utf8_lossy(&bytes));
    Ok(Request::from_parts(parts, Body::from(bytes)))
}
