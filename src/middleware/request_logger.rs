use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::constants::headers::REQUEST_ID;

/// Id assigned to each request, available to handlers as an extension and
/// echoed in the `X-Request-Id` response header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Request logging middleware that logs all incoming requests and responses
///
/// Everything logged while the request is handled, including error
/// responses, runs inside a span carrying the same `request_id`.
pub async fn request_logger_middleware(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    debug!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    let span = info_span!("request", request_id = %request_id);
    let response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration = start.elapsed();

    match status {
        StatusCode::OK => {
            info!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = %status,
                duration_ms = %duration.as_millis(),
                "Request completed successfully"
            );
        }
        StatusCode::UNAUTHORIZED => {
            warn!(
                request_id = %request_id,
                uri = %uri,
                status = %status,
                "Webhook signature rejected"
            );
        }
        status if status.is_client_error() => {
            warn!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = %status,
                duration_ms = %duration.as_millis(),
                "Request failed with client error"
            );
        }
        status if status.is_server_error() => {
            error!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = %status,
                duration_ms = %duration.as_millis(),
                "Request failed with server error"
            );
        }
        _ => {
            debug!(
                request_id = %request_id,
                method = %method,
                uri = %uri,
                status = %status,
                duration_ms = %duration.as_millis(),
                "Request completed"
            );
        }
    }

    // Add request ID to response headers for tracing
    let (mut parts, body) = response.into_parts();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(REQUEST_ID, value);
    }

    Response::from_parts(parts, body)
}
