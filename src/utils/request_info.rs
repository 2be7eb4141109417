// Helpers for pulling webhook metadata out of request headers

use axum::http::HeaderMap;

/// Extract the signature header value.
///
/// A missing or non-ASCII header yields an empty string, which never verifies.
pub fn extract_signature(headers: &HeaderMap, header_name: &str) -> String {
    headers
        .get(header_name)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Extract the sender address for log context.
/// Checks X-Forwarded-For, X-Real-IP headers for proxied requests
pub fn extract_source_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded_for.to_str() {
            // X-Forwarded-For can contain multiple IPs, take the first one
            let ip = value.split(',').next().unwrap_or("").trim();
            if !ip.is_empty() {
                return Some(ip.to_string());
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}
