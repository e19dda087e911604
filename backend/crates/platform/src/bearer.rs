//! Bearer Token Header Handling
//!
//! Protected operations carry an `Authorization: Bearer <token>` header.

use axum::http::{HeaderMap, header};

/// Extract a bearer token from the Authorization header
///
/// Returns None when the header is missing, unreadable, or not a
/// Bearer scheme. The scheme keyword is matched case-insensitively
/// per RFC 9110.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}
