//! HTTP caching middleware for calendar responses.
//!
//! - `Cache-Control` tells browsers how long a month view stays fresh
//! - `ETag` / `If-None-Match` turns unchanged months into `304 Not Modified`
//! - `X-Cache` reports whether the month came from the in-process cache
//!
//! # Example
//!
//! ```ignore
//! use campusdesk_cache::middleware::{CacheControlConfig, cache_control, etag_middleware};
//! use axum::{Router, middleware};
//!
//! let app = Router::new()
//!     .route("/api/calendar/{month}", get(handler))
//!     .layer(cache_control(CacheControlConfig::private(60).with_must_revalidate()))
//!     .layer(middleware::from_fn(etag_middleware));
//! ```

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderName, HeaderValue, Method, StatusCode,
        header::{CACHE_CONTROL, ETAG, IF_NONE_MATCH},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use sha2::{Digest, Sha256};
use tower_http::set_header::{MakeHeaderValue, SetResponseHeaderLayer};

/// Response header reporting how a month snapshot was served.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Value of the [`X_CACHE`] header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the in-process cache without I/O
    Hit,
    /// Fetched from the feed and stored
    Miss,
    /// Feed failed; a Sundays-only month was served and not stored
    Fallback,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::Fallback => "FALLBACK",
        }
    }

    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (X_CACHE, HeaderValue::from_static(self.as_str()))
    }
}

/// Configuration for the Cache-Control header of successful responses.
///
/// Responses are only cacheable by the requesting browser (`private`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheControlConfig {
    pub max_age: u64,
    pub must_revalidate: bool,
}

impl CacheControlConfig {
    pub fn private(max_age: u64) -> Self {
        Self {
            max_age,
            must_revalidate: false,
        }
    }

    pub fn with_must_revalidate(mut self) -> Self {
        self.must_revalidate = true;
        self
    }

    /// Build the Cache-Control header value.
    pub fn to_header_value(&self) -> HeaderValue {
        let mut directives = vec!["private".to_string(), format!("max-age={}", self.max_age)];

        if self.must_revalidate {
            directives.push("must-revalidate".to_string());
        }

        HeaderValue::from_str(&directives.join(", "))
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
    }
}

#[derive(Clone)]
pub struct CacheControlMakeHeader(HeaderValue);

impl<B> MakeHeaderValue<Response<B>> for CacheControlMakeHeader {
    fn make_header_value(&mut self, message: &Response<B>) -> Option<HeaderValue> {
        // Errors and fallbacks must not be reused by the browser.
        let is_fallback = message
            .headers()
            .get(X_CACHE)
            .is_some_and(|v| v.as_bytes() == CacheStatus::Fallback.as_str().as_bytes());

        if message.status().is_success() && !is_fallback {
            Some(self.0.clone())
        } else {
            Some(HeaderValue::from_static("no-store"))
        }
    }
}

/// Creates a Cache-Control layer with the given configuration.
pub fn cache_control(
    config: CacheControlConfig,
) -> SetResponseHeaderLayer<CacheControlMakeHeader> {
    SetResponseHeaderLayer::if_not_present(
        CACHE_CONTROL,
        CacheControlMakeHeader(config.to_header_value()),
    )
}

/// Generates a strong ETag from response body bytes.
fn generate_etag(body: &[u8]) -> String {
    let hash = Sha256::digest(body);
    format!("\"{}\"", hex::encode(&hash[..16]))
}

/// Weak ETag comparison (ignores the W/ prefix).
fn etags_match(client_etag: &str, server_etag: &str) -> bool {
    let client = client_etag.trim().trim_start_matches("W/");
    let server = server_etag.trim().trim_start_matches("W/");
    client == "*" || client == server
}

fn if_none_match_hits(header: &str, etag: &str) -> bool {
    header.split(',').any(|tag| etags_match(tag, etag))
}

/// `304 Not Modified` carrying the validators of the full response.
fn not_modified(etag: HeaderValue, cache_control: Option<HeaderValue>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    response.headers_mut().insert(ETAG, etag);
    if let Some(value) = cache_control {
        response.headers_mut().insert(CACHE_CONTROL, value);
    }
    response
}

/// ETag middleware for conditional GET requests.
///
/// Hashes the buffered body of successful GET responses into an `ETag` and
/// answers `304 Not Modified` when the client's `If-None-Match` matches.
/// Calendar month views are small, so buffering is acceptable.
pub async fn etag_middleware(request: Request, next: Next) -> Response {
    let is_get = request.method() == Method::GET;
    let if_none_match = request
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let response = next.run(request).await;

    if !is_get || !response.status().is_success() {
        return response;
    }

    if let Some(existing) = response.headers().get(ETAG).cloned() {
        let matches = match (&if_none_match, existing.to_str()) {
            (Some(client), Ok(server)) => if_none_match_hits(client, server),
            _ => false,
        };
        if matches {
            return not_modified(existing, response.headers().get(CACHE_CONTROL).cloned());
        }
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return (parts, Body::empty()).into_response(),
    };

    let etag = generate_etag(&bytes);
    let Ok(etag_value) = HeaderValue::from_str(&etag) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    if if_none_match
        .as_deref()
        .is_some_and(|client| if_none_match_hits(client, &etag))
    {
        return not_modified(etag_value, parts.headers.get(CACHE_CONTROL).cloned());
    }

    parts.headers.insert(ETAG, etag_value);
    Response::from_parts(parts, Body::from(bytes))
}
