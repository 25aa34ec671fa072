//! CORS policy built from the configured origin list.

use std::time::Duration;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    request::Parts,
    HeaderName, HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::{CORS_MAX_AGE_SECONDS, FALLBACK_CORS_ORIGINS};

/// Whether `origin` is allowed by one of `allowed`.
///
/// Entries are exact origins or `*.domain` wildcards; a wildcard matches
/// any subdomain over either scheme, but not the bare domain.
pub fn origin_allowed(origin: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|entry| match entry.strip_prefix("*.") {
        Some(domain) => {
            let host = origin
                .strip_prefix("https://")
                .or_else(|| origin.strip_prefix("http://"))
                .unwrap_or(origin);
            host.strip_suffix(domain)
                .is_some_and(|sub| sub.len() > 1 && sub.ends_with('.'))
        }
        None => entry == origin,
    })
}

/// Build the CORS layer.
///
/// An empty origin list falls back to the production domains.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<String> = if origins.is_empty() {
        FALLBACK_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        origins.to_vec()
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| origin_allowed(origin, &origins))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ORIGIN,
            CONTENT_TYPE,
            ACCEPT,
            AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-session-id"),
        ])
        .expose_headers([CONTENT_TYPE, HeaderName::from_static("x-session-id")])
        .allow_credentials(true)
        .max_age(Duration::from_secs(CORS_MAX_AGE_SECONDS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SESSION_ID_HEADER;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_exact_and_wildcard_origins() {
        let allowed = list(&["https://shop.example.com", "*.vercel.app"]);

        assert!(origin_allowed("https://shop.example.com", &allowed));
        assert!(origin_allowed("https://preview-12.vercel.app", &allowed));
        assert!(!origin_allowed("https://vercel.app", &allowed));
        assert!(!origin_allowed("https://evilvercel.app", &allowed));
        assert!(!origin_allowed("https://other.example.com", &allowed));
    }

    #[test]
    fn test_session_header_name_matches_constant() {
        assert_eq!(
            HeaderName::from_static("x-session-id"),
            HeaderName::from_bytes(SESSION_ID_HEADER.as_bytes()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_preflight_allowed_origin() {
        let app = Router::new()
            .route("/api/v1/products", get(|| async { "ok" }))
            .layer(cors_layer(&[]));

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1/products")
                    .header(header::ORIGIN, "https://smrtmart.com")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://smrtmart.com"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn test_unknown_origin_gets_no_allow_header() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&list(&["https://shop.example.com"])));

        let response = app
            .oneshot(
                Request::get("/")
                    .header(header::ORIGIN, "https://attacker.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
