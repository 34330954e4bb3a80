use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::core::app_config::CorsConfig;

/// Build the CORS layer from config.
///
/// A `"*"` entry means "any". Browsers reject a literal wildcard together
/// with credentials, so in that case the request's own value is mirrored.
pub fn build_cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let wildcard = |list: &[String]| list.iter().any(|s| s.trim() == "*");
    let creds = cfg.allow_credentials;

    let origin = if wildcard(&cfg.allow_origins) {
        if creds {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        AllowOrigin::list(parse_all(&cfg.allow_origins, "origin", |s| {
            HeaderValue::from_str(s).ok()
        }))
    };

    let methods = if wildcard(&cfg.allow_methods) {
        if creds {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        AllowMethods::list(parse_all(&cfg.allow_methods, "method", |s| {
            Method::from_bytes(s.to_uppercase().as_bytes()).ok()
        }))
    };

    let headers = if wildcard(&cfg.allow_headers) {
        if creds {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        AllowHeaders::list(parse_all(&cfg.allow_headers, "header", |s| {
            HeaderName::from_bytes(s.as_bytes()).ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(creds)
}

fn parse_all<T>(raw: &[String], what: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    raw.iter()
        .filter_map(|s| {
            let parsed = parse(s.trim());
            if parsed.is_none() {
                warn!(value = %s, kind = what, "cors: ignoring invalid entry");
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use tower::ServiceExt;

    use super::*;

    fn cfg(origins: &[&str], credentials: bool) -> CorsConfig {
        CorsConfig {
            allow_origins: origins.iter().map(|s| s.to_string()).collect(),
            allow_credentials: credentials,
            ..CorsConfig::default()
        }
    }

    /// Preflight `POST /api/chat` from `origin`; returns the CORS response headers.
    async fn preflight(cfg: &CorsConfig, origin: &str) -> (Option<String>, Option<String>) {
        let app = Router::new()
            .route("/api/chat", post(|| async { "ok" }))
            .layer(build_cors_layer(cfg));
        let resp = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/chat")
                    .header(header::ORIGIN, origin)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let get = |name: header::HeaderName| {
            resp.headers()
                .get(name)
                .map(|v: &HeaderValue| v.to_str().unwrap().to_string())
        };
        (
            get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        )
    }

    #[tokio::test]
    async fn default_config_allows_any_origin() {
        let (origin, creds) = preflight(&CorsConfig::default(), "http://app.local").await;
        assert_eq!(origin.as_deref(), Some("*"));
        assert_eq!(creds, None);
    }

    #[tokio::test]
    async fn explicit_list_only_echoes_listed_origins() {
        let cfg = cfg(&["http://localhost:3000", "bad\u{7f}origin"], false);
        let (origin, _) = preflight(&cfg, "http://localhost:3000").await;
        assert_eq!(origin.as_deref(), Some("http://localhost:3000"));

        let (origin, _) = preflight(&cfg, "http://evil.example").await;
        assert_eq!(origin, None);
    }

    #[tokio::test]
    async fn wildcard_with_credentials_mirrors_the_origin() {
        let (origin, creds) = preflight(&cfg(&["*"], true), "http://app.local").await;
        assert_eq!(origin.as_deref(), Some("http://app.local"));
        assert_eq!(creds.as_deref(), Some("true"));
    }
}
