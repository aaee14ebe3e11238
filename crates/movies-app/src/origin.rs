use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::{error::ApiError, state::AppState};

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:8080",
    "http://localhost:1234",
    "https://movies.com",
    "https://midu.dev",
];

/// Origins permitted to make cross-origin requests, compared exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowedOrigins(origins.into_iter().map(Into::into).collect())
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.0.iter().any(|o| o == origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for AllowedOrigins {
    fn default() -> Self {
        AllowedOrigins::new(DEFAULT_ALLOWED_ORIGINS)
    }
}

/// Middleware rejecting requests whose `Origin` is not on the allow-list.
///
/// Requests without an `Origin` header (non-browser clients) pass through.
pub async fn origin_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| state.config().allowed_origins.is_allowed(o))
            .unwrap_or(false);
        if !allowed {
            let origin = String::from_utf8_lossy(origin.as_bytes()).into_owned();
            warn!("Rejected request from origin {origin}");
            return Err(ApiError::OriginNotAllowed(origin));
        }
    }
    Ok(next.run(request).await)
}

/// CORS response headers and preflight handling for the allowed origins.
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, middleware::from_fn_with_state, routing::get, Router};
    use http::{Request, StatusCode};
    use movies_dal::MovieStore;
    use tower::ServiceExt as _;
    use tracing_test::traced_test;

    use super::*;
    use crate::state::AppConfig;

    fn app() -> Router {
        let state = AppState::new(AppConfig::default(), MovieStore::default());
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&state.config().allowed_origins))
            .layer(from_fn_with_state(state.clone(), origin_guard))
            .with_state(state)
    }

    fn request(origin: Option<&str>, method: Method) -> Request<Body> {
        let mut builder = Request::builder().uri("/").method(method);
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let origins = AllowedOrigins::default();
        assert!(origins.is_allowed("https://movies.com"));
        assert!(origins.is_allowed("http://localhost:1234"));
        assert!(!origins.is_allowed("https://movies.com/"));
        assert!(!origins.is_allowed("HTTPS://MOVIES.COM"));
        assert!(!origins.is_allowed("http://localhost:3000"));
        assert!(!origins.is_allowed(""));
    }

    #[tokio::test]
    async fn test_no_origin_passes() {
        let response = app().oneshot(request(None, Method::GET)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_allowed_origin_gets_cors_headers() {
        let response = app()
            .oneshot(request(Some("https://midu.dev"), Method::GET))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://midu.dev"
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_foreign_origin_rejected() {
        let response = app()
            .oneshot(request(Some("https://evil.example"), Method::GET))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "Not allowed by CORS");
        assert!(logs_contain("Rejected request from origin https://evil.example"));
    }

    #[tokio::test]
    async fn test_preflight() {
        let preflight = Request::builder()
            .uri("/")
            .method(Method::OPTIONS)
            .header(header::ORIGIN, "http://localhost:8080")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(preflight).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8080"
        );

        let response = app()
            .oneshot(request(Some("http://localhost:9999"), Method::OPTIONS))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
