//! API client wrapper for authenticated requests.
//!
//! Every request resolves the current token (in-memory session first, then
//! the persisted copy, since the session may not be hydrated on first load)
//! and sends it as `Authorization: Bearer <token>`. A 401 answer triggers a
//! redirect to the login route and is still returned to the caller.

use std::sync::Arc;

use anyhow::Result;
use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::{PersistenceBridge, SessionHandle};
use crate::config::Config;
use crate::navigation::Navigator;

/// Method, body, headers, and query for one request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: header::HeaderMap,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn header(mut self, name: header::HeaderName, value: header::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Authenticated request wrapper.
/// Clone is cheap - reqwest::Client and the session handle are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    login_route: String,
    session: SessionHandle,
    bridge: Arc<PersistenceBridge>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &Config,
        session: SessionHandle,
        bridge: Arc<PersistenceBridge>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            login_route: config.login_route.clone(),
            session,
            bridge,
            navigator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token to send: in-memory session first, then the persisted copy
    pub fn current_token(&self) -> Option<String> {
        self.session.token().or_else(|| self.bridge.read())
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Send one request and decode the JSON response.
    ///
    /// An empty success body decodes as JSON `null`, so `()` and `Option<T>`
    /// work for endpoints without content.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let RequestOptions {
            method,
            body,
            mut headers,
            query,
        } = options;

        if let Some(token) = self.current_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid token: {}", e)))?;
            value.set_sensitive(true);
            // Session token wins over any caller-supplied Authorization
            headers.insert(header::AUTHORIZATION, value);
        }
        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(ref body) = body {
            builder = builder.json(body);
        }

        debug!(%method, path, "Sending request");
        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "Request failed");
            ApiError::NetworkError(e)
        })?;

        let status = response.status();
        if status.is_success() {
            let text = response.text().await?;
            let text = if text.trim().is_empty() { "null" } else { text.as_str() };
            return serde_json::from_str(text).map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
            });
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            warn!(%method, path, "Unauthorized, redirecting to login");
            self.navigator.navigate_to(&self.login_route);
        } else {
            warn!(%method, path, status = status.as_u16(), "API error");
        }
        Err(ApiError::from_status(status, &body))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(path, RequestOptions::get()).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(path, RequestOptions::new(Method::POST).json(body)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenSlot;
    use crate::models::User;
    use crate::navigation::HistoryNavigator;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    struct Fixture {
        api: ApiClient,
        session: SessionHandle,
        bridge: Arc<PersistenceBridge>,
        navigator: Arc<HistoryNavigator>,
    }

    fn fixture(base_url: &str) -> Fixture {
        let config = Config {
            api_base: base_url.to_string(),
            ..Config::default()
        };
        let session = SessionHandle::new();
        let bridge = Arc::new(PersistenceBridge::new(Box::new(MemoryTokenSlot::new())));
        let navigator = Arc::new(HistoryNavigator::new());
        let api = ApiClient::new(&config, session.clone(), bridge.clone(), navigator.clone())
            .unwrap();
        Fixture {
            api,
            session,
            bridge,
            navigator,
        }
    }

    #[tokio::test]
    async fn test_attaches_session_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/items")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[1, 2, 3]"#)
            .create_async()
            .await;

        let f = fixture(&server.url());
        f.session.establish("abc".to_string(), User::default());

        let items: Vec<i32> = f.api.get("/items").await.unwrap();
        m.assert_async().await;
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_falls_back_to_persisted_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/items")
            .match_header("authorization", "Bearer from-disk")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let f = fixture(&server.url());
        f.bridge.write("from-disk", Duration::from_secs(60)).unwrap();

        let items: Vec<i32> = f.api.get("items").await.unwrap();
        m.assert_async().await;
        assert!(items.is_empty());
        // Reading the persisted copy does not hydrate the session
        assert_eq!(f.session.token(), None);
    }

    #[tokio::test]
    async fn test_session_token_replaces_caller_authorization() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/items")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let f = fixture(&server.url());
        f.session.establish("abc".to_string(), User::default());

        let options = RequestOptions::get().header(
            header::AUTHORIZATION,
            header::HeaderValue::from_static("Basic Zm9v"),
        );
        let items: Vec<i32> = f.api.request("/items", options).await.unwrap();
        m.assert_async().await;
        assert!(items.is_empty());
    }

    #[test]
    fn test_base_url_drops_trailing_slash() {
        let f = fixture("http://localhost:3001/api/");
        assert_eq!(f.api.base_url(), "http://localhost:3001/api");
        assert_eq!(f.api.url("/auth/me"), "http://localhost:3001/api/auth/me");
        assert_eq!(f.api.url("https://other.test/x"), "https://other.test/x");
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/public")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let f = fixture(&server.url());
        let body: serde_json::Value = f.api.get("/public").await.unwrap();
        m.assert_async().await;
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_unauthorized_redirects_and_still_errors() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/private")
            .with_status(401)
            .with_body("expired")
            .expect(1)
            .create_async()
            .await;

        let f = fixture(&server.url());
        f.session.establish("old".to_string(), User::default());

        let result: Result<serde_json::Value, _> = f.api.get("/private").await;
        m.assert_async().await;
        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert_eq!(f.navigator.history(), vec!["/login"]);
        // The wrapper redirects but leaves the session to the credential store
        assert_eq!(f.session.token().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_server_error_is_surfaced_once_without_redirect() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/orders")
            .with_status(503)
            .with_body("maintenance")
            .expect(1)
            .create_async()
            .await;

        let f = fixture(&server.url());
        let result: Result<serde_json::Value, _> =
            f.api.post("/orders", &serde_json::json!({"qty": 1})).await;
        m.assert_async().await;
        match result {
            Err(ApiError::ServerError { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(f.navigator.count(), 0);
    }

    #[tokio::test]
    async fn test_sends_body_query_and_headers() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/items/7")
            .match_query(Matcher::UrlEncoded("notify".into(), "false".into()))
            .match_header("x-request-id", "r-1")
            .match_body(Matcher::Json(serde_json::json!({"name": "widget"})))
            .with_status(204)
            .create_async()
            .await;

        let f = fixture(&server.url());
        let options = RequestOptions::new(Method::PUT)
            .json(&serde_json::json!({"name": "widget"}))
            .unwrap()
            .query("notify", "false")
            .header(
                header::HeaderName::from_static("x-request-id"),
                header::HeaderValue::from_static("r-1"),
            );

        f.api.request::<()>("/items/7", options).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_invalid_json_is_invalid_response() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/items")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let f = fixture(&server.url());
        let result: Result<Vec<i32>, _> = f.api.get("/items").await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let f = fixture(&format!("http://127.0.0.1:{}", port));
        let result: Result<serde_json::Value, _> = f.api.get("/items").await;
        assert!(matches!(result, Err(ApiError::NetworkError(_))));
        assert_eq!(f.navigator.count(), 0);
    }
}
