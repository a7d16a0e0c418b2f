//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{AnalyticsApi, AuthApi, ContactApi, ProjectsApi, SkillsApi};
use crate::error::{ApiError, ApiResult};
use crate::storage::{FileTokenStore, MemoryTokenStore, TokenStore};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Query string parameters
pub type Query<'a> = &'a [(&'a str, String)];

/// Portfolio API client
///
/// One instance is built at startup and handed to every caller; clones share
/// the same HTTP connection pool and the same session token.
///
/// This client wraps `reqwest` and adds:
/// - Bearer token attachment from a persisted session
/// - Normalized errors ([`ApiError`]) for every failure
/// - Request correlation IDs for tracing
#[derive(Clone)]
pub struct ApiService {
    inner: Client,
    config: Arc<ClientConfig>,
    token: Arc<RwLock<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for ApiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiService")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl ApiService {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    ///
    /// The token is persisted in `config.token_dir`, or the platform config
    /// directory when unset. If neither is available the session lives in
    /// memory only.
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        let store: Arc<dyn TokenStore> = match config.token_dir {
            Some(ref dir) => Arc::new(FileTokenStore::new(dir)),
            None => match FileTokenStore::default_location() {
                Some(store) => Arc::new(store),
                None => {
                    warn!("No config directory available, session token will not persist");
                    Arc::new(MemoryTokenStore::new())
                }
            },
        };
        Self::with_store(config, store)
    }

    /// Create a new client with an explicit token store
    pub fn with_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("portfolio-api-client/", env!("CARGO_PKG_VERSION"))),
        );

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;

        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted session token");
                None
            }
        };

        Ok(Self {
            inner,
            config: Arc::new(config),
            token: Arc::new(RwLock::new(token)),
            store,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Current session token, if any
    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether requests are currently sent with a bearer token
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Set or clear the session token.
    ///
    /// The persisted copy and the in-memory value change together: the write
    /// lock is held while the store is updated, and if persisting fails the
    /// in-memory token is left untouched. An empty token clears the session.
    pub fn set_auth_token(&self, token: Option<&str>) -> ApiResult<()> {
        let token = token.filter(|t| !t.is_empty());
        let mut slot = self.token.write().unwrap_or_else(PoisonError::into_inner);

        match token {
            Some(value) => self
                .store
                .save(value)
                .map_err(|e| ApiError::storage(format!("Failed to persist session token: {e}")))?,
            None => self
                .store
                .clear()
                .map_err(|e| ApiError::storage(format!("Failed to remove session token: {e}")))?,
        }

        *slot = token.map(str::to_owned);
        debug!(authenticated = slot.is_some(), "Session token updated");
        Ok(())
    }

    /// Drop the session token
    pub fn logout(&self) -> ApiResult<()> {
        self.set_auth_token(None)?;
        info!("Logged out");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access authentication endpoints
    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access contact form endpoints
    #[must_use]
    pub fn contact(&self) -> ContactApi {
        ContactApi::new(self.clone())
    }

    /// Access project endpoints
    #[must_use]
    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(self.clone())
    }

    /// Access skill endpoints
    #[must_use]
    pub fn skills(&self) -> SkillsApi {
        SkillsApi::new(self.clone())
    }

    /// Access analytics endpoints
    #[must_use]
    pub fn analytics(&self) -> AnalyticsApi {
        AnalyticsApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::GET, path, &[], Option::<&()>::None)
            .await
    }

    /// Perform a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> ApiResult<T> {
        self.execute(Method::GET, path, query, Option::<&()>::None)
            .await
    }

    /// Perform a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    /// Perform a PUT request with a JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.execute(Method::PUT, path, &[], Some(body)).await
    }

    /// Perform a PATCH request without a body
    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::PATCH, path, &[], Option::<&()>::None)
            .await
    }

    /// Perform a DELETE request, discarding the response body
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute::<IgnoredAny, ()>(Method::DELETE, path, &[], None)
            .await
            .map(|_| ())
    }

    /// Perform an arbitrary request against the API
    pub async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        self.execute(method, path, &[], body).await
    }

    /// Build the absolute URL for an API path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Execute a single request; no retries.
    ///
    /// The bearer token is read once here, so a token change while the request
    /// is in flight does not affect it.
    #[instrument(skip_all, fields(method = %method, path = %path, request_id))]
    async fn execute<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<&B>,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let url = self.url_for(path);
        let mut request = self
            .inner
            .request(method, &url)
            .header(X_REQUEST_ID, &request_id);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(token) = self.auth_token() {
            request = request.bearer_auth(token);
        }

        if let Some(b) = body {
            request = request.json(b);
        }

        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = ApiError::from_transport(&e);
                debug!(
                    url = %url,
                    elapsed_ms = start.elapsed().as_millis(),
                    error = %e,
                    kind = %error.kind(),
                    "Request failed"
                );
                return Err(error);
            }
        };

        debug!(
            url = %url,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            "Response received"
        );

        Self::handle_response(response).await
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            // An empty body reads as JSON null so unit-like targets still decode
            let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
                b"null"
            } else {
                &bytes
            };
            serde_json::from_slice(payload)
                .map_err(|e| ApiError::request(format!("Unexpected response from server: {e}")))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_response(status.as_u16(), &body))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{ErrorKind, NETWORK_ERROR_MESSAGE};
    use serde_json::json;
    use std::collections::HashMap;
    use std::io;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Client pointed at a mock server with an in-memory session
    pub(crate) fn test_client(server: &MockServer) -> ApiService {
        let config = ClientConfig::new(format!("{}/api", server.uri()));
        ApiService::with_store(config, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    /// Client pointed at a port nothing listens on
    pub(crate) fn unreachable_client() -> ApiService {
        let config = ClientConfig::new("http://127.0.0.1:1/api")
            .with_timeout(Duration::from_millis(500));
        ApiService::with_store(config, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    async fn authorization_headers(server: &MockServer) -> Vec<Option<String>> {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                request
                    .headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }

    #[test]
    fn test_url_for() {
        let config = ClientConfig::new("http://localhost:5000/api/");
        let client = ApiService::with_store(config, Arc::new(MemoryTokenStore::new())).unwrap();

        assert_eq!(client.url_for("projects"), "http://localhost:5000/api/projects");
        assert_eq!(client.url_for("/skills/1"), "http://localhost:5000/api/skills/1");
    }

    #[test]
    fn test_client_creation_rejects_invalid_config() {
        let config = ClientConfig::new("not a url");
        let err = ApiService::with_store(config, Arc::new(MemoryTokenStore::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.status, 0);
    }

    #[test]
    fn test_token_loaded_from_store() {
        let store = Arc::new(MemoryTokenStore::with_token("persisted"));
        let client = ApiService::with_store(ClientConfig::default(), store).unwrap();
        assert_eq!(client.auth_token().as_deref(), Some("persisted"));
    }

    #[test]
    fn test_set_auth_token_updates_store_and_memory() {
        let store = Arc::new(MemoryTokenStore::new());
        let client = ApiService::with_store(ClientConfig::default(), store.clone()).unwrap();

        client.set_auth_token(Some("abc")).unwrap();
        assert_eq!(client.auth_token().as_deref(), Some("abc"));
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        client.set_auth_token(Some("def")).unwrap();
        assert_eq!(client.auth_token().as_deref(), Some("def"));
        assert_eq!(store.load().unwrap().as_deref(), Some("def"));
    }

    /// Store whose writes always fail
    #[derive(Debug)]
    struct ReadOnlyStore;

    impl TokenStore for ReadOnlyStore {
        fn load(&self) -> io::Result<Option<String>> {
            Ok(Some("old".to_string()))
        }

        fn save(&self, _token: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn clear(&self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn test_failed_persist_keeps_previous_token() {
        let client = ApiService::with_store(ClientConfig::default(), Arc::new(ReadOnlyStore)).unwrap();
        assert_eq!(client.auth_token().as_deref(), Some("old"));

        let err = client.set_auth_token(Some("new")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.status, 0);
        assert_eq!(client.auth_token().as_deref(), Some("old"));

        let err = client.logout().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(client.auth_token().as_deref(), Some("old"));
    }

    #[test]
    fn test_clearing_token_twice_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileTokenStore::new(dir.path()));
        let client = ApiService::with_store(ClientConfig::default(), store.clone()).unwrap();
        client.set_auth_token(Some("abc")).unwrap();

        client.set_auth_token(None).unwrap();
        client.set_auth_token(None).unwrap();

        assert!(client.auth_token().is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_empty_token_clears_session() {
        let client = ApiService::with_store(
            ClientConfig::default(),
            Arc::new(MemoryTokenStore::with_token("abc")),
        )
        .unwrap();

        client.set_auth_token(Some("")).unwrap();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_clones_share_session() {
        let client = ApiService::with_store(
            ClientConfig::default(),
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap();
        let other = client.clone();

        client.set_auth_token(Some("shared")).unwrap();
        assert_eq!(other.auth_token().as_deref(), Some("shared"));

        other.logout().unwrap();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let client = ApiService::with_store(
            ClientConfig::default(),
            Arc::new(MemoryTokenStore::with_token("secret-token")),
        )
        .unwrap();

        let debug = format!("{client:?}");
        assert!(debug.contains("authenticated: true"));
        assert!(!debug.contains("secret-token"));
    }

    #[tokio::test]
    async fn test_bearer_header_follows_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"projects": []})))
            .mount(&server)
            .await;

        let client = test_client(&server);

        let _: serde_json::Value = client.get("projects").await.unwrap();
        client.set_auth_token(Some("tok-123")).unwrap();
        let _: serde_json::Value = client.get("projects").await.unwrap();
        client.logout().unwrap();
        let _: serde_json::Value = client.get("projects").await.unwrap();

        assert_eq!(
            authorization_headers(&server).await,
            vec![None, Some("Bearer tok-123".to_string()), None]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_token_change_does_not_affect_request_in_flight() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"projects": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.set_auth_token(Some("a")).unwrap();

        let in_flight = {
            let client = client.clone();
            tokio::spawn(async move { client.get::<serde_json::Value>("projects").await })
        };

        // wait until the server has the request, then swap the token
        for _ in 0..100 {
            if !server.received_requests().await.unwrap_or_default().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        client.set_auth_token(Some("b")).unwrap();

        in_flight.await.unwrap().unwrap();
        assert_eq!(
            authorization_headers(&server).await,
            vec![Some("Bearer a".to_string())]
        );
        assert_eq!(client.auth_token().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_json_content_type_and_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/echo"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"hello": "world"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response: serde_json::Value = client
            .post("echo", &json!({"hello": "world"}))
            .await
            .unwrap();
        assert_eq!(response["ok"], true);

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_server_error_is_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/contact"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "error": "Invalid email",
                "errors": {"email": "bad format"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .post::<serde_json::Value, _>("contact", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.status, 422);
        assert_eq!(err.message, "Invalid email");
        assert_eq!(err.field_error("email"), Some("bad format"));
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = unreachable_client();
        let err = client.get::<serde_json::Value>("projects").await.unwrap_err();

        assert_eq!(err.status, 0);
        assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
        assert!(err.field_errors.is_none());
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::new(format!("{}/api", server.uri()))
            .with_timeout(Duration::from_millis(100));
        let client = ApiService::with_store(config, Arc::new(MemoryTokenStore::new())).unwrap();

        let err = client.get::<serde_json::Value>("slow").await.unwrap_err();
        assert!(err.is_network_error());
        assert_eq!(err.message, NETWORK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_unserializable_body_is_request_error() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        // JSON object keys must be strings
        let mut body = HashMap::new();
        body.insert((1, 2), "value");

        let err = client
            .request::<serde_json::Value, _>(Method::POST, "projects", Some(&body))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.status, 0);
        assert!(!err.message.is_empty());
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get::<HashMap<String, String>>("projects/1").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Request);
        assert!(err.message.starts_with("Unexpected response from server"));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/projects/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete("projects/1").await.unwrap();
    }
}
