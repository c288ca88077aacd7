// API client module: the resource gateway every manager goes through.
// It owns the reqwest client, the base URL and the bearer token, and turns
// HTTP outcomes into `ClientError`s.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, User};

/// Async API client holding a reqwest client, the base URL of the API and
/// an optional bearer token for authenticated calls.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(ApiClient {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Client configured from `FIT4EVER_API_URL`, see `ClientConfig::from_env`.
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store a token for subsequent authenticated requests.
    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn headers(&self, authenticated: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if authenticated {
            if let Some(t) = &self.token {
                let val = HeaderValue::from_str(&format!("Bearer {}", t))
                    .map_err(|_| ClientError::auth("token contains invalid header characters"))?;
                headers.insert(AUTHORIZATION, val);
            }
        }
        Ok(headers)
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send one request and decode the JSON payload.
    ///
    /// The body is only attached for non-GET methods. A 204 or empty body
    /// yields `Ok(None)`. Non-2xx responses fail with the response text as
    /// detail, or `HTTP <status>` when the server sent nothing; a 401 or 403
    /// on an authenticated call is reported as `ClientError::Auth`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Option<T>> {
        self.execute(method, path, &[], body, true).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
        authenticated: bool,
    ) -> Result<Option<T>> {
        let url = self.url(path, query)?;
        debug!(%method, %url, "api request");

        let mut req = self
            .client
            .request(method.clone(), url.as_str())
            .headers(self.headers(authenticated)?);
        if let Some(body) = body.filter(|_| method != Method::GET) {
            req = req.body(serde_json::to_vec(&body)?);
        }

        let res = req.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "api request failed");
            ClientError::Network(e)
        })?;

        let status = res.status();
        if !status.is_success() {
            let txt = res.text().await.unwrap_or_default();
            let detail = if txt.trim().is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                txt
            };
            warn!(%method, %url, status = status.as_u16(), "api returned an error");
            let rejected = matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
            if rejected && authenticated && self.has_token() {
                return Err(ClientError::Auth(detail));
            }
            return Err(ClientError::Http { status, detail });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = res.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        expect_body(self.execute(Method::GET, path, &[], None, true).await?)
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        expect_body(self.execute(Method::GET, path, query, None, true).await?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        expect_body(self.execute(Method::POST, path, &[], Some(body), true).await?)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        expect_body(self.execute(Method::PUT, path, &[], Some(body), true).await?)
    }

    /// DELETE accepts both 204 and a 200 with a body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute::<Value>(Method::DELETE, path, &[], None, true)
            .await?;
        Ok(())
    }

    /// Perform login. Any rejection is reported as an authentication error.
    pub async fn login(&self, req: &LoginRequest) -> Result<TokenResponse> {
        self.authenticate("/auth/login", serde_json::to_value(req)?).await
    }

    /// Register a new account; the backend answers with a token right away.
    pub async fn register(&self, req: &RegisterRequest) -> Result<TokenResponse> {
        self.authenticate("/auth/register", serde_json::to_value(req)?).await
    }

    async fn authenticate(&self, path: &str, body: Value) -> Result<TokenResponse> {
        match self.execute(Method::POST, path, &[], Some(body), false).await {
            Ok(resp) => expect_body(resp),
            Err(ClientError::Http { detail, .. }) => Err(ClientError::Auth(detail)),
            Err(e) => Err(e),
        }
    }

    /// Fetch the profile of the token's owner.
    pub async fn me(&self) -> Result<User> {
        self.get("/users/me").await
    }
}

fn expect_body<T>(payload: Option<T>) -> Result<T> {
    payload.ok_or(ClientError::EmptyResponse)
}
