// Client configuration. The binary fills this from command-line flags;
// `from_env` keeps the plain environment-variable setup working for scripts.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const TOKEN_FILE_NAME: &str = ".fit4ever_token";

/// Settings shared by the gateway, the token store and the presenter.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, including the `/api` prefix.
    pub base_url: String,

    /// File holding the persisted session token.
    pub token_path: PathBuf,

    /// Per-request timeout handed to reqwest.
    pub request_timeout: Option<Duration>,

    /// How long a notification stays on screen.
    pub notification_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token_path: default_token_path(),
            request_timeout: Some(Duration::from_secs(30)),
            notification_ttl: Duration::from_secs(3),
        }
    }
}

impl ClientConfig {
    /// Read `FIT4EVER_API_URL` and `FIT4EVER_TOKEN_FILE`, falling back to
    /// the defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = ClientConfig::default();
        if let Ok(url) = std::env::var("FIT4EVER_API_URL") {
            config = config.with_base_url(&url);
        }
        if let Ok(path) = std::env::var("FIT4EVER_TOKEN_FILE") {
            config = config.with_token_path(PathBuf::from(path));
        }
        config
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_path(mut self, path: PathBuf) -> Self {
        self.token_path = path;
        self
    }

    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    pub fn with_notification_ttl(mut self, value: Duration) -> Self {
        self.notification_ttl = value;
        self
    }
}

/// `~/.fit4ever_token`, or the current directory when there is no home.
pub fn default_token_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(TOKEN_FILE_NAME)
}
