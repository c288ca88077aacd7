// Session lifecycle: login, registration, restoring a persisted token on
// startup, and logout. The token itself lives behind `TokenStore` so the
// terminal front-end can keep it in a file while tests keep it in memory.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::{LoginRequest, RegisterRequest, Session};

/// Persistence for the single opaque session token.
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> Result<()>;
}

/// Token kept in a plain file, by default `~/.fit4ever_token`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => {
                let token = data.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// On unix the file is created owner-only (0600).
    fn save(&self, token: &str) -> Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        *store.lock() = Some(token.to_string());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

/// Owns the current session and keeps the gateway token and the store in
/// step with it.
pub struct SessionManager<S: TokenStore> {
    store: S,
    session: Option<Session>,
}

impl<S: TokenStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        SessionManager {
            store,
            session: None,
        }
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn login(&mut self, api: &mut ApiClient, email: &str, password: &str) -> Result<Session> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let resp = api.login(&req).await?;
        self.establish(api, resp.token).await
    }

    pub async fn register(
        &mut self,
        api: &mut ApiClient,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let req = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let resp = api.register(&req).await?;
        self.establish(api, resp.token).await
    }

    /// Validate a fresh token against `/users/me`, then persist it.
    async fn establish(&mut self, api: &mut ApiClient, token: String) -> Result<Session> {
        api.set_token(&token);
        let user = match api.me().await {
            Ok(user) => user,
            Err(e) => {
                api.clear_token();
                return Err(match e {
                    ClientError::Http { detail, .. } => ClientError::Auth(detail),
                    other => other,
                });
            }
        };
        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "could not persist session token");
        }
        info!(email = %user.email, "signed in");
        let session = Session { token, user };
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Bring back the persisted session, if any. A token the server no
    /// longer accepts is dropped without surfacing an error.
    pub async fn restore_session(&mut self, api: &mut ApiClient) -> Option<Session> {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "could not read session token");
                return None;
            }
        };
        api.set_token(&token);
        match api.me().await {
            Ok(user) => {
                debug!(email = %user.email, "session restored");
                let session = Session { token, user };
                self.session = Some(session.clone());
                Some(session)
            }
            Err(e) => {
                debug!(error = %e, "stored token rejected, signing out");
                self.logout(api);
                None
            }
        }
    }

    /// Forget the session everywhere. Safe to call repeatedly.
    pub fn logout(&mut self, api: &mut ApiClient) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not remove session token");
        }
        api.clear_token();
        self.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token"));
        assert_eq!(store.load().unwrap(), None);

        store.save("abc.def").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc.def"));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn file_store_keeps_token_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileTokenStore::new(&path);
        store.save("fresh").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn file_store_treats_blank_file_as_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTokenStore::new(path).load().unwrap(), None);
    }

    #[test]
    fn memory_store_clones_share_the_slot() {
        let store = MemoryTokenStore::new();
        let other = store.clone();
        store.save("t").unwrap();
        assert_eq!(other.load().unwrap().as_deref(), Some("t"));
    }
}
