//! Explicit session context.
//!
//! The console never reads the auth token or the viewer's role from ambient
//! state. A [`Session`] is restored once from a [`TokenStore`] and handed to
//! whoever needs it. The role is decoded at restore time; the token itself is
//! re-read from the store on every mutating call, so a token cleared after
//! restore (logout elsewhere) turns the next mutation into an authentication
//! error instead of a stale request.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use userdesk_config::JwtConfig;
use userdesk_core::ConsoleError;
use userdesk_models::{Role, UserId};

use crate::jwt::{create_access_token, verify_token};

/// Bearer token sent with mutating API calls.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Persisted client storage for the auth token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    fn load(&self) -> Result<Option<AuthToken>, ConsoleError>;
    fn save(&self, token: &AuthToken) -> Result<(), ConsoleError>;
    fn clear(&self) -> Result<(), ConsoleError>;
}

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<AuthToken>>, ConsoleError> {
        self.token
            .lock()
            .map_err(|_| ConsoleError::internal(anyhow::anyhow!("Token store lock poisoned")))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, ConsoleError> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, token: &AuthToken) -> Result<(), ConsoleError> {
        *self.slot()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Key-value JSON file holding the token under a fixed key, the way a
/// browser keeps it in local storage.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, ConsoleError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let entries: BTreeMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed token storage in {}", self.path.display()))?;
        Ok(entries)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), ConsoleError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(entries).context("Failed to encode token storage")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, ConsoleError> {
        Ok(self
            .read_entries()?
            .get(&self.key)
            .filter(|token| !token.is_empty())
            .map(AuthToken::new))
    }

    fn save(&self, token: &AuthToken) -> Result<(), ConsoleError> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), token.as_str().to_string());
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), key = %self.key, "Auth token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), ConsoleError> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// The authenticated viewer operating the console.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: UserId,
    name: String,
    role: Role,
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        role: Role,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            role,
            store,
        }
    }

    /// Restores the session from the token persisted in `store`.
    ///
    /// # Errors
    ///
    /// Authentication error when no token is stored, or the token is invalid,
    /// expired, or names an unknown role.
    pub fn restore(store: Arc<dyn TokenStore>, jwt_config: &JwtConfig) -> Result<Self, ConsoleError> {
        let token = store
            .load()?
            .ok_or_else(|| ConsoleError::unauthenticated("No auth token found, log in first"))?;
        let claims = verify_token(token.as_str(), jwt_config)?;

        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ConsoleError::unauthenticated("Token subject is not a user id"))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|e| ConsoleError::unauthenticated(format!("Token role rejected: {}", e)))?;

        Ok(Self::new(user_id, claims.name, role, store))
    }

    /// Issues a token for the given actor, persists it, and returns the session.
    pub fn login(
        store: Arc<dyn TokenStore>,
        user_id: UserId,
        name: &str,
        role: Role,
        jwt_config: &JwtConfig,
    ) -> Result<Self, ConsoleError> {
        let token = create_access_token(user_id, name, role, jwt_config)?;
        store.save(&token)?;
        Ok(Self::new(user_id, name, role, store))
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The viewer role every permission decision is made for.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current token for a mutating call.
    ///
    /// # Errors
    ///
    /// Authentication error when the token has been cleared from storage.
    pub fn token(&self) -> Result<AuthToken, ConsoleError> {
        self.store
            .load()?
            .ok_or_else(|| ConsoleError::unauthenticated("No auth token available for this action"))
    }

    pub fn logout(&self) -> Result<(), ConsoleError> {
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_core::ErrorKind;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("userdesk-{}", uuid::Uuid::new_v4()))
            .join("session.json")
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&AuthToken::new("abc")).unwrap();
        assert_eq!(store.load().unwrap(), Some(AuthToken::new("abc")));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let path = temp_path();
        let other = FileTokenStore::new(&path, "theme");
        let store = FileTokenStore::new(&path, "userdesk.auth_token");

        other.save(&AuthToken::new("dark")).unwrap();
        store.save(&AuthToken::new("tok")).unwrap();
        assert_eq!(store.load().unwrap(), Some(AuthToken::new("tok")));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert_eq!(other.load().unwrap(), Some(AuthToken::new("dark")));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileTokenStore::new(temp_path(), "userdesk.auth_token");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_restore_decodes_role() {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let user_id = UserId::new();
        Session::login(store.clone(), user_id, "Ana", Role::Manager, &jwt_config()).unwrap();

        let session = Session::restore(store, &jwt_config()).unwrap();
        assert_eq!(session.role(), Role::Manager);
        assert_eq!(session.user_id(), user_id);
        assert_eq!(session.name(), "Ana");
    }

    #[test]
    fn test_restore_without_token() {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let err = Session::restore(store, &jwt_config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_token_reads_store_each_time() {
        let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
        let session =
            Session::login(store.clone(), UserId::new(), "Ana", Role::Admin, &jwt_config()).unwrap();
        assert!(session.token().is_ok());

        store.clear().unwrap();
        let err = session.token().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(session.role(), Role::Admin);
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("super-secret");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
    }
}
