//! Sign-in state and its persistence.
//!
//! [`SessionGate`] moves between [`AuthState::Anonymous`] and
//! [`AuthState::Authenticated`]. The signed-in session is written to a
//! [`SessionStore`] so a restarted client picks it up again.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use campus_core::roles::ROLE_SUPER_ADMIN;
use campus_core::types::Timestamp;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{AuthResponse, CampusApi};
use crate::error::ClientError;

/// A signed-in editor and their tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    pub role: String,
    /// Bound department; `None` for super admins.
    pub department: Option<String>,
    pub access_token: String,
    pub refresh_token: String,
    /// When the access token stops being accepted.
    pub expires_at: Timestamp,
}

impl Session {
    fn from_auth(auth: AuthResponse) -> Self {
        Self {
            username: auth.user.username,
            role: auth.user.role,
            department: auth.user.department,
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
            expires_at: Utc::now() + Duration::seconds(auth.expires_in),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Session),
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Where a signed-in session is kept between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, ClientError>;
    fn save(&self, session: &Session) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Keeps the session as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Process-local store; the session is gone when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// Client-side authentication gate.
pub struct SessionGate<S: SessionStore> {
    api: CampusApi,
    store: S,
    state: AuthState,
}

impl<S: SessionStore> SessionGate<S> {
    /// Start from whatever session `store` holds.
    pub fn restore(api: CampusApi, store: S) -> Result<Self, ClientError> {
        let state = match store.load()? {
            Some(session) => {
                tracing::debug!(username = %session.username, "Restored stored session");
                AuthState::Authenticated(session)
            }
            None => AuthState::Anonymous,
        };
        Ok(Self { api, store, state })
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Anonymous => None,
        }
    }

    /// The API client, carrying the access token when signed in.
    pub fn api(&self) -> CampusApi {
        match self.session() {
            Some(session) => self.api.with_token(session.access_token.clone()),
            None => self.api.clone(),
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Session, ClientError> {
        let auth = self.api.login(username, password).await?;
        self.establish(Session::from_auth(auth))
    }

    /// Rotate the token pair using the stored refresh token.
    pub async fn refresh(&mut self) -> Result<&Session, ClientError> {
        let refresh_token = self
            .session()
            .ok_or(ClientError::NotAuthenticated)?
            .refresh_token
            .clone();

        match self.api.refresh(&refresh_token).await {
            Ok(auth) => self.establish(Session::from_auth(auth)),
            Err(e) => {
                if e.status() == Some(401) {
                    self.forget()?;
                }
                Err(e)
            }
        }
    }

    /// Revoke every server session of the user and forget the local one.
    ///
    /// The local session is dropped even when the server call fails.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let result = match self.session() {
            Some(_) => self.api().logout().await,
            None => Ok(()),
        };
        self.forget()?;
        result
    }

    fn establish(&mut self, session: Session) -> Result<&Session, ClientError> {
        self.store.save(&session)?;
        tracing::debug!(username = %session.username, role = %session.role, "Signed in");
        self.state = AuthState::Authenticated(session);
        self.session().ok_or(ClientError::NotAuthenticated)
    }

    fn forget(&mut self) -> Result<(), ClientError> {
        self.state = AuthState::Anonymous;
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            username: "eng_admin".into(),
            role: "department_admin".into(),
            department: Some("Engineering".into()),
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now() + Duration::minutes(15),
        }
    }

    #[test]
    fn file_store_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));

        assert_eq!(store.load().unwrap(), None);
        let saved = session();
        store.save(&saved).unwrap();
        assert_eq!(store.load().unwrap(), Some(saved));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let result = FileSessionStore::new(path).load();
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn gate_restores_from_store() {
        let store = MemorySessionStore::default();
        store.save(&session()).unwrap();

        let api = CampusApi::with_client(reqwest::Client::new(), "http://campus.test");
        let gate = SessionGate::restore(api, store).unwrap();

        let restored = gate.session().unwrap();
        assert_eq!(restored.department.as_deref(), Some("Engineering"));
        assert!(!restored.is_expired());
        assert!(!restored.is_super_admin());
        assert_eq!(gate.api().access_token(), Some("access"));
    }

    #[test]
    fn empty_store_is_anonymous() {
        let api = CampusApi::with_client(reqwest::Client::new(), "http://campus.test");
        let gate = SessionGate::restore(api, MemorySessionStore::default()).unwrap();
        assert_eq!(gate.state(), &AuthState::Anonymous);
        assert_eq!(gate.api().access_token(), None);
    }
}
