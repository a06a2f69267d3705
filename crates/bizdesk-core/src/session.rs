// ── Session context ──
//
// Single source of truth for "who is logged in". The API client reads the
// bearer token from here through `TokenProvider`; only the auth flow and
// the guard write to it. Durable storage is pluggable so the CLI can keep
// sessions on disk while tests keep them in memory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use bizdesk_api::TokenProvider;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::AuthUser;

/// What survives between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

/// Durable client storage for the session.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, CoreError>;
    fn save(&self, session: &StoredSession) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;
}

// ── File storage ─────────────────────────────────────────────────────

/// JSON file, readable only by the owner on unix.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_err(action: &str, path: &Path, e: impl std::fmt::Display) -> CoreError {
    CoreError::Storage {
        message: format!("failed to {action} {}: {e}", path.display()),
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, CoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_err("read", &self.path, e)),
        };
        // A corrupt file is treated as "no session" so the user can log in again.
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &StoredSession) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_err("create", parent, e))?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| storage_err("encode", &self.path, e))?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);
        let mut file = options
            .open(&self.path)
            .map_err(|e| storage_err("open", &self.path, e))?;

        // `mode` only applies on creation; an older file may be wider.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| storage_err("restrict", &self.path, e))?;
        }
        file.write_all(json.as_bytes())
            .map_err(|e| storage_err("write", &self.path, e))
    }

    fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("remove", &self.path, e)),
        }
    }
}

// ── In-memory storage ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded storage, as if a previous run had logged in.
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<StoredSession>, CoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), CoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// ── Context ──────────────────────────────────────────────────────────

#[derive(Default)]
struct SessionState {
    token: Option<SecretString>,
    user: Option<AuthUser>,
    authenticated: bool,
}

/// The live session, shared by the API client, the guard, and the auth slice.
pub struct SessionContext {
    storage: Box<dyn SessionStorage>,
    state: RwLock<SessionState>,
    authenticated: watch::Sender<bool>,
}

impl SessionContext {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            storage: Box::new(storage),
            state: RwLock::new(SessionState::default()),
            authenticated,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, authenticated: bool) {
        self.authenticated.send_if_modified(|current| {
            let changed = *current != authenticated;
            *current = authenticated;
            changed
        });
    }

    /// Load a persisted session and mark it authenticated.
    ///
    /// Returns `true` if storage held a session.
    pub fn restore(&self) -> Result<bool, CoreError> {
        let Some(stored) = self.storage.load()? else {
            debug!("no stored session");
            return Ok(false);
        };
        {
            let mut state = self.write();
            state.token = Some(SecretString::from(stored.token));
            state.user = stored.user;
            state.authenticated = true;
        }
        self.publish(true);
        debug!("session restored");
        Ok(true)
    }

    /// Persist and activate a freshly issued session.
    pub fn establish(&self, token: SecretString, user: AuthUser) -> Result<(), CoreError> {
        self.storage.save(&StoredSession {
            token: token.expose_secret().to_owned(),
            user: Some(user.clone()),
        })?;
        {
            let mut state = self.write();
            state.token = Some(token);
            state.user = Some(user);
            state.authenticated = true;
        }
        self.publish(true);
        Ok(())
    }

    /// Replace the cached user record, keeping the token.
    pub fn update_user(&self, user: AuthUser) -> Result<(), CoreError> {
        let token = {
            let mut state = self.write();
            state.user = Some(user.clone());
            state.token.as_ref().map(|t| t.expose_secret().to_owned())
        };
        match token {
            Some(token) => self.storage.save(&StoredSession {
                token,
                user: Some(user),
            }),
            None => Ok(()),
        }
    }

    /// Forget the session in memory and in storage.
    ///
    /// Memory is always cleared, even when storage fails.
    pub fn teardown(&self) -> Result<(), CoreError> {
        *self.write() = SessionState::default();
        self.publish(false);
        debug!("session torn down");
        self.storage.clear()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().authenticated
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.read().user.clone()
    }

    /// The token in memory, falling back to durable storage.
    ///
    /// A token found in storage is cached but the session is not marked
    /// authenticated; that is the guard's decision.
    pub fn stored_token(&self) -> Option<SecretString> {
        if let Some(token) = self.read().token.clone() {
            return Some(token);
        }
        let stored = match self.storage.load() {
            Ok(stored) => stored?,
            Err(e) => {
                warn!(error = %e, "could not read stored session");
                return None;
            }
        };
        let token = SecretString::from(stored.token);
        let mut state = self.write();
        state.token = Some(token.clone());
        if state.user.is_none() {
            state.user = stored.user;
        }
        Some(token)
    }

    /// Watch the authenticated flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }
}

impl TokenProvider for SessionContext {
    fn bearer_token(&self) -> Option<SecretString> {
        self.stored_token()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionContext")
            .field("authenticated", &state.authenticated)
            .field("has_token", &state.token.is_some())
            .field("user", &state.user.as_ref().map(|u| u.email.as_str()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EntityId;

    fn user() -> AuthUser {
        AuthUser {
            id: EntityId::from(1_i64),
            email: "staff@example.com".into(),
            first_name: Some("Ada".into()),
            last_name: None,
            role: None,
        }
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested/session.json"));
        assert_eq!(storage.load().unwrap(), None);

        let session = StoredSession {
            token: "jwt".into(),
            user: Some(user()),
        };
        storage.save(&session).unwrap();
        assert_eq!(storage.load().unwrap(), Some(session));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        storage.clear().unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn existing_world_readable_file_is_restricted_before_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let storage = FileSessionStorage::new(&path);
        storage
            .save(&StoredSession {
                token: "jwt".into(),
                user: None,
            })
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(storage.load().unwrap().unwrap().token, "jwt");
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(FileSessionStorage::new(path).load().unwrap(), None);
    }

    #[test]
    fn establish_then_teardown() {
        let ctx = SessionContext::new(MemorySessionStorage::new());
        let mut rx = ctx.subscribe();
        assert!(!ctx.is_authenticated());

        ctx.establish(SecretString::from("jwt".to_owned()), user())
            .unwrap();
        assert!(ctx.is_authenticated());
        assert!(*rx.borrow_and_update());
        assert_eq!(ctx.bearer_token().unwrap().expose_secret(), "jwt");

        ctx.teardown().unwrap();
        assert!(!ctx.is_authenticated());
        assert!(ctx.user().is_none());
        assert!(ctx.stored_token().is_none());
        assert!(!*rx.borrow_and_update());
    }

    #[test]
    fn stored_token_does_not_authenticate() {
        let ctx = SessionContext::new(MemorySessionStorage::with_session(StoredSession {
            token: "old".into(),
            user: None,
        }));
        assert_eq!(ctx.stored_token().unwrap().expose_secret(), "old");
        assert!(!ctx.is_authenticated());

        assert!(ctx.restore().unwrap());
        assert!(ctx.is_authenticated());
    }
}
