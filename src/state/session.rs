use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::SessionError;

/// Name of the persisted slot holding the admin token
pub const CREDENTIAL_SLOT: &str = "adminToken";

/// Opaque bearer token proving admin identity to the service
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// A persisted slot for the session credential
///
/// Injected into the admin controller so tests can swap the storage.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<Credential>, SessionError>;
    fn set(&self, credential: &Credential) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Screens of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Gallery,
    Login,
    Admin,
}

/// Result of the admin session guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// A credential is present; the admin view may activate
    Admit(Credential),
    /// No credential; send the user elsewhere
    Redirect(Route),
}

/// Check for a stored credential before the admin view activates.
///
/// Presence only: the token is not validated against the service, and a
/// storage failure counts as "absent".
pub fn guard(store: &dyn SessionStore) -> GuardOutcome {
    match store.get() {
        Ok(Some(credential)) => {
            debug!("Session credential present, admitting admin view");
            GuardOutcome::Admit(credential)
        }
        Ok(None) => {
            info!("No session credential, redirecting to login");
            GuardOutcome::Redirect(Route::Login)
        }
        Err(e) => {
            warn!("Failed to read session credential: {e}");
            GuardOutcome::Redirect(Route::Login)
        }
    }
}

/// The SessionStore backed by a small SQLite database on disk.
/// The credential survives client restarts.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteSessionStore {
    /// Open (or create) the session database.
    ///
    /// Default location, when `path` is None:
    /// - Linux: ~/.local/share/image-gallery/session.db
    /// - macOS: ~/Library/Application Support/image-gallery/session.db
    /// - Windows: %APPDATA%\image-gallery\session.db
    pub fn open(path: Option<&Path>) -> Result<Self, SessionError> {
        let db_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_db_path()?,
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                slot        TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                saved_at    INTEGER NOT NULL
            )",
            [],
        )?;

        info!("📁 Session store opened at: {}", db_path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    fn default_db_path() -> Result<PathBuf, SessionError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(SessionError::NoDataDir)?;

        path.push("image-gallery");
        path.push("session.db");
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SessionError> {
        self.conn.lock().map_err(|_| SessionError::Poisoned)
    }
}

impl SessionStore for SqliteSessionStore {
    fn get(&self) -> Result<Option<Credential>, SessionError> {
        let token: Option<String> = self
            .conn()?
            .query_row(
                "SELECT value FROM session WHERE slot = ?1",
                [CREDENTIAL_SLOT],
                |row| row.get(0),
            )
            .optional()?;
        Ok(token.map(Credential))
    }

    fn set(&self, credential: &Credential) -> Result<(), SessionError> {
        self.conn()?.execute(
            "INSERT INTO session (slot, value, saved_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET value = excluded.value, saved_at = excluded.saved_at",
            rusqlite::params![CREDENTIAL_SLOT, credential.token(), Utc::now().timestamp()],
        )?;
        info!("Session credential saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.conn()?
            .execute("DELETE FROM session WHERE slot = ?1", [CREDENTIAL_SLOT])?;
        info!("Session credential cleared");
        Ok(())
    }
}

impl fmt::Debug for SqliteSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSessionStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// The SessionStore that forgets the credential when the client exits
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Credential>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<Credential>, SessionError> {
        Ok(self.slot.lock().map_err(|_| SessionError::Poisoned)?.clone())
    }

    fn set(&self, credential: &Credential) -> Result<(), SessionError> {
        *self.slot.lock().map_err(|_| SessionError::Poisoned)? = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}
