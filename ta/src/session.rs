//! Persisted session credential and identity
//!
//! The backend authenticates with a cookie token that expires after seven
//! days. The session file stores the token together with the signed-in user
//! and role; an expired or missing file reads back as no session, which
//! short-circuits all data loading upstream.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Role, Trainee};

/// Token lifetime, matching the backend's cookie expiry
pub const SESSION_TTL_DAYS: i64 = 7;

/// Errors from session persistence
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An authenticated session: credential token plus identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The cookie token value
    pub token: String,

    /// The signed-in user
    pub user: Trainee,

    /// The user's role
    pub role: Role,

    /// When the token expires
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session expiring [`SESSION_TTL_DAYS`] from now
    pub fn new(token: impl Into<String>, user: Trainee, role: Role) -> Self {
        Self {
            token: token.into(),
            user,
            role,
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        }
    }

    /// Check whether the token has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// File-backed session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Store at the default location in the user data directory
    pub fn new() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("planboard")
            .join("session.json");
        Self { path }
    }

    /// Store at a custom path (config override, tests)
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session. Returns None when the file is missing, unreadable as
    /// a session, or the token has expired.
    pub fn load(&self) -> Option<Session> {
        let content = fs::read_to_string(&self.path).ok()?;
        let session: Session = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file unreadable, ignoring");
                return None;
            }
        };

        if session.is_expired() {
            debug!(expires_at = %session.expires_at, "Session expired");
            return None;
        }

        Some(session)
    }

    /// Persist the session, creating parent directories as needed
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Remove the session file (sign out). Missing file is not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
