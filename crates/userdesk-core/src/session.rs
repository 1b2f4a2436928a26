//! Session storage.
//!
//! The session is the token returned by a successful login plus the username
//! it was issued for. Flows receive a `SharedSession` at construction instead
//! of reaching for a global.
//!
//! `FileSessionStore` persists the slot in `<home>/session.json` with
//! restricted permissions (0600), replacing it by rename so readers never see a
//! partial write. Tokens are never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// The client-held proof of authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Returns a masked version of the token for display.
    pub fn masked_token(&self) -> Option<String> {
        self.token.as_deref().map(mask_token)
    }
}

/// Returns a masked version of a token for display (first 8 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 12 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}

/// Persisted slot holding the current session.
///
/// Writes are last-write-wins. `get_token` never fails: an unreadable slot
/// reads as signed out.
pub trait SessionStore: Send + Sync {
    /// Returns the full session (token and username).
    fn load(&self) -> Session;

    /// Persists a token and optional username, replacing any previous session.
    ///
    /// # Errors
    /// Returns an error if the slot cannot be written.
    fn set_session(&self, token: &str, username: Option<&str>) -> Result<()>;

    /// Removes the session. Clearing an empty slot is not an error.
    ///
    /// # Errors
    /// Returns an error if the slot cannot be written.
    fn clear_session(&self) -> Result<()>;

    /// Returns the current token, if any.
    fn get_token(&self) -> Option<String> {
        self.load().token
    }
}

/// Shared handle passed to flows.
pub type SharedSession = Arc<dyn SessionStore>;

/// Process-local session slot (tests, `--ephemeral` runs).
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a token.
    pub fn with_token(token: &str, username: Option<&str>) -> Self {
        Self {
            slot: Mutex::new(Session {
                token: Some(token.to_string()),
                username: username.map(str::to_string),
            }),
        }
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(self)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_session(&self, token: &str, username: Option<&str>) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Session {
            token: Some(token.to_string()),
            username: username.map(str::to_string),
        };
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Session::default();
        Ok(())
    }
}

/// Session slot persisted as JSON on disk.
///
/// The file is read on every access so a session written by another process
/// (e.g. `userdesk login` while the TUI is open) is picked up.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the store at the default location (`<home>/session.json`).
    ///
    /// # Errors
    /// Returns an error if no home directory can be determined.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(paths::session_path()?))
    }

    pub fn shared(self) -> SharedSession {
        Arc::new(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Session::default());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    fn write(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        // Readers re-open the file on every access; they must never see a
        // truncated slot, so write a sibling and rename over it.
        let tmp_path = self.path.with_extension("json.tmp");
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&tmp_path)
            .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to flush {}", tmp_path.display()))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        match self.read() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("Ignoring unreadable session file: {err:#}");
                Session::default()
            }
        }
    }

    fn set_session(&self, token: &str, username: Option<&str>) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(&Session {
            token: Some(token.to_string()),
            username: username.map(str::to_string),
        })?;
        tracing::info!(username = username.unwrap_or("-"), "session stored");
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        tracing::info!("session cleared");
        Ok(())
    }
}
