//! # Session Storage
//!
//! Where each reader's `SessionView` lives between actions.
//!
//! - [`MemorySessionStore`]: a map in memory, gone on restart (the default).
//! - [`FileSessionStore`]: one JSON file per session (`<id>.json`) under a
//!   directory, so a reader resumes where they left off after a restart.
//!
//! File writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.
//! The state machine never sees which store is in use.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::state::SessionView;

/// Errors from a session backend.
#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "session I/O error: {e}"),
            SessionError::Parse(e) => write!(f, "session parse error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the name of the backend (for logs).
    fn name(&self) -> &str;

    /// The stored view for `id`, or None if the session is unknown.
    async fn load(&self, id: &str) -> Result<Option<SessionView>, SessionError>;

    async fn save(&self, id: &str, view: &SessionView) -> Result<(), SessionError>;

    /// Forget a session. Removing an unknown session is not an error.
    async fn remove(&self, id: &str) -> Result<(), SessionError>;
}

/// Generate a new UUID v4 session ID.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    views: RwLock<HashMap<String, SessionView>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, id: &str) -> Result<Option<SessionView>, SessionError> {
        Ok(self.views.read().await.get(id).cloned())
    }

    async fn save(&self, id: &str, view: &SessionView) -> Result<(), SessionError> {
        self.views
            .write()
            .await
            .insert(id.to_string(), view.clone());
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), SessionError> {
        self.views.write().await.remove(id);
        Ok(())
    }
}

// ============================================================================
// On disk
// ============================================================================

/// What goes into `<id>.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    pub view: SessionView,
    pub updated_at: i64,
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Use `dir` for session files, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, SessionError> {
        // IDs become file names; refuse anything that could leave the directory
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(SessionError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid session id: {id:?}"),
            )));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
async fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), SessionError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data).map_err(SessionError::Parse)?;
    tokio::fs::write(&tmp_path, json)
        .await
        .map_err(SessionError::Io)?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(SessionError::Io)?;
    Ok(())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self, id: &str) -> Result<Option<SessionView>, SessionError> {
        let path = self.path_for(id)?;
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Io(e)),
        };
        let record: SessionRecord = serde_json::from_str(&json).map_err(SessionError::Parse)?;
        Ok(Some(record.view))
    }

    async fn save(&self, id: &str, view: &SessionView) -> Result<(), SessionError> {
        let path = self.path_for(id)?;
        let record = SessionRecord {
            id: id.to_string(),
            view: view.clone(),
            updated_at: Utc::now().timestamp(),
        };
        atomic_write_json(&path, &record).await?;
        debug!("Session saved: {id}");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), SessionError> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }
}
