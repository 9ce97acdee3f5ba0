//! Local session storage
//!
//! The signed-in user lives in a small JSON file on disk. Loading it is
//! a purely local read; the screens receive the user at construction
//! time and never consult the session again.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// The signed-in user as the inventory screens see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SessionUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            name: None,
        }
    }
}

/// File-backed store for the active session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store from environment configuration
    ///
    /// # Environment Variables
    /// - `INVENTORY_SESSION_FILE`: session file location (default:
    ///   `inventory-session.json` in the working directory)
    pub fn from_env() -> Self {
        let path = env::var("INVENTORY_SESSION_FILE")
            .unwrap_or_else(|_| "inventory-session.json".to_string());
        Self::new(path)
    }

    /// Load the active session, `None` when nobody is signed in
    pub fn load(&self) -> Result<Option<SessionUser>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .map_err(|e| anyhow::anyhow!("Failed to read session file: {}", e))?;
        let user = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Malformed session file: {}", e))?;

        Ok(Some(user))
    }

    /// Persist the active session
    pub fn save(&self, user: &SessionUser) -> Result<()> {
        let raw = serde_json::to_string_pretty(user)?;
        fs::write(&self.path, raw)
            .map_err(|e| anyhow::anyhow!("Failed to write session file: {}", e))?;

        info!("Session saved for user: {}", user.uid);
        Ok(())
    }

    /// Sign out by removing the session file
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| anyhow::anyhow!("Failed to remove session file: {}", e))?;
        }

        Ok(())
    }
}
