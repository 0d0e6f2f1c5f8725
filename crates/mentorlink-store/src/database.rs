//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/mentorlink/mentorlink.db`
    /// - macOS:   `~/Library/Application Support/com.mentorlink.mentorlink/mentorlink.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\mentorlink\mentorlink\data\mentorlink.db`
    pub fn new() -> Result<Self> {
        let db_path = default_path()?;
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening database");

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}

/// Where [`Database::new`] puts the database file.
pub fn default_path() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("com", "mentorlink", "mentorlink").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().join("mentorlink.db"))
}
