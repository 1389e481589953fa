// ==============================================================================
// store.rs - Annotation Store Handle
// ==============================================================================
// Description: Owns the single read-only connection to the annotation database
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, Params};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::error::LookupError;

/// Session-scoped handle to the annotation database
///
/// Connects once. If that fails the handle stays unusable for its whole
/// lifetime and every query returns `LookupError::NotConnected`. The handle
/// is `Send` but not `Sync`; callers on several threads need one handle each.
pub struct StoreHandle {
    location: PathBuf,
    conn: Option<Connection>,
}

impl StoreHandle {
    /// Open the database at `location`, logging the outcome
    pub fn connect<P: AsRef<Path>>(location: P) -> Self {
        let location = location.as_ref().to_path_buf();

        let conn = match Self::open(&location) {
            Ok(conn) => {
                info!("Connection to {} is successful", location.display());
                Some(conn)
            }
            Err(e) => {
                error!("{}", e);
                None
            }
        };

        Self { location, conn }
    }

    fn open(location: &Path) -> Result<Connection, LookupError> {
        let to_error = |source: rusqlite::Error| LookupError::Connection {
            path: location.to_path_buf(),
            source,
        };

        // Read-only: a missing file is a failed connect, not a new empty database
        let conn = Connection::open_with_flags(
            location,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(to_error)?;

        // SQLite opens lazily; touch the header so a non-database file fails here
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(to_error)?;

        Ok(conn)
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn connection(&self) -> Result<&Connection, LookupError> {
        self.conn.as_ref().ok_or(LookupError::NotConnected)
    }

    /// Execute a parameterized query and return every row in natural order
    pub fn query_rows<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Vec<Value>>, LookupError> {
        let conn = self.connection()?;
        debug!("Executing query: {}", sql);

        let mut stmt = conn.prepare(sql)?;
        let column_count = stmt.column_count();

        let row_iter = stmt.query_map(params, |row| {
            (0..column_count)
                .map(|idx| row.get::<_, Value>(idx))
                .collect::<Result<Vec<Value>, _>>()
        })?;

        let mut rows = Vec::new();
        for row in row_iter {
            rows.push(row?);
        }

        Ok(rows)
    }
}
