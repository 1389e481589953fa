// ==============================================================================
// error.rs - Lookup Error Taxonomy
// ==============================================================================
// Description: Errors raised by store, variant and gene score lookups, plus the
//              tagged outcome returned to callers
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while answering a lookup
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Connection to {} failed: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Store handle has no open connection")]
    NotConnected,

    #[error("Query execution error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Group: {0} is not valid")]
    InvalidGroup(String),

    #[error("Unknown variant source: {0}")]
    UnknownSource(String),

    #[error("Failed to read score table {}: {source}", path.display())]
    SourceFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Score table {} has no column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid numeric value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid variant key '{0}' (expected CHR:POS:REF:ALT)")]
    InvalidVariantKey(String),
}

/// Tagged outcome of a lookup
///
/// Failures never propagate past the lookup boundary; they are carried here
/// instead. `into_rows` flattens the outcome to a plain sequence for callers
/// that only want rows (a failure then reads as an empty sequence).
#[derive(Debug)]
pub enum Lookup<T> {
    /// One or more matching rows, in source order
    Rows(Vec<T>),
    /// The query ran and nothing matched
    NoMatch,
    /// The lookup could not be answered
    Failed(LookupError),
}

impl<T> Lookup<T> {
    pub fn rows(&self) -> &[T] {
        match self {
            Lookup::Rows(rows) => rows,
            Lookup::NoMatch | Lookup::Failed(_) => &[],
        }
    }

    pub fn into_rows(self) -> Vec<T> {
        match self {
            Lookup::Rows(rows) => rows,
            Lookup::NoMatch | Lookup::Failed(_) => Vec::new(),
        }
    }

    /// Short label for reports: "ok", "no_match" or "failed"
    pub fn status(&self) -> &'static str {
        match self {
            Lookup::Rows(_) => "ok",
            Lookup::NoMatch => "no_match",
            Lookup::Failed(_) => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed(_))
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            Lookup::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl<T> From<Result<Vec<T>, LookupError>> for Lookup<T> {
    fn from(result: Result<Vec<T>, LookupError>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => Lookup::NoMatch,
            Ok(rows) => Lookup::Rows(rows),
            Err(e) => Lookup::Failed(e),
        }
    }
}
