// ==============================================================================
// config.rs - Lookup Configuration
// ==============================================================================
// Description: Locations of the annotation database and per-group score tables
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::MetricsGroup;

pub const DEFAULT_DATABASE: &str = "symetrics.db";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymetricsConfig {
    /// SQLite database holding the SILVA, SURF and SYNVEP tables
    pub database: PathBuf,

    /// Directory holding one `{GROUP}_DATA.csv` per metrics group
    pub data_dir: PathBuf,
}

impl Default for SymetricsConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl SymetricsConfig {
    pub fn new(database: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            data_dir: data_dir.into(),
        }
    }

    pub fn database(&self) -> &Path {
        &self.database
    }

    /// Score table for a group, e.g. `data/SURF_DATA.csv`
    pub fn source_path(&self, group: MetricsGroup) -> PathBuf {
        self.data_dir.join(format!("{}_DATA.csv", group.as_str()))
    }
}
