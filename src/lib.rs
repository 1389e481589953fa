// ==============================================================================
// lib.rs - Symetrics Library
// ==============================================================================
// Description: Variant annotation and gene score lookups over precomputed
//              synonymous-variant metrics
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod normalization;
pub mod registry;
pub mod scores;
pub mod store;
pub mod symetrics;
pub mod variant;

pub use config::SymetricsConfig;
pub use error::{Lookup, LookupError};
pub use models::{AnnotationRecord, AnnotationValue, GenomeBuild, MetricsGroup, ScoreRecord, VariantKey};
pub use symetrics::Symetrics;
pub use variant::VariantSource;
