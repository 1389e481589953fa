// ==============================================================================
// symetrics.rs - Annotation Lookup Facade
// ==============================================================================
// Description: Session object combining the store handle and the per-group
//              score tables behind the caller-facing query contract
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use tracing::error;

use crate::config::SymetricsConfig;
use crate::error::Lookup;
use crate::models::{AnnotationRecord, MetricsGroup, ScoreRecord, VariantKey};
use crate::scores::GeneScoreLookup;
use crate::store::StoreHandle;
use crate::variant::{self, VariantSource};

/// One lookup session: a single store connection plus the score table location
///
/// Lookups never return `Err`; failures are logged and come back as
/// `Lookup::Failed`, which flattens to an empty sequence via `into_rows`.
pub struct Symetrics {
    store: StoreHandle,
    gene_scores: GeneScoreLookup,
}

impl Symetrics {
    /// Connect to the configured database. A failed connect is logged and
    /// leaves the session usable for gene scores only.
    pub fn new(config: SymetricsConfig) -> Self {
        let store = StoreHandle::connect(config.database());
        Self {
            store,
            gene_scores: GeneScoreLookup::new(config),
        }
    }

    pub fn config(&self) -> &SymetricsConfig {
        self.gene_scores.config()
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Annotation rows for a variant from the named source ("silva", "surf", "synvep")
    pub fn get_variant_annotation(
        &self,
        source: &str,
        chr: &str,
        pos: i64,
        ref_allele: &str,
        alt_allele: &str,
    ) -> Lookup<AnnotationRecord> {
        let source: VariantSource = match source.parse() {
            Ok(source) => source,
            Err(e) => {
                error!("{}", e);
                return Lookup::Failed(e);
            }
        };

        self.annotate(source, &VariantKey::new(chr, pos, ref_allele, alt_allele))
    }

    pub fn annotate(&self, source: VariantSource, key: &VariantKey) -> Lookup<AnnotationRecord> {
        variant::annotate(&self.store, source, key)
    }

    /// SILVA scores; positions are GRCh37
    pub fn get_silva_score(&self, chr: &str, pos: i64, ref_allele: &str, alt_allele: &str) -> Lookup<AnnotationRecord> {
        self.annotate(VariantSource::Silva, &VariantKey::new(chr, pos, ref_allele, alt_allele))
    }

    /// SURF scores; positions are GRCh38
    pub fn get_surf_score(&self, chr: &str, pos: i64, ref_allele: &str, alt_allele: &str) -> Lookup<AnnotationRecord> {
        self.annotate(VariantSource::Surf, &VariantKey::new(chr, pos, ref_allele, alt_allele))
    }

    /// synVep scores; positions are GRCh38
    pub fn get_synvep_score(&self, chr: &str, pos: i64, ref_allele: &str, alt_allele: &str) -> Lookup<AnnotationRecord> {
        self.annotate(VariantSource::Synvep, &VariantKey::new(chr, pos, ref_allele, alt_allele))
    }

    /// Standardized score for `gene` in the group named `group`
    pub fn get_gene_score(&self, group: &str, gene: &str) -> Lookup<ScoreRecord> {
        self.gene_scores.gene_score(group, gene)
    }

    /// Gene scores across every registered group
    pub fn get_gene_scores_all_groups(&self, gene: &str) -> Vec<(MetricsGroup, Lookup<ScoreRecord>)> {
        self.gene_scores.gene_scores_all_groups(gene)
    }

    /// Parse `CHR:POS:REF:ALT` and annotate it from `source`
    pub fn annotate_str(&self, source: VariantSource, key: &str) -> Lookup<AnnotationRecord> {
        match key.parse::<VariantKey>() {
            Ok(key) => self.annotate(source, &key),
            Err(e) => {
                error!("{}", e);
                Lookup::Failed(e)
            }
        }
    }
}
