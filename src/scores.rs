// ==============================================================================
// scores.rs - Gene Score Lookup
// ==============================================================================
// Description: Loads a metrics group's score table, standardizes its raw score
//              column over the full table and returns the rows for one gene
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Format: CSV file with header, one file per group ({GROUP}_DATA.csv)
// Example (default layout):
//   GENE,pval,fdr,z
//   A1BG,0.012,0.048,2.51
//   A1CF,0.734,0.912,-0.34
// SURF names its gene column GENES; SYNVEP uses pval_ne, fdr_ne and z_ne.
// ==============================================================================

use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::SymetricsConfig;
use crate::error::{Lookup, LookupError};
use crate::models::{MetricsGroup, ScoreRecord};
use crate::normalization::{ColumnStats, Standardize, ZScoreScaler};
use crate::registry::{self, GroupMapping};

/// Cell values read as missing rather than rejected
const MISSING_MARKERS: [&str; 5] = ["", "NA", "NaN", "nan", "N/A"];

/// One group's score table, reduced to the mapped columns
#[derive(Debug, Clone)]
pub struct ScoreTable {
    path: PathBuf,
    genes: Vec<String>,
    pvals: Vec<Option<f64>>,
    fdrs: Vec<Option<f64>>,
    raw_scores: Vec<Option<f64>>,
}

impl ScoreTable {
    /// Read the full table at `path` using the group's native column names
    pub fn load(path: impl AsRef<Path>, mapping: &GroupMapping) -> Result<Self, LookupError> {
        let path = path.as_ref();
        let source_error = |source: csv::Error| LookupError::SourceFile {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(source_error)?;

        let headers = reader.headers().map_err(source_error)?.clone();
        let column_index = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_matches('"') == name)
                .ok_or_else(|| LookupError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };

        let gene_idx = column_index(mapping.gene_column)?;
        let pval_idx = column_index(mapping.pvalue_column)?;
        let fdr_idx = column_index(mapping.fdr_column)?;
        let raw_idx = column_index(mapping.raw_score_column)?;

        let mut table = ScoreTable {
            path: path.to_path_buf(),
            genes: Vec::new(),
            pvals: Vec::new(),
            fdrs: Vec::new(),
            raw_scores: Vec::new(),
        };

        for (row_idx, result) in reader.records().enumerate() {
            let record = result.map_err(source_error)?;

            table
                .genes
                .push(record.get(gene_idx).unwrap_or_default().trim_matches('"').to_string());
            table
                .pvals
                .push(parse_cell(&record, pval_idx, mapping.pvalue_column, row_idx)?);
            table
                .fdrs
                .push(parse_cell(&record, fdr_idx, mapping.fdr_column, row_idx)?);
            table
                .raw_scores
                .push(parse_cell(&record, raw_idx, mapping.raw_score_column, row_idx)?);
        }

        debug!("Loaded {} rows from {}", table.len(), table.path().display());

        Ok(table)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn raw_scores(&self) -> &[Option<f64>] {
        &self.raw_scores
    }
}

fn parse_cell(
    record: &StringRecord,
    idx: usize,
    column: &str,
    row_idx: usize,
) -> Result<Option<f64>, LookupError> {
    let text = record.get(idx).unwrap_or_default().trim().trim_matches('"');

    if MISSING_MARKERS.contains(&text) {
        return Ok(None);
    }

    let invalid = || LookupError::InvalidValue {
        // +2: one for the header line, one for 1-based numbering
        row: row_idx + 2,
        column: column.to_string(),
        value: text.to_string(),
    };

    let value: f64 = text.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }

    Ok(Some(value))
}

/// Per-gene score retrieval over the per-group score tables
///
/// Every call re-reads the group's table; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct GeneScoreLookup<S = ZScoreScaler> {
    config: SymetricsConfig,
    scaler: S,
}

impl GeneScoreLookup<ZScoreScaler> {
    pub fn new(config: SymetricsConfig) -> Self {
        Self::with_scaler(config, ZScoreScaler)
    }
}

impl<S: Standardize> GeneScoreLookup<S> {
    pub fn with_scaler(config: SymetricsConfig, scaler: S) -> Self {
        Self { config, scaler }
    }

    pub fn config(&self) -> &SymetricsConfig {
        &self.config
    }

    /// Scores for `gene` in the group named `group` (e.g. "SURF")
    ///
    /// Unknown group names are rejected before any file is opened.
    pub fn scores_for_gene(&self, group: &str, gene: &str) -> Result<Vec<ScoreRecord>, LookupError> {
        let group: MetricsGroup = group.parse()?;
        self.scores_for_group(group, gene)
    }

    /// Scores for `gene` in `group`
    ///
    /// NORM_SYMETRIC_SCORE is standardized over every row of the table before
    /// the gene filter, so it reflects the whole group's distribution.
    pub fn scores_for_group(&self, group: MetricsGroup, gene: &str) -> Result<Vec<ScoreRecord>, LookupError> {
        let mapping = registry::mapping(group);
        let table = ScoreTable::load(self.config.source_path(group), mapping)?;
        if table.is_empty() {
            warn!("Score table {} has no data rows", table.path().display());
        }

        if let Some(stats) = ColumnStats::compute(table.raw_scores()) {
            debug!(
                "{} column '{}': n={}, mean={:.4}, sd={:.4}, range=[{:.4}, {:.4}]",
                group, mapping.raw_score_column, stats.count, stats.mean, stats.std_dev, stats.min, stats.max
            );
        }

        let normalized = self.scaler.standardize(table.raw_scores());

        let records = table
            .genes
            .iter()
            .enumerate()
            .filter(|(_, g)| g.as_str() == gene)
            .map(|(idx, g)| ScoreRecord {
                gene: g.clone(),
                pval: table.pvals[idx],
                fdr: table.fdrs[idx],
                symetric_score: table.raw_scores[idx],
                norm_symetric_score: normalized.get(idx).copied().flatten(),
                group,
            })
            .collect();

        Ok(records)
    }

    /// Like `scores_for_gene`, but failures are logged and returned as `Lookup::Failed`
    pub fn gene_score(&self, group: &str, gene: &str) -> Lookup<ScoreRecord> {
        let outcome = Lookup::from(self.scores_for_gene(group, gene));
        log_outcome(group, gene, &outcome);
        outcome
    }

    /// Run the gene lookup against every registered group, in registry order
    pub fn gene_scores_all_groups(&self, gene: &str) -> Vec<(MetricsGroup, Lookup<ScoreRecord>)> {
        registry::mappings()
            .iter()
            .map(|mapping| {
                let outcome = Lookup::from(self.scores_for_group(mapping.group, gene));
                log_outcome(mapping.group.as_str(), gene, &outcome);
                (mapping.group, outcome)
            })
            .collect()
    }
}

fn log_outcome(group: &str, gene: &str, outcome: &Lookup<ScoreRecord>) {
    match outcome {
        Lookup::Failed(e) => error!("Gene score lookup for {} in {} failed: {}", gene, group, e),
        _ => info!("Gene score lookup for {} in {}: {} record(s)", gene, group, outcome.rows().len()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Raw score for synthetic row `i`
    pub(crate) fn raw_score(i: usize) -> f64 {
        (i as f64) * 0.5 - 10.0 + (i % 7) as f64
    }

    /// 100-row table where row 37 is A1BG and every other gene is unique
    pub(crate) fn write_group_table(dir: &Path, group: MetricsGroup) {
        let mapping = registry::mapping(group);
        let mut csv = format!(
            "{},{},{},{}\n",
            mapping.gene_column, mapping.pvalue_column, mapping.fdr_column, mapping.raw_score_column
        );

        for i in 0..100 {
            let gene = if i == 37 { "A1BG".to_string() } else { format!("GENE{}", i) };
            let pval = (i as f64 + 1.0) / 200.0;
            csv.push_str(&format!("{},{},{},{}\n", gene, pval, pval * 2.0, raw_score(i)));
        }

        fs::write(dir.join(format!("{}_DATA.csv", group.as_str())), csv).unwrap();
    }

    #[test]
    fn test_header_only_table_is_no_match() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("CPG_DATA.csv"), "GENE,pval,fdr,z\n").unwrap();

        let path = dir.path().join("CPG_DATA.csv");
        let table = ScoreTable::load(&path, registry::mapping(MetricsGroup::Cpg)).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.path(), path.as_path());

        let outcome = lookup_for(dir.path()).gene_score("CPG", "A1BG");
        assert!(matches!(outcome, Lookup::NoMatch));
    }

    fn lookup_for(dir: &Path) -> GeneScoreLookup {
        GeneScoreLookup::new(SymetricsConfig::new(dir.join("symetrics.db"), dir))
    }

    #[test]
    fn test_single_gene_from_hundred_rows() {
        let dir = tempdir().unwrap();
        write_group_table(dir.path(), MetricsGroup::Gerp);

        let records = lookup_for(dir.path()).scores_for_gene("GERP", "A1BG").unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.gene, "A1BG");
        assert_eq!(record.group, MetricsGroup::Gerp);
        assert_eq!(record.symetric_score, Some(raw_score(37)));
        assert!((record.pval.unwrap() - 38.0 / 200.0).abs() < 1e-12);
        assert!((record.fdr.unwrap() - 38.0 / 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalization_uses_full_table() {
        let dir = tempdir().unwrap();
        write_group_table(dir.path(), MetricsGroup::Rscu);

        let records = lookup_for(dir.path()).scores_for_gene("RSCU", "A1BG").unwrap();
        assert_eq!(records.len(), 1);

        let all: Vec<Option<f64>> = (0..100).map(|i| Some(raw_score(i))).collect();
        let stats = ColumnStats::compute(&all).unwrap();
        let expected = (raw_score(37) - stats.mean) / stats.std_dev;

        let norm = records[0].norm_symetric_score.unwrap();
        assert!((norm - expected).abs() < 1e-10, "expected {}, got {}", expected, norm);
        // A single-row fit would have produced exactly zero
        assert!(norm.abs() > 1e-6);
    }

    #[test]
    fn test_surf_gene_column_mapped() {
        let dir = tempdir().unwrap();
        write_group_table(dir.path(), MetricsGroup::Surf);

        let records = lookup_for(dir.path()).scores_for_gene("SURF", "A1BG").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].gene, "A1BG");

        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["GENE"], "A1BG");
        assert_eq!(json["GROUP"], "SURF");
        assert!(json.get("GENES").is_none());
    }

    #[test]
    fn test_synvep_columns_mapped() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("SYNVEP_DATA.csv"),
            "GENE,z,pval,fdr,z_ne,pval_ne,fdr_ne\n\
             A1BG,99.0,0.9,0.9,1.5,0.01,0.02\n\
             A2M,99.0,0.9,0.9,-1.5,0.5,0.6\n",
        )
        .unwrap();

        let records = lookup_for(dir.path()).scores_for_gene("SYNVEP", "A1BG").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symetric_score, Some(1.5));
        assert_eq!(records[0].pval, Some(0.01));
        assert_eq!(records[0].fdr, Some(0.02));
        assert!((records[0].norm_symetric_score.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_group_touches_no_file() {
        // Empty directory: any file access would surface as SourceFile
        let dir = tempdir().unwrap();
        let lookup = lookup_for(dir.path());

        let result = lookup.scores_for_gene("NOT_A_GROUP", "A1BG");
        assert!(matches!(result, Err(LookupError::InvalidGroup(ref g)) if g == "NOT_A_GROUP"));

        let outcome = lookup.gene_score("silva", "A1BG");
        assert!(matches!(outcome.error(), Some(LookupError::InvalidGroup(_))));
    }

    #[test]
    fn test_idempotent_calls() {
        let dir = tempdir().unwrap();
        write_group_table(dir.path(), MetricsGroup::Cpg);
        let lookup = lookup_for(dir.path());

        let first = lookup.scores_for_gene("CPG", "A1BG").unwrap();
        let second = lookup.scores_for_gene("CPG", "A1BG").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_genes_all_returned() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("DRSCU_DATA.csv"),
            "GENE,pval,fdr,z\nA1BG,0.1,0.2,1.0\nA2M,0.3,0.4,2.0\nA1BG,0.5,0.6,3.0\n",
        )
        .unwrap();

        let records = lookup_for(dir.path()).scores_for_gene("DRSCU", "A1BG").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symetric_score, Some(1.0));
        assert_eq!(records[1].symetric_score, Some(3.0));
    }

    #[test]
    fn test_unknown_gene_is_no_match() {
        let dir = tempdir().unwrap();
        write_group_table(dir.path(), MetricsGroup::Cpgx);

        let outcome = lookup_for(dir.path()).gene_score("CPGX", "NOPE");
        assert!(matches!(outcome, Lookup::NoMatch));
    }

    #[test]
    fn test_missing_values() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("GERP_DATA.csv"),
            "GENE,pval,fdr,z\nA1BG,NA,,1.0\nA2M,0.3,0.4,NA\nA4GALT,0.5,0.6,3.0\n",
        )
        .unwrap();

        let lookup = lookup_for(dir.path());
        let a1bg = lookup.scores_for_gene("GERP", "A1BG").unwrap();
        assert_eq!(a1bg[0].pval, None);
        assert_eq!(a1bg[0].fdr, None);
        assert!((a1bg[0].norm_symetric_score.unwrap() + 1.0).abs() < 1e-12);

        let a2m = lookup.scores_for_gene("GERP", "A2M").unwrap();
        assert_eq!(a2m[0].symetric_score, None);
        assert_eq!(a2m[0].norm_symetric_score, None);
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let dir = tempdir().unwrap();
        let outcome = lookup_for(dir.path()).gene_score("SURF", "A1BG");
        assert!(matches!(outcome.error(), Some(LookupError::SourceFile { .. })));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let dir = tempdir().unwrap();
        // SURF expects GENES, not GENE
        fs::write(dir.path().join("SURF_DATA.csv"), "GENE,pval,fdr,z\nA1BG,0.1,0.2,1.0\n").unwrap();

        let result = lookup_for(dir.path()).scores_for_gene("SURF", "A1BG");
        assert!(matches!(result, Err(LookupError::MissingColumn { ref column, .. }) if column == "GENES"));
    }

    #[test]
    fn test_non_numeric_score_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("RSCU_DATA.csv"),
            "GENE,pval,fdr,z\nA1BG,0.1,0.2,1.0\nA2M,0.3,0.4,high\n",
        )
        .unwrap();

        let result = lookup_for(dir.path()).scores_for_gene("RSCU", "A1BG");
        assert!(matches!(
            result,
            Err(LookupError::InvalidValue { row: 3, ref column, .. }) if column == "z"
        ));
    }

    #[test]
    fn test_all_groups_sweep() {
        let dir = tempdir().unwrap();
        write_group_table(dir.path(), MetricsGroup::Surf);
        write_group_table(dir.path(), MetricsGroup::Gerp);

        let results = lookup_for(dir.path()).gene_scores_all_groups("A1BG");
        assert_eq!(results.len(), MetricsGroup::ALL.len());

        for (group, outcome) in &results {
            match group {
                MetricsGroup::Surf | MetricsGroup::Gerp => {
                    assert_eq!(outcome.rows().len(), 1);
                    assert_eq!(outcome.rows()[0].group, *group);
                }
                _ => assert!(outcome.is_failed(), "{} has no table", group),
            }
        }
    }
}
