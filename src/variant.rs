// ==============================================================================
// variant.rs - Variant Annotation Lookup
// ==============================================================================
// Description: Exact-match variant lookups against the SILVA (GRCh37), SURF
//              (GRCh38) and SYNVEP (GRCh38) annotation tables
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Each source keeps its own native column names. The schema descriptors below
// map them onto the canonical CHR/POS/REF/ALT/GENE record plus score fields.
// Identifiers come only from these descriptors; variant fields are always
// bound as parameters.
// ==============================================================================

use rusqlite::params;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};

use crate::error::{Lookup, LookupError};
use crate::models::{AnnotationRecord, AnnotationValue, GenomeBuild, VariantKey};
use crate::store::StoreHandle;

/// Variant-level annotation table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantSource {
    Silva,
    Surf,
    Synvep,
}

/// Native score column and the name it is reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreColumn {
    pub native: &'static str,
    pub canonical: &'static str,
}

/// Native layout of one variant table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSchema {
    pub table: &'static str,
    pub build: GenomeBuild,
    pub chromosome_column: &'static str,
    pub position_column: &'static str,
    pub ref_column: &'static str,
    pub alt_column: &'static str,
    pub gene_column: &'static str,
    pub score_columns: &'static [ScoreColumn],
}

static SILVA_SCHEMA: SourceSchema = SourceSchema {
    table: "SILVA",
    build: GenomeBuild::Grch37,
    chromosome_column: "#chrom",
    position_column: "pos",
    ref_column: "ref",
    alt_column: "alt",
    gene_column: "gene",
    score_columns: &[
        ScoreColumn { native: "#RSCU", canonical: "RSCU" },
        ScoreColumn { native: "dRSCU", canonical: "dRSCU" },
        ScoreColumn { native: "#GERP++", canonical: "GERP" },
        ScoreColumn { native: "#CpG?", canonical: "CPG" },
        ScoreColumn { native: "CpG_exon", canonical: "CPGX" },
    ],
};

static SURF_SCHEMA: SourceSchema = SourceSchema {
    table: "SURF",
    build: GenomeBuild::Grch38,
    chromosome_column: "CHR",
    position_column: "POS",
    ref_column: "REF",
    alt_column: "ALT",
    gene_column: "GENE",
    score_columns: &[ScoreColumn { native: "SURF", canonical: "SURF" }],
};

static SYNVEP_SCHEMA: SourceSchema = SourceSchema {
    table: "SYNVEP",
    build: GenomeBuild::Grch38,
    chromosome_column: "chr",
    position_column: "pos_GRCh38",
    ref_column: "ref",
    alt_column: "alt",
    gene_column: "HGNC_gene_symbol",
    score_columns: &[ScoreColumn { native: "synVep", canonical: "SYNVEP" }],
};

impl VariantSource {
    pub const ALL: [VariantSource; 3] = [VariantSource::Silva, VariantSource::Surf, VariantSource::Synvep];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantSource::Silva => "silva",
            VariantSource::Surf => "surf",
            VariantSource::Synvep => "synvep",
        }
    }

    pub fn schema(&self) -> &'static SourceSchema {
        match self {
            VariantSource::Silva => &SILVA_SCHEMA,
            VariantSource::Surf => &SURF_SCHEMA,
            VariantSource::Synvep => &SYNVEP_SCHEMA,
        }
    }

    /// Coordinate build the source's positions are expressed in
    pub fn build(&self) -> GenomeBuild {
        self.schema().build
    }
}

impl fmt::Display for VariantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantSource {
    type Err = LookupError;

    /// Accepts the source name or its table name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantSource::ALL
            .iter()
            .copied()
            .find(|source| {
                s.eq_ignore_ascii_case(source.as_str()) || s.eq_ignore_ascii_case(source.schema().table)
            })
            .ok_or_else(|| LookupError::UnknownSource(s.to_string()))
    }
}

/// Integer chromosomes bind as INTEGER so they also match untyped columns
fn chromosome_param(chromosome: &str) -> Value {
    match chromosome.parse::<i64>() {
        Ok(n) => Value::Integer(n),
        Err(_) => Value::Text(chromosome.to_string()),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl SourceSchema {
    /// SELECT for an exact four-field match; parameters are ?1..?4 = chr, pos, ref, alt
    pub fn select_sql(&self) -> String {
        let mut columns = vec![
            self.chromosome_column,
            self.position_column,
            self.ref_column,
            self.alt_column,
            self.gene_column,
        ];
        columns.extend(self.score_columns.iter().map(|c| c.native));

        let select_list = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "SELECT {} FROM {} WHERE {} = ?1 AND {} = ?2 AND {} = ?3 AND {} = ?4",
            select_list,
            quote_ident(self.table),
            quote_ident(self.chromosome_column),
            quote_ident(self.position_column),
            quote_ident(self.ref_column),
            quote_ident(self.alt_column),
        )
    }

    /// Reshape a row produced by `select_sql` into the canonical record
    fn to_record(&self, row_idx: usize, row: Vec<Value>) -> Result<AnnotationRecord, LookupError> {
        let mut values = row.into_iter().map(AnnotationValue::from);
        let mut next = || values.next().unwrap_or(AnnotationValue::Null);

        // The equality predicate guarantees CHR/POS/REF/ALT are non-null
        let chromosome = next().as_text().unwrap_or_default();
        let position_value = next();
        let position = position_value.as_i64().ok_or_else(|| LookupError::InvalidValue {
            row: row_idx + 1,
            column: self.position_column.to_string(),
            value: position_value.as_text().unwrap_or_default(),
        })?;
        let ref_allele = next().as_text().unwrap_or_default();
        let alt_allele = next().as_text().unwrap_or_default();
        let gene = next().as_text();

        let scores: BTreeMap<String, AnnotationValue> = self
            .score_columns
            .iter()
            .map(|column| (column.canonical.to_string(), next()))
            .collect();

        Ok(AnnotationRecord {
            chromosome,
            position,
            ref_allele,
            alt_allele,
            gene,
            scores,
        })
    }
}

/// Fetch every row of `source` matching `key` exactly, in table order
pub fn lookup(
    store: &StoreHandle,
    source: VariantSource,
    key: &VariantKey,
) -> Result<Vec<AnnotationRecord>, LookupError> {
    let schema = source.schema();
    let sql = schema.select_sql();

    let rows = store.query_rows(
        &sql,
        params![
            chromosome_param(&key.chromosome),
            key.position,
            key.ref_allele,
            key.alt_allele
        ],
    )?;

    rows.into_iter()
        .enumerate()
        .map(|(idx, row)| schema.to_record(idx, row))
        .collect()
}

/// Lookup that never fails outward: errors are logged and returned as `Lookup::Failed`
pub fn annotate(store: &StoreHandle, source: VariantSource, key: &VariantKey) -> Lookup<AnnotationRecord> {
    let outcome = Lookup::from(lookup(store, source, key));

    match &outcome {
        Lookup::Failed(e) => error!(
            "{} lookup for {} ({}) on {} failed: {}",
            source,
            key,
            source.build().as_str(),
            store.location().display(),
            e
        ),
        _ => info!(
            "{} lookup for {} ({}): {} record(s)",
            source,
            key,
            source.build().as_str(),
            outcome.rows().len()
        ),
    }

    outcome
}
