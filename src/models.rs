// ==============================================================================
// models.rs - Annotation Data Models
// ==============================================================================
// Description: Metrics groups, variant keys and the canonical output records
//              returned by variant and gene score lookups
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::LookupError;

/// Named source of precomputed gene- or variant-level scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricsGroup {
    Surf,
    Rscu,
    Cpgx,
    Cpg,
    Drscu,
    Gerp,
    Synvep,
}

impl MetricsGroup {
    /// Every registered group, in registry order
    pub const ALL: [MetricsGroup; 7] = [
        MetricsGroup::Surf,
        MetricsGroup::Rscu,
        MetricsGroup::Cpgx,
        MetricsGroup::Cpg,
        MetricsGroup::Drscu,
        MetricsGroup::Gerp,
        MetricsGroup::Synvep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricsGroup::Surf => "SURF",
            MetricsGroup::Rscu => "RSCU",
            MetricsGroup::Cpgx => "CPGX",
            MetricsGroup::Cpg => "CPG",
            MetricsGroup::Drscu => "DRSCU",
            MetricsGroup::Gerp => "GERP",
            MetricsGroup::Synvep => "SYNVEP",
        }
    }
}

impl fmt::Display for MetricsGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricsGroup {
    type Err = LookupError;

    /// Exact, case-sensitive match on the group name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricsGroup::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| LookupError::InvalidGroup(s.to_string()))
    }
}

/// Reference genome coordinate build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenomeBuild {
    /// GRCh37 / hg19 (legacy)
    #[serde(rename = "GRCh37")]
    Grch37,
    /// GRCh38 / hg38
    #[serde(rename = "GRCh38")]
    Grch38,
}

impl GenomeBuild {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenomeBuild::Grch37 => "GRCh37",
            GenomeBuild::Grch38 => "GRCh38",
        }
    }
}

/// Chromosome/position/reference/alternate identifying a single variant
///
/// The build is not part of the key: the same key names different loci on
/// GRCh37 and GRCh38, so a key is only meaningful against a source of the
/// matching build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    pub chromosome: String,
    pub position: i64,
    pub ref_allele: String,
    pub alt_allele: String,
}

impl VariantKey {
    pub fn new(
        chromosome: impl Into<String>,
        position: i64,
        ref_allele: impl Into<String>,
        alt_allele: impl Into<String>,
    ) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.chromosome, self.position, self.ref_allele, self.alt_allele
        )
    }
}

impl FromStr for VariantKey {
    type Err = LookupError;

    /// Parse `CHR:POS:REF:ALT` (e.g. "7:91763673:C:A")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LookupError::InvalidVariantKey(s.to_string());

        let fields: Vec<&str> = s.trim().split(':').collect();
        let [chromosome, position, ref_allele, alt_allele] = fields.as_slice() else {
            return Err(invalid());
        };

        if [chromosome, ref_allele, alt_allele].iter().any(|f| f.is_empty()) {
            return Err(invalid());
        }

        let position: i64 = position.parse().map_err(|_| invalid())?;

        Ok(VariantKey::new(*chromosome, position, *ref_allele, *alt_allele))
    }
}

/// A single column value as stored in the annotation database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl AnnotationValue {
    /// Text rendering, used for the CHR/REF/ALT/GENE fields
    pub fn as_text(&self) -> Option<String> {
        match self {
            AnnotationValue::Null => None,
            AnnotationValue::Integer(i) => Some(i.to_string()),
            AnnotationValue::Real(r) => Some(r.to_string()),
            AnnotationValue::Text(t) => Some(t.clone()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AnnotationValue::Integer(i) => Some(*i),
            AnnotationValue::Real(r) if r.fract() == 0.0 => Some(*r as i64),
            AnnotationValue::Text(t) => t.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<rusqlite::types::Value> for AnnotationValue {
    fn from(value: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value;

        match value {
            Value::Null => AnnotationValue::Null,
            Value::Integer(i) => AnnotationValue::Integer(i),
            Value::Real(r) => AnnotationValue::Real(r),
            Value::Text(t) => AnnotationValue::Text(t),
            Value::Blob(b) => AnnotationValue::Text(String::from_utf8_lossy(&b).into_owned()),
        }
    }
}

/// One matching row from a variant source, reshaped to canonical fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(rename = "CHR")]
    pub chromosome: String,

    #[serde(rename = "POS")]
    pub position: i64,

    #[serde(rename = "REF")]
    pub ref_allele: String,

    #[serde(rename = "ALT")]
    pub alt_allele: String,

    #[serde(rename = "GENE")]
    pub gene: Option<String>,

    /// Source-specific score fields keyed by canonical name (e.g. "RSCU", "SURF")
    #[serde(flatten)]
    pub scores: BTreeMap<String, AnnotationValue>,
}

impl AnnotationRecord {
    pub fn key(&self) -> VariantKey {
        VariantKey::new(
            self.chromosome.clone(),
            self.position,
            self.ref_allele.clone(),
            self.alt_allele.clone(),
        )
    }

    pub fn score(&self, name: &str) -> Option<&AnnotationValue> {
        self.scores.get(name)
    }
}

/// Per-gene score from a metrics group's score table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "GENE")]
    pub gene: String,

    #[serde(rename = "PVAL")]
    pub pval: Option<f64>,

    #[serde(rename = "FDR")]
    pub fdr: Option<f64>,

    /// Raw statistic from the source table
    #[serde(rename = "SYMETRIC_SCORE")]
    pub symetric_score: Option<f64>,

    /// Raw statistic standardized over the full source table
    #[serde(rename = "NORM_SYMETRIC_SCORE")]
    pub norm_symetric_score: Option<f64>,

    /// Group that produced this record
    #[serde(rename = "GROUP")]
    pub group: MetricsGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_group_from_str() {
        assert_eq!("SURF".parse::<MetricsGroup>().unwrap(), MetricsGroup::Surf);
        assert_eq!("DRSCU".parse::<MetricsGroup>().unwrap(), MetricsGroup::Drscu);

        // Unknown and wrong-case names are rejected, not defaulted
        assert!(matches!(
            "surf".parse::<MetricsGroup>(),
            Err(LookupError::InvalidGroup(_))
        ));
        assert!(matches!(
            "SILVA".parse::<MetricsGroup>(),
            Err(LookupError::InvalidGroup(_))
        ));
    }

    #[test]
    fn test_metrics_group_serde_matches_as_str() {
        for group in MetricsGroup::ALL {
            let json = serde_json::to_string(&group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.as_str()));
        }
    }

    #[test]
    fn test_variant_key_parse() {
        let key: VariantKey = "7:91763673:C:A".parse().unwrap();
        assert_eq!(key, VariantKey::new("7", 91763673, "C", "A"));
        assert_eq!(key.to_string(), "7:91763673:C:A");

        assert!("7:91763673:C".parse::<VariantKey>().is_err());
        assert!("7:abc:C:A".parse::<VariantKey>().is_err());
        assert!("7:100::A".parse::<VariantKey>().is_err());
    }

    #[test]
    fn test_variant_key_alleles_case_sensitive() {
        let upper = VariantKey::new("2", 232536581, "A", "T");
        let lower = VariantKey::new("2", 232536581, "a", "T");
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_annotation_record_serializes_canonical_fields() {
        let mut scores = BTreeMap::new();
        scores.insert("SURF".to_string(), AnnotationValue::Real(0.42));

        let record = AnnotationRecord {
            chromosome: "2".to_string(),
            position: 232536581,
            ref_allele: "A".to_string(),
            alt_allele: "T".to_string(),
            gene: Some("ALPP".to_string()),
            scores,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["CHR"], "2");
        assert_eq!(json["POS"], 232536581);
        assert_eq!(json["GENE"], "ALPP");
        assert_eq!(json["SURF"], 0.42);
    }

    #[test]
    fn test_annotation_value_text() {
        assert_eq!(AnnotationValue::Integer(7).as_text(), Some("7".to_string()));
        assert_eq!(AnnotationValue::Null.as_text(), None);
        assert_eq!(AnnotationValue::Text("100".to_string()).as_i64(), Some(100));
    }
}
