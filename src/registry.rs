// ==============================================================================
// registry.rs - Metrics Group Registry
// ==============================================================================
// Description: Static column mapping for every metrics group's score table
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Adding a group means adding a MetricsGroup variant and one row below.
// ==============================================================================

use crate::models::MetricsGroup;

/// Native column names of one group's score table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMapping {
    pub group: MetricsGroup,
    /// Column holding the raw statistic (becomes SYMETRIC_SCORE)
    pub raw_score_column: &'static str,
    pub pvalue_column: &'static str,
    pub fdr_column: &'static str,
    pub gene_column: &'static str,
}

const GROUP_MAPPINGS: [GroupMapping; 7] = [
    GroupMapping {
        group: MetricsGroup::Surf,
        raw_score_column: "z",
        pvalue_column: "pval",
        fdr_column: "fdr",
        gene_column: "GENES",
    },
    GroupMapping {
        group: MetricsGroup::Rscu,
        raw_score_column: "z",
        pvalue_column: "pval",
        fdr_column: "fdr",
        gene_column: "GENE",
    },
    GroupMapping {
        group: MetricsGroup::Cpgx,
        raw_score_column: "z",
        pvalue_column: "pval",
        fdr_column: "fdr",
        gene_column: "GENE",
    },
    GroupMapping {
        group: MetricsGroup::Cpg,
        raw_score_column: "z",
        pvalue_column: "pval",
        fdr_column: "fdr",
        gene_column: "GENE",
    },
    GroupMapping {
        group: MetricsGroup::Drscu,
        raw_score_column: "z",
        pvalue_column: "pval",
        fdr_column: "fdr",
        gene_column: "GENE",
    },
    GroupMapping {
        group: MetricsGroup::Gerp,
        raw_score_column: "z",
        pvalue_column: "pval",
        fdr_column: "fdr",
        gene_column: "GENE",
    },
    GroupMapping {
        group: MetricsGroup::Synvep,
        raw_score_column: "z_ne",
        pvalue_column: "pval_ne",
        fdr_column: "fdr_ne",
        gene_column: "GENE",
    },
];

/// Look up the column mapping for a group
pub fn mapping(group: MetricsGroup) -> &'static GroupMapping {
    // Rows are stored in MetricsGroup declaration order
    &GROUP_MAPPINGS[group as usize]
}

/// All registered mappings, in registry order
pub fn mappings() -> &'static [GroupMapping] {
    &GROUP_MAPPINGS
}
