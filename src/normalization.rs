// ==============================================================================
// normalization.rs - Score Standardization
// ==============================================================================
// Description: Z-score standardization of a score column plus column statistics
// Author: Symetrics Developers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

/// Column transform applied to a raw score column before filtering
///
/// Output has the same length as the input; missing values stay missing.
pub trait Standardize {
    fn standardize(&self, values: &[Option<f64>]) -> Vec<Option<f64>>;
}

/// Z-score scaling over all present values in the column
///
/// # Algorithm
/// 1. Compute mean: μ = Σ(x) / n
/// 2. Compute standard deviation: σ = sqrt(Σ(x - μ)² / n)
/// 3. Scale each value: z = (x - μ) / σ
/// 4. If σ = 0 (constant values), z = 0
///
/// Missing values are excluded from μ and σ and are passed through as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZScoreScaler;

impl Standardize for ZScoreScaler {
    fn standardize(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let Some(stats) = ColumnStats::compute(values) else {
            return vec![None; values.len()];
        };

        values
            .iter()
            .map(|value| {
                value.map(|x| {
                    if stats.std_dev > 0.0 {
                        (x - stats.mean) / stats.std_dev
                    } else {
                        0.0
                    }
                })
            })
            .collect()
    }
}

/// Summary statistics for the present values of a column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divisor n)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Returns `None` when the column has no present values
    pub fn compute(values: &[Option<f64>]) -> Option<Self> {
        let present: Vec<f64> = values.iter().flatten().copied().collect();

        if present.is_empty() {
            return None;
        }

        let n = present.len() as f64;
        let mean = present.iter().sum::<f64>() / n;
        let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(ColumnStats {
            count: present.len(),
            mean,
            std_dev: variance.sqrt(),
            min: present.iter().copied().fold(f64::INFINITY, f64::min),
            max: present.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}
