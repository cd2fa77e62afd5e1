use fecviz_common::{ContributionRecord, FecVizError, HistogramConfig, Result};
use serde::{Deserialize, Serialize};

/// Ascending bin edges starting at 0. `n` edges make `n` bins; the last one is open above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinBoundaries {
    thresholds: Vec<f64>,
    edges: Vec<f64>,
}

impl BinBoundaries {
    pub fn new(thresholds: &[f64]) -> Result<Self> {
        if thresholds.is_empty() {
            return Err(FecVizError::InvalidBins("no thresholds".into()));
        }
        if let Some(t) = thresholds.iter().find(|t| !t.is_finite() || **t <= 0.0) {
            return Err(FecVizError::InvalidBins(format!("threshold {t} must be finite and > 0")));
        }
        if thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(FecVizError::InvalidBins("thresholds must be strictly ascending".into()));
        }
        Ok(Self::from_sorted(thresholds.to_vec()))
    }

    fn from_sorted(thresholds: Vec<f64>) -> Self {
        let mut edges = Vec::with_capacity(thresholds.len() + 1);
        edges.push(0.0);
        edges.extend_from_slice(&thresholds);
        Self { thresholds, edges }
    }

    /// Thresholds as given, without the leading 0.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Bin holding `amount`, or `None` for NaN and infinities.
    /// Negative amounts (refunds) land in bin 0.
    pub fn bin_index(&self, amount: f64) -> Option<usize> {
        if !amount.is_finite() {
            return None;
        }
        let above = self.edges.partition_point(|&e| e <= amount);
        Some(above.saturating_sub(1))
    }

    pub fn upper_bound(&self, index: usize) -> f64 {
        self.edges.get(index + 1).copied().unwrap_or(f64::INFINITY)
    }
}

/// Bins for the thresholds of [`HistogramConfig::default`].
impl Default for BinBoundaries {
    fn default() -> Self {
        Self::from_sorted(HistogramConfig::default().thresholds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower_bound: f64,
    pub upper_bound: f64, // f64::INFINITY for the top bin
    pub count: u64,
    #[serde(skip)]
    pub records: Vec<ContributionRecord>,
}

impl HistogramBin {
    /// Bounds and count without the member records.
    pub fn summary(&self) -> Self {
        Self {
            lower_bound: self.lower_bound,
            upper_bound: self.upper_bound,
            count: self.count,
            records: Vec::new(),
        }
    }

    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.lower_bound && amount < self.upper_bound
    }
}

/// Buckets records by amount. Always returns one bin per edge, in order.
pub fn bucket(records: &[ContributionRecord], boundaries: &BinBoundaries) -> Vec<HistogramBin> {
    let mut bins: Vec<HistogramBin> = boundaries
        .edges()
        .iter()
        .enumerate()
        .map(|(i, &lower)| HistogramBin {
            lower_bound: lower,
            upper_bound: boundaries.upper_bound(i),
            count: 0,
            records: Vec::new(),
        })
        .collect();
    for r in records {
        if let Some(idx) = boundaries.bin_index(r.amount) {
            bins[idx].count += 1;
            bins[idx].records.push(r.clone());
        }
    }
    bins
}

pub fn max_bin_count(bins: &[HistogramBin]) -> u64 {
    bins.iter().map(|b| b.count).max().unwrap_or(0)
}
