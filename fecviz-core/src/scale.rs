use serde::{Deserialize, Serialize};

/// Maps a value to the range slot chosen by how many thresholds it reaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdScale {
    domain: Vec<f64>,
    range: Vec<f64>,
}

impl ThresholdScale {
    /// `range` should hold `domain.len() + 1` values; lookups past its end clamp to the last one.
    pub fn new(domain: Vec<f64>, range: Vec<f64>) -> Self {
        Self { domain, range }
    }

    /// Thresholds spread evenly over `[0, width)` in `domain.len() + 1` steps.
    pub fn evenly_spaced(domain: &[f64], width: f64) -> Self {
        let steps = domain.len() + 1;
        let step = width / steps as f64;
        let range = (0..steps).map(|i| i as f64 * step).collect();
        Self::new(domain.to_vec(), range)
    }

    pub fn apply(&self, value: f64) -> f64 {
        let slot = self.domain.partition_point(|&d| d <= value);
        self.range
            .get(slot)
            .or_else(|| self.range.last())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn range(&self) -> &[f64] {
        &self.range
    }

    pub fn range_extent(&self) -> (f64, f64) {
        match (self.range.first(), self.range.last()) {
            (Some(&a), Some(&b)) => (a.min(b), a.max(b)),
            _ => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// A zero-width domain sends everything to the start of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }
}

/// Scales fixed for a dataset: bin thresholds to x offsets, amounts to heights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleState {
    pub x_scale: ThresholdScale,
    /// Amount domain; kept for callers, bars are sized by count instead.
    pub y_scale: LinearScale,
}

/// Rounds half-way cases toward positive infinity.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_scale() -> ThresholdScale {
        ThresholdScale::evenly_spaced(
            &[50.0, 200.0, 500.0, 1000.0, 10000.0, 50000.0, 100000.0, 1000000.0],
            330.0,
        )
    }

    #[test]
    fn threshold_range_has_nine_steps() {
        let s = x_scale();
        assert_eq!(s.range().len(), 9);
        assert_eq!(s.range()[0], 0.0);
        assert!((s.range()[1] - 330.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn threshold_lookup() {
        let s = x_scale();
        assert_eq!(s.apply(10.0), 0.0);
        assert!((s.apply(50.0) - 330.0 / 9.0).abs() < 1e-9);
        assert!((s.apply(1_000_000.0) - 8.0 * 330.0 / 9.0).abs() < 1e-9);
        assert!((s.apply(1e12) - 8.0 * 330.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn range_extent_spans_first_to_last() {
        let (a, b) = x_scale().range_extent();
        assert_eq!(a, 0.0);
        assert!((b - 8.0 * 330.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn linear_maps_domain_onto_range() {
        let s = LinearScale::new((0.0, 2.0), (0.0, 450.0));
        assert_eq!(s.apply(1.0), 225.0);
        assert_eq!(s.apply(2.0), 450.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let s = LinearScale::new((0.0, 0.0), (0.0, 450.0));
        assert_eq!(s.apply(0.0), 0.0);
        assert_eq!(s.apply(7.0), 0.0);
    }

    #[test]
    fn rounding_ties_go_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }
}
