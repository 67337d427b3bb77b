//! Autocorrelation summarised across every parameter of a chain.

use crate::stats::{mean, std_dev};

/// Per-lag summary of a set of autocorrelation series.
///
/// Every vector has one entry per lag, truncated to the shortest input.
/// `std` is the population spread of the parameters at that lag, so
/// `mean ± std` is the 1σ band drawn around the average.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageAutocorrelation {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    /// Number of series that went into the summary.
    pub parameters: usize,
}

impl AverageAutocorrelation {
    /// Summarise `series` lag by lag. `None` when there is nothing to average.
    pub fn from_series(series: &[Vec<f64>]) -> Option<Self> {
        let lags = series.iter().map(Vec::len).min()?;

        let mut summary = Self {
            mean: Vec::with_capacity(lags),
            std: Vec::with_capacity(lags),
            min: Vec::with_capacity(lags),
            max: Vec::with_capacity(lags),
            parameters: series.len(),
        };
        let mut at_lag = Vec::with_capacity(series.len());
        for lag in 0..lags {
            at_lag.clear();
            at_lag.extend(series.iter().map(|s| s[lag]));
            summary.mean.push(mean(&at_lag));
            summary.std.push(std_dev(&at_lag));
            summary
                .min
                .push(at_lag.iter().copied().fold(f64::INFINITY, f64::min));
            summary
                .max
                .push(at_lag.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        }
        Some(summary)
    }

    /// Number of lags.
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    pub fn lower(&self) -> Vec<f64> {
        self.mean.iter().zip(&self.std).map(|(m, s)| m - s).collect()
    }

    pub fn upper(&self) -> Vec<f64> {
        self.mean.iter().zip(&self.std).map(|(m, s)| m + s).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_summary_per_lag() {
        let series = vec![vec![1.0, 0.5, 0.0], vec![1.0, 0.1, -0.2]];
        let avg = AverageAutocorrelation::from_series(&series).unwrap();

        assert_eq!(avg.parameters, 2);
        assert_eq!(avg.len(), 3);
        assert_abs_diff_eq!(avg.mean[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.std[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.mean[1], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(avg.std[1], 0.2, epsilon = 1e-12);
        assert_eq!(avg.min, vec![1.0, 0.1, -0.2]);
        assert_eq!(avg.max, vec![1.0, 0.5, 0.0]);

        let lower = avg.lower();
        let upper = avg.upper();
        assert_abs_diff_eq!(lower[1], 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(upper[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_truncates_to_shortest_series() {
        let series = vec![vec![1.0, 0.5, 0.2, 0.1], vec![1.0, 0.7]];
        let avg = AverageAutocorrelation::from_series(&series).unwrap();
        assert_eq!(avg.len(), 2);
        assert_abs_diff_eq!(avg.mean[1], 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_nothing_to_average() {
        assert!(AverageAutocorrelation::from_series(&[]).is_none());
        let empty = AverageAutocorrelation::from_series(&[Vec::new()]).unwrap();
        assert!(empty.is_empty());
    }
}
