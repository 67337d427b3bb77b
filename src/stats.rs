//! Numeric kernels behind the chain accessors: summary statistics,
//! histogramming against explicit or counted bins, and the FFT
//! autocorrelation used for the diagnostic pages.

use rustfft::{num_complex::Complex64, FftPlanner};

use crate::error::StatsError;

/// Default number of bins when a histogram is requested by count.
pub const DEFAULT_HIST_BINS: usize = 100;

/// Bin specification for [`histogram`].
#[derive(Debug, Clone, PartialEq)]
pub enum Bins {
    /// Equal-width bins spanning the data range.
    Count(usize),
    /// Explicit, monotonically increasing bin edges.
    Edges(Vec<f64>),
}

impl Default for Bins {
    fn default() -> Self {
        Bins::Count(DEFAULT_HIST_BINS)
    }
}

/// Bin counts plus the edges they were computed against.
///
/// `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramResult {
    pub counts: Vec<u64>,
    pub edges: Vec<f64>,
}

impl HistogramResult {
    /// `(left, right, count)` for every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (no Bessel correction).
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Min and max, skipping `NaN`. `None` when no finite-or-infinite value exists.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// `num` evenly spaced points over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut out: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            out[num - 1] = stop;
            out
        }
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Histogram `values` against `bins`.
///
/// Bins are half-open `[left, right)` except the last one, which also
/// includes its right edge. Values outside the edges and `NaN`s are not
/// counted. With `Bins::Count` the edges span the data's min/max; a
/// zero-width range is widened by 0.5 on each side.
pub fn histogram(values: &[f64], bins: &Bins) -> Result<HistogramResult, StatsError> {
    let edges = match bins {
        Bins::Edges(edges) => edges.clone(),
        Bins::Count(n) => {
            if *n == 0 {
                return Err(StatsError::TooFewEdges(1));
            }
            let (mut lo, mut hi) = min_max(values).unwrap_or((0.0, 1.0));
            if !lo.is_finite() || !hi.is_finite() {
                return Err(StatsError::InvalidRange(lo, hi));
            }
            if lo == hi {
                lo -= 0.5;
                hi += 0.5;
            }
            linspace(lo, hi, n + 1)
        }
    };

    if edges.len() < 2 {
        return Err(StatsError::TooFewEdges(edges.len()));
    }
    if edges
        .windows(2)
        .any(|w| w[1] < w[0] || w[0].is_nan() || w[1].is_nan())
    {
        return Err(StatsError::NonMonotonicEdges);
    }

    let n_bins = edges.len() - 1;
    let first = edges[0];
    let last = edges[n_bins];
    let mut counts = vec![0u64; n_bins];

    for &v in values {
        if v.is_nan() || v < first || v > last {
            continue;
        }
        let idx = edges.partition_point(|&e| e <= v) - 1;
        counts[idx.min(n_bins - 1)] += 1;
    }

    Ok(HistogramResult { counts, edges })
}

// ---------------------------------------------------------------------------
// Autocorrelation
// ---------------------------------------------------------------------------

/// Per-sample normaliser `std(x) * sqrt(x[i])`.
///
/// Returns `None` when any element is zero or `NaN`; callers then divide by
/// one everywhere. The fallback is all-or-nothing, never per element.
pub fn autocorrelation_normaliser(values: &[f64]) -> Option<Vec<f64>> {
    let sd = std_dev(values);
    let div: Vec<f64> = values.iter().map(|&v| sd * v.sqrt()).collect();
    if div.iter().any(|&d| d == 0.0 || d.is_nan()) {
        None
    } else {
        Some(div)
    }
}

/// Autocorrelation by lag, computed through the power spectrum.
///
/// The centred signal is scaled by [`autocorrelation_normaliser`], pushed
/// through a length-`n` FFT, squared in magnitude, and transformed back.
/// The result is divided by its maximum so lag 0 reads 1.0. A signal with no
/// positive maximum (constant input) is returned unscaled, all zeros.
pub fn autocorrelation(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let m = mean(values);
    let signal: Vec<Complex64> = match autocorrelation_normaliser(values) {
        Some(div) => values
            .iter()
            .zip(div.iter())
            .map(|(&v, &d)| Complex64::new((v - m) / d, 0.0))
            .collect(),
        None => {
            log::debug!("autocorrelation normaliser degenerate, falling back to ones");
            values.iter().map(|&v| Complex64::new(v - m, 0.0)).collect()
        }
    };

    let mut planner = FftPlanner::<f64>::new();
    let mut buffer = signal;
    planner.plan_fft_forward(n).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex64::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(n).process(&mut buffer);

    // rustfft leaves the inverse unscaled.
    let scale = 1.0 / n as f64;
    let mut acf: Vec<f64> = buffer.iter().map(|c| c.re * scale).collect();

    let peak = acf.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if peak.is_finite() && peak > 0.0 {
        for v in acf.iter_mut() {
            *v /= peak;
        }
    }
    acf
}
