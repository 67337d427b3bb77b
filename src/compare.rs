use crate::average::AverageAutocorrelation;
use crate::data::model::Chain;
use crate::error::ChainError;
use crate::stats::{linspace, Bins, HistogramResult};

/// Number of shared bin edges used for the posterior comparison.
pub const SHARED_HIST_BINS: usize = 25;

// ---------------------------------------------------------------------------
// Chain comparator
// ---------------------------------------------------------------------------

/// Two labelled chains queried side by side.
///
/// The first chain's schema is authoritative: parameters that exist only in
/// the second chain are never listed.
#[derive(Debug, Clone)]
pub struct ChainComparator {
    first: Chain,
    second: Chain,
}

impl ChainComparator {
    pub fn new(first: Chain, second: Chain) -> Self {
        for chain in [&first, &second] {
            if chain.is_empty() {
                log::warn!("'{}' has no samples after the burn-in cut", chain.label());
            }
        }
        let extra: Vec<&String> = second
            .parameter_names()
            .iter()
            .filter(|p| !first.has_parameter(p))
            .collect();
        if !extra.is_empty() {
            log::warn!(
                "Parameters only in '{}' will not be plotted: {extra:?}",
                second.label()
            );
        }
        Self { first, second }
    }

    pub fn labels(&self) -> (&str, &str) {
        (self.first.label(), self.second.label())
    }

    /// Parameters of the first chain, in its schema order.
    pub fn parameter_names(&self) -> &[String] {
        self.first.parameter_names()
    }

    /// Range covering both chains: min of the mins, max of the maxes.
    pub fn min_max(&self, name: &str) -> Result<(f64, f64), ChainError> {
        let (min_1, max_1) = self.first.min_max(name)?;
        let (min_2, max_2) = self.second.min_max(name)?;
        Ok((min_1.min(min_2), max_1.max(max_2)))
    }

    /// Histogram both chains against one edge vector of `bin_count` points
    /// spanning [`Self::min_max`].
    ///
    /// `bin_count` points make `bin_count - 1` bins. Degenerate requests
    /// (`bin_count < 2`, or a zero-width range) are left to
    /// [`crate::stats::histogram`].
    pub fn shared_histograms(
        &self,
        name: &str,
        bin_count: usize,
    ) -> Result<(HistogramResult, HistogramResult), ChainError> {
        let (lo, hi) = self.min_max(name)?;
        let bins = Bins::Edges(linspace(lo, hi, bin_count));
        Ok((
            self.first.histogram(name, &bins)?,
            self.second.histogram(name, &bins)?,
        ))
    }

    pub fn autocorrelations(&self, name: &str) -> Result<(Vec<f64>, Vec<f64>), ChainError> {
        Ok((
            self.first.autocorrelation(name)?,
            self.second.autocorrelation(name)?,
        ))
    }

    /// Autocorrelation of every listed parameter, averaged per chain.
    pub fn average_autocorrelations(
        &self,
    ) -> Result<(AverageAutocorrelation, AverageAutocorrelation), ChainError> {
        let mut first = Vec::with_capacity(self.parameter_names().len());
        let mut second = Vec::with_capacity(self.parameter_names().len());
        for name in self.parameter_names() {
            let (ac_1, ac_2) = self.autocorrelations(name)?;
            first.push(ac_1);
            second.push(ac_2);
        }
        log::info!("Averaging autocorrelation over {} parameters", first.len());

        let summarise = |chain: &Chain, series: &[Vec<f64>]| {
            AverageAutocorrelation::from_series(series)
                .ok_or_else(|| ChainError::NoParameters(chain.label().to_string()))
        };
        Ok((
            summarise(&self.first, &first)?,
            summarise(&self.second, &second)?,
        ))
    }

    pub fn parameter_values(&self, name: &str) -> Result<(&[f64], &[f64]), ChainError> {
        Ok((
            self.first.parameter_values(name)?,
            self.second.parameter_values(name)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::table_with_steps;
    use crate::data::model::Column;
    use crate::error::StatsError;

    fn chain(label: &str, columns: Vec<Column>) -> Chain {
        let n = columns.first().map_or(0, |c| c.values.len());
        Chain::from_table(label, table_with_steps(n, columns), -1).unwrap()
    }

    #[test]
    fn test_min_max_is_union_range() {
        let a = chain("a", vec![Column::new("p", vec![0.0, 4.0, 10.0])]);
        let b = chain("b", vec![Column::new("p", vec![-5.0, 3.0, 1.0])]);
        let cmp = ChainComparator::new(a, b);
        assert_eq!(cmp.min_max("p").unwrap(), (-5.0, 10.0));
    }

    #[test]
    fn test_shared_histograms_use_identical_edges() {
        let a = chain("a", vec![Column::new("p", (0..50).map(|i| i as f64).collect())]);
        let b = chain("b", vec![Column::new("p", (0..50).map(|i| i as f64 * 0.5 - 20.0).collect())]);
        let cmp = ChainComparator::new(a, b);

        let (h1, h2) = cmp.shared_histograms("p", SHARED_HIST_BINS).unwrap();
        assert_eq!(h1.edges, h2.edges);
        assert_eq!(h1.edges.len(), SHARED_HIST_BINS);
        assert_eq!(h1.counts.len(), SHARED_HIST_BINS - 1);
        assert_eq!(h1.edges[0], -20.0);
        assert_eq!(*h1.edges.last().unwrap(), 49.0);
        // Every sample falls inside the union range.
        assert_eq!(h1.counts.iter().sum::<u64>(), 50);
        assert_eq!(h2.counts.iter().sum::<u64>(), 50);
    }

    #[test]
    fn test_shared_histograms_degenerate_bin_count() {
        let a = chain("a", vec![Column::new("p", vec![1.0, 2.0])]);
        let b = chain("b", vec![Column::new("p", vec![1.0, 2.0])]);
        let cmp = ChainComparator::new(a, b);
        assert_eq!(
            cmp.shared_histograms("p", 1).unwrap_err(),
            ChainError::Stats(StatsError::TooFewEdges(1))
        );
    }

    #[test]
    fn test_shared_histograms_constant_chains() {
        let a = chain("a", vec![Column::new("p", vec![5.0; 4])]);
        let b = chain("b", vec![Column::new("p", vec![5.0; 6])]);
        let cmp = ChainComparator::new(a, b);
        let (h1, h2) = cmp.shared_histograms("p", 5).unwrap();
        assert_eq!(h1.edges, vec![5.0; 5]);
        assert_eq!(h1.counts, vec![0, 0, 0, 4]);
        assert_eq!(h2.counts, vec![0, 0, 0, 6]);
    }

    #[test]
    fn test_first_schema_is_authoritative() {
        let a = chain(
            "a",
            vec![Column::new("a", vec![1.0]), Column::new("b", vec![2.0])],
        );
        let b = chain(
            "b",
            vec![
                Column::new("a", vec![1.0]),
                Column::new("b", vec![2.0]),
                Column::new("c", vec![3.0]),
            ],
        );
        let cmp = ChainComparator::new(a, b);
        assert_eq!(cmp.parameter_names(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_pairs_keep_chain_order() {
        let a = chain("first", vec![Column::new("p", vec![1.0, 2.0, 3.0])]);
        let b = chain("second", vec![Column::new("p", vec![7.0, 8.0])]);
        let cmp = ChainComparator::new(a, b);

        let (v1, v2) = cmp.parameter_values("p").unwrap();
        assert_eq!(v1, &[1.0, 2.0, 3.0]);
        assert_eq!(v2, &[7.0, 8.0]);

        let (ac1, ac2) = cmp.autocorrelations("p").unwrap();
        assert_eq!(ac1.len(), 3);
        assert_eq!(ac2.len(), 2);
        assert_eq!(cmp.labels(), ("first", "second"));
    }

    #[test]
    fn test_average_autocorrelations_cover_every_parameter() {
        let a = chain(
            "a",
            vec![
                Column::new("p", (0..32).map(|i| 2.0 + (i as f64 * 0.4).sin()).collect()),
                Column::new("q", (0..32).map(|i| 3.0 + ((i * 5) % 7) as f64).collect()),
            ],
        );
        let b = chain(
            "b",
            vec![
                Column::new("p", (0..16).map(|i| 1.0 + i as f64).collect()),
                Column::new("q", (0..16).map(|i| 1.0 + (i % 3) as f64).collect()),
            ],
        );
        let cmp = ChainComparator::new(a, b);
        let (avg_1, avg_2) = cmp.average_autocorrelations().unwrap();

        assert_eq!(avg_1.parameters, 2);
        assert_eq!(avg_1.len(), 32);
        assert_eq!(avg_2.len(), 16);

        let (p, _) = cmp.autocorrelations("p").unwrap();
        let (q, _) = cmp.autocorrelations("q").unwrap();
        for lag in [0, 3, 31] {
            let want = (p[lag] + q[lag]) / 2.0;
            assert!((avg_1.mean[lag] - want).abs() < 1e-12);
            assert!(avg_1.min[lag] <= avg_1.mean[lag] && avg_1.mean[lag] <= avg_1.max[lag]);
        }
    }

    #[test]
    fn test_average_autocorrelations_need_parameters() {
        let a = chain("a", vec![]);
        let b = chain("b", vec![]);
        let cmp = ChainComparator::new(a, b);
        assert_eq!(
            cmp.average_autocorrelations().unwrap_err(),
            ChainError::NoParameters("a".into())
        );
    }

    #[test]
    fn test_parameter_missing_from_second_chain() {
        let a = chain("a", vec![Column::new("only_a", vec![1.0])]);
        let b = chain("b", vec![Column::new("other", vec![1.0])]);
        let cmp = ChainComparator::new(a, b);
        assert!(matches!(
            cmp.min_max("only_a"),
            Err(ChainError::UnknownParameter { chain, .. }) if chain == "b"
        ));
    }
}
