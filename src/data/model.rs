use std::path::{Path, PathBuf};

use crate::data::filter::{retained_rows, STEP_COLUMN};
use crate::error::{ChainError, LoadError};
use crate::stats::{self, Bins, HistogramResult};

// ---------------------------------------------------------------------------
// Column / ChainTable – raw table as read from disk
// ---------------------------------------------------------------------------

/// One named numeric column, widened to `f64`. Nulls are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A table of equally long numeric columns in schema order.
#[derive(Debug, Clone)]
pub struct ChainTable {
    /// Where the table was read from (used in error messages).
    pub source: PathBuf,
    pub columns: Vec<Column>,
}

impl ChainTable {
    /// Number of rows (length of the first column).
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// ---------------------------------------------------------------------------
// Chain – one labelled sample chain after the burn-in cut
// ---------------------------------------------------------------------------

/// A labelled MCMC chain restricted to rows with `step > burn_in`.
///
/// Immutable once built; every accessor hands out read-only views.
#[derive(Debug, Clone)]
pub struct Chain {
    label: String,
    columns: Vec<Column>,
    /// Column names minus `step`, in schema order.
    parameters: Vec<String>,
}

impl Chain {
    /// Load the table named `table` from `source` and apply the burn-in cut.
    pub fn load(
        source: &Path,
        label: impl Into<String>,
        burn_in: i64,
        table: &str,
    ) -> Result<Self, LoadError> {
        log::info!("Loading {}...", source.display());
        let raw = crate::data::loader::load_table(source, table)?;
        Self::from_table(label, raw, burn_in)
    }

    /// Build a chain from an in-memory table, keeping rows with `step > burn_in`.
    pub fn from_table(
        label: impl Into<String>,
        table: ChainTable,
        burn_in: i64,
    ) -> Result<Self, LoadError> {
        let label = label.into();
        let step = table
            .column(STEP_COLUMN)
            .ok_or_else(|| LoadError::MissingStepColumn {
                path: table.source.clone(),
            })?;

        let keep = retained_rows(&step.values, burn_in);
        log::info!(
            "{label}: kept {} of {} rows after burn-in cut (step > {burn_in})",
            keep.len(),
            table.num_rows()
        );

        let columns: Vec<Column> = table
            .columns
            .into_iter()
            .map(|col| Column {
                values: keep.iter().map(|&i| col.values[i]).collect(),
                name: col.name,
            })
            .collect();

        let parameters = columns
            .iter()
            .filter(|c| c.name != STEP_COLUMN)
            .map(|c| c.name.clone())
            .collect();

        Ok(Chain {
            label,
            columns,
            parameters,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Displayable parameters: every column except `step`, in schema order.
    pub fn parameter_names(&self) -> &[String] {
        &self.parameters
    }

    /// Whether `name` is a column of this chain (including `step`).
    pub fn has_parameter(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Values of column `name` in row order. `step` may be requested explicitly.
    pub fn parameter_values(&self, name: &str) -> Result<&[f64], ChainError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| ChainError::UnknownParameter {
                chain: self.label.clone(),
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn min_max(&self, name: &str) -> Result<(f64, f64), ChainError> {
        let values = self.parameter_values(name)?;
        stats::min_max(values).ok_or_else(|| self.empty(name))
    }

    pub fn histogram(&self, name: &str, bins: &Bins) -> Result<HistogramResult, ChainError> {
        Ok(stats::histogram(self.parameter_values(name)?, bins)?)
    }

    /// Max-normalised autocorrelation of column `name`, index 0 = lag 0.
    pub fn autocorrelation(&self, name: &str) -> Result<Vec<f64>, ChainError> {
        let values = self.parameter_values(name)?;
        if values.is_empty() {
            return Err(self.empty(name));
        }
        Ok(stats::autocorrelation(values))
    }

    fn empty(&self, name: &str) -> ChainError {
        ChainError::EmptyParameter {
            chain: self.label.clone(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Table with `step` 0..n followed by the given columns.
    pub(crate) fn table_with_steps(n: usize, columns: Vec<Column>) -> ChainTable {
        let mut all = vec![Column::new(STEP_COLUMN, (0..n).map(|i| i as f64).collect())];
        all.extend(columns);
        ChainTable {
            source: PathBuf::from("memory"),
            columns: all,
        }
    }

    #[test]
    fn test_burn_in_keeps_only_later_steps() {
        let table = table_with_steps(10, vec![Column::new("x", (0..10).map(|i| i as f64 * 2.0).collect())]);
        let chain = Chain::from_table("a", table, 4).unwrap();

        let steps = chain.parameter_values(STEP_COLUMN).unwrap();
        assert_eq!(steps, &[5.0, 6.0, 7.0, 8.0, 9.0]);
        assert!(steps.iter().all(|&s| s > 4.0));
        assert_eq!(chain.parameter_values("x").unwrap(), &[10.0, 12.0, 14.0, 16.0, 18.0]);
        assert_eq!(chain.len(), 5);
    }

    #[test]
    fn test_step_is_not_a_displayed_parameter() {
        let table = table_with_steps(
            3,
            vec![Column::new("b", vec![1.0; 3]), Column::new("a", vec![2.0; 3])],
        );
        let chain = Chain::from_table("a", table, -1).unwrap();
        assert_eq!(chain.parameter_names(), &["b".to_string(), "a".to_string()]);
        assert!(chain.has_parameter(STEP_COLUMN));
    }

    #[test]
    fn test_missing_step_column() {
        let table = ChainTable {
            source: PathBuf::from("memory"),
            columns: vec![Column::new("x", vec![1.0])],
        };
        let err = Chain::from_table("a", table, 0).unwrap_err();
        assert!(matches!(err, LoadError::MissingStepColumn { .. }));
    }

    #[test]
    fn test_unknown_parameter() {
        let chain = Chain::from_table("a", table_with_steps(3, vec![]), -1).unwrap();
        assert_eq!(
            chain.parameter_values("nope"),
            Err(ChainError::UnknownParameter {
                chain: "a".into(),
                name: "nope".into()
            })
        );
        assert!(chain.autocorrelation("nope").is_err());
        assert!(chain.min_max("nope").is_err());
    }

    #[test]
    fn test_accessors_after_cut() {
        let table = table_with_steps(
            6,
            vec![Column::new("x", vec![100.0, -100.0, 3.0, -2.0, 7.0, 1.0])],
        );
        let chain = Chain::from_table("a", table, 1).unwrap();
        // The cut removed the extreme values at steps 0 and 1.
        assert_eq!(chain.min_max("x").unwrap(), (-2.0, 7.0));

        let hist = chain.histogram("x", &Bins::Count(3)).unwrap();
        assert_eq!(hist.counts.iter().sum::<u64>(), 4);

        let acf = chain.autocorrelation("x").unwrap();
        assert_eq!(acf.len(), 4);
        assert_abs_diff_eq!(acf[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_everything_cut_is_empty_parameter() {
        let table = table_with_steps(5, vec![Column::new("x", vec![1.0; 5])]);
        let chain = Chain::from_table("a", table, 100).unwrap();
        assert!(chain.is_empty());
        assert!(matches!(
            chain.min_max("x"),
            Err(ChainError::EmptyParameter { .. })
        ));
        assert!(matches!(
            chain.autocorrelation("x"),
            Err(ChainError::EmptyParameter { .. })
        ));
    }
}
