use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{Args, AverageArgs};
use crate::compare::ChainComparator;
use crate::data::model::Chain;
use crate::data::DEFAULT_TABLE;
use crate::render::ComparisonRenderer;

/// Steps discarded from the start of every chain.
pub const BURN_IN_STEP: i64 = 100_000;

// ---------------------------------------------------------------------------
// Comparison job: load → compare → render
// ---------------------------------------------------------------------------

/// Everything needed for one comparison run.
#[derive(Debug, Clone)]
pub struct ComparisonJob {
    pub file_1: PathBuf,
    pub label_1: String,
    pub file_2: PathBuf,
    pub label_2: String,
    pub output: PathBuf,
    pub burn_in: i64,
    pub table: String,
}

impl From<Args> for ComparisonJob {
    fn from(args: Args) -> Self {
        Self {
            file_1: args.file_1,
            label_1: args.label_1,
            file_2: args.file_2,
            label_2: args.label_2,
            output: args.output,
            burn_in: BURN_IN_STEP,
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl From<AverageArgs> for ComparisonJob {
    fn from(args: AverageArgs) -> Self {
        Self {
            file_1: args.file_1,
            label_1: args.label_1,
            file_2: args.file_2,
            label_2: args.label_2,
            output: args.output,
            burn_in: BURN_IN_STEP,
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl ComparisonJob {
    /// Load both chains, then render every shared parameter into `output`.
    /// Returns the page titles in document order.
    pub fn run(&self) -> Result<Vec<String>> {
        let renderer = ComparisonRenderer::new(self.load()?);
        let titles = renderer
            .render_all(&self.output)
            .with_context(|| format!("rendering {}", self.output.display()))?;
        Ok(titles)
    }

    /// Load both chains, then write the autocorrelation averaged over all
    /// parameters as a single page into `output`.
    pub fn run_average(&self) -> Result<()> {
        let renderer = ComparisonRenderer::new(self.load()?);
        renderer
            .write_average(&self.output)
            .with_context(|| format!("rendering {}", self.output.display()))
    }

    fn load(&self) -> Result<ChainComparator> {
        let first = Chain::load(&self.file_1, &self.label_1, self.burn_in, &self.table)
            .with_context(|| format!("loading chain '{}'", self.label_1))?;
        let second = Chain::load(&self.file_2, &self.label_2, self.burn_in, &self.table)
            .with_context(|| format!("loading chain '{}'", self.label_2))?;
        Ok(ChainComparator::new(first, second))
    }
}
