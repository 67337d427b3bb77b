use std::path::PathBuf;

use clap::Parser;

/// Document written when no output path is given.
pub const DEFAULT_OUTPUT: &str = "trace_comp.pdf";

/// Document written by `average_autocorrelation` when no output path is given.
pub const DEFAULT_AVERAGE_OUTPUT: &str = "average_ac.pdf";

pub const USAGE: &str = "Usage: chain-compare file1 label1 file2 label2 [output]";

/// Compare two MCMC chains parameter by parameter (trace, posterior,
/// autocorrelation) and write the plots to a multi-page PDF.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, override_usage = "chain-compare <FILE1> <LABEL1> <FILE2> <LABEL2> [OUTPUT]")]
pub struct Args {
    /// First chain (.parquet, .json, .csv or a directory)
    #[arg(value_name = "FILE1")]
    pub file_1: PathBuf,

    /// Legend label of the first chain
    #[arg(value_name = "LABEL1", allow_hyphen_values = true)]
    pub label_1: String,

    /// Second chain
    #[arg(value_name = "FILE2")]
    pub file_2: PathBuf,

    /// Legend label of the second chain
    #[arg(value_name = "LABEL2", allow_hyphen_values = true)]
    pub label_2: String,

    /// Output PDF
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Trailing arguments are accepted and ignored.
    #[arg(hide = true)]
    pub extra: Vec<String>,
}

/// Plot the autocorrelation of two MCMC chains averaged over all their
/// parameters, with 1σ and full-range bands, on a single PDF page.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct AverageArgs {
    /// First chain (.parquet, .json, .csv or a directory)
    #[arg(value_name = "FILE1")]
    pub file_1: PathBuf,

    /// Legend label of the first chain
    #[arg(value_name = "LABEL1", allow_hyphen_values = true)]
    pub label_1: String,

    /// Second chain
    #[arg(value_name = "FILE2")]
    pub file_2: PathBuf,

    /// Legend label of the second chain
    #[arg(value_name = "LABEL2", allow_hyphen_values = true)]
    pub label_2: String,

    /// Output PDF
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_AVERAGE_OUTPUT)]
    pub output: PathBuf,
}
