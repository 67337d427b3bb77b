use anyhow::Result;
use clap::Parser;

use chain_compare::app::ComparisonJob;
use chain_compare::cli::AverageArgs;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let job = ComparisonJob::from(AverageArgs::parse());
    job.run_average()?;
    println!("Average autocorrelation saved to {}", job.output.display());
    Ok(())
}
