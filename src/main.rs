use chain_compare::app::ComparisonJob;
use chain_compare::cli::{Args, USAGE};
use clap::error::ErrorKind;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            log::debug!("argument error: {e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    if !args.extra.is_empty() {
        log::warn!("Ignoring extra arguments: {:?}", args.extra);
    }

    let job = ComparisonJob::from(args);
    job.run()?;
    println!("Comparison saved to {}", job.output.display());
    Ok(())
}
