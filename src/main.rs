use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use superquick::cli::Cli;
use superquick::Finder;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let options = cli.build_options().context("invalid configuration")?;
    debug!("Resolved options: {:?}", options);

    let report = Finder::new(options)
        .find()
        .with_context(|| format!("cannot search {}", cli.root_path().display()))?;

    debug!(
        "{} path(s) passed over by the skip/hidden/symlink policy",
        report.stats.skipped_policy
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    cli.formatter()
        .write(&report, &mut out)
        .context("failed to write results")?;
    out.flush().context("failed to write results")?;

    Ok(())
}
