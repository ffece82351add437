use anyhow::Context;
use clap::Parser;

fn main() -> Result<(), anyhow::Error> {
    let cli = alarmctl::Cli::parse();
    cli.init_logging()?;

    // Commands make one AWS call at a time, so a single-threaded runtime is all we need.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(cli.run())
}
