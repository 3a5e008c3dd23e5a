//! fmc-route - build an FMC flight plan route interactively.

use std::io;

use anyhow::Result;
use clap::Parser;
use fmc_cli::{Args, Config, Console, Session, SessionOutcome};
use fmc_core::ReferenceData;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env().with_args(&args);

    // Logs go to stderr so they never interleave with prompts on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let reference = load_reference(&config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());
    match Session::new(&mut console, &reference).run()? {
        SessionOutcome::Finalized(doc) => {
            tracing::info!(legs = doc.legs.len(), "done");
        }
        SessionOutcome::Discarded => {
            tracing::info!("route discarded, nothing written");
        }
    }

    Ok(())
}

fn load_reference(config: &Config) -> ReferenceData {
    match ReferenceData::load(&config.airports_path, &config.nav_data_path) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(%err, "reference data unavailable, all positions must be entered manually");
            ReferenceData::empty()
        }
    }
}
