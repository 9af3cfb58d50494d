use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use datum_shift::catalog;
use datum_shift::config::{CliArgs, PipelineConfig};
use datum_shift::pipeline::Pipeline;

fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();

    // Init tracing
    let filter = if args.verbose {
        EnvFilter::new("datum_shift=debug")
    } else {
        EnvFilter::new("datum_shift=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config: PipelineConfig = args.into();

    if config.list_datums {
        for name in catalog::datum_names() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Configure rayon thread pool
    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure rayon thread pool")?;
    }

    match Pipeline::run(&config) {
        Ok(result) => {
            println!(
                "Done: {} converted, {} failed in {:.2}s",
                result.report.converted,
                result.report.failed,
                result.duration.as_secs_f64()
            );
            if result.report.success {
                Ok(ExitCode::SUCCESS)
            } else {
                warn!(failed = result.report.failed, "Some records could not be converted");
                Ok(ExitCode::FAILURE)
            }
        }
        Err(e) => {
            error!(%e, "Pipeline failed");
            Err(anyhow::anyhow!(e)).context("datum-shift pipeline failed")
        }
    }
}
