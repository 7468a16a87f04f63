mod cli;
mod sample;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use xray_core::logging::{self, LogOptions};
use xray_view::{NeverThrowingExecutor, PassthroughExecutor, Snapshot, ThreadExecutor, Xray};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&LogOptions {
        file: cli.log_file,
        dir: None,
    })?;
    info!(version = env!("CARGO_PKG_VERSION"), "xray starting");

    let config = cli.load_config()?;
    let windows = match &cli.snapshot {
        Some(path) => {
            info!(path = %path.display(), "loading hierarchy snapshot");
            Snapshot::from_path(path)?.into_window_manager()
        }
        None => sample::sample_hierarchy(),
    };
    let options = cli::scan_options(&config, Arc::new(windows), cli.test_tag.as_deref())?;

    let output = match config.executor.timeout_ms {
        Some(timeout_ms) => Xray::scan_with(
            &options,
            &NeverThrowingExecutor::new(ThreadExecutor::new(Duration::from_millis(timeout_ms))),
        )?,
        None => Xray::scan_with(&options, &NeverThrowingExecutor::new(PassthroughExecutor))?,
    };
    print!("{output}");
    Ok(())
}
