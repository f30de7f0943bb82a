use anyhow::{Context, Result};
use clap::Parser;
use claimcheck_client::{ClaimBackend, HttpBackend};
use claimcheck_common::observability::{LogConfig, init_logging};
use claimcheck_config::ClaimCheckConfig;
use cli::Cli;
use std::{process::ExitCode, sync::Arc, time::Duration};
use tether::{Tether, build_interactive};

mod cli;
mod oneshot;
mod tether;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let cfg: ClaimCheckConfig = cli.load_config().context("loading configuration")?;
    let one_shot = cli.one_shot_claim();

    // Never write logs to the terminal the UI is drawing on.
    let log_path = init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: one_shot.is_some(),
        format: cfg.logging.format,
        default_filter: cfg.logging.filter.clone(),
        ..LogConfig::default()
    })?;
    tracing::debug!(log = %log_path.display(), backend = %cfg.backend.base_url, "app.start");

    let backend = HttpBackend::new(&cfg.backend.base_url, &cfg.backend.check_path)?
        .with_timeout(Duration::from_secs(cfg.backend.timeout_secs));

    if let Some(claim) = one_shot {
        let ok = oneshot::run_once(&backend, &claim, cli.json, &mut std::io::stdout().lock()).await?;
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let backend: Arc<dyn ClaimBackend> = Arc::new(backend);
    let mut tether = Tether::new();
    build_interactive(&mut tether, backend)?;
    tether.run().await?;
    Ok(ExitCode::SUCCESS)
}
