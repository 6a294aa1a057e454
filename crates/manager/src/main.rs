//! certman - certbot supervisor.
//!
//! Load config, validate, run the initial certificate batch, and only if
//! that fully succeeds, schedule recurring renewal checks until a
//! termination signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use certman_certbot::{
    run_initial_batch, validate_config_authenticators, AuthenticatorRegistry, CertbotRunner,
    FlagRegistry,
};
use certman_config::{Config, DEFAULT_CERTBOT_PATH, DEFAULT_CONFIG_PATH, DEFAULT_LOG_LEVEL};
use certman_manager::Scheduler;

/// Manages Let's Encrypt certificates through certbot using webroot or DNS
/// challenges.
#[derive(Parser, Debug)]
#[command(name = "certman")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Environment variables:\n  \
    CERTBOT_MANAGER_GLOBALS_<KEY>   overrides [globals] config values \
    (e.g. CERTBOT_MANAGER_GLOBALS_EMAIL)\n  \
    CERTBOT_MANAGER_CONFIG, CERTBOT_MANAGER_CERTBOT_PATH, CERTBOT_MANAGER_LOG_LEVEL\n  \
    override the corresponding flags")]
struct Cli {
    /// Configuration file path
    #[arg(
        short = 'c',
        long = "config",
        env = "CERTBOT_MANAGER_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    /// Path to the certbot executable
    #[arg(
        long = "certbot-path",
        env = "CERTBOT_MANAGER_CERTBOT_PATH",
        default_value = DEFAULT_CERTBOT_PATH
    )]
    certbot_path: String,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(
        long = "log-level",
        env = "CERTBOT_MANAGER_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    info!("starting certman");

    let config = Config::load(&cli.config).context("failed to load configuration")?;
    let runner = CertbotRunner::new(&cli.certbot_path).context("certbot path validation failed")?;

    // Registries are built once here and threaded through explicitly.
    let flags = FlagRegistry::standard();
    let authenticators = AuthenticatorRegistry::standard();
    validate_config_authenticators(&config, &authenticators)
        .context("configuration references an unknown authenticator")?;

    if config.certificates.is_empty() {
        info!("no [[certificate]] blocks found in configuration, nothing to schedule");
        return Ok(());
    }

    let outcome = run_initial_batch(&config, &runner, &flags, &authenticators).await;
    if !outcome.is_success() {
        error!(
            attempted = outcome.attempted,
            failed = outcome.failed,
            "one or more initial certificate requests failed; \
             the renewal scheduler will not start"
        );
        anyhow::bail!(
            "{} of {} initial certificate requests failed",
            outcome.failed,
            outcome.attempted
        );
    }
    info!("initial certificate processing completed successfully");

    let runner = Arc::new(runner);
    let job_runner = Arc::clone(&runner);
    let scheduler = Scheduler::start(&config.globals.renewal_cron, move || {
        let runner = Arc::clone(&job_runner);
        async move {
            info!("renewal check triggered");
            match runner.renew().await {
                Ok(()) => info!("renewal check finished successfully"),
                Err(error) => warn!(%error, "renewal check finished with potential issue"),
            }
        }
    })
    .context("failed to start cron scheduler")?;

    info!("certman running; renewal checks scheduled, waiting for signals");
    wait_for_shutdown_signal().await;

    info!("shutdown signal received");
    scheduler.stop().await;
    info!("certman stopped");
    Ok(())
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(error) => {
            warn!(%error, "failed to install SIGTERM handler, handling Ctrl-C only");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
