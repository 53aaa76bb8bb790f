//! Interactive banking desk.
//!
//! Menu on stdout, logs on stderr. See [`bankdesk::BankConfig`] for the
//! environment variables it reads.

use anyhow::Result;
use bankdesk::{BankConfig, BankEnvironment, Shell};
use bankdesk_core::environment::SystemClock;
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let config = BankConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(bankdesk::config::DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!(
        min_balance = %config.defaults.min_balance,
        overdraft_limit = %config.defaults.overdraft_limit,
        "banking desk starting"
    );

    let env = BankEnvironment::new(Arc::new(SystemClock)).with_defaults(config.defaults);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), env);
    shell.run()?;

    info!(accounts = shell.state().count(), "banking desk closed");
    Ok(())
}
