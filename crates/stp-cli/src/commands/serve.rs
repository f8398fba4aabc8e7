//! Serve command: the network time endpoint.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use stp_clock::SntpClient;
use tokio::net::TcpListener;

use crate::Config;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (defaults to the configured bind address).
    #[arg(long)]
    pub bind: Option<String>,
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// Runs the serve command until Ctrl-C.
pub fn run(args: &ServeArgs, config: &Config) -> Result<()> {
    let bind = args.bind.as_deref().unwrap_or(&config.bind);
    let source = Arc::new(SntpClient::new(&config.ntp_host, config.ntp_port));

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime.block_on(async {
        let listener = TcpListener::bind(bind)
            .await
            .with_context(|| format!("failed to bind {bind}"))?;
        println!(
            "Serving network time on http://{}{}",
            listener.local_addr().context("failed to read listen address")?,
            stp_clock::TIME_ROUTE
        );
        stp_clock::server::serve(listener, source, shutdown_signal())
            .await
            .context("time server failed")
    })
}
