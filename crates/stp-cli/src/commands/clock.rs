//! Clock command: network time, ticking once a second.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use stp_clock::{ClockSync, SntpClient, TimeSource, TimeSyncClient};
use stp_core::clock::{ClockDisplay, DisplayZone};

use crate::Config;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Args)]
pub struct ClockArgs {
    /// Stop after this many ticks. Runs until Ctrl-C otherwise.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Query the NTP server directly instead of the time endpoint.
    #[arg(long)]
    pub direct: bool,
}

/// Formats one clock line.
pub fn format_display(display: &ClockDisplay) -> String {
    let mut line = format!("{}  {}", display.zone, display.text);
    if let Some(notice) = display.notice {
        line.push_str("  (");
        line.push_str(notice);
        line.push(')');
    }
    line
}

/// Prints the clock every second until `ticks` lines are out or Ctrl-C.
pub async fn tick<W: Write>(
    writer: &mut W,
    sync: &ClockSync,
    zone: &DisplayZone,
    ticks: Option<u64>,
) -> Result<()> {
    let mut interval = tokio::time::interval(TICK);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut printed = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => break,
        }
        writeln!(writer, "{}", format_display(&sync.display(zone)))?;
        writer.flush()?;
        printed += 1;
        if ticks.is_some_and(|limit| printed >= limit) {
            break;
        }
    }
    Ok(())
}

fn time_source(args: &ClockArgs, config: &Config) -> Result<Arc<dyn TimeSource>> {
    if args.direct {
        return Ok(Arc::new(SntpClient::new(&config.ntp_host, config.ntp_port)));
    }
    let client =
        TimeSyncClient::new(&config.time_sync_url).context("failed to create time sync client")?;
    Ok(Arc::new(client))
}

/// Runs the clock command.
pub fn run(args: &ClockArgs, config: &Config) -> Result<()> {
    let source = time_source(args, config)?;
    let zone = config.display_zone();
    tracing::debug!(direct = args.direct, zone = %zone.label, "starting clock");

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    runtime.block_on(async {
        let sync = ClockSync::start(source, config.refresh_interval());
        let result = tick(&mut std::io::stdout(), &sync, &zone, args.ticks).await;
        sync.stop();
        result
    })
}
