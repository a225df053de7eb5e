//! curfewd - scheduled internet curfew enforcement
//!
//! This is the main entry point for the curfewd service. It wires together:
//! - The compiled-in weekly schedule
//! - The curfew switch
//! - The Linux adapter set (rtnetlink)
//! - The tick loop and signal handling

use anyhow::{Context, Result};
use clap::Parser;
use curfew_core::{Clock, CurfewSwitch, SwitchOutcome, UtcClock};
use curfew_host_api::AdapterSet;
use curfew_host_linux::{LinuxAdapterSet, ProbeConfig, ReachabilityProbe};
use curfew_schedule::Schedule;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// curfewd - scheduled internet curfew enforcement
#[derive(Parser, Debug)]
#[command(name = "curfewd")]
#[command(about = "Scheduled internet curfew enforcement", long_about = None)]
struct Args {
    /// Seconds between schedule evaluations
    #[arg(short, long, env = "CURFEWD_INTERVAL_SECS", default_value_t = 1)]
    interval_secs: u64,

    /// Re-assert the current state every N ticks even without a change
    /// (guards against adapters toggled behind the daemon's back; 0 disables)
    #[arg(long, env = "CURFEWD_REASSERT_EVERY", default_value_t = 60)]
    reassert_every: u32,

    /// URL probed after transitions to log whether they took effect
    #[arg(long, env = "CURFEWD_PROBE_URL",
          default_value = "http://connectivitycheck.gstatic.com/generate_204")]
    probe_url: String,

    /// Timeout for reachability probes, in seconds
    #[arg(long, default_value_t = 5)]
    probe_timeout_secs: u64,

    /// Disable post-transition reachability probing
    #[arg(long)]
    no_probe: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print the effective schedule as JSON and exit
    #[arg(long)]
    print_schedule: bool,
}

/// Main service state
struct Service {
    switch: CurfewSwitch,
    clock: UtcClock,
    probe: Option<Arc<ReachabilityProbe>>,
    interval: Duration,
    reassert_every: u32,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        let adapters =
            Arc::new(LinuxAdapterSet::new().context("Failed to enumerate network adapters")?);

        if adapters.list().is_empty() {
            warn!("No network adapters found; state changes will have nothing to apply");
        } else {
            info!(count = adapters.list().len(), "Adapter set captured");
        }

        let probe = if args.no_probe {
            None
        } else {
            let config = ProbeConfig {
                url: args.probe_url.clone(),
                timeout: Duration::from_secs(args.probe_timeout_secs),
            };
            Some(Arc::new(
                ReachabilityProbe::new(config).context("Failed to build reachability probe")?,
            ))
        };

        let switch = CurfewSwitch::new(Schedule::default_curfew(), adapters);

        Ok(Self {
            switch,
            clock: UtcClock,
            probe,
            interval: Duration::from_secs(args.interval_secs.max(1)),
            reassert_every: args.reassert_every,
        })
    }

    async fn run(mut self) -> Result<()> {
        // Establish ground truth before the first tick
        let outcome = self
            .switch
            .update(self.clock.now(), true)
            .await
            .context("Initial schedule evaluation failed")?;
        self.spawn_probe(&outcome);

        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;
        let mut sighup = signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?;

        let mut tick_timer = tokio::time::interval(self.interval);
        tick_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        let mut ticks_since_assert: u32 = 0;

        info!("Service running");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully");
                    break;
                }
                _ = sighup.recv() => {
                    info!("Received SIGHUP, shutting down gracefully");
                    break;
                }

                _ = tick_timer.tick() => {
                    ticks_since_assert += 1;
                    let force = self.reassert_every > 0
                        && ticks_since_assert >= self.reassert_every;
                    if force {
                        ticks_since_assert = 0;
                    }

                    // A schedule error is a construction bug; stop rather
                    // than keep running with an unenforced curfew
                    let outcome = self
                        .switch
                        .update(self.clock.now(), force)
                        .await
                        .context("Schedule evaluation failed")?;

                    if matches!(outcome, SwitchOutcome::Applied { .. }) && !force {
                        self.spawn_probe(&outcome);
                    }
                }
            }
        }

        // A stopped curfew must not strand the network off
        info!("Shutting down curfewd");
        let failures = self.switch.release().await;
        if failures > 0 {
            warn!(failures, "Some adapters could not be re-enabled on shutdown");
        }

        info!("Shutdown complete");
        Ok(())
    }

    /// Log, out of band, whether an applied transition took effect.
    fn spawn_probe(&self, outcome: &SwitchOutcome) {
        let SwitchOutcome::Applied { state, .. } = *outcome else {
            return;
        };
        let Some(probe) = &self.probe else {
            return;
        };

        let probe = probe.clone();
        tokio::spawn(async move {
            let reachable = probe.is_reachable().await;
            info!(
                state = %state,
                reachable,
                url = probe.url(),
                "Post-transition reachability"
            );
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_schedule {
        let schedule = Schedule::default_curfew();
        println!(
            "{}",
            serde_json::to_string_pretty(&schedule).context("Failed to serialize schedule")?
        );
        return Ok(());
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "curfewd starting");
    if curfew_util::is_mock_time_active() {
        warn!("Mock time is active; curfew decisions will not track real time");
    }

    let service = Service::new(&args)?;
    service.run().await
}
