//! Timer loop driving refresh cycles
//!
//! A long periodic interval runs the regular check. After the user acts on
//! an update, a one-shot short timer re-checks so the installed list picks
//! up the new version. Manual checks arrive over a command channel.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::{RECHECK_DELAY_MS, UpdaterConfig};

use super::refresh::{UpdateReport, Updater};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Run a cycle immediately
    CheckNow,
    /// Arm the one-shot re-check timer
    RecheckSoon,
    Shutdown,
}

/// Sending side of the scheduler's command channel
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: UnboundedSender<SchedulerCommand>,
}

impl SchedulerHandle {
    /// Returns false when the scheduler is no longer running
    pub fn check_now(&self) -> bool {
        self.tx.send(SchedulerCommand::CheckNow).is_ok()
    }

    pub fn recheck_soon(&self) -> bool {
        self.tx.send(SchedulerCommand::RecheckSoon).is_ok()
    }

    pub fn shutdown(&self) -> bool {
        self.tx.send(SchedulerCommand::Shutdown).is_ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    interval: Duration,
    recheck_delay: Duration,
}

enum Wake {
    Tick,
    Recheck,
    Manual,
}

impl Scheduler {
    pub fn new(interval: Duration, recheck_delay: Duration) -> Self {
        Self {
            interval,
            recheck_delay,
        }
    }

    pub fn from_config(config: &UpdaterConfig) -> Self {
        Self::new(
            Duration::from_millis(config.refresh_interval.max(1)),
            Duration::from_millis(RECHECK_DELAY_MS),
        )
    }

    pub fn channel() -> (SchedulerHandle, UnboundedReceiver<SchedulerCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SchedulerHandle { tx }, rx)
    }

    /// Drive `updater` until shutdown is requested or every handle is dropped.
    ///
    /// The first periodic tick fires immediately. Any cycle disarms a pending
    /// re-check. Returns the number of cycles run.
    pub async fn run<F>(
        &self,
        updater: &mut Updater,
        mut commands: UnboundedReceiver<SchedulerCommand>,
        mut on_report: F,
    ) -> usize
    where
        F: FnMut(&UpdateReport),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let recheck = tokio::time::sleep(self.recheck_delay);
        tokio::pin!(recheck);
        let mut recheck_armed = false;

        let mut cycles = 0;

        info!(
            "Scheduler started (interval {:?}, re-check delay {:?})",
            self.interval, self.recheck_delay
        );

        loop {
            let wake = tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(SchedulerCommand::CheckNow) => Wake::Manual,
                    Some(SchedulerCommand::RecheckSoon) => {
                        recheck
                            .as_mut()
                            .reset(Instant::now() + self.recheck_delay);
                        recheck_armed = true;
                        debug!("Re-check armed");
                        continue;
                    }
                    Some(SchedulerCommand::Shutdown) | None => break,
                },
                _ = &mut recheck, if recheck_armed => Wake::Recheck,
                _ = ticker.tick() => Wake::Tick,
            };

            match wake {
                Wake::Tick => debug!("Periodic refresh"),
                Wake::Recheck => debug!("Re-check after user action"),
                Wake::Manual => debug!("Manual refresh"),
            }

            recheck_armed = false;
            let report = updater.refresh_cycle().await;
            cycles += 1;
            on_report(&report);
        }

        info!("Scheduler stopped after {} cycles", cycles);
        cycles
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::from_config(&UpdaterConfig::default())
    }
}
