//! The curfew switch state machine

use curfew_host_api::{AdapterFailure, AdapterSet};
use curfew_schedule::{NetworkState, Schedule, ScheduleError};
use curfew_util::TimePoint;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What an update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Evaluation matched the recorded state and the update was not forced;
    /// no adapter was touched.
    Unchanged { state: NetworkState },

    /// The state was applied to the adapter set (on a transition or a
    /// forced re-assertion). `failures` counts adapters that could not be
    /// toggled; the recorded state stands regardless.
    Applied {
        state: NetworkState,
        failures: usize,
    },
}

impl SwitchOutcome {
    pub fn state(&self) -> NetworkState {
        match self {
            SwitchOutcome::Unchanged { state } | SwitchOutcome::Applied { state, .. } => *state,
        }
    }
}

/// Holds the current state and the schedule; applies transitions through
/// the injected adapter capability.
///
/// State starts as `Allowed` until the first forced update establishes
/// ground truth. Side effects happen only on a state change or a forced
/// re-assertion, never on every tick, so established connections and
/// leases are not disturbed while the decision is stable.
pub struct CurfewSwitch {
    state: NetworkState,
    schedule: Schedule,
    adapters: Arc<dyn AdapterSet>,
}

impl CurfewSwitch {
    pub fn new(schedule: Schedule, adapters: Arc<dyn AdapterSet>) -> Self {
        Self {
            state: NetworkState::Allowed,
            schedule,
            adapters,
        }
    }

    pub fn state(&self) -> NetworkState {
        self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Re-evaluate the schedule at `now` and apply the result.
    ///
    /// A `ScheduleError` means the schedule itself is broken (a day type
    /// without a profile); it propagates to the caller, which must treat it
    /// as fatal rather than keep running with an unenforced curfew.
    pub async fn update(
        &mut self,
        now: TimePoint,
        force: bool,
    ) -> Result<SwitchOutcome, ScheduleError> {
        let new_state = self.schedule.state_at(&now)?;

        if new_state == self.state && !force {
            debug!(state = %self.state, at = %now, "State unchanged, skipping");
            return Ok(SwitchOutcome::Unchanged { state: self.state });
        }

        info!(
            from = %self.state,
            to = %new_state,
            at = %now,
            forced = force,
            "Applying network state"
        );

        self.state = new_state;

        let failures = match new_state {
            NetworkState::Allowed => self.adapters.enable_all().await,
            NetworkState::Forbidden => self.adapters.disable_all().await,
        };

        report_failures(&failures);

        Ok(SwitchOutcome::Applied {
            state: new_state,
            failures: failures.len(),
        })
    }

    /// Force the adapters back up regardless of schedule, recording
    /// `Allowed`. Used on daemon shutdown so a stopped curfew never strands
    /// the network off.
    pub async fn release(&mut self) -> usize {
        info!(from = %self.state, "Releasing curfew, re-enabling adapters");

        self.state = NetworkState::Allowed;
        let failures = self.adapters.enable_all().await;
        report_failures(&failures);
        failures.len()
    }
}

fn report_failures(failures: &[AdapterFailure]) {
    for failure in failures {
        warn!(
            adapter = %failure.adapter,
            error = %failure.error,
            "Adapter operation failed"
        );
    }
}
