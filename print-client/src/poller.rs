//! Polling trigger
//!
//! Walks order ids upwards: fetch the next id, print it, advance. The
//! state file only moves forward after a printed outcome, so an order that
//! could not be printed is retried instead of skipped.

use crate::jobs::PrintJobRunner;
use crate::state::PollState;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What one poll iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Order printed and recorded; poll the next id right away
    Printed(u64),
    /// Order exists but every print stage failed; retry after the interval
    Unprinted(u64),
    /// No order with this id yet
    NotFound(u64),
    /// Unexpected error; back off
    Failed(u64),
}

pub struct Poller {
    jobs: Arc<PrintJobRunner>,
    state: PollState,
    poll_interval: Duration,
    error_backoff: Duration,
    next_id: u64,
}

impl Poller {
    /// Start from the stored state, or `start_id` without one
    pub async fn new(
        jobs: Arc<PrintJobRunner>,
        state: PollState,
        start_id: u64,
        poll_interval: Duration,
        error_backoff: Duration,
    ) -> Self {
        let next_id = state.next_id(start_id).await;
        Self {
            jobs,
            state,
            poll_interval,
            error_backoff,
            next_id,
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Try the next id once
    pub async fn step(&mut self) -> PollStep {
        let id = self.next_id;
        debug!(order_id = id, "Checking for order");

        match self.jobs.fetch_and_print(id).await {
            Ok(outcome) if outcome.is_printed() => {
                if let Err(e) = self.state.save(id).await {
                    error!(order_id = id, error = %e, "Printed but failed to save state");
                }
                info!(order_id = id, "Order processed");
                self.next_id = id + 1;
                PollStep::Printed(id)
            }
            Ok(_) => {
                warn!(order_id = id, "Failed to print order, will retry");
                PollStep::Unprinted(id)
            }
            Err(e) if e.is_not_found() => PollStep::NotFound(id),
            Err(e) => {
                error!(order_id = id, error = %e, "Unexpected error while processing order");
                PollStep::Failed(id)
            }
        }
    }

    /// How long to wait after `step`
    pub fn delay_after(&self, step: PollStep) -> Duration {
        match step {
            PollStep::Printed(_) => Duration::ZERO,
            PollStep::Unprinted(_) | PollStep::NotFound(_) => self.poll_interval,
            PollStep::Failed(_) => self.error_backoff,
        }
    }

    /// Poll until `shutdown` is cancelled
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            start_id = self.next_id,
            state_file = %self.state.path().display(),
            interval_secs = self.poll_interval.as_secs(),
            "Polling started"
        );

        // Steps run to completion; shutdown is only checked between them
        while !shutdown.is_cancelled() {
            let step = self.step().await;

            let delay = self.delay_after(step);
            if delay.is_zero() {
                continue;
            }
            if let PollStep::NotFound(id) = step {
                debug!(order_id = id, wait_secs = delay.as_secs(), "No new order, waiting");
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!(next_id = self.next_id, "Polling stopped");
    }
}
