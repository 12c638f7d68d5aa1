//! Auto-replenishment scheduler
//!
//! A single recurring task owns the tick state. Candidate SKUs are
//! matched on wall-clock HH:MM and processed sequentially; every
//! per-SKU failure is contained to that SKU and that tick, and a
//! cool-down lookback on AUTO proposals keeps overlapping minutes from
//! double-ordering.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{Local, Utc};

use crate::error::AppResult;
use crate::services::{PolicyService, ProposalService, ReplenishmentService};
use crate::AppState;
use shared::{cooldown_window_start, ProposalSource};

/// Lifecycle of the scheduler's tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running { started: Instant },
}

/// Recurring auto-replenishment task
pub struct AutoReplenishScheduler {
    state: AppState,
    run_state: Mutex<RunState>,
}

impl AutoReplenishScheduler {
    /// Create a scheduler bound to the application state
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            run_state: Mutex::new(RunState::Idle),
        }
    }

    /// Recurring loop; fires once per tick interval for the life of the
    /// process
    pub async fn run(self) {
        let mut interval =
            tokio::time::interval(Duration::from_secs(self.state.config.scheduler.tick_seconds));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let minute = Local::now().format("%H:%M").to_string();
            if let Err(err) = self.tick(&minute).await {
                tracing::error!("Auto-replenishment tick failed: {}", err);
            }
        }
    }

    /// One scheduler pass for the given wall-clock minute. Returns the
    /// number of proposals created.
    pub async fn tick(&self, minute: &str) -> AppResult<u32> {
        if !self.try_begin() {
            tracing::warn!("Previous auto-replenishment tick still running, skipping");
            return Ok(0);
        }
        let result = self.process_candidates(minute).await;
        self.release();
        result
    }

    /// Claim the run state. A Running state older than the configured
    /// maximum tick duration is considered stuck and is taken over
    /// rather than blocking all future ticks.
    fn try_begin(&self) -> bool {
        let mut guard = match self.run_state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match *guard {
            RunState::Idle => {
                *guard = RunState::Running {
                    started: Instant::now(),
                };
                true
            }
            RunState::Running { started } => {
                let max = Duration::from_secs(self.state.config.scheduler.max_tick_seconds);
                if started.elapsed() > max {
                    tracing::warn!("Releasing stale scheduler run state");
                    *guard = RunState::Running {
                        started: Instant::now(),
                    };
                    true
                } else {
                    false
                }
            }
        }
    }

    fn release(&self) {
        let mut guard = match self.run_state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = RunState::Idle;
    }

    /// Scan the candidates scheduled for this minute, SKU by SKU. A
    /// failure for one SKU never aborts the rest of the batch.
    async fn process_candidates(&self, minute: &str) -> AppResult<u32> {
        let candidates = PolicyService::new(self.state.db.clone())
            .auto_candidates(minute)
            .await?;
        if candidates.is_empty() {
            return Ok(0);
        }
        tracing::debug!(
            "Auto-replenishment tick at {}: {} candidate SKUs",
            minute,
            candidates.len()
        );

        let mut created = 0;
        for policy in &candidates {
            match self.process_sku(&policy.sku).await {
                Ok(true) => created += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::error!("Auto-replenishment for {} failed: {}", policy.sku, err);
                }
            }
        }
        if created > 0 {
            tracing::info!(
                "Auto-replenishment tick at {} created {} proposals",
                minute,
                created
            );
        }
        Ok(created)
    }

    /// Evaluate one SKU; Ok(true) when a proposal was created
    async fn process_sku(&self, sku: &str) -> AppResult<bool> {
        // Cool-down guard: a recent AUTO proposal suppresses another
        // trigger even if the same minute matches twice
        let cooldown = self.state.config.scheduler.proposal_cooldown_minutes;
        let since = cooldown_window_start(Utc::now(), cooldown);
        let recent = ProposalService::new(self.state.db.clone())
            .recent_auto(sku, since)
            .await?;
        if !recent.is_empty() {
            tracing::debug!("Skipping {}: auto proposal within cool-down window", sku);
            return Ok(false);
        }

        let service = ReplenishmentService::new(self.state.db.clone(), self.state.config.clone());
        let proposal = service.trigger(sku, ProposalSource::Auto).await?;
        Ok(proposal.is_some())
    }
}
