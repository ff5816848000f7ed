//! Fixed-step timing
//!
//! Hosts without a native interval timer (a frame loop, a headless runner)
//! accumulate elapsed time and run one tick per whole period.

use std::time::Duration;

use crate::consts::MAX_SUBSTEPS;
use crate::game::Scheduler;

/// Accumulates elapsed time and releases it one fixed period at a time
#[derive(Debug, Clone)]
pub struct FixedStep {
    period: Duration,
    accumulator: Duration,
    max_substeps: u32,
}

impl FixedStep {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            accumulator: Duration::ZERO,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    /// Add elapsed time and return how many ticks are due
    ///
    /// At most `MAX_SUBSTEPS` ticks are released per call; time beyond that is
    /// dropped so a long stall does not turn into a burst of catch-up ticks.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }
        self.accumulator += elapsed;

        let mut due = 0;
        while self.accumulator >= self.period && due < self.max_substeps {
            self.accumulator -= self.period;
            due += 1;
        }
        if due == self.max_substeps && self.accumulator >= self.period {
            log::debug!("Dropping {:?} of backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        due
    }
}

/// Scheduler for loop-driven hosts: records whether ticks should run and at
/// which period, and hands out a [`FixedStep`] for the running interval
#[derive(Debug, Clone, Default)]
pub struct IntervalScheduler {
    clock: Option<FixedStep>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self { clock: None }
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_some()
    }

    /// Ticks due after `elapsed`, zero while stopped
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.clock.as_mut().map_or(0, |clock| clock.advance(elapsed))
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self, period: Duration) {
        log::debug!("Interval started ({:?})", period);
        self.clock = Some(FixedStep::new(period));
    }

    fn stop(&mut self) {
        if self.clock.take().is_some() {
            log::debug!("Interval stopped");
        }
    }
}
