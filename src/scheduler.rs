//! Cooperative scheduler for the two periodic jobs of the demo.
//!
//! The animation tick and the stage auto-advance each run at their own
//! period, but they share one scheduler so they always start and stop
//! together. The host feeds wall-clock deltas in and gets back how many
//! periods of each sub-task came due.
//!
//! ```
//! use nephron::scheduler::Scheduler;
//! use std::time::Duration;
//!
//! let mut scheduler = Scheduler::new(Duration::from_millis(40), Duration::from_millis(8000));
//! assert_eq!(scheduler.advance(Duration::from_millis(100)).ticks, 0); // not started
//!
//! scheduler.start();
//! assert_eq!(scheduler.advance(Duration::from_millis(100)).ticks, 2);
//! ```

use std::time::Duration;

/// One periodic job with its own phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubTask {
    period: Duration,
    /// Time accumulated toward the next period.
    elapsed: Duration,
}

impl SubTask {
    fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
        }
    }

    /// Add `dt` and return how many full periods completed.
    fn accumulate(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        let due = (self.elapsed.as_nanos() / self.period.as_nanos()).min(u32::MAX as u128) as u32;
        self.elapsed -= self.period * due;
        due
    }

    fn rearm(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// Work that came due during one [`Scheduler::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Due {
    /// Animation ticks to run.
    pub ticks: u32,
    /// Stage auto-advances to run.
    pub stage_advances: u32,
}

impl Due {
    pub fn is_empty(&self) -> bool {
        self.ticks == 0 && self.stage_advances == 0
    }
}

/// Single scheduler driving the animation tick and stage auto-advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    tick: SubTask,
    stage: SubTask,
    running: bool,
    max_catch_up_ticks: u32,
}

impl Scheduler {
    /// Default bound on animation ticks reported by a single call.
    pub const DEFAULT_MAX_CATCH_UP_TICKS: u32 = 8;

    /// Create a stopped scheduler.
    pub fn new(tick_interval: Duration, stage_interval: Duration) -> Self {
        Self {
            tick: SubTask::new(tick_interval),
            stage: SubTask::new(stage_interval),
            running: false,
            max_catch_up_ticks: Self::DEFAULT_MAX_CATCH_UP_TICKS,
        }
    }

    /// Bound the animation ticks reported after a long stall.
    pub fn with_max_catch_up_ticks(mut self, max: u32) -> Self {
        self.max_catch_up_ticks = max.max(1);
        self
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick.period
    }

    pub fn stage_interval(&self) -> Duration {
        self.stage.period
    }

    /// Start both sub-tasks with fresh phases.
    pub fn start(&mut self) {
        if !self.running {
            self.tick.rearm();
            self.stage.rearm();
            self.running = true;
        }
    }

    /// Stop both sub-tasks, discarding any partially elapsed period.
    pub fn stop(&mut self) {
        self.running = false;
        self.tick.rearm();
        self.stage.rearm();
    }

    /// Restart only the animation tick phase.
    pub fn restart_tick_phase(&mut self) {
        self.tick.rearm();
    }

    /// Feed `dt` of wall-clock time and collect the work that came due.
    ///
    /// A stopped scheduler accumulates nothing and reports nothing.
    pub fn advance(&mut self, dt: Duration) -> Due {
        if !self.running {
            return Due::default();
        }
        let mut ticks = self.tick.accumulate(dt);
        if ticks > self.max_catch_up_ticks {
            log::debug!(
                "Dropping {} animation ticks after a {:?} stall",
                ticks - self.max_catch_up_ticks,
                dt
            );
            ticks = self.max_catch_up_ticks;
        }
        Due {
            ticks,
            stage_advances: self.stage.accumulate(dt),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(40), Duration::from_millis(8000))
    }
}
