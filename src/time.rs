//! Cyclic time facilities for the filtration animation.
//!
//! The whole simulation is driven by a single scalar, [`CyclicTime`], the
//! phase within one circulation cycle. A [`Clock`] advances it by a fixed
//! amount per tick, scaled by a [`Speed`] multiplier, and reports when the
//! phase wraps past 1.0.
//!
//! # Example
//!
//! ```
//! use nephron::time::{Clock, CyclicTime, Speed};
//!
//! let clock = Clock::default();
//! let step = clock.advance(CyclicTime::new(0.99), Speed::NORMAL);
//!
//! assert!(step.wrapped);
//! assert!(step.time.value() < 0.01);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Phase within one circulation cycle, always in `[0, 1)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct CyclicTime(f32);

impl CyclicTime {
    /// Start of the cycle.
    pub const ZERO: CyclicTime = CyclicTime(0.0);

    /// Wrap an arbitrary value into `[0, 1)`.
    ///
    /// Non-finite input maps to the start of the cycle.
    pub fn new(value: f32) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        let wrapped = value.rem_euclid(1.0);
        // rem_euclid can round up to exactly 1.0 for tiny negative inputs
        if wrapped >= 1.0 {
            Self::ZERO
        } else {
            CyclicTime(wrapped)
        }
    }

    /// Raw phase value.
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// This phase shifted by `offset`, wrapped back into `[0, 1)`.
    #[inline]
    pub fn offset(self, offset: f32) -> Self {
        Self::new(self.0 + offset)
    }
}

impl From<f32> for CyclicTime {
    fn from(value: f32) -> Self {
        CyclicTime::new(value)
    }
}

impl From<CyclicTime> for f32 {
    fn from(time: CyclicTime) -> Self {
        time.0
    }
}

/// Animation speed multiplier in `[0.25, 2.0]`, quantized to steps of 0.25.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Speed(f32);

impl Speed {
    pub const MIN: Speed = Speed(0.25);
    pub const MAX: Speed = Speed(2.0);
    pub const STEP: f32 = 0.25;
    pub const NORMAL: Speed = Speed(1.0);

    /// Clamp into range and snap to the nearest 0.25 step.
    pub fn new(value: f32) -> Self {
        if !value.is_finite() {
            log::warn!("Ignoring non-finite speed {}, using 1.0x", value);
            return Self::NORMAL;
        }
        if value < Self::MIN.0 || value > Self::MAX.0 {
            log::warn!("Speed {} out of range, clamping", value);
        }
        let snapped = (value / Self::STEP).round() * Self::STEP;
        Speed(snapped.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Multiplier value.
    #[inline]
    pub fn value(self) -> f32 {
        self.0
    }

    /// All selectable speeds, slowest first.
    pub fn steps() -> impl Iterator<Item = Speed> {
        (1..=8).map(|i| Speed(i as f32 * Self::STEP))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl From<f32> for Speed {
    fn from(value: f32) -> Self {
        Speed::new(value)
    }
}

impl From<Speed> for f32 {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

/// Cumulative filtrate drop counters, one per kidney.
///
/// Only ever grows during a session; reset replaces it with zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropCount {
    pub healthy: u64,
    pub ckd: u64,
}

impl DropCount {
    /// Drops credited per completed cycle by default.
    pub const PER_CYCLE: DropCount = DropCount { healthy: 10, ckd: 6 };

    pub fn new(healthy: u64, ckd: u64) -> Self {
        Self { healthy, ckd }
    }

    /// Counters after one more completed cycle worth `per_cycle` drops.
    #[must_use]
    pub fn record_cycle(self, per_cycle: DropCount) -> Self {
        Self {
            healthy: self.healthy.saturating_add(per_cycle.healthy),
            ckd: self.ckd.saturating_add(per_cycle.ckd),
        }
    }
}

/// Result of one clock tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    /// Phase after the tick.
    pub time: CyclicTime,
    /// Whether the tick crossed the 1.0 boundary.
    pub wrapped: bool,
}

/// Fixed-increment clock for [`CyclicTime`].
///
/// Each tick advances the phase by `base_rate * speed`. The increment is
/// kept strictly below one full cycle at maximum speed, so a single tick can
/// never skip or double-count a wraparound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    base_rate: f32,
}

impl Clock {
    /// Per-tick phase increment at 1.0x speed.
    pub const DEFAULT_BASE_RATE: f32 = 0.015;

    /// Create a clock with the given per-tick increment.
    ///
    /// Fails if the increment is not positive or would reach a full cycle
    /// per tick at [`Speed::MAX`].
    pub fn new(base_rate: f32) -> Result<Self, ConfigError> {
        if !base_rate.is_finite() || base_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "base rate must be positive, got {}",
                base_rate
            )));
        }
        if base_rate * Speed::MAX.value() >= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "base rate {} advances a full cycle per tick at {}x speed",
                base_rate,
                Speed::MAX.value()
            )));
        }
        Ok(Self { base_rate })
    }

    /// Per-tick phase increment at 1.0x speed.
    #[inline]
    pub fn base_rate(&self) -> f32 {
        self.base_rate
    }

    /// Phase increment of a single tick at `speed`.
    #[inline]
    pub fn step(&self, speed: Speed) -> f32 {
        self.base_rate * speed.value()
    }

    /// Number of ticks one full cycle takes at `speed`.
    pub fn ticks_per_cycle(&self, speed: Speed) -> f32 {
        1.0 / self.step(speed)
    }

    /// Advance `current` by one tick.
    pub fn advance(&self, current: CyclicTime, speed: Speed) -> Advance {
        let time = current.offset(self.step(speed));
        Advance {
            time,
            wrapped: time < current,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            base_rate: Self::DEFAULT_BASE_RATE,
        }
    }
}
