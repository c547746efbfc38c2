//! Demo configuration.
//!
//! [`DemoConfig`] holds every tunable of a session: clock rate, timer
//! periods, population sizes, drop increments and the initial view state.
//! It serializes to JSON so a viewer can start from a saved file; missing
//! fields fall back to the defaults.

use crate::controller::ViewMode;
use crate::error::ConfigError;
use crate::particles::ParticleCounts;
use crate::scheduler::Scheduler;
use crate::stage::CkdStage;
use crate::time::{Clock, DropCount, Speed};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Complete session configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Phase advanced per tick at 1.0x speed.
    pub base_rate: f32,
    /// Wall-clock period of the animation tick.
    pub tick_interval_ms: u64,
    /// Wall-clock period of the stage auto-advance.
    pub stage_interval_ms: u64,
    /// Most animation ticks run for a single host frame.
    pub max_catch_up_ticks: u32,
    pub blood_count: u32,
    pub filtrate_count: u32,
    pub healthy_drops_per_cycle: u64,
    pub ckd_drops_per_cycle: u64,
    pub initial_stage: CkdStage,
    pub initial_speed: Speed,
    pub initial_view: ViewMode,
    pub show_info: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            base_rate: Clock::DEFAULT_BASE_RATE,
            tick_interval_ms: 40,
            stage_interval_ms: 8000,
            max_catch_up_ticks: Scheduler::DEFAULT_MAX_CATCH_UP_TICKS,
            blood_count: 15,
            filtrate_count: 10,
            healthy_drops_per_cycle: DropCount::PER_CYCLE.healthy,
            ckd_drops_per_cycle: DropCount::PER_CYCLE.ckd,
            initial_stage: CkdStage::default(),
            initial_speed: Speed::NORMAL,
            initial_view: ViewMode::Both,
            show_info: true,
        }
    }
}

impl DemoConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration describes a usable simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clock()?;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.stage_interval_ms == 0 {
            return Err(ConfigError::Invalid("stage_interval_ms must be positive".into()));
        }
        if self.max_catch_up_ticks == 0 {
            return Err(ConfigError::Invalid("max_catch_up_ticks must be at least 1".into()));
        }
        if self.blood_count == 0 || self.filtrate_count == 0 {
            return Err(ConfigError::Invalid(format!(
                "particle counts must be positive, got blood {} and filtrate {}",
                self.blood_count, self.filtrate_count
            )));
        }
        Ok(())
    }

    /// Clock with the configured base rate.
    pub fn clock(&self) -> Result<Clock, ConfigError> {
        Clock::new(self.base_rate)
    }

    /// Stopped scheduler with the configured periods.
    pub fn scheduler(&self) -> Scheduler {
        Scheduler::new(
            Duration::from_millis(self.tick_interval_ms),
            Duration::from_millis(self.stage_interval_ms),
        )
        .with_max_catch_up_ticks(self.max_catch_up_ticks)
    }

    pub fn particle_counts(&self) -> ParticleCounts {
        ParticleCounts {
            blood: self.blood_count,
            filtrate: self.filtrate_count,
        }
    }

    pub fn drops_per_cycle(&self) -> DropCount {
        DropCount::new(self.healthy_drops_per_cycle, self.ckd_drops_per_cycle)
    }
}
