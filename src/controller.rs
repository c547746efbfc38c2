//! View state and its transitions.
//!
//! All session state lives in one [`ViewState`] value. Every change goes
//! through [`update`], a pure function of the previous state and an
//! [`Event`]. The [`Controller`] owns the state together with the clock and
//! the scheduler, keeps the scheduler running exactly while the state says
//! it is playing, and turns scheduler output into `Tick` and `AdvanceStage`
//! events.
//!
//! ```
//! use nephron::prelude::*;
//! use std::time::Duration;
//!
//! let mut controller = Controller::default();
//! controller.handle(Event::TogglePlay);
//! controller.advance(Duration::from_millis(400));
//!
//! let frame = controller.frame();
//! assert!(frame.playing);
//! assert!(frame.time.value() > 0.0);
//! ```

use crate::config::DemoConfig;
use crate::error::ConfigError;
use crate::particles::{ParticleCounts, Variant};
use crate::scene::Frame;
use crate::scheduler::{Due, Scheduler};
use crate::stage::CkdStage;
use crate::time::{Clock, CyclicTime, DropCount, Speed};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which kidneys are on screen.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ViewMode {
    Healthy,
    Ckd,
    #[default]
    Both,
}

impl ViewMode {
    pub fn all() -> [ViewMode; 3] {
        [ViewMode::Both, ViewMode::Healthy, ViewMode::Ckd]
    }

    /// Variants shown in this mode, healthy first.
    pub fn variants(self) -> &'static [Variant] {
        match self {
            ViewMode::Healthy => &[Variant::Healthy],
            ViewMode::Ckd => &[Variant::Ckd],
            ViewMode::Both => &[Variant::Healthy, Variant::Ckd],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Healthy => "Healthy Kidney",
            ViewMode::Ckd => "CKD Kidney",
            ViewMode::Both => "Compare Both",
        }
    }
}

/// Complete session state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ViewState {
    pub time: CyclicTime,
    pub playing: bool,
    pub view: ViewMode,
    pub speed: Speed,
    pub stage: CkdStage,
    pub info_visible: bool,
    pub drops: DropCount,
}

impl ViewState {
    /// Initial state described by `config`.
    pub fn from_config(config: &DemoConfig) -> Self {
        Self {
            time: CyclicTime::ZERO,
            playing: false,
            view: config.initial_view,
            speed: config.initial_speed,
            stage: config.initial_stage,
            info_visible: config.show_info,
            drops: DropCount::default(),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::from_config(&DemoConfig::default())
    }
}

/// Something that changes the view state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    TogglePlay,
    Play,
    Pause,
    /// Pause and rewind to the start of the cycle, clearing drop counters.
    /// The stage is kept.
    Reset,
    SetView(ViewMode),
    SetSpeed(Speed),
    SetStage(CkdStage),
    ToggleInfo,
    /// One animation tick. Ignored while paused.
    Tick,
    /// Stage auto-advance, 5 wraps to 1. Ignored while paused.
    AdvanceStage,
}

/// Fixed rules applied by [`update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dynamics {
    pub clock: Clock,
    pub drops_per_cycle: DropCount,
}

impl Dynamics {
    pub fn from_config(config: &DemoConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            clock: config.clock()?,
            drops_per_cycle: config.drops_per_cycle(),
        })
    }
}

impl Default for Dynamics {
    fn default() -> Self {
        Self {
            clock: Clock::default(),
            drops_per_cycle: DropCount::PER_CYCLE,
        }
    }
}

/// Apply `event` to `state`.
pub fn update(dynamics: &Dynamics, state: ViewState, event: Event) -> ViewState {
    match event {
        Event::TogglePlay => ViewState {
            playing: !state.playing,
            ..state
        },
        Event::Play => ViewState { playing: true, ..state },
        Event::Pause => ViewState { playing: false, ..state },
        Event::Reset => ViewState {
            time: CyclicTime::ZERO,
            playing: false,
            drops: DropCount::default(),
            ..state
        },
        Event::SetView(view) => ViewState { view, ..state },
        Event::SetSpeed(speed) => ViewState { speed, ..state },
        Event::SetStage(stage) => ViewState { stage, ..state },
        Event::ToggleInfo => ViewState {
            info_visible: !state.info_visible,
            ..state
        },
        Event::Tick if state.playing => {
            let step = dynamics.clock.advance(state.time, state.speed);
            let drops = if step.wrapped {
                state.drops.record_cycle(dynamics.drops_per_cycle)
            } else {
                state.drops
            };
            ViewState {
                time: step.time,
                drops,
                ..state
            }
        }
        Event::AdvanceStage if state.playing => ViewState {
            stage: state.stage.next(),
            ..state
        },
        Event::Tick | Event::AdvanceStage => state,
    }
}

/// Owner of the session: state, clock and scheduler.
#[derive(Debug, Clone)]
pub struct Controller {
    config: DemoConfig,
    dynamics: Dynamics,
    scheduler: Scheduler,
    state: ViewState,
}

impl Controller {
    /// Create a paused session from a validated config.
    pub fn new(config: DemoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            dynamics: Dynamics::from_config(&config)?,
            scheduler: config.scheduler(),
            state: ViewState::from_config(&config),
            config,
        })
    }

    #[inline]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn particle_counts(&self) -> ParticleCounts {
        self.config.particle_counts()
    }

    /// Apply a user event.
    ///
    /// Pausing or resetting stops the scheduler before returning, so no
    /// tick or stage advance can run afterwards until playback resumes.
    pub fn handle(&mut self, event: Event) {
        let before = self.state;
        self.state = update(&self.dynamics, before, event);
        self.sync_scheduler(&before);

        if before.stage != self.state.stage {
            log::info!("CKD stage {} -> {}", before.stage, self.state.stage);
        }
        if !matches!(event, Event::Tick) {
            log::debug!("{:?}: playing={} view={:?}", event, self.state.playing, self.state.view);
        }
    }

    /// Feed `dt` of wall-clock time and run whatever came due.
    pub fn advance(&mut self, dt: Duration) -> Due {
        let due = self.scheduler.advance(dt);
        for _ in 0..due.ticks {
            self.handle(Event::Tick);
        }
        for _ in 0..due.stage_advances {
            self.handle(Event::AdvanceStage);
        }
        due
    }

    /// Renderer payload for the current state.
    pub fn frame(&self) -> Frame {
        Frame::compose(&self.state, self.particle_counts())
    }

    fn sync_scheduler(&mut self, before: &ViewState) {
        if self.state.playing && !self.scheduler.is_running() {
            self.scheduler.start();
        } else if !self.state.playing && self.scheduler.is_running() {
            self.scheduler.stop();
        } else if self.state.playing && before.speed != self.state.speed {
            self.scheduler.restart_tick_phase();
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        let config = DemoConfig::default();
        Self {
            dynamics: Dynamics::default(),
            scheduler: config.scheduler(),
            state: ViewState::from_config(&config),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> ViewState {
        ViewState {
            playing: true,
            ..ViewState::default()
        }
    }

    #[test]
    fn test_tick_ignored_while_paused() {
        let state = ViewState::default();
        assert_eq!(update(&Dynamics::default(), state, Event::Tick), state);
        assert_eq!(update(&Dynamics::default(), state, Event::AdvanceStage), state);
    }

    #[test]
    fn test_wrap_credits_drops_once() {
        let state = ViewState {
            time: CyclicTime::new(0.99),
            ..playing()
        };
        let next = update(&Dynamics::default(), state, Event::Tick);
        assert_eq!(next.drops, DropCount::new(10, 6));
        let after = update(&Dynamics::default(), next, Event::Tick);
        assert_eq!(after.drops, DropCount::new(10, 6));
    }

    #[test]
    fn test_reset_keeps_stage() {
        let state = ViewState {
            time: CyclicTime::new(0.5),
            stage: CkdStage::MAX,
            drops: DropCount::new(40, 24),
            ..playing()
        };
        let reset = update(&Dynamics::default(), state, Event::Reset);
        assert_eq!(reset.time, CyclicTime::ZERO);
        assert_eq!(reset.drops, DropCount::default());
        assert!(!reset.playing);
        assert_eq!(reset.stage, CkdStage::MAX);
    }

    #[test]
    fn test_advance_stage_wraps() {
        let state = ViewState {
            stage: CkdStage::MAX,
            ..playing()
        };
        let next = update(&Dynamics::default(), state, Event::AdvanceStage);
        assert_eq!(next.stage, CkdStage::MIN);
    }

    #[test]
    fn test_setters() {
        let d = Dynamics::default();
        let s = ViewState::default();
        assert_eq!(update(&d, s, Event::SetView(ViewMode::Ckd)).view, ViewMode::Ckd);
        assert_eq!(update(&d, s, Event::SetSpeed(Speed::MAX)).speed, Speed::MAX);
        assert_eq!(update(&d, s, Event::SetStage(CkdStage::MIN)).stage, CkdStage::MIN);
        assert_eq!(update(&d, s, Event::ToggleInfo).info_visible, !s.info_visible);
    }

    #[test]
    fn test_controller_scheduler_follows_playing() {
        let mut controller = Controller::default();
        assert!(!controller.scheduler().is_running());

        controller.handle(Event::TogglePlay);
        assert!(controller.scheduler().is_running());

        controller.handle(Event::Pause);
        assert!(!controller.scheduler().is_running());
        let time = controller.state().time;
        assert!(controller.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(controller.state().time, time);
    }

    #[test]
    fn test_controller_reset_stops_scheduler() {
        let mut controller = Controller::default();
        controller.handle(Event::Play);
        controller.advance(Duration::from_millis(120));
        controller.handle(Event::Reset);
        assert!(!controller.scheduler().is_running());
        assert_eq!(controller.state().time, CyclicTime::ZERO);
    }

    #[test]
    fn test_speed_change_restarts_tick_phase() {
        let mut controller = Controller::default();
        controller.handle(Event::Play);
        assert_eq!(controller.advance(Duration::from_millis(30)).ticks, 0);

        controller.handle(Event::SetSpeed(Speed::MAX));
        // The 30ms banked before the change is discarded
        assert_eq!(controller.advance(Duration::from_millis(10)).ticks, 0);
        assert_eq!(controller.state().time, CyclicTime::ZERO);

        assert_eq!(controller.advance(Duration::from_millis(30)).ticks, 1);
        assert!((controller.state().time.value() - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_controller_auto_advances_stage() {
        let mut controller = Controller::default();
        let start = controller.state().stage;
        controller.handle(Event::Play);
        for _ in 0..200 {
            controller.advance(Duration::from_millis(40));
        }
        assert_eq!(controller.state().stage, start.next());
    }

    #[test]
    fn test_controller_rejects_invalid_config() {
        let config = DemoConfig {
            blood_count: 0,
            ..Default::default()
        };
        assert!(Controller::new(config).is_err());
    }
}
