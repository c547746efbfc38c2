//! # nephron - Renal Filtration Dynamics
//!
//! Deterministic particle simulation comparing blood and filtrate flow in a
//! healthy kidney with a kidney affected by chronic kidney disease (CKD).
//!
//! nephron computes *what* to draw: particle positions and opacities, GFR
//! values, image tint and anatomical labels. *How* to draw it is up to the
//! renderer; every tick produces a [`Frame`] that can be painted with any
//! technology or serialized to JSON.
//!
//! ## Quick Start
//!
//! ```
//! use nephron::prelude::*;
//! use std::time::Duration;
//!
//! let mut controller = Controller::new(DemoConfig::default()).unwrap();
//! controller.handle(Event::Play);
//!
//! // In your frame loop:
//! controller.advance(Duration::from_millis(16));
//! let frame = controller.frame();
//! for scene in &frame.scenes {
//!     for particle in &scene.blood {
//!         // draw particle.position with particle.opacity
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Cyclic time
//!
//! A single [`CyclicTime`] in `[0, 1)` drives everything. The [`Clock`]
//! advances it by `base_rate * speed` per tick (0.015 per 40 ms tick by
//! default) and reports wraparound; each wrap credits the filtrate drop
//! counters.
//!
//! ### Populations
//!
//! | Population | Healthy | CKD |
//! |------------|---------|-----|
//! | Blood | 4π swirl, bright | 3π swirl, dimmer, slower |
//! | Filtrate | peak opacity 1.0 | peak opacity 0.5 |
//! | Protein | none | one particle per stage |
//!
//! Particles are pure functions of `(time, index, count, variant)`; nothing
//! is stored between ticks.
//!
//! ### Stages
//!
//! [`CkdStage`] 1 to 5 selects the diseased kidney's baseline GFR, image
//! desaturation and protein leak. While playing, the stage auto-advances
//! every 8 seconds.

pub mod config;
pub mod controller;
pub mod error;
pub mod gfr;
pub mod input;
pub mod particles;
pub mod scene;
pub mod scheduler;
pub mod stage;
pub mod time;

pub use bytemuck;
pub use config::DemoConfig;
pub use controller::{update, Controller, Dynamics, Event, ViewMode, ViewState};
pub use error::{ConfigError, StageError};
pub use gfr::gfr;
pub use glam::{Vec2, Vec3};
pub use particles::{Particle, ParticleCounts, Population, Variant};
pub use scene::{Annotation, Frame, GlomerulusPulse, ParticleStyle, Scene, Tint};
pub use scheduler::{Due, Scheduler};
pub use stage::{CkdStage, StageParams};
pub use time::{Advance, Clock, CyclicTime, DropCount, Speed};

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```
/// use nephron::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::DemoConfig;
    pub use crate::controller::{Controller, Event, ViewMode, ViewState};
    pub use crate::gfr::{gauge_fraction, gfr, GAUGE_MAX};
    pub use crate::input::{Input, KeyCode};
    pub use crate::particles::{Particle, ParticleCounts, Population, Variant};
    pub use crate::scene::{Annotation, Frame, ParticleStyle, Scene, Tint};
    pub use crate::stage::CkdStage;
    pub use crate::time::{Clock, CyclicTime, DropCount, Speed};
    pub use crate::{Vec2, Vec3};
}
