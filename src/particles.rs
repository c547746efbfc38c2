//! Particle generators for the three populations.
//!
//! Particles are never stored. Each one is a pure function of the shared
//! [`CyclicTime`], its index within its population and the population
//! parameters, so the same inputs always produce the same list and the
//! population size can never drift.
//!
//! Each particle gets its own phase
//!
//! ```text
//! particle_time = (time + index / count + population_offset) mod 1
//! ```
//!
//! which is looked up in the population's segments. A segment covers a
//! half-open phase range and rescales it to a local `t` in `[0, 1)`. A
//! particle whose phase lies outside every segment is absent from the
//! output.
//!
//! | Population | Segments | Variants |
//! |------------|----------|----------|
//! | [`Population::Blood`] | arterial approach, glomerular swirl, venous exit | both |
//! | [`Population::Filtrate`] | tubule descent | both |
//! | [`Population::Protein`] | leak descent | CKD only |
//!
//! Coordinates are in a 350 x 450 scene space with y pointing down.

use crate::stage::CkdStage;
use crate::time::CyclicTime;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Center of the glomerulus the blood swirls around.
pub const GLOMERULUS_CENTER: Vec2 = Vec2::new(175.0, 200.0);

/// Which kidney a scene or population belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Healthy,
    Ckd,
}

impl Variant {
    pub fn all() -> [Variant; 2] {
        [Variant::Healthy, Variant::Ckd]
    }

    pub fn label(self) -> &'static str {
        match self {
            Variant::Healthy => "Healthy Kidney",
            Variant::Ckd => "Unhealthy Kidney",
        }
    }
}

/// A positioned, opacity-weighted particle.
///
/// Laid out as plain data so a GPU renderer can upload a particle list as an
/// instance buffer with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize)]
pub struct Particle {
    pub position: Vec2,
    pub opacity: f32,
    /// Index of the particle within its population.
    pub id: u32,
}

impl Particle {
    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }
}

/// Half-open phase range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    start: f32,
    end: f32,
}

impl Segment {
    const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Local parameter of `phase` if it lies in `[start, end)`.
    fn local(self, phase: f32) -> Option<f32> {
        if phase >= self.start && phase < self.end {
            Some((phase - self.start) / (self.end - self.start))
        } else {
            None
        }
    }

    /// Local parameter of `phase` if it lies strictly inside `(start, end)`.
    fn local_open(self, phase: f32) -> Option<f32> {
        if phase > self.start && phase < self.end {
            Some((phase - self.start) / (self.end - self.start))
        } else {
            None
        }
    }
}

/// Trajectory parameters of the blood population for one variant.
#[derive(Debug, Clone, Copy)]
struct BloodPath {
    approach: Segment,
    swirl: Segment,
    exit: Segment,
    /// Horizontal distance covered on approach and exit.
    travel: f32,
    /// Amplitude of the vertical wobble on approach and exit.
    wobble: f32,
    /// Half-periods of wobble per segment.
    wobble_cycles: f32,
    orbit_radius: f32,
    /// Total angle swept around the glomerulus.
    sweep: f32,
    approach_opacity: f32,
    swirl_opacity: f32,
    exit_opacity: f32,
    /// Opacity lost over the exit segment.
    exit_fade: f32,
}

const HEALTHY_BLOOD: BloodPath = BloodPath {
    approach: Segment::new(0.0, 0.3),
    swirl: Segment::new(0.3, 0.6),
    exit: Segment::new(0.6, 0.85),
    travel: 120.0,
    wobble: 10.0,
    wobble_cycles: 1.0,
    orbit_radius: 30.0,
    sweep: 4.0 * PI,
    approach_opacity: 0.8,
    swirl_opacity: 0.9,
    exit_opacity: 0.8,
    exit_fade: 0.5,
};

// Reduced perfusion: wider segments, shorter travel, fewer revolutions, dimmer.
const CKD_BLOOD: BloodPath = BloodPath {
    approach: Segment::new(0.0, 0.35),
    swirl: Segment::new(0.35, 0.7),
    exit: Segment::new(0.7, 0.95),
    travel: 115.0,
    wobble: 12.0,
    wobble_cycles: 0.8,
    orbit_radius: 25.0,
    sweep: 3.0 * PI,
    approach_opacity: 0.6,
    swirl_opacity: 0.65,
    exit_opacity: 0.6,
    exit_fade: 0.5,
};

const ARTERY_ENTRY: Vec2 = Vec2::new(50.0, 200.0);
const VEIN_EXIT_Y: f32 = 220.0;

impl BloodPath {
    fn for_variant(variant: Variant) -> &'static BloodPath {
        match variant {
            Variant::Healthy => &HEALTHY_BLOOD,
            Variant::Ckd => &CKD_BLOOD,
        }
    }

    fn sample(&self, phase: f32) -> Option<(Vec2, f32)> {
        if let Some(t) = self.approach.local(phase) {
            let position = Vec2::new(
                ARTERY_ENTRY.x + t * self.travel,
                ARTERY_ENTRY.y + (t * PI * self.wobble_cycles).sin() * self.wobble,
            );
            return Some((position, self.approach_opacity));
        }
        if let Some(t) = self.swirl.local(phase) {
            let angle = t * self.sweep;
            let position = GLOMERULUS_CENTER + Vec2::new(angle.cos(), angle.sin()) * self.orbit_radius;
            return Some((position, self.swirl_opacity));
        }
        if let Some(t) = self.exit.local(phase) {
            let position = Vec2::new(
                GLOMERULUS_CENTER.x - t * self.travel,
                VEIN_EXIT_Y + (t * PI * self.wobble_cycles).sin() * self.wobble,
            );
            return Some((position, self.exit_opacity - t * self.exit_fade));
        }
        None
    }
}

const FILTRATE_OFFSET: f32 = 0.35;
const FILTRATE_GATE: Segment = Segment::new(0.4, 0.75);
const FILTRATE_ORIGIN: Vec2 = Vec2::new(119.0, 230.0);
const FILTRATE_DRIFT: Vec2 = Vec2::new(10.0, 130.0);

const PROTEIN_OFFSET: f32 = 0.45;
/// Phase gap between consecutive protein particles.
const PROTEIN_SPACING: f32 = 0.2;
const PROTEIN_GATE: Segment = Segment::new(0.4, 0.75);
const PROTEIN_ORIGIN: Vec2 = Vec2::new(120.0, 230.0);
const PROTEIN_DRIFT: Vec2 = Vec2::new(2.0, 75.0);

/// Peak opacity of diseased filtrate, half of the healthy peak.
pub const CKD_FILTRATE_PEAK_OPACITY: f32 = 0.5;

fn spread_phase(time: CyclicTime, index: u32, count: u32, offset: f32) -> f32 {
    time.offset(index as f32 / count as f32 + offset).value()
}

/// Blood cell `index` of `count`.
///
/// Returns `None` while the particle is between cycles, or if `index` is
/// not below `count`.
pub fn blood(time: CyclicTime, index: u32, count: u32, variant: Variant) -> Option<Particle> {
    if index >= count {
        return None;
    }
    let phase = spread_phase(time, index, count, 0.0);
    BloodPath::for_variant(variant)
        .sample(phase)
        .map(|(position, opacity)| Particle { position, opacity, id: index })
}

/// Filtrate droplet `index` of `count`, draining from the glomerulus toward the ureter.
pub fn filtrate(time: CyclicTime, index: u32, count: u32, variant: Variant) -> Option<Particle> {
    if index >= count {
        return None;
    }
    let phase = spread_phase(time, index, count, FILTRATE_OFFSET);
    let t = FILTRATE_GATE.local_open(phase)?;
    let opacity = match variant {
        Variant::Healthy => 1.0 - t * 0.2,
        Variant::Ckd => CKD_FILTRATE_PEAK_OPACITY - t * 0.2,
    };
    Some(Particle {
        position: FILTRATE_ORIGIN + FILTRATE_DRIFT * t,
        opacity,
        id: index,
    })
}

/// Leaked protein particle `index` of `count`.
///
/// Proteins are spaced a fixed 0.2 of a cycle apart rather than spread over
/// the population, so adding a stage adds a particle without moving the
/// others. The healthy kidney leaks nothing.
pub fn protein(time: CyclicTime, index: u32, count: u32, variant: Variant) -> Option<Particle> {
    if variant == Variant::Healthy || index >= count {
        return None;
    }
    let phase = time
        .offset(index as f32 * PROTEIN_SPACING + PROTEIN_OFFSET)
        .value();
    let t = PROTEIN_GATE.local_open(phase)?;
    Some(Particle {
        position: PROTEIN_ORIGIN + PROTEIN_DRIFT * t,
        opacity: 1.0 - t * 0.2,
        id: index,
    })
}

/// Population sizes that are fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleCounts {
    pub blood: u32,
    pub filtrate: u32,
}

impl Default for ParticleCounts {
    fn default() -> Self {
        Self {
            blood: 15,
            filtrate: 10,
        }
    }
}

/// One of the three particle populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Population {
    /// Red blood cells flowing through the glomerulus.
    Blood,
    /// Filtrate draining toward the ureter.
    Filtrate,
    /// Albumin leaking into the urine (proteinuria).
    Protein,
}

impl Population {
    pub fn all() -> [Population; 3] {
        [Population::Blood, Population::Filtrate, Population::Protein]
    }

    /// Number of particle slots for this population.
    ///
    /// Protein scales with disease stage and is empty for the healthy kidney.
    pub fn count(self, variant: Variant, counts: ParticleCounts, stage: CkdStage) -> u32 {
        match (self, variant) {
            (Population::Blood, _) => counts.blood,
            (Population::Filtrate, _) => counts.filtrate,
            (Population::Protein, Variant::Healthy) => 0,
            (Population::Protein, Variant::Ckd) => stage.params().protein_count,
        }
    }

    /// Particle `index` of `count`, or `None` if it is outside its active segments.
    pub fn generate(self, time: CyclicTime, index: u32, count: u32, variant: Variant) -> Option<Particle> {
        match self {
            Population::Blood => blood(time, index, count, variant),
            Population::Filtrate => filtrate(time, index, count, variant),
            Population::Protein => protein(time, index, count, variant),
        }
    }

    /// Every active particle of the population at `time`.
    pub fn generate_all(
        self,
        time: CyclicTime,
        variant: Variant,
        counts: ParticleCounts,
        stage: CkdStage,
    ) -> Vec<Particle> {
        let count = self.count(variant, counts, stage);
        (0..count)
            .filter_map(|i| self.generate(time, i, count, variant))
            .collect()
    }
}
