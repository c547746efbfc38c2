//! Scene composition: the renderer boundary.
//!
//! A [`Scene`] bundles everything needed to draw one kidney at one instant:
//! the three particle lists, the current GFR, the image tint, the pulsing
//! glomerulus and the static anatomical annotations. A [`Frame`] carries the
//! scenes for the selected view plus the indicators shown around them.
//!
//! Nothing here is retained between ticks. Renderers receive a fresh frame
//! and may draw it with any technology; scenes and frames serialize to JSON
//! for renderers outside Rust.
//!
//! ```
//! use nephron::prelude::*;
//!
//! let scene = Scene::compose(
//!     Variant::Ckd,
//!     CyclicTime::new(0.2),
//!     CkdStage::MAX,
//!     ParticleCounts::default(),
//! );
//! assert!(scene.gfr >= 0.0);
//! assert!(scene.protein.len() <= 5);
//! ```

use crate::controller::{ViewMode, ViewState};
use crate::gfr::gfr;
use crate::particles::{Particle, ParticleCounts, Population, Variant, GLOMERULUS_CENTER};
use crate::stage::CkdStage;
use crate::time::{CyclicTime, DropCount, Speed};
use glam::{Vec2, Vec3};
use serde::Serialize;

/// Size of the scene coordinate space.
pub const SCENE_SIZE: Vec2 = Vec2::new(350.0, 450.0);

/// Placement of the kidney cross-section image within the scene.
pub const KIDNEY_ORIGIN: Vec2 = Vec2::new(25.0, 10.0);
pub const KIDNEY_SIZE: Vec2 = Vec2::new(300.0, 430.0);

/// Color adjustment applied to the kidney image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tint {
    pub saturation: f32,
    pub brightness: f32,
}

impl Tint {
    pub const NONE: Tint = Tint {
        saturation: 1.0,
        brightness: 1.0,
    };

    pub fn for_variant(variant: Variant, stage: CkdStage) -> Self {
        match variant {
            Variant::Healthy => Self::NONE,
            Variant::Ckd => {
                let params = stage.params();
                Tint {
                    saturation: params.saturation,
                    brightness: params.brightness,
                }
            }
        }
    }

    /// Apply to an RGB color in `[0, 1]`.
    pub fn apply(&self, color: Vec3) -> Vec3 {
        let luma = color.dot(Vec3::new(0.2126, 0.7152, 0.0722));
        let desaturated = Vec3::splat(luma).lerp(color, self.saturation);
        (desaturated * self.brightness).clamp(Vec3::ZERO, Vec3::ONE)
    }
}

/// Radial glow over the glomerulus that pulses on wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlomerulusPulse {
    pub center: Vec2,
    pub radius: f32,
    pub color: Vec3,
    /// Overall opacity of the glow disc.
    pub opacity: f32,
    /// Center intensity at the top of the pulse.
    pub peak: f32,
    /// Center intensity at the bottom of the pulse.
    pub trough: f32,
    pub period_secs: f32,
}

impl GlomerulusPulse {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Healthy => Self {
                center: GLOMERULUS_CENTER,
                radius: 35.0,
                color: CRIMSON,
                opacity: 0.4,
                peak: 0.8,
                trough: 0.3,
                period_secs: 2.0,
            },
            // Damaged glomerulus: smaller, darker, slower
            Variant::Ckd => Self {
                center: GLOMERULUS_CENTER,
                radius: 30.0,
                color: DARK_RED,
                opacity: 0.5,
                peak: 0.6,
                trough: 0.2,
                period_secs: 3.0,
            },
        }
    }

    /// Center intensity `seconds` into the animation.
    ///
    /// Linear peak → trough → peak over one period.
    pub fn intensity(&self, seconds: f32) -> f32 {
        let phase = (seconds / self.period_secs).rem_euclid(1.0);
        let w = (2.0 * phase - 1.0).abs();
        self.trough + (self.peak - self.trough) * w
    }
}

const CRIMSON: Vec3 = Vec3::new(0.863, 0.078, 0.235);
const DARK_RED: Vec3 = Vec3::new(0.545, 0.0, 0.0);
const ROYAL_BLUE: Vec3 = Vec3::new(0.255, 0.412, 0.882);
const GOLD: Vec3 = Vec3::new(1.0, 0.843, 0.0);

/// How a renderer should draw one population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleStyle {
    pub color: Vec3,
    pub radius: f32,
    /// Multiplier applied to each particle's own opacity.
    pub opacity_scale: f32,
    /// Blur radius of the glow halo.
    pub glow: f32,
}

impl ParticleStyle {
    pub fn for_population(population: Population, variant: Variant) -> Self {
        match (population, variant) {
            (Population::Blood, Variant::Healthy) => Self {
                color: CRIMSON,
                radius: 3.5,
                opacity_scale: 1.0,
                glow: 2.0,
            },
            (Population::Blood, Variant::Ckd) => Self {
                color: DARK_RED,
                radius: 4.0,
                opacity_scale: 1.0,
                glow: 2.0,
            },
            (Population::Filtrate, Variant::Healthy) => Self {
                color: ROYAL_BLUE,
                radius: 2.0,
                opacity_scale: 1.0,
                glow: 1.5,
            },
            (Population::Filtrate, Variant::Ckd) => Self {
                color: ROYAL_BLUE,
                radius: 2.0,
                opacity_scale: 0.6,
                glow: 1.5,
            },
            (Population::Protein, _) => Self {
                color: GOLD,
                radius: 3.0,
                opacity_scale: 1.0,
                glow: 2.5,
            },
        }
    }
}

/// Leader line from a label to the structure it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Leader {
    pub from: Vec2,
    pub to: Vec2,
    pub dashed: bool,
}

/// A static anatomical label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Annotation {
    /// Label text, one entry per line.
    pub lines: &'static [&'static str],
    /// Baseline position of the first line.
    pub anchor: Vec2,
    pub leader: Option<Leader>,
    pub color: Vec3,
}

const HEALTHY_LABEL: Vec3 = Vec3::new(0.102, 0.361, 0.102);
const CKD_LABEL: Vec3 = Vec3::new(0.478, 0.0, 0.0);
const PROTEINURIA_LABEL: Vec3 = Vec3::new(0.722, 0.525, 0.043);

/// Line spacing of multi-line labels.
pub const LABEL_LINE_HEIGHT: f32 = 12.0;

const fn label(lines: &'static [&'static str], anchor: Vec2, from: Vec2, to: Vec2, color: Vec3) -> Annotation {
    Annotation {
        lines,
        anchor,
        leader: Some(Leader {
            from,
            to,
            dashed: false,
        }),
        color,
    }
}

const fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

pub static HEALTHY_ANNOTATIONS: [Annotation; 8] = [
    label(&["Renal Artery"], v(-20.0, 207.0), v(75.0, 204.0), v(115.0, 215.0), HEALTHY_LABEL),
    label(&["Renal Vein"], v(-20.0, 242.0), v(45.0, 239.0), v(115.0, 230.0), HEALTHY_LABEL),
    label(&["Capsule"], v(325.0, 120.0), v(325.0, 123.0), v(225.0, 130.0), HEALTHY_LABEL),
    label(&["Cortex"], v(325.0, 175.0), v(325.0, 178.0), v(240.0, 185.0), HEALTHY_LABEL),
    label(&["Medulla"], v(325.0, 240.0), v(325.0, 243.0), v(230.0, 250.0), HEALTHY_LABEL),
    label(&["Calyx"], v(325.0, 295.0), v(325.0, 298.0), v(210.0, 280.0), HEALTHY_LABEL),
    label(&["Pelvis"], v(250.0, 360.0), v(250.0, 357.0), v(185.0, 310.0), HEALTHY_LABEL),
    Annotation {
        lines: &["Ureter"],
        anchor: v(115.0, 350.0),
        leader: None,
        color: HEALTHY_LABEL,
    },
];

pub static CKD_ANNOTATIONS: [Annotation; 9] = [
    label(&["Narrowed", "Artery"], v(-30.0, 197.0), v(35.0, 203.0), v(115.0, 215.0), CKD_LABEL),
    label(&["Congested", "Vein"], v(-30.0, 237.0), v(40.0, 243.0), v(115.0, 230.0), CKD_LABEL),
    label(&["Thinned", "Capsule"], v(325.0, 110.0), v(325.0, 116.0), v(225.0, 130.0), CKD_LABEL),
    label(&["Atrophied", "Cortex"], v(325.0, 165.0), v(325.0, 171.0), v(240.0, 185.0), CKD_LABEL),
    label(&["Fibrotic", "Medulla"], v(325.0, 230.0), v(325.0, 236.0), v(230.0, 250.0), CKD_LABEL),
    label(&["Blunted", "Calyx"], v(325.0, 285.0), v(325.0, 291.0), v(210.0, 280.0), CKD_LABEL),
    Annotation {
        lines: &["Proteinuria"],
        anchor: v(325.0, 335.0),
        leader: Some(Leader {
            from: v(325.0, 332.0),
            to: v(210.0, 270.0),
            dashed: true,
        }),
        color: PROTEINURIA_LABEL,
    },
    label(&["Dilated", "Pelvis"], v(235.0, 350.0), v(235.0, 356.0), v(185.0, 310.0), CKD_LABEL),
    Annotation {
        lines: &["Ureter"],
        anchor: v(115.0, 350.0),
        leader: None,
        color: CKD_LABEL,
    },
];

/// Everything needed to draw one kidney at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub variant: Variant,
    pub blood: Vec<Particle>,
    pub filtrate: Vec<Particle>,
    pub protein: Vec<Particle>,
    pub gfr: f32,
    pub tint: Tint,
    pub glomerulus: GlomerulusPulse,
    pub annotations: &'static [Annotation],
}

impl Scene {
    /// Build the scene for `variant` at `time`.
    pub fn compose(variant: Variant, time: CyclicTime, stage: CkdStage, counts: ParticleCounts) -> Self {
        let generate = |population: Population| population.generate_all(time, variant, counts, stage);
        Self {
            variant,
            blood: generate(Population::Blood),
            filtrate: generate(Population::Filtrate),
            protein: generate(Population::Protein),
            gfr: gfr(variant, time, stage),
            tint: Tint::for_variant(variant, stage),
            glomerulus: GlomerulusPulse::for_variant(variant),
            annotations: annotations(variant),
        }
    }

    /// Active particles of one population.
    pub fn particles(&self, population: Population) -> &[Particle] {
        match population {
            Population::Blood => &self.blood,
            Population::Filtrate => &self.filtrate,
            Population::Protein => &self.protein,
        }
    }

    /// Render style of one population in this scene.
    pub fn style(&self, population: Population) -> ParticleStyle {
        ParticleStyle::for_population(population, self.variant)
    }

    /// Total number of active particles across all populations.
    pub fn particle_count(&self) -> usize {
        self.blood.len() + self.filtrate.len() + self.protein.len()
    }
}

/// Static annotation set of a variant.
pub fn annotations(variant: Variant) -> &'static [Annotation] {
    match variant {
        Variant::Healthy => &HEALTHY_ANNOTATIONS,
        Variant::Ckd => &CKD_ANNOTATIONS,
    }
}

/// Per-tick payload handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub view: ViewMode,
    /// One scene per variant shown by `view`, healthy first.
    pub scenes: Vec<Scene>,
    pub gfr_healthy: f32,
    pub gfr_ckd: f32,
    pub drops: DropCount,
    pub stage: CkdStage,
    pub time: CyclicTime,
    pub playing: bool,
    pub speed: Speed,
    pub info_visible: bool,
}

impl Frame {
    /// Compose the frame for the current view state.
    pub fn compose(state: &ViewState, counts: ParticleCounts) -> Self {
        let scenes = state
            .view
            .variants()
            .iter()
            .map(|&variant| Scene::compose(variant, state.time, state.stage, counts))
            .collect();
        Self {
            view: state.view,
            scenes,
            gfr_healthy: gfr(Variant::Healthy, state.time, state.stage),
            gfr_ckd: gfr(Variant::Ckd, state.time, state.stage),
            drops: state.drops,
            stage: state.stage,
            time: state.time,
            playing: state.playing,
            speed: state.speed,
            info_visible: state.info_visible,
        }
    }

    /// The scene for `variant`, if the current view shows it.
    pub fn scene(&self, variant: Variant) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.variant == variant)
    }

    /// Drop counter for `variant`.
    pub fn drops_for(&self, variant: Variant) -> u64 {
        match variant {
            Variant::Healthy => self.drops.healthy,
            Variant::Ckd => self.drops.ckd,
        }
    }

    /// GFR for `variant`.
    pub fn gfr_for(&self, variant: Variant) -> f32 {
        match variant {
            Variant::Healthy => self.gfr_healthy,
            Variant::Ckd => self.gfr_ckd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_scene_has_no_protein() {
        for i in 0..50 {
            let scene = Scene::compose(
                Variant::Healthy,
                CyclicTime::new(i as f32 / 50.0),
                CkdStage::MAX,
                ParticleCounts::default(),
            );
            assert!(scene.protein.is_empty());
            assert_eq!(scene.tint, Tint::NONE);
        }
    }

    #[test]
    fn test_ckd_tint_follows_stage() {
        let stage = CkdStage::clamped(4);
        let scene = Scene::compose(Variant::Ckd, CyclicTime::ZERO, stage, ParticleCounts::default());
        assert_eq!(scene.tint.saturation, stage.params().saturation);
        assert_eq!(scene.tint.brightness, stage.params().brightness);
    }

    #[test]
    fn test_tint_apply() {
        let white = Vec3::ONE;
        assert_eq!(Tint::NONE.apply(white), white);

        let gray = Tint {
            saturation: 0.0,
            brightness: 0.5,
        }
        .apply(Vec3::new(1.0, 0.0, 0.0));
        assert!((gray.x - gray.y).abs() < 1e-6);
        assert!((gray.y - gray.z).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_intensity_cycles() {
        let pulse = GlomerulusPulse::for_variant(Variant::Healthy);
        assert!((pulse.intensity(0.0) - 0.8).abs() < 1e-6);
        assert!((pulse.intensity(1.0) - 0.3).abs() < 1e-6);
        assert!((pulse.intensity(2.0) - 0.8).abs() < 1e-6);

        let damaged = GlomerulusPulse::for_variant(Variant::Ckd);
        assert!(damaged.period_secs > pulse.period_secs);
        assert!(damaged.radius < pulse.radius);
    }

    #[test]
    fn test_annotation_sets() {
        assert_eq!(annotations(Variant::Healthy).len(), 8);
        assert_eq!(annotations(Variant::Ckd).len(), 9);
        let dashed: Vec<_> = annotations(Variant::Ckd)
            .iter()
            .filter(|a| a.leader.is_some_and(|l| l.dashed))
            .collect();
        assert_eq!(dashed.len(), 1);
        assert_eq!(dashed[0].lines, &["Proteinuria"]);
    }

    #[test]
    fn test_ckd_filtrate_drawn_dimmer() {
        let healthy = ParticleStyle::for_population(Population::Filtrate, Variant::Healthy);
        let ckd = ParticleStyle::for_population(Population::Filtrate, Variant::Ckd);
        assert!(ckd.opacity_scale < healthy.opacity_scale);
    }

    #[test]
    fn test_frame_follows_view() {
        let mut state = ViewState::default();
        state.view = ViewMode::Both;
        let frame = Frame::compose(&state, ParticleCounts::default());
        assert_eq!(frame.scenes.len(), 2);
        assert_eq!(frame.scenes[0].variant, Variant::Healthy);

        state.view = ViewMode::Ckd;
        let frame = Frame::compose(&state, ParticleCounts::default());
        assert_eq!(frame.scenes.len(), 1);
        assert!(frame.scene(Variant::Healthy).is_none());
        assert!(frame.scene(Variant::Ckd).is_some());
        // Indicators are reported for both kidneys regardless of view
        assert_eq!(frame.gfr_healthy, 105.0);
    }

    #[test]
    fn test_frame_serializes() {
        let frame = Frame::compose(&ViewState::default(), ParticleCounts::default());
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"gfr_healthy\""));
        assert!(json.contains("Proteinuria"));
    }
}
