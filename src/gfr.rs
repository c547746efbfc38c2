//! Glomerular filtration rate.
//!
//! GFR oscillates sinusoidally once per cycle around a baseline: 105 for the
//! healthy kidney, the stage baseline for the diseased one. The value is
//! clamped so it never goes negative.

use crate::particles::Variant;
use crate::stage::CkdStage;
use crate::time::CyclicTime;
use std::f32::consts::TAU;

/// Baseline GFR of the healthy kidney, mL/min/1.73m².
pub const HEALTHY_BASELINE: f32 = 105.0;
/// Full scale of a GFR gauge.
pub const GAUGE_MAX: f32 = 120.0;

const HEALTHY_AMPLITUDE: f32 = 5.0;
const CKD_AMPLITUDE: f32 = 3.0;

/// Instantaneous GFR for `variant` at `time`.
///
/// `stage` only affects the diseased kidney.
pub fn gfr(variant: Variant, time: CyclicTime, stage: CkdStage) -> f32 {
    let (baseline, amplitude) = match variant {
        Variant::Healthy => (HEALTHY_BASELINE, HEALTHY_AMPLITUDE),
        Variant::Ckd => (stage.baseline_gfr(), CKD_AMPLITUDE),
    };
    let value = baseline + amplitude * (TAU * time.value()).sin();
    value.max(0.0)
}

/// Fraction of the gauge filled by `value`, in `[0, 1]`.
pub fn gauge_fraction(value: f32) -> f32 {
    (value / GAUGE_MAX).clamp(0.0, 1.0)
}
