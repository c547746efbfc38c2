//! CKD stage table.
//!
//! Every stage-dependent parameter of the diseased kidney is derived from a
//! single [`CkdStage`] through [`CkdStage::params`]:
//!
//! | Stage | Baseline GFR | Saturation | Brightness | Protein particles |
//! |-------|--------------|------------|------------|-------------------|
//! | 1     | 95           | 0.85       | 0.65       | 1                 |
//! | 2     | 75           | 0.70       | 0.57       | 2                 |
//! | 3     | 45           | 0.55       | 0.49       | 3                 |
//! | 4     | 20           | 0.40       | 0.41       | 4                 |
//! | 5     | 8            | 0.25       | 0.33       | 5                 |

use crate::error::StageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chronic kidney disease severity, 1 (mild) to 5 (kidney failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CkdStage(u8);

impl CkdStage {
    pub const MIN: CkdStage = CkdStage(1);
    pub const MAX: CkdStage = CkdStage(5);

    /// Clamp an arbitrary value into `1..=5`.
    pub fn clamped(value: u8) -> Self {
        CkdStage(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Numeric stage.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The following stage, wrapping from 5 back to 1.
    #[must_use]
    pub fn next(self) -> Self {
        CkdStage(self.0 % Self::MAX.0 + 1)
    }

    /// All stages in ascending severity.
    pub fn all() -> impl Iterator<Item = CkdStage> {
        (Self::MIN.0..=Self::MAX.0).map(CkdStage)
    }

    /// Baseline GFR in mL/min/1.73m².
    pub fn baseline_gfr(self) -> f32 {
        match self.0 {
            1 => 95.0,
            2 => 75.0,
            3 => 45.0,
            4 => 20.0,
            _ => 8.0,
        }
    }

    /// Row of the stage table for this stage.
    pub fn params(self) -> StageParams {
        let stage = self.0 as f32;
        StageParams {
            stage: self,
            baseline_gfr: self.baseline_gfr(),
            saturation: 0.25 + (5.0 - stage) * 0.15,
            brightness: 0.65 - (stage - 1.0) * 0.08,
            protein_count: self.0 as u32,
        }
    }

    /// Clinical label.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Stage 1 (kidney damage, normal GFR)",
            2 => "Stage 2 (mild)",
            3 => "Stage 3 (moderate)",
            4 => "Stage 4 (severe)",
            _ => "Stage 5 (kidney failure)",
        }
    }
}

impl Default for CkdStage {
    fn default() -> Self {
        CkdStage(3)
    }
}

impl TryFrom<u8> for CkdStage {
    type Error = StageError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(CkdStage(value))
        } else {
            Err(StageError(value))
        }
    }
}

impl From<CkdStage> for u8 {
    fn from(stage: CkdStage) -> Self {
        stage.0
    }
}

impl fmt::Display for CkdStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stage-dependent parameters for the diseased kidney.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageParams {
    pub stage: CkdStage,
    /// GFR around which the diseased kidney oscillates.
    pub baseline_gfr: f32,
    /// Color saturation factor for the diseased kidney image.
    pub saturation: f32,
    /// Brightness factor for the diseased kidney image.
    pub brightness: f32,
    /// Number of leaked protein particles.
    pub protein_count: u32,
}

impl StageParams {
    /// The full table, stage 1 first.
    pub fn all() -> Vec<StageParams> {
        CkdStage::all().map(CkdStage::params).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_range() {
        assert!(CkdStage::try_from(0).is_err());
        assert_eq!(CkdStage::try_from(1).map(CkdStage::get), Ok(1));
        assert_eq!(CkdStage::try_from(5).map(CkdStage::get), Ok(5));
        assert_eq!(CkdStage::try_from(6), Err(StageError(6)));
    }

    #[test]
    fn test_clamped() {
        assert_eq!(CkdStage::clamped(0).get(), 1);
        assert_eq!(CkdStage::clamped(9).get(), 5);
        assert_eq!(CkdStage::clamped(4).get(), 4);
    }

    #[test]
    fn test_next_wraps() {
        let order: Vec<u8> = CkdStage::all().map(|s| s.next().get()).collect();
        assert_eq!(order, vec![2, 3, 4, 5, 1]);
    }

    #[test]
    fn test_table_values() {
        let table = StageParams::all();
        assert_eq!(table.len(), 5);

        let baselines: Vec<f32> = table.iter().map(|p| p.baseline_gfr).collect();
        assert_eq!(baselines, vec![95.0, 75.0, 45.0, 20.0, 8.0]);

        let s1 = table[0];
        assert!((s1.saturation - 0.85).abs() < 1e-6);
        assert!((s1.brightness - 0.65).abs() < 1e-6);
        assert_eq!(s1.protein_count, 1);

        let s5 = table[4];
        assert!((s5.saturation - 0.25).abs() < 1e-6);
        assert!((s5.brightness - 0.33).abs() < 1e-6);
        assert_eq!(s5.protein_count, 5);
    }

    #[test]
    fn test_severity_is_monotonic() {
        let table = StageParams::all();
        for pair in table.windows(2) {
            assert!(pair[1].baseline_gfr < pair[0].baseline_gfr);
            assert!(pair[1].saturation < pair[0].saturation);
            assert!(pair[1].brightness < pair[0].brightness);
            assert!(pair[1].protein_count > pair[0].protein_count);
        }
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<CkdStage>("0").is_err());
        assert_eq!(serde_json::from_str::<CkdStage>("4").unwrap().get(), 4);
    }
}
