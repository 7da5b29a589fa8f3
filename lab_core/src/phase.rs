//! # Phase Composition
//!
//! Splits a sample into its three phases (solids, water, air) as
//! percentages of the total, normalized so the triple sums to 100. This is
//! the data behind the saturation profile bar and the ternary diagram.
//!
//! Components are not clamped: a negative air share (more water than voids)
//! survives normalization so the caller can see it.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::phase::PhaseComposition;
//!
//! let phases = PhaseComposition::normalize(60.0, 25.0, 15.0).unwrap();
//! assert!((phases.total() - 100.0).abs() < 1e-9);
//!
//! let (x, y) = phases.ternary_point();
//! assert!((x - 0.325).abs() < 1e-9);
//! assert!(y > 0.0);
//! ```

use serde::{Deserialize, Serialize};

/// Volumetric phase shares of a sample, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseComposition {
    pub solids_pct: f64,
    pub water_pct: f64,
    pub air_pct: f64,
}

impl PhaseComposition {
    /// Normalize raw phase amounts (any common unit) to percentages.
    ///
    /// Returns `None` when the total is zero, negative or non-finite, since
    /// no meaningful split exists then.
    pub fn normalize(solids: f64, water: f64, air: f64) -> Option<Self> {
        let total = solids + water + air;
        if !total.is_finite() || total <= 0.0 {
            return None;
        }
        Some(PhaseComposition {
            solids_pct: solids / total * 100.0,
            water_pct: water / total * 100.0,
            air_pct: air / total * 100.0,
        })
    }

    /// Sum of the three shares (100 up to rounding).
    pub fn total(&self) -> f64 {
        self.solids_pct + self.water_pct + self.air_pct
    }

    /// Cartesian position inside a unit ternary diagram.
    ///
    /// Solids sit at the origin corner, water at (1, 0) and air at the apex
    /// (0.5, √3/2).
    pub fn ternary_point(&self) -> (f64, f64) {
        let height = 3.0_f64.sqrt() / 2.0;
        let x = (self.water_pct + self.air_pct / 2.0) / 100.0;
        let y = self.air_pct * height / 100.0;
        (x, y)
    }

    /// `(solids, water, air)` tuple.
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.solids_pct, self.water_pct, self.air_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sums_to_100() {
        let phases = PhaseComposition::normalize(104.9, 0.0, 63.1).unwrap();
        assert!((phases.total() - 100.0).abs() < 1e-9);
        assert_eq!(phases.water_pct, 0.0);
    }

    #[test]
    fn test_already_percentages_unchanged() {
        let phases = PhaseComposition::normalize(50.0, 30.0, 20.0).unwrap();
        assert!((phases.solids_pct - 50.0).abs() < 1e-12);
        assert!((phases.water_pct - 30.0).abs() < 1e-12);
        assert!((phases.air_pct - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_component_not_clamped() {
        let phases = PhaseComposition::normalize(90.0, 15.0, -5.0).unwrap();
        assert!(phases.air_pct < 0.0);
        assert!((phases.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_totals() {
        assert!(PhaseComposition::normalize(0.0, 0.0, 0.0).is_none());
        assert!(PhaseComposition::normalize(f64::NAN, 1.0, 1.0).is_none());
        assert!(PhaseComposition::normalize(f64::INFINITY, 1.0, 1.0).is_none());
        assert!(PhaseComposition::normalize(-3.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_ternary_corners() {
        let solids = PhaseComposition::normalize(1.0, 0.0, 0.0).unwrap();
        assert_eq!(solids.ternary_point(), (0.0, 0.0));

        let water = PhaseComposition::normalize(0.0, 1.0, 0.0).unwrap();
        assert_eq!(water.ternary_point(), (1.0, 0.0));

        let air = PhaseComposition::normalize(0.0, 0.0, 1.0).unwrap();
        let (x, y) = air.ternary_point();
        assert!((x - 0.5).abs() < 1e-12);
        assert!((y - 3.0_f64.sqrt() / 2.0).abs() < 1e-12);
    }
}
