//! # Soil Classification
//!
//! Heuristic soil-type label from porosity and specific gravity. The table
//! is evaluated top to bottom and the first matching row wins:
//!
//! | # | Porosity n (%) | Specific gravity Gs | Label                  |
//! |---|----------------|---------------------|------------------------|
//! | 1 | n > 40         | Gs < 2.5            | high-porosity clay     |
//! | 2 | n > 30         | 2.5 ≤ Gs < 2.7      | medium-porosity silt   |
//! | 3 | n < 30         | Gs ≥ 2.7            | dense sand             |
//! | 4 | otherwise      |                     | mixed soil             |
//!
//! Porosity comparisons are strict, so n = 30 and n = 40 exactly never
//! satisfy the porosity clause of their row and fall through to later rows.
//! These boundaries are kept as-is pending laboratory confirmation.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::calculations::classification::{classify, SoilClass};
//!
//! assert_eq!(classify(45.0, 2.4), SoilClass::HighPorosityClay);
//! assert_eq!(classify(40.0, 2.4), SoilClass::MixedSoil);
//! assert_eq!(classify(37.6, 2.73).label(), "mixed soil");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Soil-type label assigned by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilClass {
    #[serde(rename = "high-porosity clay")]
    HighPorosityClay,
    #[serde(rename = "medium-porosity silt")]
    MediumPorositySilt,
    #[serde(rename = "dense sand")]
    DenseSand,
    #[serde(rename = "mixed soil")]
    MixedSoil,
}

impl SoilClass {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SoilClass::HighPorosityClay => "high-porosity clay",
            SoilClass::MediumPorositySilt => "medium-porosity silt",
            SoilClass::DenseSand => "dense sand",
            SoilClass::MixedSoil => "mixed soil",
        }
    }
}

impl fmt::Display for SoilClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a soil from porosity (%) and specific gravity of solids.
///
/// NaN inputs fail every comparison and land on [`SoilClass::MixedSoil`].
pub fn classify(porosity_pct: f64, specific_gravity: f64) -> SoilClass {
    if porosity_pct > 40.0 && specific_gravity < 2.5 {
        SoilClass::HighPorosityClay
    } else if porosity_pct > 30.0 && (2.5..2.7).contains(&specific_gravity) {
        SoilClass::MediumPorositySilt
    } else if porosity_pct < 30.0 && specific_gravity >= 2.7 {
        SoilClass::DenseSand
    } else {
        SoilClass::MixedSoil
    }
}
