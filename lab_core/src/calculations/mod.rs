//! # Index-Property Calculations
//!
//! Each pipeline follows the pattern:
//!
//! - `*SampleInput` - Raw weighings (JSON-serializable)
//! - `*Results` - Derived properties (JSON-serializable)
//! - `*Analysis` - Results plus their [`ValidationReport`]
//! - `compute_*(input) -> *Analysis` - Pure, ungated calculation
//! - `calculate(input, settings) -> LabResult<*Analysis>` - Same, behind the
//!   completeness gate
//!
//! ## Available Calculations
//!
//! - [`rock`] - Buoyancy method for rock specimens
//! - [`soil`] - Paraffin-coated soil specimens with flask specific gravity
//! - [`classification`] - Soil-type heuristic used by the soil pipeline

pub mod classification;
mod non_finite;
pub mod rock;
pub mod soil;

use serde::{Deserialize, Serialize};

use crate::errors::LabResult;
use crate::phase::PhaseComposition;
use crate::settings::LabSettings;
use crate::validation::ValidationReport;

// Re-export commonly used types
pub use classification::{classify, SoilClass};
pub use rock::{compute_rock, compute_rock_with, RockAnalysis, RockResults, RockSampleInput};
pub use soil::{compute_soil, compute_soil_with, SoilAnalysis, SoilResults, SoilSampleInput, SoilValidations};

/// Input of either pipeline, tagged with its sample type.
///
/// ```json
/// { "type": "Rock", "masaInicial": 285.12, "masaSuperficialmenteSeca": 287.11,
///   "masaSumergida": 117.71, "masaSeca": 280.50, "temperaturaAgua": 26.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SampleInput {
    Rock(RockSampleInput),
    Soil(SoilSampleInput),
}

impl SampleInput {
    /// Sample type as a string
    pub fn kind(&self) -> &'static str {
        match self {
            SampleInput::Rock(_) => "Rock",
            SampleInput::Soil(_) => "Soil",
        }
    }

    /// Fields that block the calculation
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            SampleInput::Rock(r) => r.missing_fields(),
            SampleInput::Soil(s) => s.missing_fields(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Ungated calculation.
    pub fn analyze(&self, settings: &LabSettings) -> SampleRecord {
        match *self {
            SampleInput::Rock(input) => SampleRecord::Rock {
                input,
                analysis: compute_rock_with(&input, settings),
            },
            SampleInput::Soil(input) => SampleRecord::Soil {
                input,
                analysis: compute_soil_with(&input, settings),
            },
        }
    }

    /// Gated calculation.
    pub fn calculate(&self, settings: &LabSettings) -> LabResult<SampleRecord> {
        match *self {
            SampleInput::Rock(input) => Ok(SampleRecord::Rock {
                input,
                analysis: rock::calculate(&input, settings)?,
            }),
            SampleInput::Soil(input) => Ok(SampleRecord::Soil {
                input,
                analysis: soil::calculate(&input, settings)?,
            }),
        }
    }
}

/// An analysed sample: the input it was computed from and its analysis.
///
/// Records are rebuilt from scratch on every recalculation and never
/// patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SampleRecord {
    Rock {
        input: RockSampleInput,
        analysis: RockAnalysis,
    },
    Soil {
        input: SoilSampleInput,
        analysis: SoilAnalysis,
    },
}

impl SampleRecord {
    /// Sample type as a string
    pub fn kind(&self) -> &'static str {
        match self {
            SampleRecord::Rock { .. } => "Rock",
            SampleRecord::Soil { .. } => "Soil",
        }
    }

    /// Input fields with their serialized names
    pub fn input_values(&self) -> Vec<(&'static str, f64)> {
        match self {
            SampleRecord::Rock { input, .. } => input.named_values().to_vec(),
            SampleRecord::Soil { input, .. } => input.named_values().to_vec(),
        }
    }

    /// Numeric results as `(name, value, unit)`
    pub fn result_values(&self) -> Vec<(&'static str, f64, &'static str)> {
        let (values, fields): (Vec<(&'static str, f64)>, &[(&'static str, &'static str)]) = match self {
            SampleRecord::Rock { analysis, .. } => (analysis.results.named_values(), &RockResults::FIELDS),
            SampleRecord::Soil { analysis, .. } => (analysis.results.named_values(), &SoilResults::FIELDS),
        };
        values
            .into_iter()
            .zip(fields.iter())
            .map(|((name, value), (_, unit))| (name, value, *unit))
            .collect()
    }

    /// Soil classification, if this is a soil sample
    pub fn classification(&self) -> Option<SoilClass> {
        match self {
            SampleRecord::Rock { .. } => None,
            SampleRecord::Soil { analysis, .. } => Some(analysis.results.classification),
        }
    }

    /// Unit weights `(saturated, dry, solids)`, if this is a rock sample
    pub fn unit_weights(&self) -> Option<(f64, f64, f64)> {
        match self {
            SampleRecord::Rock { analysis, .. } => Some(analysis.results.unit_weights()),
            SampleRecord::Soil { .. } => None,
        }
    }

    pub fn validation(&self) -> &ValidationReport {
        match self {
            SampleRecord::Rock { analysis, .. } => &analysis.validation,
            SampleRecord::Soil { analysis, .. } => &analysis.validation,
        }
    }

    pub fn warnings(&self) -> Vec<String> {
        self.validation().warnings()
    }

    pub fn phase_composition(&self) -> Option<PhaseComposition> {
        match self {
            SampleRecord::Rock { analysis, .. } => analysis.phase_composition(),
            SampleRecord::Soil { analysis, .. } => analysis.phase_composition(),
        }
    }
}
