//! # lab_core - Rock and Soil Index-Property Engine
//!
//! `lab_core` turns raw laboratory weighings into the index properties of a
//! rock or soil specimen (specific gravity, porosity, void ratio, moisture,
//! unit weights), checks them against physical-plausibility rules and
//! renders them as JSON, CSV or PDF. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Problems are data**: Implausible results come back as a
//!   [`ValidationReport`], never as errors
//! - **Gated**: Only incomplete input refuses to compute
//!
//! ## Quick Start
//!
//! ```rust
//! use lab_core::calculations::{compute_rock, RockSampleInput};
//!
//! let input = RockSampleInput {
//!     initial_mass_g: 285.12,
//!     saturated_surface_dry_mass_g: 287.11,
//!     submerged_mass_g: 117.71,
//!     dry_mass_g: 280.50,
//!     water_temperature_c: 26.0,
//! };
//!
//! let analysis = compute_rock(&input);
//! assert!((analysis.results.porosity_pct - 3.902).abs() < 1e-3);
//! assert!(analysis.is_clean());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Rock and soil pipelines, soil classification
//! - [`water`] - Water density as a function of temperature
//! - [`validation`] - Plausibility rules and the validation report
//! - [`phase`] - Three-phase (solids/water/air) composition
//! - [`settings`] - Rule thresholds, loaded from TOML
//! - [`report`] - Report metadata wrapped around an analysed sample
//! - [`export`] - CSV export
//! - [`pdf`] - PDF rendering via Typst
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod export;
pub mod pdf;
pub mod phase;
pub mod report;
pub mod settings;
pub mod validation;
pub mod water;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    compute_rock, compute_soil, RockAnalysis, RockSampleInput, SampleInput, SampleRecord, SoilAnalysis,
    SoilClass, SoilSampleInput,
};
pub use errors::{LabError, LabResult};
pub use phase::PhaseComposition;
pub use report::{LabReport, ReportMetadata, ReportType};
pub use settings::LabSettings;
pub use validation::{RuleId, Severity, ValidationCheck, ValidationReport};
