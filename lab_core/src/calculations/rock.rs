//! # Rock Index Properties (Buoyancy Method)
//!
//! Derives moisture, volumes, specific gravity, porosity and unit weights of
//! a rock specimen from four weighings and the bath temperature.
//!
//! ## Procedure
//!
//! | Step | Quantity                 | Formula                          |
//! |------|--------------------------|----------------------------------|
//! | 1    | ρw                       | water density at T               |
//! | 2    | Mw                       | M₀ − Md                          |
//! | 3    | w (%)                    | Mw / Md × 100                    |
//! | 4    | Vv (cm³)                 | (Msss − Md) / ρw                 |
//! | 5    | V (cm³)                  | (Msss − Msub) / ρw               |
//! | 6    | Gs                       | Md / (V − Vv)                    |
//! | 7    | n (%)                    | Vv / V × 100                     |
//! | 8-10 | γsat, γd, γs (g/cm³)     | Msss / V, Md / V, Gs · ρw        |
//!
//! A zero denominator (V = Vv or V = 0) produces a non-finite value. The
//! value is kept as-is in [`RockResults`] and flagged by the
//! `finite_results` check; nothing is clamped.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::calculations::rock::{compute_rock, RockSampleInput};
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
//! assert!((analysis.results.porosity_pct - 3.90).abs() < 0.01);
//! assert!(analysis.warnings().is_empty());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{LabError, LabResult};
use crate::phase::PhaseComposition;
use crate::settings::LabSettings;
use crate::validation::{validate_rock, RuleId, ValidationReport};
use crate::water;

/// Weighings of one rock specimen.
///
/// ## JSON Example
///
/// ```json
/// {
///   "masaInicial": 285.12,
///   "masaSuperficialmenteSeca": 287.11,
///   "masaSumergida": 117.71,
///   "masaSeca": 280.50,
///   "temperaturaAgua": 26.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RockSampleInput {
    /// Mass as received (g)
    #[serde(rename = "masaInicial")]
    pub initial_mass_g: f64,

    /// Saturated surface-dry mass (g)
    #[serde(rename = "masaSuperficialmenteSeca")]
    pub saturated_surface_dry_mass_g: f64,

    /// Apparent mass while submerged (g)
    #[serde(rename = "masaSumergida")]
    pub submerged_mass_g: f64,

    /// Oven-dry mass (g)
    #[serde(rename = "masaSeca")]
    pub dry_mass_g: f64,

    /// Bath temperature (°C)
    #[serde(rename = "temperaturaAgua")]
    pub water_temperature_c: f64,
}

impl RockSampleInput {
    /// Fields with their serialized names, in form order.
    pub fn named_values(&self) -> [(&'static str, f64); 5] {
        [
            ("masaInicial", self.initial_mass_g),
            ("masaSuperficialmenteSeca", self.saturated_surface_dry_mass_g),
            ("masaSumergida", self.submerged_mass_g),
            ("masaSeca", self.dry_mass_g),
            ("temperaturaAgua", self.water_temperature_c),
        ]
    }

    /// Fields that are not strictly positive (NaN counts as missing).
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.named_values()
            .into_iter()
            .filter(|(_, v)| !(*v > 0.0))
            .map(|(name, _)| name)
            .collect()
    }

    /// True when every field is positive and a calculation should run.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Completeness gate as a `Result`.
    pub fn validate(&self) -> LabResult<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LabError::incomplete_input("rock", missing))
        }
    }
}

/// Derived rock properties.
///
/// Serialized with the laboratory sheet's field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RockResults {
    /// Mass of pore water M₀ − Md (g)
    #[serde(rename = "masaAgua", with = "super::non_finite")]
    pub water_mass_g: f64,

    /// Moisture content (%)
    #[serde(rename = "humedad", with = "super::non_finite")]
    pub moisture_content_pct: f64,

    /// Volume of voids (cm³)
    #[serde(rename = "volumenHuecos", with = "super::non_finite")]
    pub void_volume_cm3: f64,

    /// Bulk volume (cm³)
    #[serde(rename = "volumenMuestra", with = "super::non_finite")]
    pub sample_volume_cm3: f64,

    /// Specific gravity of solids
    #[serde(rename = "gravedadEspecifica", with = "super::non_finite")]
    pub specific_gravity: f64,

    /// Porosity (%)
    #[serde(rename = "porosidad", with = "super::non_finite")]
    pub porosity_pct: f64,

    /// Saturated unit weight (g/cm³)
    #[serde(rename = "pesoUnitarioSaturado", with = "super::non_finite")]
    pub saturated_unit_weight: f64,

    /// Dry unit weight (g/cm³)
    #[serde(rename = "pesoUnitarioSeco", with = "super::non_finite")]
    pub dry_unit_weight: f64,

    /// Unit weight of solids (g/cm³)
    #[serde(rename = "pesoUnitarioSolidos", with = "super::non_finite")]
    pub solids_unit_weight: f64,

    /// Water density at the bath temperature (g/cm³)
    #[serde(rename = "densidadAgua", with = "super::non_finite")]
    pub water_density: f64,
}

impl RockResults {
    /// Every derived value with its serialized name.
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        Self::FIELDS
            .iter()
            .zip(self.values())
            .map(|((name, _), v)| (*name, v))
            .collect()
    }

    /// Serialized names and units, in calculation order.
    pub const FIELDS: [(&'static str, &'static str); 10] = [
        ("masaAgua", "g"),
        ("humedad", "%"),
        ("volumenHuecos", "cm3"),
        ("volumenMuestra", "cm3"),
        ("gravedadEspecifica", "-"),
        ("porosidad", "%"),
        ("pesoUnitarioSaturado", "g/cm3"),
        ("pesoUnitarioSeco", "g/cm3"),
        ("pesoUnitarioSolidos", "g/cm3"),
        ("densidadAgua", "g/cm3"),
    ];

    fn values(&self) -> [f64; 10] {
        [
            self.water_mass_g,
            self.moisture_content_pct,
            self.void_volume_cm3,
            self.sample_volume_cm3,
            self.specific_gravity,
            self.porosity_pct,
            self.saturated_unit_weight,
            self.dry_unit_weight,
            self.solids_unit_weight,
            self.water_density,
        ]
    }

    /// `(saturated, dry, solids)` unit weights in g/cm³
    pub fn unit_weights(&self) -> (f64, f64, f64) {
        (self.saturated_unit_weight, self.dry_unit_weight, self.solids_unit_weight)
    }
}

/// Rock results plus the checks computed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RockAnalysis {
    pub results: RockResults,
    pub validation: ValidationReport,
}

impl RockAnalysis {
    /// Messages of the failed checks
    pub fn warnings(&self) -> Vec<String> {
        self.validation.warnings()
    }

    /// Pass flag per rule: temperature, moisture, porosity, finite results
    pub fn valid_passes(&self) -> Vec<bool> {
        self.validation.pass_flags()
    }

    /// True when no check failed
    pub fn is_clean(&self) -> bool {
        self.validation.all_passed()
    }

    /// Solids / water / air split of the bulk volume.
    ///
    /// Solids are V − Vv, water is the pore-water volume Mw / ρw, and air is
    /// the rest of the voids.
    pub fn phase_composition(&self) -> Option<PhaseComposition> {
        let r = &self.results;
        let solids = (r.sample_volume_cm3 - r.void_volume_cm3) / r.sample_volume_cm3 * 100.0;
        let water = r.water_mass_g / r.water_density / r.sample_volume_cm3 * 100.0;
        let air = r.porosity_pct - water;
        PhaseComposition::normalize(solids, water, air)
    }
}

/// Compute rock properties with the default thresholds.
pub fn compute_rock(input: &RockSampleInput) -> RockAnalysis {
    compute_rock_with(input, &LabSettings::default())
}

/// Compute rock properties and run the rock rule set.
///
/// Never gates and never fails: degenerate inputs give non-finite results
/// plus a failed `finite_results` check.
pub fn compute_rock_with(input: &RockSampleInput, settings: &LabSettings) -> RockAnalysis {
    let water_density = water::density(input.water_temperature_c);

    let water_mass_g = input.initial_mass_g - input.dry_mass_g;
    let moisture_content_pct = water_mass_g / input.dry_mass_g * 100.0;
    let void_volume_cm3 = (input.saturated_surface_dry_mass_g - input.dry_mass_g) / water_density;
    let sample_volume_cm3 = (input.saturated_surface_dry_mass_g - input.submerged_mass_g) / water_density;

    let specific_gravity = input.dry_mass_g / (sample_volume_cm3 - void_volume_cm3);
    let porosity_pct = void_volume_cm3 / sample_volume_cm3 * 100.0;
    let saturated_unit_weight = input.saturated_surface_dry_mass_g / sample_volume_cm3;
    let dry_unit_weight = input.dry_mass_g / sample_volume_cm3;
    let solids_unit_weight = specific_gravity * water_density;

    let results = RockResults {
        water_mass_g,
        moisture_content_pct,
        void_volume_cm3,
        sample_volume_cm3,
        specific_gravity,
        porosity_pct,
        saturated_unit_weight,
        dry_unit_weight,
        solids_unit_weight,
        water_density,
    };

    let validation = validate_rock(input, &results, settings);
    if !validation.passed(RuleId::FiniteResults) {
        warn!(?input, "rock calculation produced non-finite results");
    }
    debug!(
        specific_gravity,
        porosity_pct,
        failed_checks = validation.warnings().len(),
        "rock properties computed"
    );

    RockAnalysis { results, validation }
}

/// Gated calculation: returns `IncompleteInput` unless every field is positive.
pub fn calculate(input: &RockSampleInput, settings: &LabSettings) -> LabResult<RockAnalysis> {
    input.validate()?;
    Ok(compute_rock_with(input, settings))
}
