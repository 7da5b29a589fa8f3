//! # Soil Index Properties (Paraffin Method)
//!
//! The soil specimen is coated in paraffin, weighed in air and submerged,
//! and the paraffin's own mass and volume are removed from the bulk
//! measurement. Specific gravity comes from an independent flask
//! (pycnometer) test on a dry sub-sample.
//!
//! ## Procedure
//!
//! | Step | Quantity        | Formula                                   |
//! |------|-----------------|-------------------------------------------|
//! | 1    | ρw              | water density at T                        |
//! | 2    | Mp              | Msp − M₀                                  |
//! | 3    | Vp              | Mp / ρp                                   |
//! | 4    | V               | (Msp − Msub) / ρw − Vp                    |
//! | 5    | Gs              | Ms / (Mfw + Ms − Mfws)                    |
//! | 6    | Vs              | M₀ / (Gs · ρw)                            |
//! | 7    | Vw              | (Msp − M₀ − Mp) / ρw                      |
//! | 8    | Va              | V − Vs − Vw                               |
//! | 9    | n (%)           | (V − Vs) / V × 100                        |
//! | 10   | e               | (V − Vs) / Vs                             |
//! | 11   | Sr (%)          | Vw / (V − Vs) × 100                       |
//! | 12   | class           | [`classify`](super::classification::classify)(n, Gs) |
//!
//! Vw = 0 is a legitimate outcome (dry specimen, Sr = 0). A negative Vw
//! fails the `water_volume` check.
//!
//! ## Example
//!
//! ```rust
//! use lab_core::calculations::soil::{compute_soil, SoilSampleInput};
//! use lab_core::calculations::classification::SoilClass;
//!
//! let input = SoilSampleInput {
//!     initial_mass_g: 285.12,
//!     waxed_mass_g: 287.11,
//!     submerged_mass_g: 117.71,
//!     paraffin_density: 0.9,
//!     water_temperature_c: 26.0,
//!     subsample_dry_mass_g: 50.25,
//!     flask_water_mass_g: 675.30,
//!     flask_water_solids_mass_g: 707.15,
//! };
//!
//! let analysis = compute_soil(&input);
//! assert!((analysis.results.specific_gravity - 2.731).abs() < 0.001);
//! assert_eq!(analysis.results.classification, SoilClass::MixedSoil);
//! assert!(analysis.validations().consistencia);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classification::{classify, SoilClass};
use crate::errors::{LabError, LabResult};
use crate::phase::PhaseComposition;
use crate::settings::{LabSettings, DEFAULT_PARAFFIN_DENSITY};
use crate::validation::{validate_soil, RuleId, ValidationReport};
use crate::water;

fn default_paraffin_density() -> f64 {
    DEFAULT_PARAFFIN_DENSITY
}

/// Weighings of one paraffin-coated soil specimen plus its flask sub-test.
///
/// ## JSON Example
///
/// ```json
/// {
///   "masaInicial": 285.12,
///   "masaSueloParafina": 287.11,
///   "masaSumergida": 117.71,
///   "densidadParafina": 0.9,
///   "temperaturaAgua": 26.0,
///   "masaSecaSubmuestra": 50.25,
///   "masaMatrazAgua": 675.30,
///   "masaMatrazAguaSolidos": 707.15
/// }
/// ```
///
/// `densidadParafina` may be omitted and defaults to 0.9 g/cm³.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSampleInput {
    /// Specimen mass before coating (g)
    #[serde(rename = "masaInicial")]
    pub initial_mass_g: f64,

    /// Specimen plus paraffin, weighed in air (g)
    #[serde(rename = "masaSueloParafina")]
    pub waxed_mass_g: f64,

    /// Coated specimen, weighed submerged (g)
    #[serde(rename = "masaSumergida")]
    pub submerged_mass_g: f64,

    /// Paraffin density (g/cm³)
    #[serde(rename = "densidadParafina", default = "default_paraffin_density")]
    pub paraffin_density: f64,

    /// Bath temperature (°C)
    #[serde(rename = "temperaturaAgua")]
    pub water_temperature_c: f64,

    /// Dry mass of the flask sub-sample (g)
    #[serde(rename = "masaSecaSubmuestra")]
    pub subsample_dry_mass_g: f64,

    /// Flask filled with water (g)
    #[serde(rename = "masaMatrazAgua")]
    pub flask_water_mass_g: f64,

    /// Flask with water and sub-sample solids (g)
    #[serde(rename = "masaMatrazAguaSolidos")]
    pub flask_water_solids_mass_g: f64,
}

impl SoilSampleInput {
    /// Fields with their serialized names, in form order.
    pub fn named_values(&self) -> [(&'static str, f64); 8] {
        [
            ("masaInicial", self.initial_mass_g),
            ("masaSueloParafina", self.waxed_mass_g),
            ("masaSumergida", self.submerged_mass_g),
            ("densidadParafina", self.paraffin_density),
            ("temperaturaAgua", self.water_temperature_c),
            ("masaSecaSubmuestra", self.subsample_dry_mass_g),
            ("masaMatrazAgua", self.flask_water_mass_g),
            ("masaMatrazAguaSolidos", self.flask_water_solids_mass_g),
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
            Err(LabError::incomplete_input("soil", missing))
        }
    }
}

/// Derived soil properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilResults {
    #[serde(rename = "masaParafina", with = "super::non_finite")]
    pub paraffin_mass_g: f64,

    #[serde(rename = "volumenParafina", with = "super::non_finite")]
    pub paraffin_volume_cm3: f64,

    /// Coated volume minus paraffin volume; equals the sample volume
    #[serde(rename = "volumenSumergido", with = "super::non_finite")]
    pub submerged_volume_cm3: f64,

    /// From the flask sub-test, independent of the specimen volume
    #[serde(rename = "gravedadEspecifica", with = "super::non_finite")]
    pub specific_gravity: f64,

    #[serde(rename = "volumenMuestra", with = "super::non_finite")]
    pub sample_volume_cm3: f64,

    #[serde(rename = "volumenSolidos", with = "super::non_finite")]
    pub solids_volume_cm3: f64,

    #[serde(rename = "volumenAgua", with = "super::non_finite")]
    pub water_volume_cm3: f64,

    #[serde(rename = "volumenAire", with = "super::non_finite")]
    pub air_volume_cm3: f64,

    #[serde(rename = "porosidad", with = "super::non_finite")]
    pub porosity_pct: f64,

    #[serde(rename = "relacionVacios", with = "super::non_finite")]
    pub void_ratio: f64,

    #[serde(rename = "gradoSaturacion", with = "super::non_finite")]
    pub degree_of_saturation_pct: f64,

    #[serde(rename = "densidadAgua", with = "super::non_finite")]
    pub water_density: f64,

    #[serde(rename = "clasificacion")]
    pub classification: SoilClass,
}

impl SoilResults {
    /// Serialized names and units of the numeric results, in calculation order.
    pub const FIELDS: [(&'static str, &'static str); 12] = [
        ("masaParafina", "g"),
        ("volumenParafina", "cm3"),
        ("volumenSumergido", "cm3"),
        ("gravedadEspecifica", "-"),
        ("volumenMuestra", "cm3"),
        ("volumenSolidos", "cm3"),
        ("volumenAgua", "cm3"),
        ("volumenAire", "cm3"),
        ("porosidad", "%"),
        ("relacionVacios", "-"),
        ("gradoSaturacion", "%"),
        ("densidadAgua", "g/cm3"),
    ];

    /// Every numeric result with its serialized name.
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        let values = [
            self.paraffin_mass_g,
            self.paraffin_volume_cm3,
            self.submerged_volume_cm3,
            self.specific_gravity,
            self.sample_volume_cm3,
            self.solids_volume_cm3,
            self.water_volume_cm3,
            self.air_volume_cm3,
            self.porosity_pct,
            self.void_ratio,
            self.degree_of_saturation_pct,
            self.water_density,
        ];
        Self::FIELDS
            .iter()
            .zip(values)
            .map(|((name, _), v)| (*name, v))
            .collect()
    }
}

/// The three soil procedure checks, keyed the way the lab sheet names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilValidations {
    pub parafina: bool,
    pub temperatura: bool,
    pub consistencia: bool,
}

/// Soil results plus the checks computed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilAnalysis {
    pub results: SoilResults,
    pub validation: ValidationReport,
}

impl SoilAnalysis {
    /// Messages of the failed checks
    pub fn warnings(&self) -> Vec<String> {
        self.validation.warnings()
    }

    /// Paraffin, temperature and consistency outcomes
    pub fn validations(&self) -> SoilValidations {
        SoilValidations {
            parafina: self.validation.passed(RuleId::SoilParaffin),
            temperatura: self.validation.passed(RuleId::SoilTemperature),
            consistencia: self.validation.passed(RuleId::SoilConsistency),
        }
    }

    /// True when no check failed
    pub fn is_clean(&self) -> bool {
        self.validation.all_passed()
    }

    /// Solids / water / air split of the sample volume
    pub fn phase_composition(&self) -> Option<PhaseComposition> {
        let r = &self.results;
        PhaseComposition::normalize(
            r.solids_volume_cm3 / r.sample_volume_cm3 * 100.0,
            r.water_volume_cm3 / r.sample_volume_cm3 * 100.0,
            r.air_volume_cm3 / r.sample_volume_cm3 * 100.0,
        )
    }
}

/// Compute soil properties with the default thresholds.
pub fn compute_soil(input: &SoilSampleInput) -> SoilAnalysis {
    compute_soil_with(input, &LabSettings::default())
}

/// Compute soil properties, classify, and run the soil rule set.
pub fn compute_soil_with(input: &SoilSampleInput, settings: &LabSettings) -> SoilAnalysis {
    let water_density = water::density(input.water_temperature_c);

    let paraffin_mass_g = input.waxed_mass_g - input.initial_mass_g;
    let paraffin_volume_cm3 = paraffin_mass_g / input.paraffin_density;
    let submerged_volume_cm3 =
        (input.waxed_mass_g - input.submerged_mass_g) / water_density - paraffin_volume_cm3;

    let specific_gravity = input.subsample_dry_mass_g
        / (input.flask_water_mass_g + input.subsample_dry_mass_g - input.flask_water_solids_mass_g);

    let sample_volume_cm3 = submerged_volume_cm3;
    let solids_volume_cm3 = input.initial_mass_g / (specific_gravity * water_density);
    let water_volume_cm3 = (input.waxed_mass_g - input.initial_mass_g - paraffin_mass_g) / water_density;
    let air_volume_cm3 = sample_volume_cm3 - solids_volume_cm3 - water_volume_cm3;

    let voids_cm3 = sample_volume_cm3 - solids_volume_cm3;
    let porosity_pct = voids_cm3 / sample_volume_cm3 * 100.0;
    let void_ratio = voids_cm3 / solids_volume_cm3;
    let degree_of_saturation_pct = water_volume_cm3 / voids_cm3 * 100.0;

    let classification = classify(porosity_pct, specific_gravity);

    let results = SoilResults {
        paraffin_mass_g,
        paraffin_volume_cm3,
        submerged_volume_cm3,
        specific_gravity,
        sample_volume_cm3,
        solids_volume_cm3,
        water_volume_cm3,
        air_volume_cm3,
        porosity_pct,
        void_ratio,
        degree_of_saturation_pct,
        water_density,
        classification,
    };

    let validation = validate_soil(input, &results, settings);
    if !validation.passed(RuleId::FiniteResults) {
        warn!(?input, "soil calculation produced non-finite results");
    }
    debug!(
        specific_gravity,
        porosity_pct,
        void_ratio,
        %classification,
        failed_checks = validation.warnings().len(),
        "soil properties computed"
    );

    SoilAnalysis { results, validation }
}

/// Gated calculation: returns `IncompleteInput` unless every field is positive.
pub fn calculate(input: &SoilSampleInput, settings: &LabSettings) -> LabResult<SoilAnalysis> {
    input.validate()?;
    Ok(compute_soil_with(input, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_soil;

    fn test_soil() -> SoilSampleInput {
        SoilSampleInput {
            initial_mass_g: 285.12,
            waxed_mass_g: 287.11,
            submerged_mass_g: 117.71,
            paraffin_density: 0.9,
            water_temperature_c: 26.0,
            subsample_dry_mass_g: 50.25,
            flask_water_mass_g: 675.30,
            flask_water_solids_mass_g: 707.15,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let r = compute_soil(&test_soil()).results;

        assert!((r.paraffin_mass_g - 1.99).abs() < 1e-9);
        assert!((r.paraffin_volume_cm3 - 2.2111).abs() < 1e-3);
        // Gs = 50.25 / (675.30 + 50.25 − 707.15) = 50.25 / 18.40
        assert!((r.specific_gravity - 2.7310).abs() < 1e-3);
        assert!((r.sample_volume_cm3 - 167.96).abs() < 0.01);
        assert_eq!(r.sample_volume_cm3, r.submerged_volume_cm3);
        assert!((r.solids_volume_cm3 - 104.88).abs() < 0.01);
        assert_eq!(r.water_volume_cm3, 0.0);
        assert!((r.air_volume_cm3 - 63.08).abs() < 0.01);
        assert!((r.porosity_pct - 37.56).abs() < 0.01);
        assert!((r.void_ratio - 0.6015).abs() < 1e-3);
        assert_eq!(r.degree_of_saturation_pct, 0.0);
        assert_eq!(r.classification, SoilClass::MixedSoil);
    }

    #[test]
    fn test_reference_scenario_validations() {
        let analysis = compute_soil(&test_soil());
        assert_eq!(
            analysis.validations(),
            SoilValidations {
                parafina: true,
                temperatura: true,
                consistencia: true,
            }
        );
        assert!(analysis.is_clean());
        assert!(analysis.warnings().is_empty());

        let paraffin = analysis.validation.get(RuleId::SoilParaffin).unwrap();
        assert_eq!(paraffin.message, "paraffin fraction 0.698%");
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(compute_soil(&test_soil()), compute_soil(&test_soil()));
    }

    #[test]
    fn test_thin_paraffin_fails() {
        let mut soil = test_soil();
        soil.waxed_mass_g = soil.initial_mass_g + 1.0; // 0.35 %
        let analysis = compute_soil(&soil);
        assert!(!analysis.validations().parafina);
        assert!(analysis.validations().temperatura);
        assert_eq!(analysis.warnings(), vec!["paraffin fraction below 0.5%"]);
    }

    #[test]
    fn test_hot_bath_fails() {
        let mut soil = test_soil();
        soil.water_temperature_c = 31.0;
        let analysis = compute_soil(&soil);
        assert!(!analysis.validations().temperatura);
        assert!(analysis.warnings().contains(&"temperature too high".to_string()));
    }

    #[test]
    fn test_rules_are_independent() {
        // Thin coating and a hot bath at once
        let mut soil = test_soil();
        soil.waxed_mass_g = soil.initial_mass_g + 1.0;
        soil.water_temperature_c = 31.0;

        let analysis = compute_soil(&soil);
        assert_eq!(
            analysis.validations(),
            SoilValidations {
                parafina: false,
                temperatura: false,
                consistencia: true,
            }
        );
        let warnings = analysis.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.contains(&"paraffin fraction below 0.5%".to_string()));
        assert!(warnings.contains(&"temperature too high".to_string()));
    }

    #[test]
    fn test_degenerate_flask_survives_json() {
        let mut soil = test_soil();
        soil.flask_water_mass_g = 600.0;
        soil.subsample_dry_mass_g = 50.0;
        soil.flask_water_solids_mass_g = 650.0;

        let analysis = compute_soil(&soil);
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"gravedadEspecifica\":\"inf\""));
        assert!(json.contains("\"relacionVacios\":\"inf\""));

        let back: SoilAnalysis = serde_json::from_str(&json).unwrap();
        assert!(back.results.specific_gravity.is_infinite());
        assert_eq!(back, analysis);
    }

    #[test]
    fn test_degenerate_flask_is_flagged() {
        let mut soil = test_soil();
        // Mfw + Ms − Mfws = 0
        soil.flask_water_mass_g = 600.0;
        soil.subsample_dry_mass_g = 50.0;
        soil.flask_water_solids_mass_g = 650.0;

        let analysis = compute_soil(&soil);
        let r = &analysis.results;
        assert!(r.specific_gravity.is_infinite());
        assert_eq!(r.solids_volume_cm3, 0.0);
        assert!(r.void_ratio.is_infinite());

        // inf − inf is NaN, which must not slip through the tolerance check
        assert!(!analysis.validations().consistencia);
        assert!(!analysis.validation.passed(RuleId::FiniteResults));
        let finite = analysis.validation.get(RuleId::FiniteResults).unwrap();
        assert!(finite.message.contains("gravedadEspecifica"));
        assert!(finite.message.contains("relacionVacios"));
    }

    #[test]
    fn test_negative_water_volume_is_flagged() {
        let soil = test_soil();
        let mut results = compute_soil(&soil).results;
        results.water_volume_cm3 = -0.4;
        let report = validate_soil(&soil, &results, &LabSettings::default());
        assert!(!report.passed(RuleId::WaterVolume));
        assert!(report.passed(RuleId::SoilConsistency));
    }

    #[test]
    fn test_inconsistent_void_ratio_fails() {
        let soil = test_soil();
        let mut results = compute_soil(&soil).results;
        results.void_ratio += 0.06;
        let report = validate_soil(&soil, &results, &LabSettings::default());
        assert!(!report.passed(RuleId::SoilConsistency));
        assert_eq!(report.warnings(), vec!["void-ratio/porosity inconsistency"]);
    }

    #[test]
    fn test_phase_composition() {
        let phases = compute_soil(&test_soil()).phase_composition().unwrap();
        assert!((phases.solids_pct - 62.44).abs() < 0.01);
        assert_eq!(phases.water_pct, 0.0);
        assert!((phases.air_pct - 37.56).abs() < 0.01);
    }

    #[test]
    fn test_gate() {
        let mut soil = test_soil();
        assert!(soil.is_complete());

        soil.flask_water_mass_g = 0.0;
        assert_eq!(soil.missing_fields(), vec!["masaMatrazAgua"]);
        let err = calculate(&soil, &LabSettings::default()).unwrap_err();
        assert_eq!(err.error_code(), "INCOMPLETE_INPUT");
    }

    #[test]
    fn test_paraffin_density_defaults() {
        let json = r#"{
            "masaInicial": 285.12,
            "masaSueloParafina": 287.11,
            "masaSumergida": 117.71,
            "temperaturaAgua": 26.0,
            "masaSecaSubmuestra": 50.25,
            "masaMatrazAgua": 675.30,
            "masaMatrazAguaSolidos": 707.15
        }"#;
        let soil: SoilSampleInput = serde_json::from_str(json).unwrap();
        assert_eq!(soil.paraffin_density, 0.9);
        assert_eq!(soil, test_soil());
    }

    #[test]
    fn test_results_json_shape() {
        let value = serde_json::to_value(compute_soil(&test_soil())).unwrap();
        assert_eq!(value["results"]["clasificacion"], "mixed soil");
        assert!(value["validation"]["checks"].as_array().unwrap().len() == 5);
    }
}
