//! # Validation Rules
//!
//! Cross-checks run after every calculation. Each rule yields one
//! independent [`ValidationCheck`]; no rule depends on or suppresses another.
//! A failed check never blocks the result: it travels next to it.
//!
//! ## Rock (severity: warning)
//!
//! | Rule                | Fails when                      |
//! |---------------------|---------------------------------|
//! | `rock_temperature`  | water temperature > 30 °C       |
//! | `rock_moisture`     | moisture content < 0 %          |
//! | `rock_porosity`     | porosity > 50 %                 |
//!
//! ## Soil (severity: failure)
//!
//! | Rule                | Fails when                                     |
//! |---------------------|------------------------------------------------|
//! | `soil_paraffin`     | paraffin mass < 0.5 % of the soil mass         |
//! | `soil_temperature`  | water temperature > 30 °C                      |
//! | `soil_consistency`  | abs(e − n / (100 − n)) > 0.05                  |
//! | `water_volume`      | water volume < 0                               |
//!
//! Both pipelines end with `finite_results`, which fails when any derived
//! quantity is NaN or infinite. Thresholds come from
//! [`LabSettings`](crate::settings::LabSettings).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::rock::{RockResults, RockSampleInput};
use crate::calculations::soil::{SoilResults, SoilSampleInput};
use crate::settings::LabSettings;

/// Identifier of a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    RockTemperature,
    RockMoisture,
    RockPorosity,
    SoilParaffin,
    SoilTemperature,
    SoilConsistency,
    WaterVolume,
    FiniteResults,
}

impl RuleId {
    /// Stable string id (matches the serialized form)
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::RockTemperature => "rock_temperature",
            RuleId::RockMoisture => "rock_moisture",
            RuleId::RockPorosity => "rock_porosity",
            RuleId::SoilParaffin => "soil_paraffin",
            RuleId::SoilTemperature => "soil_temperature",
            RuleId::SoilConsistency => "soil_consistency",
            RuleId::WaterVolume => "water_volume",
            RuleId::FiniteResults => "finite_results",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a failed check should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Result is usable but suspect
    Warning,
    /// Procedure or consistency check did not pass
    Failure,
}

/// Outcome of one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub rule_id: RuleId,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
}

impl ValidationCheck {
    fn evaluate(
        rule_id: RuleId,
        severity: Severity,
        failed: bool,
        fail_message: impl Into<String>,
        pass_message: impl Into<String>,
    ) -> Self {
        ValidationCheck {
            rule_id,
            passed: !failed,
            severity,
            message: if failed { fail_message.into() } else { pass_message.into() },
        }
    }
}

/// Ordered list of checks computed together with one result record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    /// True when every check passed
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Messages of the failed checks, in rule order
    pub fn warnings(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.message.clone())
            .collect()
    }

    /// Pass flag of every check, in rule order
    pub fn pass_flags(&self) -> Vec<bool> {
        self.checks.iter().map(|c| c.passed).collect()
    }

    /// Look up a check by rule
    pub fn get(&self, rule_id: RuleId) -> Option<&ValidationCheck> {
        self.checks.iter().find(|c| c.rule_id == rule_id)
    }

    /// Whether a given rule passed (`false` if the rule was not run)
    pub fn passed(&self, rule_id: RuleId) -> bool {
        self.get(rule_id).map(|c| c.passed).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationCheck> {
        self.checks.iter()
    }
}

/// Run the rock rule set.
pub fn validate_rock(input: &RockSampleInput, results: &RockResults, settings: &LabSettings) -> ValidationReport {
    let checks = vec![
        ValidationCheck::evaluate(
            RuleId::RockTemperature,
            Severity::Warning,
            input.water_temperature_c > settings.max_water_temperature_c,
            "temperature may affect density precision",
            "water temperature within limit",
        ),
        ValidationCheck::evaluate(
            RuleId::RockMoisture,
            Severity::Warning,
            results.moisture_content_pct < 0.0,
            "negative moisture, check inputs",
            "moisture content non-negative",
        ),
        ValidationCheck::evaluate(
            RuleId::RockPorosity,
            Severity::Warning,
            results.porosity_pct > settings.max_rock_porosity_pct,
            "unusually high porosity",
            "porosity within expected range",
        ),
        finite_check(&results.named_values()),
    ];
    ValidationReport { checks }
}

/// Run the soil rule set.
pub fn validate_soil(input: &SoilSampleInput, results: &SoilResults, settings: &LabSettings) -> ValidationReport {
    let paraffin_pct = paraffin_fraction_pct(input, results);
    let expected_void_ratio = results.porosity_pct / (100.0 - results.porosity_pct);
    let void_ratio_gap = (results.void_ratio - expected_void_ratio).abs();

    let checks = vec![
        ValidationCheck::evaluate(
            RuleId::SoilParaffin,
            Severity::Failure,
            !(paraffin_pct >= settings.min_paraffin_fraction_pct),
            format!("paraffin fraction below {}%", settings.min_paraffin_fraction_pct),
            format!("paraffin fraction {:.3}%", paraffin_pct),
        ),
        ValidationCheck::evaluate(
            RuleId::SoilTemperature,
            Severity::Failure,
            input.water_temperature_c > settings.max_water_temperature_c,
            "temperature too high",
            "water temperature within limit",
        ),
        ValidationCheck::evaluate(
            RuleId::SoilConsistency,
            Severity::Failure,
            !(void_ratio_gap <= settings.void_ratio_tolerance),
            "void-ratio/porosity inconsistency",
            "void ratio consistent with porosity",
        ),
        ValidationCheck::evaluate(
            RuleId::WaterVolume,
            Severity::Failure,
            results.water_volume_cm3 < 0.0,
            "negative water volume, check masses",
            "water volume non-negative",
        ),
        finite_check(&results.named_values()),
    ];
    ValidationReport { checks }
}

/// Paraffin mass as a percentage of the initial soil mass
pub fn paraffin_fraction_pct(input: &SoilSampleInput, results: &SoilResults) -> f64 {
    results.paraffin_mass_g / input.initial_mass_g * 100.0
}

fn finite_check(values: &[(&'static str, f64)]) -> ValidationCheck {
    let bad: Vec<&str> = values
        .iter()
        .filter(|(_, v)| !v.is_finite())
        .map(|(name, _)| *name)
        .collect();
    ValidationCheck::evaluate(
        RuleId::FiniteResults,
        Severity::Failure,
        !bad.is_empty(),
        format!("non-finite results: {}", bad.join(", ")),
        "all results finite",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rule_id: RuleId, passed: bool) -> ValidationCheck {
        ValidationCheck {
            rule_id,
            passed,
            severity: Severity::Warning,
            message: rule_id.to_string(),
        }
    }

    #[test]
    fn test_report_accessors() {
        let report = ValidationReport {
            checks: vec![
                check(RuleId::RockTemperature, true),
                check(RuleId::RockMoisture, false),
                check(RuleId::RockPorosity, false),
            ],
        };
        assert!(!report.all_passed());
        assert_eq!(report.pass_flags(), vec![true, false, false]);
        assert_eq!(report.warnings(), vec!["rock_moisture", "rock_porosity"]);
        assert!(report.passed(RuleId::RockTemperature));
        assert!(!report.passed(RuleId::SoilParaffin));
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_finite_check_lists_fields() {
        let c = finite_check(&[("a", 1.0), ("b", f64::INFINITY), ("c", f64::NAN)]);
        assert!(!c.passed);
        assert_eq!(c.message, "non-finite results: b, c");

        let ok = finite_check(&[("a", 1.0)]);
        assert!(ok.passed);
    }

    #[test]
    fn test_rule_id_serialization() {
        let json = serde_json::to_string(&RuleId::SoilConsistency).unwrap();
        assert_eq!(json, "\"soil_consistency\"");
        assert_eq!(RuleId::FiniteResults.as_str(), "finite_results");
        assert_eq!(serde_json::to_string(&Severity::Failure).unwrap(), "\"failure\"");
    }
}
