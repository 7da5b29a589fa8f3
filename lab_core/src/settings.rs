//! # Laboratory Settings
//!
//! Thresholds used by the validation rules and defaults applied to new
//! samples. Every field has a default equal to the value prescribed by the
//! test procedure, so an empty settings file is valid.
//!
//! Settings files are TOML:
//!
//! ```toml
//! max_water_temperature_c = 30.0
//! max_rock_porosity_pct = 50.0
//! min_paraffin_fraction_pct = 0.5
//! void_ratio_tolerance = 0.05
//! default_paraffin_density = 0.9
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lab_core::settings::LabSettings;
//!
//! let settings = LabSettings::from_toml_str("max_rock_porosity_pct = 45.0").unwrap();
//! assert_eq!(settings.max_rock_porosity_pct, 45.0);
//! assert_eq!(settings.max_water_temperature_c, 30.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{LabError, LabResult};

/// Default paraffin density (g/cm³)
pub const DEFAULT_PARAFFIN_DENSITY: f64 = 0.9;

/// Validation thresholds and sample defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabSettings {
    /// Bath temperature above which density precision is questioned (°C)
    pub max_water_temperature_c: f64,

    /// Rock porosity above which the result is flagged (%)
    pub max_rock_porosity_pct: f64,

    /// Minimum paraffin mass as a share of the soil mass (%)
    pub min_paraffin_fraction_pct: f64,

    /// Allowed gap between the void ratio and n/(100 − n)
    pub void_ratio_tolerance: f64,

    /// Paraffin density used when a soil sample does not state one (g/cm³)
    pub default_paraffin_density: f64,
}

impl Default for LabSettings {
    fn default() -> Self {
        LabSettings {
            max_water_temperature_c: 30.0,
            max_rock_porosity_pct: 50.0,
            min_paraffin_fraction_pct: 0.5,
            void_ratio_tolerance: 0.05,
            default_paraffin_density: DEFAULT_PARAFFIN_DENSITY,
        }
    }
}

impl LabSettings {
    /// Parse settings from a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> LabResult<Self> {
        let settings: LabSettings =
            toml::from_str(content).map_err(|e| LabError::config_error("<string>", e.to_string()))?;
        settings.validate("<string>")?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> LabResult<Self> {
        let shown = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LabError::file_error("read", &shown, e.to_string()))?;
        let settings: LabSettings =
            toml::from_str(&content).map_err(|e| LabError::config_error(&shown, e.to_string()))?;
        settings.validate(&shown)?;
        debug!(path = %shown, ?settings, "loaded lab settings");
        Ok(settings)
    }

    /// Serialize to TOML (e.g. to write a starter settings file).
    pub fn to_toml_string(&self) -> LabResult<String> {
        toml::to_string_pretty(self).map_err(|e| LabError::config_error("<string>", e.to_string()))
    }

    fn validate(&self, origin: &str) -> LabResult<()> {
        let checks = [
            ("max_water_temperature_c", self.max_water_temperature_c, true),
            ("max_rock_porosity_pct", self.max_rock_porosity_pct, false),
            ("min_paraffin_fraction_pct", self.min_paraffin_fraction_pct, false),
            ("void_ratio_tolerance", self.void_ratio_tolerance, false),
            ("default_paraffin_density", self.default_paraffin_density, false),
        ];
        for (key, value, allow_negative) in checks {
            if !value.is_finite() {
                return Err(LabError::config_error(origin, format!("{} must be a finite number", key)));
            }
            if !allow_negative && value < 0.0 {
                return Err(LabError::config_error(origin, format!("{} cannot be negative", key)));
            }
        }
        if self.default_paraffin_density == 0.0 {
            return Err(LabError::config_error(origin, "default_paraffin_density must be positive"));
        }
        Ok(())
    }
}
