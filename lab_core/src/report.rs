//! # Laboratory Report
//!
//! A [`LabReport`] bundles the project metadata typed on the report form
//! with one analysed sample. It is the only input the exporters
//! ([`export`](crate::export), [`pdf`](crate::pdf)) consume.
//!
//! ## Structure
//!
//! ```text
//! LabReport
//! ├── metadata: ReportMetadata (project, sample id, location, date, people)
//! └── sample: SampleRecord (input + results + validation)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lab_core::calculations::{RockSampleInput, SampleInput};
//! use lab_core::report::{LabReport, ReportMetadata};
//! use lab_core::settings::LabSettings;
//!
//! let input = SampleInput::Rock(RockSampleInput {
//!     initial_mass_g: 285.12,
//!     saturated_surface_dry_mass_g: 287.11,
//!     submerged_mass_g: 117.71,
//!     dry_mass_g: 280.50,
//!     water_temperature_c: 26.0,
//! });
//!
//! let meta = ReportMetadata::new("Central Building", "M-001-2024");
//! let report = LabReport::build(meta, &input, &LabSettings::default()).unwrap();
//! assert_eq!(report.sample.kind(), "Rock");
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calculations::{SampleInput, SampleRecord};
use crate::errors::LabResult;
use crate::settings::LabSettings;

/// Test standard the procedure follows
pub const TEST_STANDARD: &str = "INV E-128-11";

/// Which sections a rendered report contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Inputs, results, phase composition, validation
    #[default]
    Complete,
    /// Results and validation only
    Summary,
    /// Inputs, results and validation, no chart data
    Technical,
    /// Chart data only (phase composition, unit weights)
    Graphs,
}

impl ReportType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportType::Complete => "Complete Report",
            ReportType::Summary => "Executive Summary",
            ReportType::Technical => "Technical Data",
            ReportType::Graphs => "Charts Only",
        }
    }

    pub fn includes_inputs(&self) -> bool {
        matches!(self, ReportType::Complete | ReportType::Technical)
    }

    pub fn includes_results(&self) -> bool {
        !matches!(self, ReportType::Graphs)
    }

    pub fn includes_chart_data(&self) -> bool {
        matches!(self, ReportType::Complete | ReportType::Graphs)
    }

    pub fn includes_validation(&self) -> bool {
        !matches!(self, ReportType::Graphs)
    }
}

/// Project information printed in the report header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    pub project_name: String,
    pub sample_id: String,
    pub location: String,
    pub test_date: NaiveDate,
    pub technician: String,
    pub client: String,
    pub observations: String,
    pub report_type: ReportType,
}

impl ReportMetadata {
    /// Metadata dated today with the remaining fields empty.
    pub fn new(project_name: impl Into<String>, sample_id: impl Into<String>) -> Self {
        ReportMetadata {
            project_name: project_name.into(),
            sample_id: sample_id.into(),
            ..ReportMetadata::default()
        }
    }

    pub fn with_report_type(mut self, report_type: ReportType) -> Self {
        self.report_type = report_type;
        self
    }
}

impl Default for ReportMetadata {
    fn default() -> Self {
        ReportMetadata {
            project_name: String::new(),
            sample_id: String::new(),
            location: String::new(),
            test_date: Local::now().date_naive(),
            technician: String::new(),
            client: String::new(),
            observations: String::new(),
            report_type: ReportType::default(),
        }
    }
}

/// Metadata plus one analysed sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabReport {
    pub metadata: ReportMetadata,
    pub sample: SampleRecord,
}

impl LabReport {
    pub fn new(metadata: ReportMetadata, sample: SampleRecord) -> Self {
        LabReport { metadata, sample }
    }

    /// Run the gated calculation and wrap the record.
    pub fn build(metadata: ReportMetadata, input: &SampleInput, settings: &LabSettings) -> LabResult<Self> {
        let sample = input.calculate(settings)?;
        Ok(LabReport { metadata, sample })
    }

    /// Header fields as `(label, value)` pairs, in form order.
    pub fn metadata_rows(&self) -> Vec<(&'static str, String)> {
        let m = &self.metadata;
        vec![
            ("projectName", m.project_name.clone()),
            ("sampleId", m.sample_id.clone()),
            ("location", m.location.clone()),
            ("date", m.test_date.format("%Y-%m-%d").to_string()),
            ("technician", m.technician.clone()),
            ("client", m.client.clone()),
            ("observations", m.observations.clone()),
            ("reportType", format!("{:?}", m.report_type).to_lowercase()),
            ("standard", TEST_STANDARD.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::fixtures::{rock_input, soil_input};

    #[test]
    fn test_metadata_partial_json() {
        let json = r#"{
            "project_name": "Estudio Geotecnico",
            "sample_id": "M-001-2024",
            "test_date": "2024-03-15",
            "report_type": "summary"
        }"#;
        let meta: ReportMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.sample_id, "M-001-2024");
        assert_eq!(meta.test_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(meta.report_type, ReportType::Summary);
        assert!(meta.technician.is_empty());
    }

    #[test]
    fn test_report_type_sections() {
        assert!(ReportType::Complete.includes_inputs());
        assert!(ReportType::Complete.includes_chart_data());
        assert!(!ReportType::Summary.includes_inputs());
        assert!(ReportType::Summary.includes_results());
        assert!(!ReportType::Technical.includes_chart_data());
        assert!(!ReportType::Graphs.includes_results());
        assert!(!ReportType::Graphs.includes_validation());
    }

    #[test]
    fn test_build_gated() {
        let settings = LabSettings::default();
        let report = LabReport::build(
            ReportMetadata::new("P", "S-1"),
            &SampleInput::Soil(soil_input()),
            &settings,
        )
        .unwrap();
        assert_eq!(report.sample.kind(), "Soil");

        let mut rock = rock_input();
        rock.dry_mass_g = 0.0;
        let err = LabReport::build(ReportMetadata::new("P", "S-2"), &SampleInput::Rock(rock), &settings)
            .unwrap_err();
        assert_eq!(err.error_code(), "INCOMPLETE_INPUT");
    }

    #[test]
    fn test_metadata_rows() {
        let mut meta = ReportMetadata::new("Central", "M-7");
        meta.test_date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let report = LabReport::new(meta, SampleInput::Rock(rock_input()).analyze(&LabSettings::default()));
        let rows = report.metadata_rows();
        assert_eq!(rows[0], ("projectName", "Central".to_string()));
        assert_eq!(rows[3], ("date", "2024-01-09".to_string()));
        assert_eq!(rows[7], ("reportType", "complete".to_string()));
        assert_eq!(rows[8].1, TEST_STANDARD);
    }
}
