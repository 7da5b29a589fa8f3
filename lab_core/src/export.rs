//! # CSV Export
//!
//! Flattens a [`LabReport`] into long-format CSV, one value per row:
//!
//! ```text
//! section,field,value,unit,detail
//! metadata,sampleId,M-001-2024,,
//! input,masaInicial,285.12,g,
//! result,porosidad,3.902007083825273,%,
//! validation,rock_temperature,pass,,water temperature within limit
//! phase,solids,96.09799291617472,%,
//! ```
//!
//! Values are written at full precision. Non-finite results are written as
//! `inf`/`NaN` rather than dropped.

use tracing::debug;

use crate::errors::{LabError, LabResult};
use crate::report::LabReport;

/// CSV header row
pub const CSV_HEADER: [&str; 5] = ["section", "field", "value", "unit", "detail"];

fn input_unit(field: &str) -> &'static str {
    match field {
        "temperaturaAgua" => "degC",
        "densidadParafina" => "g/cm3",
        _ => "g",
    }
}

fn csv_error(err: impl ToString) -> LabError {
    LabError::export_error("csv", err.to_string())
}

/// Write the report as CSV into any writer.
pub fn write_csv<W: std::io::Write>(report: &LabReport, writer: W) -> LabResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER).map_err(csv_error)?;

    for (field, value) in report.metadata_rows() {
        wtr.write_record(["metadata", field, value.as_str(), "", ""])
            .map_err(csv_error)?;
    }

    let sample = &report.sample;
    wtr.write_record(["metadata", "sampleType", sample.kind(), "", ""])
        .map_err(csv_error)?;

    for (field, value) in sample.input_values() {
        let text = value.to_string();
        wtr.write_record(["input", field, text.as_str(), input_unit(field), ""])
            .map_err(csv_error)?;
    }

    for (field, value, unit) in sample.result_values() {
        let text = value.to_string();
        wtr.write_record(["result", field, text.as_str(), unit, ""])
            .map_err(csv_error)?;
    }
    if let Some(class) = sample.classification() {
        wtr.write_record(["result", "clasificacion", class.label(), "", ""])
            .map_err(csv_error)?;
    }

    for check in sample.validation().iter() {
        let outcome = if check.passed { "pass" } else { "fail" };
        wtr.write_record(["validation", check.rule_id.as_str(), outcome, "", check.message.as_str()])
            .map_err(csv_error)?;
    }

    if let Some(phases) = sample.phase_composition() {
        let (solids, water, air) = phases.as_tuple();
        for (field, value) in [("solids", solids), ("water", water), ("air", air)] {
            let text = value.to_string();
            wtr.write_record(["phase", field, text.as_str(), "%", ""])
                .map_err(csv_error)?;
        }
    }

    wtr.flush().map_err(csv_error)?;
    debug!(sample_id = %report.metadata.sample_id, "csv export written");
    Ok(())
}

/// Render the report as a CSV string.
pub fn to_csv(report: &LabReport) -> LabResult<String> {
    let mut buffer = Vec::new();
    write_csv(report, &mut buffer)?;
    String::from_utf8(buffer).map_err(csv_error)
}
