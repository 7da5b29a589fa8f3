//! # PDF Generation Module
//!
//! Renders a [`LabReport`] to a PDF laboratory sheet using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as string constants
//! - Data is injected via string formatting before compilation
//! - Sections are included according to the report's [`ReportType`]
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use lab_core::calculations::{RockSampleInput, SampleInput};
//! use lab_core::pdf::render_report_pdf;
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
//! let report = LabReport::build(ReportMetadata::new("Central", "M-001"), &input, &LabSettings::default()).unwrap();
//! let pdf_bytes = render_report_pdf(&report).unwrap();
//! std::fs::write("M-001.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::SampleRecord;
use crate::errors::{LabError, LabResult};
use crate::report::{LabReport, TEST_STANDARD};
use crate::validation::Severity;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    /// Fonts bundled with typst-assets (Libertinus Serif, New Computer Modern, DejaVu Sans Mono)
    fn load_fonts() -> Vec<Font> {
        let mut fonts = Vec::new();
        for font_bytes in typst_assets::fonts() {
            let buffer = Bytes::new(font_bytes.to_vec());
            for font in Font::iter(buffer) {
                fonts.push(font);
            }
        }
        fonts
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Templates
// ============================================================================

/// Page setup, title block and project information
const HEADER_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2.5cm, bottom: 2.5cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Geolab Index Properties - {{STANDARD}}]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Sample: {{SAMPLE_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{GENERATED}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{TITLE}}]
    #v(4pt)
    #text(size: 13pt)[{{REPORT_TYPE}}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Project:], [{{PROJECT}}],
      [Sample ID:], [{{SAMPLE_ID}}],
      [Location:], [{{LOCATION}}],
      [Client:], [{{CLIENT}}],
    )
  ],
  [
    *Test Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      row-gutter: 4pt,
      [Test date:], [{{TEST_DATE}}],
      [Technician:], [{{TECHNICIAN}}],
      [Standard:], [{{STANDARD}}],
    )
  ]
)

#v(12pt)
#line(length: 100%, stroke: 0.5pt)
"##;

/// Three-column quantity table; `{{ROWS}}` holds `[name], [value], [unit],` rows
const TABLE_TEMPLATE: &str = r##"
#v(8pt)

== {{HEADING}}

#table(
  columns: (1fr, auto, auto),
  inset: 7pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*{{COL_NAME}}*], [*Value*], [*Unit*]),
{{ROWS}}
)
"##;

/// Validation table and overall verdict
const VALIDATION_TEMPLATE: &str = r##"
#v(8pt)

== Validation

#table(
  columns: (auto, auto, auto, 1fr),
  inset: 7pt,
  stroke: 0.5pt,
  align: (left, center, center, left),
  table.header([*Rule*], [*Severity*], [*Status*], [*Message*]),
{{ROWS}}
)

#v(12pt)

#let pass_status = "{{OVERALL}}"
#align(center)[
  #block(
    width: auto,
    fill: if pass_status == "PASS" { rgb("#d4edda") } else { rgb("#f8d7da") },
    inset: 14pt,
    radius: 4pt
  )[
    #text(size: 14pt, weight: "bold")[
      #if pass_status == "PASS" [
        ALL CHECKS PASSED
      ] else [
        {{FAILED_COUNT}} CHECK(S) FLAGGED
      ]
    ]
  ]
]
"##;

const OBSERVATIONS_TEMPLATE: &str = r##"
#v(8pt)

== Observations

{{OBSERVATIONS}}
"##;

const FOOTER_TEMPLATE: &str = r##"
#v(20pt)
#line(length: 100%, stroke: 0.5pt)
#v(6pt)

#text(size: 9pt, fill: gray)[
  Generated by Geolab \
  Results flagged by validation should be reviewed before use.
]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render a laboratory report to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(LabError)` - If Typst compilation or PDF export fails
pub fn render_report_pdf(report: &LabReport) -> LabResult<Vec<u8>> {
    let source = build_report_source(report);

    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        LabError::export_error("pdf", format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        LabError::export_error("pdf", format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })?;

    debug!(
        sample_id = %report.metadata.sample_id,
        bytes = pdf_bytes.len(),
        "pdf report rendered"
    );
    Ok(pdf_bytes)
}

/// Assemble the Typst source for a report.
pub fn build_report_source(report: &LabReport) -> String {
    let meta = &report.metadata;
    let report_type = meta.report_type;
    let sample = &report.sample;

    let title = match sample {
        SampleRecord::Rock { .. } => "Rock Index Properties",
        SampleRecord::Soil { .. } => "Soil Index Properties",
    };

    let mut source = HEADER_TEMPLATE
        .replace("{{TITLE}}", title)
        .replace("{{REPORT_TYPE}}", report_type.display_name())
        .replace("{{STANDARD}}", TEST_STANDARD)
        .replace("{{GENERATED}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{PROJECT}}", &escape_typst(&meta.project_name))
        .replace("{{SAMPLE_ID}}", &escape_typst(&meta.sample_id))
        .replace("{{LOCATION}}", &escape_typst(&meta.location))
        .replace("{{CLIENT}}", &escape_typst(&meta.client))
        .replace("{{TEST_DATE}}", &meta.test_date.format("%Y-%m-%d").to_string())
        .replace("{{TECHNICIAN}}", &escape_typst(&meta.technician));

    if report_type.includes_inputs() {
        let rows: Vec<(String, String, String)> = sample
            .input_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), format_value(value), input_unit(name).to_string()))
            .collect();
        source.push_str(&render_table("Measurements", "Field", &rows));
    }

    if report_type.includes_results() {
        let mut rows: Vec<(String, String, String)> = sample
            .result_values()
            .into_iter()
            .map(|(name, value, unit)| (name.to_string(), format_value(value), typst_unit(unit).to_string()))
            .collect();
        if let Some(class) = sample.classification() {
            rows.push(("clasificacion".to_string(), class.label().to_string(), String::new()));
        }
        source.push_str(&render_table("Results", "Property", &rows));
    }

    if report_type.includes_chart_data() {
        if let Some(phases) = sample.phase_composition() {
            let (x, y) = phases.ternary_point();
            let rows = vec![
                ("Solids".to_string(), format_value(phases.solids_pct), "%".to_string()),
                ("Water".to_string(), format_value(phases.water_pct), "%".to_string()),
                ("Air".to_string(), format_value(phases.air_pct), "%".to_string()),
                (
                    "Ternary point (x, y)".to_string(),
                    format!("({}, {})", format_value(x), format_value(y)),
                    String::new(),
                ),
            ];
            source.push_str(&render_table("Phase Composition", "Phase", &rows));
        }
        if let Some((saturated, dry, solids)) = sample.unit_weights() {
            let rows = vec![
                ("Saturated".to_string(), format_value(saturated), typst_unit("g/cm3").to_string()),
                ("Dry".to_string(), format_value(dry), typst_unit("g/cm3").to_string()),
                ("Solids".to_string(), format_value(solids), typst_unit("g/cm3").to_string()),
            ];
            source.push_str(&render_table("Unit Weights", "Unit weight", &rows));
        }
    }

    if report_type.includes_validation() {
        source.push_str(&render_validation(sample));
    }

    if !meta.observations.trim().is_empty() {
        source.push_str(&OBSERVATIONS_TEMPLATE.replace("{{OBSERVATIONS}}", &escape_typst(&meta.observations)));
    }

    source.push_str(FOOTER_TEMPLATE);
    source
}

fn render_table(heading: &str, col_name: &str, rows: &[(String, String, String)]) -> String {
    let body = rows
        .iter()
        .map(|(name, value, unit)| format!("  [{}], [{}], [{}],", escape_typst(name), value, unit))
        .collect::<Vec<_>>()
        .join("\n");
    TABLE_TEMPLATE
        .replace("{{HEADING}}", heading)
        .replace("{{COL_NAME}}", col_name)
        .replace("{{ROWS}}", &body)
}

fn render_validation(sample: &SampleRecord) -> String {
    let report = sample.validation();
    let body = report
        .iter()
        .map(|check| {
            let severity = match check.severity {
                Severity::Warning => "warning",
                Severity::Failure => "failure",
            };
            let status = if check.passed {
                "#text(fill: rgb(\"#1e7e34\"))[PASS]"
            } else {
                "#text(fill: rgb(\"#b02a37\"))[FAIL]"
            };
            format!(
                "  [{}], [{}], [{}], [{}],",
                escape_typst(check.rule_id.as_str()),
                severity,
                status,
                escape_typst(&check.message)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let failed = report.iter().filter(|c| !c.passed).count();
    VALIDATION_TEMPLATE
        .replace("{{ROWS}}", &body)
        .replace("{{OVERALL}}", if failed == 0 { "PASS" } else { "FAIL" })
        .replace("{{FAILED_COUNT}}", &failed.to_string())
}

/// Four decimals for finite values; `inf`/`NaN` spelled out
fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        value.to_string()
    }
}

fn input_unit(field: &str) -> &'static str {
    match field {
        "temperaturaAgua" => "°C",
        "densidadParafina" => "g/cm#super[3]",
        _ => "g",
    }
}

fn typst_unit(unit: &str) -> &str {
    match unit {
        "cm3" => "cm#super[3]",
        "g/cm3" => "g/cm#super[3]",
        "-" => "",
        other => other,
    }
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '/' => "\\/".to_string(),
            '=' => "\\=".to_string(),
            '-' => "\\-".to_string(),
            '+' => "\\+".to_string(),
            '~' => "\\~".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            '\n' => " \\ ".to_string(),
            '\r' => String::new(),
            _ => c.to_string(),
        })
        .collect()
}
