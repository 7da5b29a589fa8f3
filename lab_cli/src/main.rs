//! # Geolab CLI Application
//!
//! Command line front end for lab_core: reads the weighings of one rock or
//! soil specimen, runs the gated calculation and prints the report as
//! text, JSON or CSV, optionally rendering a PDF alongside.
//!
//! Exit codes: `0` on success (validation warnings included), `1` on any
//! error, `2` when the input is incomplete and nothing was computed.

mod cli;

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, OutputFormat, SampleArgs};
use lab_core::calculations::{RockSampleInput, SampleInput, SoilSampleInput};
use lab_core::report::TEST_STANDARD;
use lab_core::{export, pdf, LabError, LabReport, LabResult, LabSettings, ReportMetadata};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            if let Ok(json) = serde_json::to_string(&err) {
                eprintln!("{}", json);
            }
            ExitCode::from(exit_status(&err))
        }
    }
}

/// `2` when the completeness gate closed, `1` for every other error.
fn exit_status(err: &LabError) -> u8 {
    if err.is_incomplete() {
        2
    } else {
        1
    }
}

/// Logs go to stderr; `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> LabResult<()> {
    let settings = match &cli.config {
        Some(path) => LabSettings::load(path)?,
        None => LabSettings::default(),
    };
    let metadata = match &cli.meta {
        Some(path) => load_metadata(path)?,
        None => ReportMetadata::default(),
    };

    let input = match &cli.command {
        Commands::Rock(args) => SampleInput::Rock(read_rock(args)?),
        Commands::Soil(args) => SampleInput::Soil(read_soil(args, settings.default_paraffin_density)?),
    };
    debug!(kind = input.kind(), "input loaded");

    let report = LabReport::build(metadata, &input, &settings)?;

    let output = match cli.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Csv => export::to_csv(&report)?,
    };
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    if let Some(path) = &cli.pdf {
        let bytes = pdf::render_report_pdf(&report)?;
        fs::write(path, bytes)
            .map_err(|e| LabError::file_error("write", path.display().to_string(), e.to_string()))?;
        info!(path = %path.display(), "pdf written");
    }

    Ok(())
}

fn load_metadata(path: &Path) -> LabResult<ReportMetadata> {
    let content = fs::read_to_string(path)
        .map_err(|e| LabError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Raw JSON text of the weighings, from a file or stdin.
fn read_input_text(args: &SampleArgs) -> LabResult<String> {
    let Some(path) = &args.input else {
        return Err(LabError::missing_field("--input or --interactive"));
    };
    if args.reads_stdin() {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| LabError::file_error("read", "stdin", e.to_string()))?;
        Ok(content)
    } else {
        fs::read_to_string(path).map_err(|e| LabError::file_error("read", path.display().to_string(), e.to_string()))
    }
}

fn read_rock(args: &SampleArgs) -> LabResult<RockSampleInput> {
    if args.interactive {
        let stdin = io::stdin();
        return Ok(prompt_rock(&mut stdin.lock(), &mut io::stdout()));
    }
    Ok(serde_json::from_str(&read_input_text(args)?)?)
}

/// Soil weighings; a missing `densidadParafina` takes the configured default.
fn read_soil(args: &SampleArgs, paraffin_density: f64) -> LabResult<SoilSampleInput> {
    if args.interactive {
        let stdin = io::stdin();
        return Ok(prompt_soil(&mut stdin.lock(), &mut io::stdout(), paraffin_density));
    }
    parse_soil_json(&read_input_text(args)?, paraffin_density)
}

fn parse_soil_json(content: &str, paraffin_density: f64) -> LabResult<SoilSampleInput> {
    let mut value: serde_json::Value = serde_json::from_str(content)?;
    if let Some(fields) = value.as_object_mut() {
        fields
            .entry("densidadParafina")
            .or_insert_with(|| serde_json::Value::from(paraffin_density));
    }
    Ok(serde_json::from_value(value)?)
}

/// Ask for one number. Anything unparsable becomes `default`.
fn prompt_f64<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, prompt: &str, default: f64) -> f64 {
    if write!(writer, "{}", prompt).and_then(|_| writer.flush()).is_err() {
        return default;
    }

    let mut input = String::new();
    if reader.read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_rock<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> RockSampleInput {
    let mut ask = |prompt: &str| prompt_f64(reader, writer, prompt, 0.0);
    RockSampleInput {
        initial_mass_g: ask("Initial mass (g): "),
        saturated_surface_dry_mass_g: ask("Saturated surface-dry mass (g): "),
        submerged_mass_g: ask("Submerged mass (g): "),
        dry_mass_g: ask("Oven-dry mass (g): "),
        water_temperature_c: ask("Water temperature (C): "),
    }
}

fn prompt_soil<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, default_density: f64) -> SoilSampleInput {
    let initial_mass_g = prompt_f64(reader, writer, "Initial mass (g): ", 0.0);
    let waxed_mass_g = prompt_f64(reader, writer, "Paraffin-coated mass (g): ", 0.0);
    let submerged_mass_g = prompt_f64(reader, writer, "Submerged coated mass (g): ", 0.0);
    let paraffin_density = prompt_f64(
        reader,
        writer,
        &format!("Paraffin density (g/cm3) [{}]: ", default_density),
        default_density,
    );
    let water_temperature_c = prompt_f64(reader, writer, "Water temperature (C): ", 0.0);
    let subsample_dry_mass_g = prompt_f64(reader, writer, "Subsample dry mass (g): ", 0.0);
    let flask_water_mass_g = prompt_f64(reader, writer, "Flask + water mass (g): ", 0.0);
    let flask_water_solids_mass_g = prompt_f64(reader, writer, "Flask + water + solids mass (g): ", 0.0);
    SoilSampleInput {
        initial_mass_g,
        waxed_mass_g,
        submerged_mass_g,
        paraffin_density,
        water_temperature_c,
        subsample_dry_mass_g,
        flask_water_mass_g,
        flask_water_solids_mass_g,
    }
}

fn status_icon(passed: bool) -> &'static str {
    if passed {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn render_text(report: &LabReport) -> String {
    let sample = &report.sample;
    let meta = &report.metadata;
    let mut out = String::new();

    let title = format!("{} Index Properties ({})", sample.kind(), TEST_STANDARD);
    out.push_str(&format!("{}\n{}\n", title, "=".repeat(title.chars().count())));
    if !meta.project_name.is_empty() {
        out.push_str(&format!("Project:   {}\n", meta.project_name));
    }
    if !meta.sample_id.is_empty() {
        out.push_str(&format!("Sample ID: {}\n", meta.sample_id));
    }
    out.push_str(&format!("Date:      {}\n\n", meta.test_date.format("%Y-%m-%d")));

    out.push_str("Results:\n");
    for (name, value, unit) in sample.result_values() {
        let unit = if unit == "-" { "" } else { unit };
        let line = format!("  {:<24} {:>12.4} {}", name, value, unit);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    if let Some(class) = sample.classification() {
        out.push_str(&format!("  {:<24} {}\n", "clasificacion", class));
    }

    if let Some(phases) = sample.phase_composition() {
        out.push_str(&format!(
            "\nPhase composition: solids {:.2}%  water {:.2}%  air {:.2}%\n",
            phases.solids_pct, phases.water_pct, phases.air_pct
        ));
    }

    out.push_str("\nValidation:\n");
    for check in sample.validation().iter() {
        out.push_str(&format!(
            "  {:<7}{:<18} {}\n",
            status_icon(check.passed),
            check.rule_id.as_str(),
            check.message
        ));
    }
    let failed = sample.validation().iter().filter(|c| !c.passed).count();
    if failed == 0 {
        out.push_str("\nAll checks passed.\n");
    } else {
        out.push_str(&format!("\n{} check(s) flagged.\n", failed));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_core::settings::DEFAULT_PARAFFIN_DENSITY;
    use std::io::Cursor;

    fn rock() -> RockSampleInput {
        RockSampleInput {
            initial_mass_g: 285.12,
            saturated_surface_dry_mass_g: 287.11,
            submerged_mass_g: 117.71,
            dry_mass_g: 280.50,
            water_temperature_c: 26.0,
        }
    }

    #[test]
    fn test_prompt_f64_parses_and_falls_back() {
        let mut reader = Cursor::new("12.5\nabc\n\n");
        let mut writer = Vec::new();
        assert_eq!(prompt_f64(&mut reader, &mut writer, "a: ", 0.0), 12.5);
        assert_eq!(prompt_f64(&mut reader, &mut writer, "b: ", 0.0), 0.0);
        assert_eq!(prompt_f64(&mut reader, &mut writer, "c: ", 0.9), 0.9);
        // End of input also falls back
        assert_eq!(prompt_f64(&mut reader, &mut writer, "d: ", 0.0), 0.0);
        assert_eq!(String::from_utf8(writer).unwrap(), "a: b: c: d: ");
    }

    #[test]
    fn test_prompt_rock_reads_fields_in_order() {
        let mut reader = Cursor::new("285.12\n287.11\n117.71\n280.50\n26\n");
        let input = prompt_rock(&mut reader, &mut Vec::new());
        assert_eq!(input, rock());
    }

    #[test]
    fn test_prompt_soil_defaults_paraffin_density() {
        let mut reader = Cursor::new("285.12\n287.11\n117.71\n\n26\n50.25\n675.30\nx\n");
        let input = prompt_soil(&mut reader, &mut Vec::new(), DEFAULT_PARAFFIN_DENSITY);
        assert_eq!(input.paraffin_density, DEFAULT_PARAFFIN_DENSITY);
        assert_eq!(input.flask_water_mass_g, 675.30);
        // Unparsable entry becomes zero and closes the gate
        assert_eq!(input.flask_water_solids_mass_g, 0.0);
        assert_eq!(input.missing_fields(), vec!["masaMatrazAguaSolidos"]);
    }

    #[test]
    fn test_soil_json_takes_configured_paraffin_density() {
        let json = r#"{
            "masaInicial": 285.12, "masaSueloParafina": 287.11, "masaSumergida": 117.71,
            "temperaturaAgua": 26.0, "masaSecaSubmuestra": 50.25,
            "masaMatrazAgua": 675.30, "masaMatrazAguaSolidos": 707.15
        }"#;
        assert_eq!(parse_soil_json(json, 0.92).unwrap().paraffin_density, 0.92);

        let explicit = json.replacen("\"masaInicial\"", "\"densidadParafina\": 0.88, \"masaInicial\"", 1);
        assert_eq!(parse_soil_json(&explicit, 0.92).unwrap().paraffin_density, 0.88);

        assert!(parse_soil_json("[1, 2]", 0.9).is_err());
    }

    #[test]
    fn test_exit_status() {
        let mut input = rock();
        input.dry_mass_g = 0.0;
        let gate = LabReport::build(ReportMetadata::default(), &SampleInput::Rock(input), &LabSettings::default())
            .unwrap_err();
        assert_eq!(exit_status(&gate), 2);

        assert_eq!(exit_status(&LabError::missing_field("--input or --interactive")), 1);
        assert_eq!(exit_status(&LabError::config_error("lab.toml", "bad")), 1);
        let parse = serde_json::from_str::<RockSampleInput>("{}").unwrap_err();
        assert_eq!(exit_status(&parse.into()), 1);
    }

    #[test]
    fn test_render_text() {
        let report = LabReport::build(
            ReportMetadata::new("Central", "M-001"),
            &SampleInput::Rock(rock()),
            &LabSettings::default(),
        )
        .unwrap();
        let text = render_text(&report);
        assert!(text.starts_with("Rock Index Properties (INV E-128-11)\n"));
        assert!(text.contains("Sample ID: M-001"));
        assert!(text.contains("porosidad"));
        assert!(text.contains("3.9020 %"));
        assert!(text.contains("[OK]   rock_temperature"));
        assert!(text.contains("All checks passed."));
    }

    #[test]
    fn test_render_text_flags_failures() {
        let mut input = rock();
        input.water_temperature_c = 35.0;
        let report = LabReport::build(ReportMetadata::default(), &SampleInput::Rock(input), &LabSettings::default())
            .unwrap();
        let text = render_text(&report);
        assert!(text.contains("[FAIL] rock_temperature"));
        assert!(text.contains("1 check(s) flagged."));
        assert!(!text.contains("Sample ID:"));
    }
}
