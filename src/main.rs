use std::path::PathBuf;
use std::process::ExitCode;

use air_compare::app::AirCompareApp;
use air_compare::chart::{AxisScale, ChartKind};
use air_compare::data::loader::load_measurements;
use air_compare::data::model::{ComplianceReport, MeasurementSet, RawMeasurements, ThresholdTable};
use air_compare::data::series::{to_chart_series, ChartSeries, SeriesOptions};
use air_compare::state::AppState;
use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use eframe::egui;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare air-quality measurements against WHO and Peru limits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the desktop window (default)
    Gui,
    /// Evaluate measurements without a window and print the report
    Report(ReportArgs),
    /// Print the reference threshold table
    Table,
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// Measurement file (.json or .csv) applied over the example values
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Override one value (repeatable), e.g. `--set pm25_24h=40`
    #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Print results and chart series as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Chart preset used for the JSON series
    #[arg(long, value_enum, default_value_t = KindArg::Bar)]
    chart: KindArg,

    /// Axis scale for the JSON series (defaults to the chart's own)
    #[arg(long, value_enum)]
    scale: Option<ScaleArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Bar,
    Line,
    Scatter,
    Pie,
}

impl From<KindArg> for ChartKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Bar => ChartKind::Bar,
            KindArg::Line => ChartKind::Line,
            KindArg::Scatter => ChartKind::Scatter,
            KindArg::Pie => ChartKind::Pie,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScaleArg {
    Linear,
    Log,
}

impl From<ScaleArg> for AxisScale {
    fn from(s: ScaleArg) -> Self {
        match s {
            ScaleArg::Linear => AxisScale::Linear,
            ScaleArg::Log => AxisScale::Logarithmic,
        }
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{s}'"))?;
    Ok((id.trim().to_string(), value.to_string()))
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a ComplianceReport,
    measurements: &'a MeasurementSet,
    series: ChartSeries,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => run_gui().map(|_| ExitCode::SUCCESS),
        Command::Report(args) => run_report(args),
        Command::Table => {
            print_table();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_gui() -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Air Compare – WHO vs Peru",
        options,
        Box::new(|_cc| Ok(Box::new(AirCompareApp::default()))),
    )
    .map_err(|e| anyhow!("failed to start the window: {e}"))
}

fn run_report(args: ReportArgs) -> Result<ExitCode> {
    let mut state = AppState::headless();

    if let Some(path) = &args.input {
        let raw = load_measurements(path, &state.table)?;
        log::info!("Imported {} values from {}", raw.len(), path.display());
        state.apply_raw(&raw);
    }

    let mut overrides = RawMeasurements::new();
    for (id, value) in args.set {
        if state.table.get(&id).is_none() {
            bail!("Unknown pollutant identifier: {id}");
        }
        overrides.insert(id, value);
    }
    state.apply_raw(&overrides);

    if let Err(e) = state.evaluate() {
        eprintln!("{}", e.user_message());
        for field in e.fields() {
            eprintln!("  {field}");
        }
        return Ok(ExitCode::FAILURE);
    }

    let (Some(report), Some(measurements)) = (&state.report, &state.measurements) else {
        bail!("evaluation produced no report");
    };

    if args.json {
        let kind = ChartKind::from(args.chart);
        let scale = args.scale.map(AxisScale::from).unwrap_or(kind.default_scale());
        let options = SeriesOptions::for_chart(kind, scale);
        let output = JsonOutput {
            report,
            measurements,
            series: to_chart_series(&state.table, measurements, &options),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", state.report_text);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_table() {
    let table = ThresholdTable::reference();
    println!("{:<12} {:<28} {:>8} {:>8}  unit", "id", "pollutant", "WHO", "Peru");
    for s in table.iter() {
        println!(
            "{:<12} {:<28} {:>8} {:>8}  {}",
            s.id, s.name, s.guideline, s.national, s.unit
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn report_args(set: &[(&str, &str)]) -> ReportArgs {
        ReportArgs {
            input: None,
            set: set
                .iter()
                .map(|(id, value)| (id.to_string(), value.to_string()))
                .collect(),
            json: false,
            chart: KindArg::Bar,
            scale: None,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn set_flag_parses_assignments() {
        let cli = Cli::try_parse_from(["air-compare", "report", "--set", "pm25_24h=40"]).unwrap();
        let Some(Command::Report(args)) = cli.command else {
            panic!("expected the report subcommand");
        };
        assert_eq!(args.set, vec![("pm25_24h".to_string(), "40".to_string())]);
        assert!(Cli::try_parse_from(["air-compare", "report", "--set", "pm25_24h"]).is_err());
    }

    #[test]
    fn assignment_needs_an_equals_sign() {
        assert!(parse_assignment("x").is_err());
        assert_eq!(
            parse_assignment(" o3_8h =120").unwrap(),
            ("o3_8h".to_string(), "120".to_string())
        );
    }

    #[test]
    fn report_succeeds_on_valid_values() {
        let code = run_report(report_args(&[("pm25_24h", "70")])).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn invalid_batch_exits_with_failure() {
        let code = run_report(report_args(&[("pm25_24h", "-5")])).unwrap();
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let err = run_report(report_args(&[("pm99_1h", "10")])).unwrap_err();
        assert!(err.to_string().contains("pm99_1h"));
    }

    #[test]
    fn json_report_uses_the_chosen_preset() {
        let mut args = report_args(&[]);
        args.json = true;
        args.chart = KindArg::Pie;
        args.scale = Some(ScaleArg::Log);
        assert_eq!(run_report(args).unwrap(), ExitCode::SUCCESS);
    }
}
