//! End-to-end checks: form values through classification, report text and
//! chart refresh.

use air_compare::chart::{AxisScale, ChartKind};
use air_compare::data::compliance::{classify_all, evaluate_raw};
use air_compare::data::loader::load_measurements;
use air_compare::data::model::{
    ComplianceStatus, MeasurementSet, RawMeasurements, ThresholdTable,
};
use air_compare::data::series::{to_chart_series, SeriesOptions};
use air_compare::state::AppState;

fn state_with(id: &str, text: &str) -> AppState {
    let mut state = AppState::default();
    let mut raw = RawMeasurements::new();
    raw.insert(id.to_string(), text.to_string());
    state.apply_raw(&raw);
    state
}

fn report_line<'a>(state: &'a AppState, name: &str) -> &'a str {
    state
        .report_text
        .lines()
        .find(|l| l.contains(name))
        .expect("report line present")
}

#[test]
fn pm25_at_guideline_meets_both() {
    let mut state = state_with("pm25_24h", "25");
    let status = state.evaluate().unwrap().get("pm25_24h").unwrap().status;
    assert_eq!(status, ComplianceStatus::CompliantBoth);
    assert!(report_line(&state, "PM-2.5 (24h)").starts_with('✔'));
}

#[test]
fn pm25_between_limits_meets_national_only() {
    let mut state = state_with("pm25_24h", "40");
    let status = state.evaluate().unwrap().get("pm25_24h").unwrap().status;
    assert_eq!(status, ComplianceStatus::CompliantNationalOnly);
    assert!(report_line(&state, "PM-2.5 (24h)").starts_with('⚠'));
}

#[test]
fn pm25_above_national_exceeds_both() {
    let mut state = state_with("pm25_24h", "70");
    let status = state.evaluate().unwrap().get("pm25_24h").unwrap().status;
    assert_eq!(status, ComplianceStatus::ExceedsBoth);
    assert!(report_line(&state, "PM-2.5 (24h)").starts_with('✘'));
}

#[test]
fn negative_input_rejects_batch_without_chart_update() {
    for standard in ThresholdTable::reference() {
        let mut state = state_with(standard.id, "-5");
        let before = state.chart.replaced();
        let err = state.evaluate().unwrap_err();
        assert_eq!(err.fields().len(), 1);
        assert_eq!(err.fields()[0].id, standard.id);
        assert_eq!(state.chart.replaced(), before);
        assert!(state.report.is_none());
        assert_eq!(state.report_text, err.user_message());
    }
}

#[test]
fn report_has_header_and_one_line_per_row() {
    let table = ThresholdTable::reference();
    let report = classify_all(&table, &MeasurementSet::from_examples(&table)).unwrap();
    let text = report.to_string();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("=== AIR QUALITY RESULTS ==="));
    assert_eq!(lines.next(), Some(""));
    assert_eq!(lines.count(), table.len());
}

#[test]
fn zero_is_valid_and_floored_for_log_charts() {
    let table = ThresholdTable::reference();
    let raw: RawMeasurements = table
        .iter()
        .map(|s| (s.id.to_string(), "0".to_string()))
        .collect();
    let (set, report) = evaluate_raw(&table, &raw).unwrap();
    assert_eq!(report.count(ComplianceStatus::CompliantBoth), table.len());

    let options = SeriesOptions::for_chart(ChartKind::Bar, AxisScale::Logarithmic);
    let series = to_chart_series(&table, &set, &options);
    assert!(series.measured.iter().all(|v| *v > 0.0));
}

#[test]
fn imported_file_feeds_the_same_pipeline() {
    let path = std::env::temp_dir().join(format!(
        "air_compare_it_{}_import.json",
        std::process::id()
    ));
    let body = r#"[{ "id": "pm25_24h", "value": 70 }, { "id": "o3_8h", "value": "110" }]"#;
    std::fs::write(&path, body).unwrap();

    let mut state = AppState::default();
    let raw = load_measurements(&path, &state.table).unwrap();
    std::fs::remove_file(&path).ok();
    state.apply_raw(&raw);

    let report = state.evaluate().unwrap();
    assert_eq!(
        report.get("pm25_24h").unwrap().status,
        ComplianceStatus::ExceedsBoth
    );
    assert_eq!(
        report.get("o3_8h").unwrap().status,
        ComplianceStatus::CompliantNationalOnly
    );
}

#[test]
fn every_chart_kind_gets_a_fresh_handle() {
    let mut state = AppState::default();
    state.evaluate().unwrap();
    for kind in ChartKind::ALL {
        let before = state.chart.replaced();
        state.select_chart(kind);
        let chart = state.chart.current().unwrap();
        assert_eq!(chart.kind, kind);
        if kind != ChartKind::Bar {
            assert_eq!(state.chart.replaced(), before + 1);
        }
        assert!(chart.show_measured);
    }
}
