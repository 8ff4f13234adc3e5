use crate::chart::{AxisScale, ChartKind, ChartSlot, PlotChart};
use crate::data::compliance::evaluate_raw;
use crate::data::model::{ComplianceReport, MeasurementSet, RawMeasurements, ThresholdTable};
use crate::data::series::{to_chart_series, SeriesOptions};
use crate::error::{ChartError, EvalError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full evaluation session, independent of rendering.
pub struct AppState {
    pub table: ThresholdTable,

    /// Raw text of each input field, in table order.
    pub inputs: Vec<String>,

    /// Last successful report.
    pub report: Option<ComplianceReport>,

    /// Text shown in the report area: the report or an error message.
    pub report_text: String,

    /// Measurements behind `report`, used for the measured series.
    pub measurements: Option<MeasurementSet>,

    pub chart_kind: ChartKind,
    pub scale: AxisScale,
    pub chart: ChartSlot<PlotChart>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_slot(ChartSlot::new())
    }
}

impl AppState {
    /// Session without a chart renderer (command line).
    pub fn headless() -> Self {
        Self::with_slot(ChartSlot::unavailable())
    }

    fn with_slot(chart: ChartSlot<PlotChart>) -> Self {
        let table = ThresholdTable::reference();
        let kind = ChartKind::default();
        let mut state = Self {
            table,
            inputs: example_inputs(&table),
            report: None,
            report_text: String::new(),
            measurements: None,
            chart_kind: kind,
            scale: kind.default_scale(),
            chart,
            status_message: None,
        };
        state.refresh_chart_or_skip();
        state
    }

    /// Current input fields keyed by identifier.
    pub fn raw_measurements(&self) -> RawMeasurements {
        self.table
            .iter()
            .zip(&self.inputs)
            .map(|(s, text)| (s.id.to_string(), text.clone()))
            .collect()
    }

    /// Validate the form, classify it, and refresh the chart.
    ///
    /// An invalid batch replaces the report with the error message and
    /// leaves the chart untouched.
    pub fn evaluate(&mut self) -> Result<&ComplianceReport, EvalError> {
        let raw = self.raw_measurements();
        match evaluate_raw(&self.table, &raw) {
            Ok((measurements, report)) => {
                log::info!(
                    "Evaluated {} pollutants, worst status: {:?}",
                    report.len(),
                    report.worst()
                );
                self.report_text = report.to_string();
                self.measurements = Some(measurements);
                self.status_message = None;
                self.refresh_chart_or_skip();
                Ok(&*self.report.insert(report))
            }
            Err(e) => {
                log::warn!("Rejected evaluation batch: {e}");
                self.report_text = e.user_message();
                self.report = None;
                self.measurements = None;
                Err(e)
            }
        }
    }

    pub fn select_chart(&mut self, kind: ChartKind) {
        if self.chart_kind == kind {
            return;
        }
        self.chart_kind = kind;
        self.scale = kind.default_scale();
        self.refresh_chart_or_skip();
    }

    pub fn set_scale(&mut self, scale: AxisScale) {
        if self.scale == scale {
            return;
        }
        self.scale = scale;
        self.refresh_chart_or_skip();
    }

    /// Refill the form with example values; clears the last report.
    pub fn reset_inputs(&mut self) {
        self.inputs = example_inputs(&self.table);
        self.report = None;
        self.report_text.clear();
        self.measurements = None;
        self.status_message = None;
        self.refresh_chart_or_skip();
    }

    /// Copy imported values into the form. Identifiers absent from `raw`
    /// keep their current text.
    pub fn apply_raw(&mut self, raw: &RawMeasurements) {
        for (standard, input) in self.table.iter().zip(self.inputs.iter_mut()) {
            if let Some(text) = raw.get(standard.id) {
                *input = text.trim().to_string();
            }
        }
    }

    /// Rebuild the chart for the current kind, scale and measurements.
    pub fn refresh_chart(&mut self) -> Result<(), ChartError> {
        if !self.chart.is_available() {
            return Err(ChartError::RenderingUnavailable);
        }
        let options = SeriesOptions::for_chart(self.chart_kind, self.scale);
        let empty = MeasurementSet::new();
        let measurements = self.measurements.as_ref().unwrap_or(&empty);
        let chart = PlotChart {
            kind: self.chart_kind,
            scale: self.scale,
            series: to_chart_series(&self.table, measurements, &options),
            show_measured: self.measurements.is_some(),
            generation: self.chart.replaced() + 1,
        };
        self.chart.replace(chart)
    }

    fn refresh_chart_or_skip(&mut self) {
        if let Err(e) = self.refresh_chart() {
            log::debug!("Skipping chart update: {e}");
        }
    }
}

fn example_inputs(table: &ThresholdTable) -> Vec<String> {
    table
        .iter()
        .map(|s| s.example_or_zero().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ComplianceStatus;

    fn set_input(state: &mut AppState, id: &str, text: &str) {
        let idx = state.table.position(id).unwrap();
        state.inputs[idx] = text.to_string();
    }

    #[test]
    fn starts_with_example_values_and_a_chart() {
        let state = AppState::default();
        assert_eq!(state.inputs.len(), state.table.len());
        assert_eq!(state.inputs[state.table.position("pm25_24h").unwrap()], "25");
        let chart = state.chart.current().unwrap();
        assert_eq!(chart.kind, ChartKind::Bar);
        assert!(!chart.show_measured);
    }

    #[test]
    fn evaluation_updates_report_and_chart() {
        let mut state = AppState::default();
        set_input(&mut state, "pm25_24h", "40");
        let before = state.chart.replaced();

        let report = state.evaluate().unwrap();
        assert_eq!(
            report.get("pm25_24h").unwrap().status,
            ComplianceStatus::CompliantNationalOnly
        );
        assert!(state.report_text.contains("⚠ PM-2.5 (24h)"));
        assert_eq!(state.chart.replaced(), before + 1);
        assert!(state.chart.current().unwrap().show_measured);
    }

    #[test]
    fn invalid_input_skips_the_chart() {
        let mut state = AppState::default();
        state.evaluate().unwrap();
        set_input(&mut state, "so2_24h", "-5");
        let before = state.chart.replaced();

        assert!(state.evaluate().is_err());
        assert_eq!(state.chart.replaced(), before);
        assert!(state.report.is_none());
        assert!(state.report_text.starts_with("Error:"));
    }

    #[test]
    fn headless_evaluation_still_reports() {
        let mut state = AppState::headless();
        set_input(&mut state, "pm25_24h", "70");
        let report = state.evaluate().unwrap();
        assert_eq!(
            report.get("pm25_24h").unwrap().status,
            ComplianceStatus::ExceedsBoth
        );
        assert!(state.chart.current().is_none());
        assert_eq!(state.refresh_chart(), Err(ChartError::RenderingUnavailable));
    }

    #[test]
    fn switching_kind_resets_scale() {
        let mut state = AppState::default();
        state.select_chart(ChartKind::Line);
        assert_eq!(state.scale, AxisScale::Linear);
        state.set_scale(AxisScale::Logarithmic);
        let chart = state.chart.current().unwrap();
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.scale, AxisScale::Logarithmic);
    }

    #[test]
    fn apply_raw_only_touches_listed_fields() {
        let mut state = AppState::default();
        let mut raw = RawMeasurements::new();
        raw.insert("o3_8h".into(), " 130 ".into());
        state.apply_raw(&raw);
        assert_eq!(state.inputs[state.table.position("o3_8h").unwrap()], "130");
        assert_eq!(state.inputs[state.table.position("pm25_24h").unwrap()], "25");
    }

    #[test]
    fn reset_restores_examples() {
        let mut state = AppState::default();
        set_input(&mut state, "pm25_24h", "999");
        state.evaluate().unwrap();
        state.status_message = Some("Imported values rejected".into());
        state.reset_inputs();
        assert!(state.report.is_none());
        assert!(state.status_message.is_none());
        assert_eq!(state.inputs[state.table.position("pm25_24h").unwrap()], "25");
    }
}
