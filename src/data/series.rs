use std::collections::BTreeSet;

use serde::Serialize;

use crate::chart::{AxisScale, ChartKind};

use super::model::{MeasurementSet, ThresholdTable, CARBON_MONOXIDE};

/// Epsilon substituted for zero measurements on logarithmic axes.
pub const LOG_FLOOR: f64 = 1e-3;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How the table is reshaped into chart series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesOptions {
    /// Truncate labels at the first `(`.
    pub short_labels: bool,
    /// Identifiers dropped from every output sequence.
    pub exclude: BTreeSet<String>,
    /// Replace measured values `<= 0` by this epsilon.
    pub floor_zero: Option<f64>,
}

impl SeriesOptions {
    /// Named preset for a chart kind drawn on the given scale.
    ///
    /// Line and pie charts drop carbon monoxide: on a linear axis (or as a
    /// share of a whole) it flattens every other row to nothing.
    pub fn for_chart(kind: ChartKind, scale: AxisScale) -> Self {
        let short_labels = matches!(kind, ChartKind::Bar | ChartKind::Line);
        let exclude = match kind {
            ChartKind::Line | ChartKind::Pie => {
                CARBON_MONOXIDE.iter().map(|id| id.to_string()).collect()
            }
            ChartKind::Bar | ChartKind::Scatter => BTreeSet::new(),
        };
        let floor_zero = match scale {
            AxisScale::Logarithmic => Some(LOG_FLOOR),
            AxisScale::Linear => None,
        };
        Self {
            short_labels,
            exclude,
            floor_zero,
        }
    }

    pub fn excluding<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(ids.into_iter().map(Into::into));
        self
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Parallel sequences, one entry per included row, in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub ids: Vec<&'static str>,
    pub labels: Vec<String>,
    pub guideline: Vec<f64>,
    pub national: Vec<f64>,
    pub measured: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest value over all three sequences.
    pub fn max_value(&self) -> f64 {
        self.guideline
            .iter()
            .chain(&self.national)
            .chain(&self.measured)
            .copied()
            .fold(0.0, f64::max)
    }
}

/// Reshape the table and a measurement set into chart series.
///
/// A row missing from `measurements` contributes `0.0` to the measured
/// sequence, before `floor_zero` is applied.
pub fn to_chart_series(
    table: &ThresholdTable,
    measurements: &MeasurementSet,
    options: &SeriesOptions,
) -> ChartSeries {
    let mut series = ChartSeries::default();

    for standard in table.iter() {
        if options.exclude.contains(standard.id) {
            continue;
        }

        let label = if options.short_labels {
            standard.short_label()
        } else {
            standard.name
        };

        let mut measured = measurements.get(standard.id).unwrap_or(0.0);
        if let Some(eps) = options.floor_zero {
            if measured <= 0.0 {
                measured = eps;
            }
        }

        series.ids.push(standard.id);
        series.labels.push(label.to_string());
        series.guideline.push(standard.guideline);
        series.national.push(standard.national);
        series.measured.push(measured);
    }

    series
}
