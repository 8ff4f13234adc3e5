use std::fmt;

use crate::data::series::ChartSeries;
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Chart kinds and scales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Pie,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
            ChartKind::Pie => "Pie",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar chart: WHO vs Peru",
            ChartKind::Line => "Line chart: WHO vs Peru",
            ChartKind::Scatter => "Scatter: WHO (x) vs Peru (y)",
            ChartKind::Pie => "Pie: distribution of Peru limits",
        }
    }

    /// Scale selected when the user switches to this kind.
    pub fn default_scale(self) -> AxisScale {
        match self {
            ChartKind::Bar | ChartKind::Scatter => AxisScale::Logarithmic,
            ChartKind::Line | ChartKind::Pie => AxisScale::Linear,
        }
    }

    /// Pie slices are shares of a whole; an axis scale does not apply.
    pub fn has_axes(self) -> bool {
        !matches!(self, ChartKind::Pie)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    Logarithmic,
}

impl AxisScale {
    pub fn name(self) -> &'static str {
        match self {
            AxisScale::Linear => "Linear",
            AxisScale::Logarithmic => "Log",
        }
    }

    /// Map a data value onto plot coordinates. `None` for values a
    /// logarithmic axis cannot show.
    pub fn to_plot(self, value: f64) -> Option<f64> {
        match self {
            AxisScale::Linear => Some(value),
            AxisScale::Logarithmic if value > 0.0 => Some(value.log10()),
            AxisScale::Logarithmic => None,
        }
    }

    /// Inverse of [`AxisScale::to_plot`], used for tick labels.
    pub fn from_plot(self, coord: f64) -> f64 {
        match self {
            AxisScale::Linear => coord,
            AxisScale::Logarithmic => 10f64.powf(coord),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoped chart slot
// ---------------------------------------------------------------------------

/// A live drawing resource that must be released before its slot is reused.
pub trait ChartHandle {
    fn destroy(self);
}

/// Owns at most one live chart. `replace` always destroys the previous
/// handle before storing the new one.
#[derive(Debug)]
pub struct ChartSlot<H: ChartHandle> {
    current: Option<H>,
    available: bool,
    replaced: u64,
}

impl<H: ChartHandle> Default for ChartSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ChartHandle> ChartSlot<H> {
    pub fn new() -> Self {
        Self {
            current: None,
            available: true,
            replaced: 0,
        }
    }

    /// A slot with no renderer behind it (headless runs).
    pub fn unavailable() -> Self {
        Self {
            current: None,
            available: false,
            replaced: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn replace(&mut self, chart: H) -> Result<(), ChartError> {
        if !self.available {
            chart.destroy();
            return Err(ChartError::RenderingUnavailable);
        }
        if let Some(previous) = self.current.take() {
            previous.destroy();
        }
        self.current = Some(chart);
        self.replaced += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.destroy();
        }
    }

    pub fn current(&self) -> Option<&H> {
        self.current.as_ref()
    }

    /// Number of successful `replace` calls.
    pub fn replaced(&self) -> u64 {
        self.replaced
    }
}

impl<H: ChartHandle> Drop for ChartSlot<H> {
    fn drop(&mut self) {
        self.clear();
    }
}

// ---------------------------------------------------------------------------
// PlotChart – what the GUI draws
// ---------------------------------------------------------------------------

/// A prepared chart: series plus how to draw them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotChart {
    pub kind: ChartKind,
    pub scale: AxisScale,
    pub series: ChartSeries,
    /// Whether `series.measured` comes from a successful evaluation.
    pub show_measured: bool,
    /// Distinct per replacement; keys the plot's zoom/pan memory.
    pub generation: u64,
}

impl PlotChart {
    /// Heading above the plot. Pie slices switch to measured values once
    /// an evaluation succeeds.
    pub fn title(&self) -> &'static str {
        match (self.kind, self.show_measured) {
            (ChartKind::Pie, true) => "Pie: distribution of measured values",
            (kind, _) => kind.title(),
        }
    }
}

impl ChartHandle for PlotChart {
    fn destroy(self) {
        log::debug!(
            "Releasing {} chart (generation {})",
            self.kind,
            self.generation
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use approx::assert_relative_eq;

    use super::*;

    #[derive(Debug)]
    struct Probe {
        id: u32,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ChartHandle for Probe {
        fn destroy(self) {
            self.log.borrow_mut().push(format!("destroy {}", self.id));
        }
    }

    fn probe(id: u32, log: &Rc<RefCell<Vec<String>>>) -> Probe {
        log.borrow_mut().push(format!("create {id}"));
        Probe {
            id,
            log: Rc::clone(log),
        }
    }

    #[test]
    fn replace_destroys_previous_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = ChartSlot::new();
        slot.replace(probe(1, &log)).unwrap();
        slot.replace(probe(2, &log)).unwrap();
        assert_eq!(slot.current().map(|p| p.id), Some(2));
        assert_eq!(slot.replaced(), 2);
        assert_eq!(*log.borrow(), vec!["create 1", "create 2", "destroy 1"]);
    }

    #[test]
    fn dropping_the_slot_releases_the_last_chart() {
        let log = Rc::new(RefCell::new(Vec::new()));
        {
            let mut slot = ChartSlot::new();
            slot.replace(probe(7, &log)).unwrap();
        }
        assert_eq!(log.borrow().last().map(String::as_str), Some("destroy 7"));
    }

    #[test]
    fn unavailable_slot_rejects_without_storing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = ChartSlot::unavailable();
        let err = slot.replace(probe(1, &log)).unwrap_err();
        assert_eq!(err, ChartError::RenderingUnavailable);
        assert!(slot.current().is_none());
        assert_eq!(slot.replaced(), 0);
        assert_eq!(*log.borrow(), vec!["create 1", "destroy 1"]);
    }

    #[test]
    fn pie_title_follows_the_drawn_values() {
        let mut chart = PlotChart {
            kind: ChartKind::Pie,
            scale: AxisScale::Linear,
            series: ChartSeries::default(),
            show_measured: false,
            generation: 1,
        };
        assert_eq!(chart.title(), "Pie: distribution of Peru limits");
        chart.show_measured = true;
        assert_eq!(chart.title(), "Pie: distribution of measured values");
        chart.kind = ChartKind::Bar;
        assert_eq!(chart.title(), ChartKind::Bar.title());
    }

    #[test]
    fn log_scale_round_trips_and_rejects_zero() {
        let scale = AxisScale::Logarithmic;
        let coord = scale.to_plot(250.0).unwrap();
        assert_relative_eq!(scale.from_plot(coord), 250.0, epsilon = 1e-9);
        assert_eq!(scale.to_plot(0.0), None);
        assert_eq!(AxisScale::Linear.to_plot(0.0), Some(0.0));
    }
}
