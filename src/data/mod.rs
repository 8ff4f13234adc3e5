/// Data layer: reference thresholds, evaluation, and chart shaping.
///
/// Architecture:
/// ```text
///   form fields / .json / .csv
///        │
///        ▼
///   ┌──────────────┐
///   │  loader       │  file → RawMeasurements (text per identifier)
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  compliance   │  validate → MeasurementSet → ComplianceReport
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  series       │  ThresholdTable + MeasurementSet → ChartSeries
///   └──────────────┘
/// ```

pub mod compliance;
pub mod loader;
pub mod model;
pub mod series;
