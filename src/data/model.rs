use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{EvalError, InvalidReason};

/// Concentration unit shared by every row of the reference table.
pub const UNIT: &str = "µg/m³";

// ---------------------------------------------------------------------------
// PollutantStandard – one row of the threshold table
// ---------------------------------------------------------------------------

/// Regulatory limits for one pollutant / averaging-period combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantStandard {
    /// Stable key, unique across the table.
    pub id: &'static str,
    /// Display name, may embed the averaging period, e.g. `"PM-2.5 (24h)"`.
    pub name: &'static str,
    pub unit: &'static str,
    /// WHO-style guideline limit.
    pub guideline: f64,
    /// National (Peru) limit, never stricter than the guideline.
    pub national: f64,
    /// Illustrative value used to seed the input form.
    pub example: Option<f64>,
}

impl PollutantStandard {
    /// Name truncated at the first `(`, e.g. `"PM-2.5 (24h)"` → `"PM-2.5"`.
    pub fn short_label(&self) -> &'static str {
        let name: &'static str = self.name;
        match name.find('(') {
            Some(idx) => name[..idx].trim(),
            None => name.trim(),
        }
    }

    /// Example value, or zero when the row has none.
    pub fn example_or_zero(&self) -> f64 {
        self.example.unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// ThresholdTable – immutable, ordered reference data
// ---------------------------------------------------------------------------

/// Identifiers of the carbon monoxide rows. Their limits are two to four
/// orders of magnitude above every other row.
pub const CARBON_MONOXIDE: &[&str] = &["co_8h", "co_1h"];

const REFERENCE_STANDARDS: &[PollutantStandard] = &[
    PollutantStandard {
        id: "so2_24h",
        name: "Sulfur Dioxide (24h)",
        unit: UNIT,
        guideline: 20.0,
        national: 365.0,
        example: Some(15.0),
    },
    PollutantStandard {
        id: "so2_annual",
        name: "Sulfur Dioxide (Annual)",
        unit: UNIT,
        guideline: 20.0,
        national: 50.0,
        example: Some(8.0),
    },
    PollutantStandard {
        id: "pm10_24h",
        name: "PM-10 (24h)",
        unit: UNIT,
        guideline: 50.0,
        national: 150.0,
        example: Some(62.0),
    },
    PollutantStandard {
        id: "pm10_annual",
        name: "PM-10 (Annual)",
        unit: UNIT,
        guideline: 20.0,
        national: 50.0,
        example: Some(35.0),
    },
    PollutantStandard {
        id: "pm25_24h",
        name: "PM-2.5 (24h)",
        unit: UNIT,
        guideline: 25.0,
        national: 65.0,
        example: Some(25.0),
    },
    PollutantStandard {
        id: "pm25_annual",
        name: "PM-2.5 (Annual)",
        unit: UNIT,
        guideline: 10.0,
        national: 15.0,
        example: Some(18.0),
    },
    PollutantStandard {
        id: "co_8h",
        name: "Carbon Monoxide (8h)",
        unit: UNIT,
        guideline: 10000.0,
        national: 10000.0,
        example: Some(4200.0),
    },
    PollutantStandard {
        id: "co_1h",
        name: "Carbon Monoxide (1h)",
        unit: UNIT,
        guideline: 30000.0,
        national: 30000.0,
        example: Some(9500.0),
    },
    PollutantStandard {
        id: "no2_1h",
        name: "Nitrogen Dioxide (1h)",
        unit: UNIT,
        guideline: 200.0,
        national: 200.0,
        example: Some(120.0),
    },
    PollutantStandard {
        id: "no2_annual",
        name: "Nitrogen Dioxide (Annual)",
        unit: UNIT,
        guideline: 40.0,
        national: 100.0,
        example: Some(44.0),
    },
    PollutantStandard {
        id: "o3_8h",
        name: "Ozone (8h)",
        unit: UNIT,
        guideline: 100.0,
        national: 120.0,
        example: Some(96.0),
    },
    PollutantStandard {
        id: "pb_annual",
        name: "Lead (Annual)",
        unit: UNIT,
        guideline: 0.5,
        national: 0.5,
        example: Some(0.2),
    },
];

/// Read-only ordered sequence of [`PollutantStandard`] rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    rows: &'static [PollutantStandard],
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl ThresholdTable {
    /// The twelve WHO / Peru reference rows.
    pub const fn reference() -> Self {
        Self {
            rows: REFERENCE_STANDARDS,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'static, PollutantStandard> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&'static PollutantStandard> {
        self.rows.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|s| s.id == id)
    }
}

impl IntoIterator for ThresholdTable {
    type Item = &'static PollutantStandard;
    type IntoIter = std::slice::Iter<'static, PollutantStandard>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// ---------------------------------------------------------------------------
// Measurements
// ---------------------------------------------------------------------------

/// Unvalidated text per identifier, as typed in the form or read from a file.
pub type RawMeasurements = BTreeMap<String, String>;

/// Validated measurements: identifier → finite, non-negative value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasurementSet {
    values: BTreeMap<String, f64>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every row's example value (zero where absent).
    pub fn from_examples(table: &ThresholdTable) -> Self {
        let values = table
            .iter()
            .map(|s| (s.id.to_string(), s.example_or_zero()))
            .collect();
        Self { values }
    }

    /// Insert a value, rejecting negative and non-finite numbers.
    pub fn insert(&mut self, id: &str, value: f64) -> Result<(), EvalError> {
        if !value.is_finite() {
            return Err(EvalError::invalid(id, &value.to_string(), InvalidReason::NotFinite));
        }
        if value < 0.0 {
            return Err(EvalError::invalid(id, &value.to_string(), InvalidReason::Negative));
        }
        self.values.insert(id.to_string(), value);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Compliance classification
// ---------------------------------------------------------------------------

/// Tri-state result, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ComplianceStatus {
    /// Meets guideline and national limit.
    CompliantBoth,
    /// Meets the national limit but exceeds the guideline.
    CompliantNationalOnly,
    ExceedsBoth,
}

impl ComplianceStatus {
    pub const ALL: [ComplianceStatus; 3] = [
        ComplianceStatus::CompliantBoth,
        ComplianceStatus::CompliantNationalOnly,
        ComplianceStatus::ExceedsBoth,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            ComplianceStatus::CompliantBoth => "✔",
            ComplianceStatus::CompliantNationalOnly => "⚠",
            ComplianceStatus::ExceedsBoth => "✘",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplianceStatus::CompliantBoth => "Compliant",
            ComplianceStatus::CompliantNationalOnly => "National only",
            ComplianceStatus::ExceedsBoth => "Exceeds both",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of one measured value against one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceResult {
    pub id: &'static str,
    pub name: &'static str,
    pub measured: f64,
    pub guideline: f64,
    pub national: f64,
    pub status: ComplianceStatus,
    /// Report line, prefixed with the status marker.
    pub message: String,
}

pub const REPORT_HEADER: &str = "=== AIR QUALITY RESULTS ===";

/// Ordered results for a whole table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub results: Vec<ComplianceResult>,
}

impl ComplianceReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ComplianceResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// Most severe status in the report.
    pub fn worst(&self) -> Option<ComplianceStatus> {
        self.results.iter().map(|r| r.status).max()
    }

    pub fn count(&self, status: ComplianceStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

impl fmt::Display for ComplianceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_HEADER}")?;
        writeln!(f)?;
        for r in &self.results {
            writeln!(f, "{}", r.message)?;
        }
        Ok(())
    }
}
