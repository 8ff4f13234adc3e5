use crate::error::{EvalError, InvalidField, InvalidReason};

use super::model::{
    ComplianceReport, ComplianceResult, ComplianceStatus, MeasurementSet, PollutantStandard,
    RawMeasurements, ThresholdTable,
};

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

/// Parse one raw field. Zero is accepted; empty, unparseable, non-finite and
/// negative input is not.
pub fn parse_measurement(raw: &str) -> Result<f64, InvalidReason> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(InvalidReason::Missing);
    }
    let value: f64 = text.parse().map_err(|_| InvalidReason::NotANumber)?;
    if !value.is_finite() {
        return Err(InvalidReason::NotFinite);
    }
    if value < 0.0 {
        return Err(InvalidReason::Negative);
    }
    // "-0" parses to negative zero; report it as plain 0.
    Ok(if value == 0.0 { 0.0 } else { value })
}

/// Build a [`MeasurementSet`] with one entry per table row.
///
/// Every row is checked before failing so the single
/// [`EvalError::InvalidMeasurement`] names all offending fields.
pub fn parse_measurements(
    table: &ThresholdTable,
    raw: &RawMeasurements,
) -> Result<MeasurementSet, EvalError> {
    let mut set = MeasurementSet::new();
    let mut invalid = Vec::new();

    for standard in table.iter() {
        let text = raw.get(standard.id).map(String::as_str);
        let parsed = match text {
            Some(t) => parse_measurement(t),
            None => Err(InvalidReason::Missing),
        };
        match parsed {
            Ok(value) => set.insert(standard.id, value)?,
            Err(reason) => invalid.push(InvalidField {
                id: standard.id.to_string(),
                raw: text.unwrap_or_default().to_string(),
                reason,
            }),
        }
    }

    if invalid.is_empty() {
        Ok(set)
    } else {
        Err(EvalError::InvalidMeasurement { fields: invalid })
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a validated value against one row.
///
/// A value exactly at a limit counts as meeting it.
pub fn classify(standard: &'static PollutantStandard, value: f64) -> ComplianceResult {
    let status = if value <= standard.guideline {
        ComplianceStatus::CompliantBoth
    } else if value <= standard.national {
        ComplianceStatus::CompliantNationalOnly
    } else {
        ComplianceStatus::ExceedsBoth
    };

    let PollutantStandard {
        name,
        unit,
        guideline: g,
        national: n,
        ..
    } = standard;
    let verdict = match status {
        ComplianceStatus::CompliantBoth => format!("meets WHO ({g}) and Peru ({n})"),
        ComplianceStatus::CompliantNationalOnly => {
            format!("meets Peru ({n}), exceeds WHO ({g})")
        }
        ComplianceStatus::ExceedsBoth => format!("exceeds WHO ({g}) and Peru ({n})"),
    };

    ComplianceResult {
        id: standard.id,
        name: standard.name,
        measured: value,
        guideline: *g,
        national: *n,
        status,
        message: format!("{} {name} = {value} {unit}: {verdict}", status.marker()),
    }
}

/// Classify every row in table order. A row without a measurement fails the
/// whole batch.
pub fn classify_all(
    table: &ThresholdTable,
    measurements: &MeasurementSet,
) -> Result<ComplianceReport, EvalError> {
    let mut results = Vec::with_capacity(table.len());
    let mut missing = Vec::new();

    for standard in table.iter() {
        match measurements.get(standard.id) {
            Some(value) => results.push(classify(standard, value)),
            None => missing.push(InvalidField {
                id: standard.id.to_string(),
                raw: String::new(),
                reason: InvalidReason::Missing,
            }),
        }
    }

    if !missing.is_empty() {
        return Err(EvalError::InvalidMeasurement { fields: missing });
    }
    Ok(ComplianceReport { results })
}

/// Parse and classify in one step (the form path).
pub fn evaluate_raw(
    table: &ThresholdTable,
    raw: &RawMeasurements,
) -> Result<(MeasurementSet, ComplianceReport), EvalError> {
    let measurements = parse_measurements(table, raw)?;
    let report = classify_all(table, &measurements)?;
    Ok((measurements, report))
}
