use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Evaluation errors
// ---------------------------------------------------------------------------

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// No value was supplied for the identifier.
    Missing,
    /// The text could not be parsed as a number.
    NotANumber,
    /// NaN or infinite.
    NotFinite,
    Negative,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidReason::Missing => "missing",
            InvalidReason::NotANumber => "not a number",
            InvalidReason::NotFinite => "not a finite number",
            InvalidReason::Negative => "negative",
        };
        f.write_str(text)
    }
}

/// One offending field of a rejected batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub id: String,
    pub raw: String,
    pub reason: InvalidReason,
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:?} ({})", self.id, self.raw, self.reason)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The batch contained at least one unusable value; no partial results.
    #[error("invalid measurement: {}", join_fields(.fields))]
    InvalidMeasurement { fields: Vec<InvalidField> },
}

impl EvalError {
    pub fn invalid(id: &str, raw: &str, reason: InvalidReason) -> Self {
        EvalError::InvalidMeasurement {
            fields: vec![InvalidField {
                id: id.to_string(),
                raw: raw.to_string(),
                reason,
            }],
        }
    }

    /// Fields that caused the rejection.
    pub fn fields(&self) -> &[InvalidField] {
        match self {
            EvalError::InvalidMeasurement { fields } => fields,
        }
    }

    /// Message shown in place of the report.
    pub fn user_message(&self) -> String {
        "Error: check that every value entered is a valid, non-negative number.".to_string()
    }
}

fn join_fields(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Chart errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartError {
    #[error("chart renderer is not available")]
    RenderingUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_measurement_lists_every_field() {
        let err = EvalError::InvalidMeasurement {
            fields: vec![
                InvalidField {
                    id: "pm25_24h".into(),
                    raw: "-5".into(),
                    reason: InvalidReason::Negative,
                },
                InvalidField {
                    id: "o3_8h".into(),
                    raw: "abc".into(),
                    reason: InvalidReason::NotANumber,
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("pm25_24h = \"-5\" (negative)"));
        assert!(text.contains("o3_8h = \"abc\" (not a number)"));
        assert_eq!(err.fields().len(), 2);
    }
}
