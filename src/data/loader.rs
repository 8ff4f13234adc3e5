use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{RawMeasurements, ThresholdTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw measurements from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{ "pm25_24h": 40, ... }` or `[{ "id": "pm25_24h", "value": 40 }, ...]`
/// * `.csv`  – header row with `id` and `value` columns
///
/// Values are returned as text and validated later, exactly like typed
/// input. Identifiers not in `table` are rejected.
pub fn load_measurements(path: &Path, table: &ThresholdTable) -> Result<RawMeasurements> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        "csv" => {
            let reader = csv::Reader::from_path(path).context("opening CSV")?;
            parse_csv(reader)?
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    check_identifiers(&raw, table)?;
    Ok(raw)
}

fn check_identifiers(raw: &RawMeasurements, table: &ThresholdTable) -> Result<()> {
    let unknown: Vec<&str> = raw
        .keys()
        .filter(|id| table.get(id).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!("Unknown pollutant identifier(s): {}", unknown.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn parse_json(text: &str) -> Result<RawMeasurements> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    match root {
        JsonValue::Object(map) => Ok(map
            .into_iter()
            .map(|(id, v)| (id, json_to_text(&v)))
            .collect()),
        JsonValue::Array(records) => {
            let mut raw = RawMeasurements::new();
            for (i, rec) in records.iter().enumerate() {
                let obj = rec
                    .as_object()
                    .with_context(|| format!("Row {i} is not a JSON object"))?;
                let id = obj
                    .get("id")
                    .and_then(|v| v.as_str())
                    .with_context(|| format!("Row {i}: missing or invalid 'id'"))?;
                let value = obj.get("value").map(json_to_text).unwrap_or_default();
                if raw.insert(id.to_string(), value).is_some() {
                    bail!("Row {i}: duplicate identifier '{id}'");
                }
            }
            Ok(raw)
        }
        _ => bail!("Expected a JSON object or array at top level"),
    }
}

/// Numbers keep their JSON spelling; `null` becomes empty (rejected later).
fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn parse_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<RawMeasurements> {
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let id_idx = headers
        .iter()
        .position(|h| h.trim() == "id")
        .context("CSV missing 'id' column")?;
    let value_idx = headers
        .iter()
        .position(|h| h.trim() == "value")
        .context("CSV missing 'value' column")?;

    let mut raw = RawMeasurements::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let id = record.get(id_idx).unwrap_or("").trim();
        if id.is_empty() {
            bail!("CSV row {row_no}: empty 'id'");
        }
        let value = record.get(value_idx).unwrap_or("").to_string();
        if raw.insert(id.to_string(), value).is_some() {
            bail!("CSV row {row_no}: duplicate identifier '{id}'");
        }
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "air_compare_{}_{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn json_object_keeps_raw_text() {
        let raw = parse_json(r#"{ "pm25_24h": 40, "o3_8h": "-5", "pb_annual": null }"#).unwrap();
        assert_eq!(raw["pm25_24h"], "40");
        assert_eq!(raw["o3_8h"], "-5");
        assert_eq!(raw["pb_annual"], "");
    }

    #[test]
    fn json_records() {
        let body = r#"[{ "id": "pm25_24h", "value": 12.5 }, { "id": "o3_8h" }]"#;
        let raw = parse_json(body).unwrap();
        assert_eq!(raw["pm25_24h"], "12.5");
        assert_eq!(raw["o3_8h"], "");
    }

    #[test]
    fn json_records_reject_duplicates() {
        let err = parse_json(r#"[{ "id": "o3_8h", "value": 1 }, { "id": "o3_8h", "value": 2 }]"#)
            .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn csv_file_loads() {
        let path = write_temp("ok.csv", "id,value\npm25_24h,40\nco_8h, 4200\n");
        let raw = load_measurements(&path, &ThresholdTable::reference()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw["co_8h"], " 4200");
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        let path = write_temp("unknown.json", r#"{ "radon": 3 }"#);
        let err = load_measurements(&path, &ThresholdTable::reference()).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("radon"));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_measurements(Path::new("values.xlsx"), &ThresholdTable::reference())
            .unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
