use std::fs::File;

use air_compare::data::model::ThresholdTable;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

#[derive(Serialize)]
struct Record {
    id: &'static str,
    value: f64,
}

/// Writes sample measurement files for File → Import and `report --input`:
///
/// * `sample_measurements.json` – example values, object form
/// * `sample_measurements.csv`  – example values, `id,value` rows
/// * `sample_exceeding.json`    – 125 % of each national limit, record form
fn main() -> Result<()> {
    let table = ThresholdTable::reference();

    let object: Map<String, JsonValue> = table
        .iter()
        .map(|s| (s.id.to_string(), JsonValue::from(s.example_or_zero())))
        .collect();
    let path = "sample_measurements.json";
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    serde_json::to_writer_pretty(file, &object).context("writing JSON")?;

    let path = "sample_measurements.csv";
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for s in table.iter() {
        writer.serialize(Record {
            id: s.id,
            value: s.example_or_zero(),
        })?;
    }
    writer.flush().context("writing CSV")?;

    let exceeding: Vec<Record> = table
        .iter()
        .map(|s| Record {
            id: s.id,
            value: s.national * 1.25,
        })
        .collect();
    let path = "sample_exceeding.json";
    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    serde_json::to_writer_pretty(file, &exceeding).context("writing JSON")?;

    println!(
        "Wrote {} pollutants to sample_measurements.json, sample_measurements.csv and sample_exceeding.json",
        table.len()
    );
    Ok(())
}
