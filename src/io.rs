//! JSON dataset loading and report writing for the command-line tools.

use crate::dataset::{Attribute, Dataset, Instance, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// On-disk dataset layout. `null` cells are missing.
#[derive(Debug, Deserialize, Serialize)]
pub struct DatasetFile {
    #[serde(default = "default_name")]
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub rows: Vec<RowRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RowRecord {
    pub values: Vec<Option<f64>>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_name() -> String {
    "dataset".to_string()
}

fn default_weight() -> f64 {
    1.0
}

impl DatasetFile {
    pub fn into_dataset(self) -> Result<Dataset, String> {
        let mut data = Dataset::with_capacity(self.name, self.attributes, self.rows.len());
        for (i, row) in self.rows.into_iter().enumerate() {
            let values = parse_row(data.attributes(), &row.values)
                .map_err(|e| format!("row {i}: {e}"))?;
            data.add(Instance::with_weight(values, row.weight))
                .map_err(|e| format!("row {i}: {e}"))?;
        }
        Ok(data)
    }
}

/// Convert raw cells to typed values following `attributes`.
pub fn parse_row(attributes: &[Attribute], raw: &[Option<f64>]) -> Result<Vec<Value>, String> {
    if raw.len() != attributes.len() {
        return Err(format!(
            "expected {} values, found {}",
            attributes.len(),
            raw.len()
        ));
    }
    attributes
        .iter()
        .zip(raw)
        .map(|(attr, &cell)| attr.parse_value(cell).map_err(|e| e.to_string()))
        .collect()
}

pub fn dataset_from_json_str(json: &str) -> Result<Dataset, String> {
    let file: DatasetFile =
        serde_json::from_str(json).map_err(|e| format!("Failed to parse dataset: {e}"))?;
    file.into_dataset()
}

pub fn load_dataset(path: &Path) -> Result<Dataset, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read dataset {}: {e}", path.display()))?;
    dataset_from_json_str(&data).map_err(|e| format!("{}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
