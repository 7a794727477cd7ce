use crate::dataset::{Dataset, Instance};
use crate::em::{EmParams, Initialization};
use crate::io::parse_row;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration of the `em_fit` tool.
#[derive(Debug, Deserialize)]
pub struct FitToolConfig {
    /// JSON dataset to cluster.
    #[serde(rename = "input")]
    pub input: PathBuf,
    #[serde(default)]
    pub em: EmParams,
    /// Initial centers, one row per cluster; `null` cells fall back to the
    /// column mean or mode. Random rows are drawn when omitted.
    #[serde(default)]
    pub centers: Option<Vec<Vec<Option<f64>>>>,
    /// Cluster sizes seeding the priors; equal sizes when omitted.
    #[serde(default)]
    pub sizes: Option<Vec<f64>>,
    #[serde(default)]
    pub output: FitOutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FitOutputConfig {
    /// Destination of the JSON fit summary.
    pub result_json: Option<PathBuf>,
    /// Include per-row hard assignments in the summary.
    pub include_assignments: bool,
}

impl FitToolConfig {
    /// Resolve the starting point of the fit against the loaded dataset.
    pub fn initialization(&self, data: &Dataset) -> Result<Initialization, String> {
        let Some(rows) = &self.centers else {
            return Ok(Initialization::RandomRows);
        };
        let centers = rows
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                parse_row(data.attributes(), raw)
                    .map(Instance::new)
                    .map_err(|e| format!("center {i}: {e}"))
            })
            .collect::<Result<Vec<_>, String>>()?;
        let sizes = self
            .sizes
            .clone()
            .unwrap_or_else(|| vec![1.0; centers.len()]);
        if sizes.len() != centers.len() {
            return Err(format!(
                "{} sizes given for {} centers",
                sizes.len(),
                centers.len()
            ));
        }
        Ok(Initialization::centers(centers, sizes))
    }
}

pub fn load_config(path: &Path) -> Result<FitToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
