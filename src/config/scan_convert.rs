use crate::acquisition::MetadataDictionary;
use crate::convert::ConvertOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ScanConvertToolConfig {
    pub input: PathBuf,
    /// Physical spacing of the input image along (columns, rows).
    #[serde(default = "default_input_spacing")]
    pub input_spacing: [f64; 2],
    #[serde(default)]
    pub axes: AxesConfig,
    /// Acquisition metadata; must provide the radius and the line angles.
    pub metadata: MetadataDictionary,
    #[serde(default)]
    pub convert: ConvertOptions,
    pub output: ScanConvertOutputConfig,
}

fn default_input_spacing() -> [f64; 2] {
    [1.0, 1.0]
}

/// Which image axis holds depth and which holds the scan lines.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub radius_axis: usize,
    pub angle_axis: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        // Scan lines as columns, depth running down the rows.
        Self {
            radius_axis: 1,
            angle_axis: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanConvertOutputConfig {
    pub image: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ScanConvertToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
