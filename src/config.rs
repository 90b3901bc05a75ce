//! Trace location and figure configuration, loaded from TOML.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::trace::{Material, SanetLayout};

/// Where the simulator wrote its traces and which series to build.
///
/// Every key is optional; defaults match the file names the simulation
/// scenarios produce.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TraceConfig {
    /// Directory the trace file names are resolved against.
    pub trace_dir: PathBuf,
    pub mobility_file: String,
    /// File name prefix; the material is appended as `<prefix>_<material>.txt`.
    pub rssi_distance_prefix: String,
    pub rssi_time_file: String,
    pub sanet_file: String,
    /// Number of nodes plotted in the spatial distribution (ids `0..node_count`).
    pub node_count: u32,
    /// Node compared across materials in the RSSI-distance figure.
    pub compare_node: i64,
    pub materials: Vec<Material>,
    pub sanet: SanetConfig,
}

/// SANET CSV layout and the metrics plotted over time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SanetConfig {
    pub time_column: String,
    pub text_columns: Vec<String>,
    pub metrics: Vec<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            trace_dir: PathBuf::from("."),
            mobility_file: "mobility.txt".to_string(),
            rssi_distance_prefix: "rssi_building".to_string(),
            rssi_time_file: "rssi_time.txt".to_string(),
            sanet_file: "sanet.output.csv".to_string(),
            node_count: 10,
            compare_node: 1,
            materials: vec![Material::Wood, Material::Concrete, Material::Stone],
            sanet: SanetConfig::default(),
        }
    }
}

impl Default for SanetConfig {
    fn default() -> Self {
        let layout = SanetLayout::default();
        Self {
            time_column: layout.time_column,
            text_columns: layout.text_columns,
            metrics: vec!["Average End to End".to_string(), "Package Delivery Ratio".to_string()],
        }
    }
}

impl TraceConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the config.toml file
    ///
    /// A relative `trace-dir` is resolved against the config file's directory.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: TraceConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        if config.trace_dir.is_relative() {
            if let Some(parent) = config_path.parent() {
                config.trace_dir = parent.join(&config.trace_dir);
            }
        }
        Ok(config)
    }

    pub fn mobility_path(&self) -> PathBuf {
        self.trace_dir.join(&self.mobility_file)
    }

    pub fn rssi_distance_path(&self, material: Material) -> PathBuf {
        self.trace_dir
            .join(format!("{}_{}.txt", self.rssi_distance_prefix, material.file_stem()))
    }

    pub fn rssi_time_path(&self) -> PathBuf {
        self.trace_dir.join(&self.rssi_time_file)
    }

    pub fn sanet_path(&self) -> PathBuf {
        self.trace_dir.join(&self.sanet_file)
    }

    pub fn sanet_layout(&self) -> SanetLayout {
        SanetLayout {
            time_column: self.sanet.time_column.clone(),
            text_columns: self.sanet.text_columns.clone(),
        }
    }
}
