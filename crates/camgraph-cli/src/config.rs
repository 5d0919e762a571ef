//! Configuration loading for the device description file

use anyhow::Result;
use camgraph_core::{PipelineRequest, SensorInfo, SensorInventory, SensorSocket};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Sensors in enumeration order
    #[serde(default = "default_sensors", rename = "sensor")]
    pub sensors: Vec<SensorInfo>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            sensors: default_sensors(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Topology key (RGB, RGBD, RGBSTEREO, STEREO, DEPTH, CAMARRAY, RAE)
    #[serde(default = "default_topology")]
    pub topology: String,
    /// Neural-network mode key (NONE, RGB, SPATIAL)
    #[serde(default = "default_nn_type")]
    pub nn_type: String,
    /// Append an inertial-measurement node
    #[serde(default = "default_true")]
    pub enable_imu: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            topology: default_topology(),
            nn_type: default_nn_type(),
            enable_imu: true,
        }
    }
}

fn default_topology() -> String {
    "RGBD".to_string()
}

fn default_nn_type() -> String {
    "none".to_string()
}

fn default_true() -> bool {
    true
}

/// Stock color + stereo module layout
fn default_sensors() -> Vec<SensorInfo> {
    vec![
        SensorInfo::new(SensorSocket::CAM_A, "IMX378"),
        SensorInfo::new(SensorSocket::CAM_B, "OV9282"),
        SensorInfo::new(SensorSocket::CAM_C, "OV9282"),
    ]
}

impl Config {
    pub fn inventory(&self) -> SensorInventory {
        SensorInventory::new(self.sensors.clone())
    }

    pub fn to_request(&self) -> PipelineRequest {
        PipelineRequest::new(
            self.pipeline.topology.as_str(),
            self.pipeline.nn_type.as_str(),
            self.pipeline.enable_imu,
        )
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), sensors = config.sensors.len(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}
