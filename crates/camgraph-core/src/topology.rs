//! Camera topologies, neural-network modes and hardware feasibility checks

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::PipelineError;
use crate::names::NameTable;

/// Graph shape of processing nodes for one camera configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Single color sensor
    ColorOnly,
    /// Color sensor plus stereo depth
    ColorPlusDepth,
    /// Color sensor plus two raw stereo captures
    ColorPlusStereoPair,
    /// Two raw stereo captures
    StereoPairOnly,
    /// Stereo depth only
    DepthOnly,
    /// One capture node per enumerated sensor
    SensorArray,
    /// 5-sensor rig: one color sensor and front/back stereo pairs
    FixedRigConfiguration,
}

impl Topology {
    pub const ALL: [Topology; 7] = [
        Topology::ColorOnly,
        Topology::ColorPlusDepth,
        Topology::ColorPlusStereoPair,
        Topology::StereoPairOnly,
        Topology::DepthOnly,
        Topology::SensorArray,
        Topology::FixedRigConfiguration,
    ];
}

pub static TOPOLOGY_NAMES: NameTable<Topology> = NameTable::new(
    "pipeline type",
    &[
        ("RGB", Topology::ColorOnly),
        ("RGBD", Topology::ColorPlusDepth),
        ("RGBSTEREO", Topology::ColorPlusStereoPair),
        ("STEREO", Topology::StereoPairOnly),
        ("DEPTH", Topology::DepthOnly),
        ("CAMARRAY", Topology::SensorArray),
        ("RAE", Topology::FixedRigConfiguration),
    ],
);

impl FromStr for Topology {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TOPOLOGY_NAMES.resolve(s)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", TOPOLOGY_NAMES.key_of(*self).unwrap_or("UNKNOWN"))
    }
}

/// Which stream, if any, neural-network inference runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeuralNetworkMode {
    #[default]
    None,
    /// Inference on the color preview stream
    ColorInput,
    /// Inference on color preview plus depth for 3D localization
    SpatialColorInput,
}

impl NeuralNetworkMode {
    pub const ALL: [NeuralNetworkMode; 3] = [
        NeuralNetworkMode::None,
        NeuralNetworkMode::ColorInput,
        NeuralNetworkMode::SpatialColorInput,
    ];
}

pub static NN_MODE_NAMES: NameTable<NeuralNetworkMode> = NameTable::new(
    "nn type",
    &[
        ("NONE", NeuralNetworkMode::None),
        ("", NeuralNetworkMode::None),
        ("RGB", NeuralNetworkMode::ColorInput),
        ("SPATIAL", NeuralNetworkMode::SpatialColorInput),
    ],
);

impl FromStr for NeuralNetworkMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NN_MODE_NAMES.resolve(s)
    }
}

impl fmt::Display for NeuralNetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", NN_MODE_NAMES.key_of(*self).unwrap_or("UNKNOWN"))
    }
}

/// Outcome of checking a requested topology against the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub requested: Topology,
    pub effective: Topology,
    pub corrected: bool,
}

/// Confirm `requested` is realizable with `sensor_count` sensors, or substitute a safe fallback
///
/// Rules, first match wins:
/// - 1 sensor: only [`Topology::ColorOnly`]
/// - 2 sensors: [`Topology::StereoPairOnly`] or [`Topology::DepthOnly`], else stereo
/// - 3 sensors: anything
/// - more: [`Topology::SensorArray`] or [`Topology::FixedRigConfiguration`], else array
pub fn validate(requested: Topology, sensor_count: usize) -> Validation {
    let effective = match sensor_count {
        1 if requested != Topology::ColorOnly => Topology::ColorOnly,
        2 if !matches!(requested, Topology::StereoPairOnly | Topology::DepthOnly) => {
            Topology::StereoPairOnly
        }
        n if n > 3
            && !matches!(
                requested,
                Topology::SensorArray | Topology::FixedRigConfiguration
            ) =>
        {
            Topology::SensorArray
        }
        _ => requested,
    };

    let corrected = effective != requested;
    if corrected {
        warn!(
            requested = %requested,
            effective = %effective,
            sensors = sensor_count,
            "Wrong pipeline chosen for camera, switching"
        );
    }

    Validation {
        requested,
        effective,
        corrected,
    }
}
