//! Construction of the node set for each topology
//!
//! Dispatch goes through [`BUILD_TABLE`], keyed by (topology, neural-network
//! mode). Every pair must have an entry; a missing pair surfaces as
//! [`PipelineError::UnsupportedTopology`].

use tracing::{error, warn};

use crate::error::{PipelineError, Result};
use crate::node::{CaptureNode, ProcessingNode, StereoDepthNode};
use crate::pipeline::BuildWarning;
use crate::sensor::{SensorInventory, SensorSocket};
use crate::topology::{NeuralNetworkMode, Topology};
use crate::wiring::{attach_inference, attach_spatial_inference};

pub type BuildFn = fn(&mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>>;

use crate::topology::NeuralNetworkMode as Nn;
use crate::topology::Topology as T;

/// One row of the dispatch table
#[derive(Clone, Copy)]
pub struct BuildEntry {
    pub topology: Topology,
    pub mode: NeuralNetworkMode,
    pub build: BuildFn,
}

const fn entry(topology: Topology, mode: NeuralNetworkMode, build: BuildFn) -> BuildEntry {
    BuildEntry {
        topology,
        mode,
        build,
    }
}

pub static BUILD_TABLE: &[BuildEntry] = &[
    entry(T::ColorOnly, Nn::None, color_only),
    entry(T::ColorOnly, Nn::ColorInput, color_only_with_nn),
    entry(T::ColorOnly, Nn::SpatialColorInput, color_only_with_spatial_nn),
    entry(T::ColorPlusDepth, Nn::None, color_depth),
    entry(T::ColorPlusDepth, Nn::ColorInput, color_depth_with_nn),
    entry(T::ColorPlusDepth, Nn::SpatialColorInput, color_depth_with_spatial_nn),
    entry(T::ColorPlusStereoPair, Nn::None, color_stereo),
    entry(T::ColorPlusStereoPair, Nn::ColorInput, color_stereo_with_nn),
    entry(T::ColorPlusStereoPair, Nn::SpatialColorInput, color_stereo_with_spatial_nn),
    entry(T::StereoPairOnly, Nn::None, stereo_pair),
    entry(T::StereoPairOnly, Nn::ColorInput, stereo_pair),
    entry(T::StereoPairOnly, Nn::SpatialColorInput, stereo_pair),
    entry(T::DepthOnly, Nn::None, depth_only),
    entry(T::DepthOnly, Nn::ColorInput, depth_only),
    entry(T::DepthOnly, Nn::SpatialColorInput, depth_only),
    entry(T::SensorArray, Nn::None, sensor_array),
    entry(T::SensorArray, Nn::ColorInput, sensor_array),
    entry(T::SensorArray, Nn::SpatialColorInput, sensor_array),
    entry(T::FixedRigConfiguration, Nn::None, fixed_rig),
    entry(T::FixedRigConfiguration, Nn::ColorInput, fixed_rig),
    entry(T::FixedRigConfiguration, Nn::SpatialColorInput, fixed_rig),
];

/// Find the construction function for a (topology, mode) pair
pub fn lookup(topology: Topology, mode: NeuralNetworkMode) -> Option<BuildFn> {
    BUILD_TABLE
        .iter()
        .find(|e| e.topology == topology && e.mode == mode)
        .map(|e| e.build)
}

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Name of the `index`-th (0-based) sensor in a sensor array
///
/// Letters cycle a..z, and each full cycle adds one repetition:
/// 0 -> "a", 25 -> "z", 26 -> "aa", 27 -> "bb", 52 -> "aaa".
pub fn array_node_name(index: usize) -> String {
    let letter = ALPHABET[index % ALPHABET.len()] as char;
    let repeat = index / ALPHABET.len() + 1;
    std::iter::repeat(letter).take(repeat).collect()
}

/// Builds the nodes for one topology against an enumerated inventory
pub struct TopologyBuilder<'a> {
    inventory: &'a SensorInventory,
    /// Raw configuration string, reported when the topology is unsupported
    configuration: String,
    topology: Topology,
    mode: NeuralNetworkMode,
    warnings: Vec<BuildWarning>,
}

impl<'a> TopologyBuilder<'a> {
    pub fn new(inventory: &'a SensorInventory, configuration: impl Into<String>) -> Self {
        Self {
            inventory,
            configuration: configuration.into(),
            topology: Topology::ColorOnly,
            mode: NeuralNetworkMode::None,
            warnings: Vec::new(),
        }
    }

    /// Construct the node set for `topology` with `mode` inference attached where defined
    pub fn build(
        &mut self,
        topology: Topology,
        mode: NeuralNetworkMode,
    ) -> Result<Vec<ProcessingNode>> {
        let Some(build_fn) = lookup(topology, mode) else {
            error!(configuration = %self.configuration, "Unsupported pipeline type");
            return Err(PipelineError::UnsupportedTopology {
                configuration: self.configuration.clone(),
            });
        };

        self.topology = topology;
        self.mode = mode;
        build_fn(self)
    }

    /// Warnings recorded by the builds so far
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<BuildWarning> {
        self.warnings
    }

    fn capture(&self, name: &str, socket: SensorSocket) -> Result<CaptureNode> {
        let sensor = self
            .inventory
            .find(socket)
            .ok_or_else(|| PipelineError::MissingSensor {
                socket,
                topology: self.topology.to_string(),
            })?;
        CaptureNode::from_sensor(name, sensor)
    }

    fn stereo(
        &self,
        name: &str,
        (left_name, left_socket): (&str, SensorSocket),
        (right_name, right_socket): (&str, SensorSocket),
    ) -> Result<StereoDepthNode> {
        let left = self.capture(left_name, left_socket)?;
        let right = self.capture(right_name, right_socket)?;
        Ok(StereoDepthNode::new(name, left, right))
    }

    fn default_stereo(&self) -> Result<StereoDepthNode> {
        self.stereo(
            "stereo",
            ("left", SensorSocket::LEFT),
            ("right", SensorSocket::RIGHT),
        )
    }

    fn mode_mismatch(&mut self) {
        warn!(
            topology = %self.topology,
            nn_type = %self.mode,
            "Spatial NN selected, but configuration has no depth source"
        );
        self.warnings.push(BuildWarning::NeuralNetworkModeMismatch {
            topology: self.topology,
            mode: self.mode,
        });
    }
}

fn color_only(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let rgb = b.capture("rgb", SensorSocket::RGB)?;
    Ok(vec![rgb.into()])
}

fn color_only_with_nn(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let rgb = b.capture("rgb", SensorSocket::RGB)?;
    let nn = attach_inference(&rgb)?;
    Ok(vec![nn.into(), rgb.into()])
}

fn color_only_with_spatial_nn(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    b.mode_mismatch();
    color_only_with_nn(b)
}

fn color_depth(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let rgb = b.capture("rgb", SensorSocket::RGB)?;
    let stereo = b.default_stereo()?;
    Ok(vec![rgb.into(), stereo.into()])
}

fn color_depth_with_nn(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let rgb = b.capture("rgb", SensorSocket::RGB)?;
    let stereo = b.default_stereo()?;
    let nn = attach_inference(&rgb)?;
    Ok(vec![nn.into(), rgb.into(), stereo.into()])
}

fn color_depth_with_spatial_nn(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let rgb = b.capture("rgb", SensorSocket::RGB)?;
    let stereo = b.default_stereo()?;
    let nn = attach_spatial_inference(&rgb, &stereo)?;
    Ok(vec![nn.into(), rgb.into(), stereo.into()])
}

fn color_stereo(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let rgb = b.capture("rgb", SensorSocket::RGB)?;
    let left = b.capture("left", SensorSocket::LEFT)?;
    let right = b.capture("right", SensorSocket::RIGHT)?;
    Ok(vec![rgb.into(), left.into(), right.into()])
}

fn color_stereo_with_nn(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let rgb = b.capture("rgb", SensorSocket::RGB)?;
    let left = b.capture("left", SensorSocket::LEFT)?;
    let right = b.capture("right", SensorSocket::RIGHT)?;
    let nn = attach_inference(&rgb)?;
    Ok(vec![nn.into(), rgb.into(), left.into(), right.into()])
}

fn color_stereo_with_spatial_nn(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    b.mode_mismatch();
    color_stereo_with_nn(b)
}

fn stereo_pair(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let left = b.capture("left", SensorSocket::LEFT)?;
    let right = b.capture("right", SensorSocket::RIGHT)?;
    Ok(vec![left.into(), right.into()])
}

fn depth_only(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    Ok(vec![b.default_stereo()?.into()])
}

fn sensor_array(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    b.inventory
        .iter()
        .enumerate()
        .map(|(i, sensor)| CaptureNode::from_sensor(array_node_name(i), sensor).map(ProcessingNode::from))
        .collect()
}

fn fixed_rig(b: &mut TopologyBuilder<'_>) -> Result<Vec<ProcessingNode>> {
    let rgb = b.capture("rgb", SensorSocket::RGB)?;
    let front = b.stereo(
        "stereo_front",
        ("left_front", SensorSocket::CAM_B),
        ("right_front", SensorSocket::CAM_C),
    )?;
    let back = b.stereo(
        "stereo_back",
        ("left_back", SensorSocket::CAM_D),
        ("right_back", SensorSocket::CAM_E),
    )?;
    Ok(vec![rgb.into(), front.into(), back.into()])
}
