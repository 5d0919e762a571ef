//! Processing nodes, typed ports and links
//!
//! Nodes are plain owned values. Links are stored on the consuming node, so a
//! wired inference node always carries every input link it needs.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::sensor::{SensorInfo, SensorResolution, SensorSocket};

/// Semantic type of the data flowing through a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    RawImage,
    VideoImage,
    PreviewImage,
    DepthMap,
    Detections,
    SpatialDetections,
    ImuSamples,
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelType::RawImage => "raw image",
            ChannelType::VideoImage => "video image",
            ChannelType::PreviewImage => "preview image",
            ChannelType::DepthMap => "depth map",
            ChannelType::Detections => "detections",
            ChannelType::SpatialDetections => "spatial detections",
            ChannelType::ImuSamples => "imu samples",
        };
        f.write_str(name)
    }
}

/// Port names shared by the node kinds
pub mod ports {
    pub const RAW: &str = "raw";
    pub const VIDEO: &str = "video";
    pub const PREVIEW: &str = "preview";
    pub const DEPTH: &str = "depth";
    pub const INPUT: &str = "input";
    pub const INPUT_DEPTH: &str = "input_depth";
    pub const DETECTIONS: &str = "detections";
    pub const IMU: &str = "imu";
}

/// A named, typed input or output of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Port {
    pub name: &'static str,
    pub channel: ChannelType,
}

impl Port {
    pub const fn new(name: &'static str, channel: ChannelType) -> Self {
        Self { name, channel }
    }
}

pub(crate) fn find_port(node: &str, ports: &[Port], name: &str) -> Result<Port> {
    ports
        .iter()
        .find(|p| p.name == name)
        .copied()
        .ok_or_else(|| PipelineError::UnknownPort {
            node: node.to_string(),
            port: name.to_string(),
        })
}

/// Capability set shared by every node: a name and its typed ports
pub trait NodePorts {
    fn name(&self) -> &str;
    fn input_ports(&self) -> &'static [Port];
    fn output_ports(&self) -> &'static [Port];

    fn input_port(&self, name: &str) -> Result<Port> {
        find_port(self.name(), self.input_ports(), name)
    }

    fn output_port(&self, name: &str) -> Result<Port> {
        find_port(self.name(), self.output_ports(), name)
    }
}

/// One end of a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortAddress {
    pub node: String,
    pub port: &'static str,
}

impl fmt::Display for PortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

/// Directed edge: output `from` feeds input `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub from: PortAddress,
    pub to: PortAddress,
    pub channel: ChannelType,
}

impl Link {
    /// Link an output port to an input port; channel types must match
    pub fn between(from_node: &str, output: Port, to_node: &str, input: Port) -> Result<Self> {
        let from = PortAddress {
            node: from_node.to_string(),
            port: output.name,
        };
        let to = PortAddress {
            node: to_node.to_string(),
            port: input.name,
        };

        if output.channel != input.channel {
            return Err(PipelineError::PortTypeMismatch {
                from: from.to_string(),
                to: to.to_string(),
                output: output.channel,
                input: input.channel,
            });
        }

        debug!(from = %from, to = %to, channel = %output.channel, "Linked ports");
        Ok(Self {
            from,
            to,
            channel: output.channel,
        })
    }
}

const COLOR_CAPTURE_OUTPUTS: &[Port] = &[
    Port::new(ports::RAW, ChannelType::RawImage),
    Port::new(ports::VIDEO, ChannelType::VideoImage),
    Port::new(ports::PREVIEW, ChannelType::PreviewImage),
];
const MONO_CAPTURE_OUTPUTS: &[Port] = &[Port::new(ports::RAW, ChannelType::RawImage)];

/// Raw stream from one sensor socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureNode {
    pub name: String,
    pub socket: SensorSocket,
    pub model: String,
    pub color: bool,
    pub resolution: SensorResolution,
    /// Pixel size of `resolution` as (width, height)
    pub size: (u32, u32),
}

impl CaptureNode {
    /// Create a capture node for an enumerated sensor, using the catalog defaults
    pub fn from_sensor(name: impl Into<String>, sensor: &SensorInfo) -> Result<Self> {
        let entry = sensor.catalog_entry()?;
        let resolution = entry.default_resolution();
        let node = Self {
            name: name.into(),
            socket: sensor.socket,
            model: entry.model.to_string(),
            color: entry.color,
            resolution,
            size: resolution.size(),
        };
        debug!(
            name = %node.name,
            socket = %node.socket,
            model = %node.model,
            color = node.color,
            "Created capture node"
        );
        Ok(node)
    }
}

impl NodePorts for CaptureNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_ports(&self) -> &'static [Port] {
        &[]
    }

    fn output_ports(&self) -> &'static [Port] {
        if self.color {
            COLOR_CAPTURE_OUTPUTS
        } else {
            MONO_CAPTURE_OUTPUTS
        }
    }
}

/// Stereo depth estimator owning its left/right captures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StereoDepthNode {
    pub name: String,
    pub left: CaptureNode,
    pub right: CaptureNode,
}

impl StereoDepthNode {
    pub const OUTPUTS: &'static [Port] = &[Port::new(ports::DEPTH, ChannelType::DepthMap)];

    pub fn new(name: impl Into<String>, left: CaptureNode, right: CaptureNode) -> Self {
        let name = name.into();
        debug!(
            name = %name,
            left = %left.socket,
            right = %right.socket,
            "Created stereo depth node"
        );
        Self { name, left, right }
    }
}

impl NodePorts for StereoDepthNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_ports(&self) -> &'static [Port] {
        &[]
    }

    fn output_ports(&self) -> &'static [Port] {
        Self::OUTPUTS
    }
}

/// Neural-network inference on a color preview stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceNode {
    pub name: String,
    pub input: Link,
}

impl InferenceNode {
    pub const INPUTS: &'static [Port] = &[Port::new(ports::INPUT, ChannelType::PreviewImage)];
    pub const OUTPUTS: &'static [Port] = &[Port::new(ports::DETECTIONS, ChannelType::Detections)];
}

impl NodePorts for InferenceNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_ports(&self) -> &'static [Port] {
        Self::INPUTS
    }

    fn output_ports(&self) -> &'static [Port] {
        Self::OUTPUTS
    }
}

/// Neural-network inference on color preview plus depth
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpatialInferenceNode {
    pub name: String,
    pub input: Link,
    pub input_depth: Link,
}

impl SpatialInferenceNode {
    pub const INPUTS: &'static [Port] = &[
        Port::new(ports::INPUT, ChannelType::PreviewImage),
        Port::new(ports::INPUT_DEPTH, ChannelType::DepthMap),
    ];
    pub const OUTPUTS: &'static [Port] =
        &[Port::new(ports::DETECTIONS, ChannelType::SpatialDetections)];
}

impl NodePorts for SpatialInferenceNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_ports(&self) -> &'static [Port] {
        Self::INPUTS
    }

    fn output_ports(&self) -> &'static [Port] {
        Self::OUTPUTS
    }
}

/// Inertial measurement capture, never linked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InertialNode {
    pub name: String,
}

impl InertialNode {
    pub const OUTPUTS: &'static [Port] = &[Port::new(ports::IMU, ChannelType::ImuSamples)];

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl NodePorts for InertialNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_ports(&self) -> &'static [Port] {
        &[]
    }

    fn output_ports(&self) -> &'static [Port] {
        Self::OUTPUTS
    }
}

/// Role of a node in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    SensorCapture,
    StereoDepth,
    NeuralNetworkInference,
    SpatialNeuralNetworkInference,
    InertialCapture,
}

/// Any node produced by a pipeline build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ProcessingNode {
    SensorCapture(CaptureNode),
    StereoDepth(StereoDepthNode),
    NeuralNetworkInference(InferenceNode),
    SpatialNeuralNetworkInference(SpatialInferenceNode),
    InertialCapture(InertialNode),
}

impl ProcessingNode {
    pub fn role(&self) -> NodeRole {
        match self {
            ProcessingNode::SensorCapture(_) => NodeRole::SensorCapture,
            ProcessingNode::StereoDepth(_) => NodeRole::StereoDepth,
            ProcessingNode::NeuralNetworkInference(_) => NodeRole::NeuralNetworkInference,
            ProcessingNode::SpatialNeuralNetworkInference(_) => {
                NodeRole::SpatialNeuralNetworkInference
            }
            ProcessingNode::InertialCapture(_) => NodeRole::InertialCapture,
        }
    }

    /// Socket the node captures from; derived nodes have none
    pub fn socket(&self) -> Option<SensorSocket> {
        match self {
            ProcessingNode::SensorCapture(node) => Some(node.socket),
            _ => None,
        }
    }

    /// Links feeding this node's inputs
    pub fn links(&self) -> Vec<&Link> {
        match self {
            ProcessingNode::NeuralNetworkInference(node) => vec![&node.input],
            ProcessingNode::SpatialNeuralNetworkInference(node) => {
                vec![&node.input, &node.input_depth]
            }
            _ => Vec::new(),
        }
    }

    fn ports(&self) -> &dyn NodePorts {
        match self {
            ProcessingNode::SensorCapture(node) => node,
            ProcessingNode::StereoDepth(node) => node,
            ProcessingNode::NeuralNetworkInference(node) => node,
            ProcessingNode::SpatialNeuralNetworkInference(node) => node,
            ProcessingNode::InertialCapture(node) => node,
        }
    }
}

impl NodePorts for ProcessingNode {
    fn name(&self) -> &str {
        self.ports().name()
    }

    fn input_ports(&self) -> &'static [Port] {
        self.ports().input_ports()
    }

    fn output_ports(&self) -> &'static [Port] {
        self.ports().output_ports()
    }
}

impl From<CaptureNode> for ProcessingNode {
    fn from(node: CaptureNode) -> Self {
        ProcessingNode::SensorCapture(node)
    }
}

impl From<StereoDepthNode> for ProcessingNode {
    fn from(node: StereoDepthNode) -> Self {
        ProcessingNode::StereoDepth(node)
    }
}

impl From<InferenceNode> for ProcessingNode {
    fn from(node: InferenceNode) -> Self {
        ProcessingNode::NeuralNetworkInference(node)
    }
}

impl From<SpatialInferenceNode> for ProcessingNode {
    fn from(node: SpatialInferenceNode) -> Self {
        ProcessingNode::SpatialNeuralNetworkInference(node)
    }
}

impl From<InertialNode> for ProcessingNode {
    fn from(node: InertialNode) -> Self {
        ProcessingNode::InertialCapture(node)
    }
}
