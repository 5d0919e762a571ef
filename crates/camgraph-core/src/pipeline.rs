//! Top-level pipeline build: resolve, validate, construct, attach auxiliaries

use serde::Serialize;
use tracing::info;

use crate::builder::TopologyBuilder;
use crate::error::Result;
use crate::node::{InertialNode, Link, NodePorts, ProcessingNode};
use crate::sensor::SensorInventory;
use crate::topology::{validate, NeuralNetworkMode, Topology, NN_MODE_NAMES, TOPOLOGY_NAMES};

/// Name of the inertial-measurement node
pub const IMU_NODE_NAME: &str = "imu";

/// What the caller asked for, as raw configuration values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineRequest {
    /// Topology key, case-insensitive (e.g. "rgbd")
    pub topology: String,
    /// Neural-network mode key, case-insensitive (e.g. "spatial")
    pub nn_type: String,
    pub enable_imu: bool,
}

impl PipelineRequest {
    pub fn new(topology: impl Into<String>, nn_type: impl Into<String>, enable_imu: bool) -> Self {
        Self {
            topology: topology.into(),
            nn_type: nn_type.into(),
            enable_imu,
        }
    }
}

/// Recoverable condition noticed while building
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildWarning {
    /// Requested topology was infeasible for the sensor count and was replaced
    TopologyCorrected {
        requested: Topology,
        effective: Topology,
        sensor_count: usize,
    },
    /// Spatial inference requested without a depth source; plain inference used
    NeuralNetworkModeMismatch {
        topology: Topology,
        mode: NeuralNetworkMode,
    },
}

/// Result of a successful build; owns every node
#[derive(Debug, Clone, Serialize)]
pub struct Pipeline {
    pub topology: Topology,
    pub nn_mode: NeuralNetworkMode,
    pub nodes: Vec<ProcessingNode>,
    pub warnings: Vec<BuildWarning>,
}

impl Pipeline {
    /// Every link in the pipeline, in node order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.nodes.iter().flat_map(|n| n.links())
    }

    pub fn node(&self, name: &str) -> Option<&ProcessingNode> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Hand the nodes over for registration
    pub fn into_nodes(self) -> Vec<ProcessingNode> {
        self.nodes
    }
}

/// Append the inertial-measurement node; it is never linked
pub fn attach_inertial(nodes: &mut Vec<ProcessingNode>) {
    nodes.push(InertialNode::new(IMU_NODE_NAME).into());
}

/// Build the full node collection for `request` on a device with `inventory`
///
/// Either every node is returned or the call fails and nothing is.
pub fn create_pipeline(inventory: &SensorInventory, request: &PipelineRequest) -> Result<Pipeline> {
    info!(pipeline_type = %request.topology, "Pipeline type");

    let requested = TOPOLOGY_NAMES.resolve(&request.topology)?;
    let validation = validate(requested, inventory.sensor_count());
    let nn_mode = NN_MODE_NAMES.resolve(&request.nn_type)?;

    let mut warnings = Vec::new();
    if validation.corrected {
        warnings.push(BuildWarning::TopologyCorrected {
            requested,
            effective: validation.effective,
            sensor_count: inventory.sensor_count(),
        });
    }

    let mut builder = TopologyBuilder::new(inventory, request.topology.as_str());
    let mut nodes = builder.build(validation.effective, nn_mode)?;
    warnings.extend(builder.into_warnings());

    if request.enable_imu {
        attach_inertial(&mut nodes);
    }

    info!(
        topology = %validation.effective,
        nn_type = %nn_mode,
        nodes = nodes.len(),
        "Finished setting up pipeline"
    );

    Ok(Pipeline {
        topology: validation.effective,
        nn_mode,
        nodes,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::node::NodeRole;
    use crate::sensor::{SensorInfo, SensorSocket};

    fn inventory(models: &[&str]) -> SensorInventory {
        models
            .iter()
            .enumerate()
            .map(|(i, m)| SensorInfo::new(SensorSocket(i as u16), *m))
            .collect()
    }

    fn oak_d() -> SensorInventory {
        inventory(&["IMX378", "OV9282", "OV9282"])
    }

    #[test]
    fn test_rgbd_spatial_pipeline() {
        let pipeline = create_pipeline(&oak_d(), &PipelineRequest::new("rgbd", "spatial", false)).unwrap();

        assert_eq!(pipeline.topology, Topology::ColorPlusDepth);
        assert_eq!(pipeline.nn_mode, NeuralNetworkMode::SpatialColorInput);
        assert_eq!(pipeline.len(), 3);
        assert!(pipeline.warnings.is_empty());

        let nn = pipeline.node("nn").unwrap();
        assert_eq!(nn.role(), NodeRole::SpatialNeuralNetworkInference);
        assert_eq!(pipeline.links().count(), 2);
    }

    #[test]
    fn test_unknown_topology_fails() {
        let err = create_pipeline(&oak_d(), &PipelineRequest::new("bogus", "none", true)).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnknownConfigurationValue {
                kind: "pipeline type",
                value: "bogus".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_nn_type_fails() {
        let err = create_pipeline(&oak_d(), &PipelineRequest::new("rgb", "yolo", false)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnknownConfigurationValue { kind: "nn type", .. }
        ));
    }

    #[test]
    fn test_single_sensor_corrected_to_color() {
        let pipeline =
            create_pipeline(&inventory(&["IMX214"]), &PipelineRequest::new("RGBD", "", false)).unwrap();

        assert_eq!(pipeline.topology, Topology::ColorOnly);
        assert_eq!(pipeline.len(), 1);
        assert_eq!(
            pipeline.warnings,
            vec![BuildWarning::TopologyCorrected {
                requested: Topology::ColorPlusDepth,
                effective: Topology::ColorOnly,
                sensor_count: 1,
            }]
        );
    }

    #[test]
    fn test_many_sensors_corrected_to_array() {
        let pipeline = create_pipeline(
            &inventory(&["IMX378", "OV9282", "OV9282", "OV9782", "OV9782", "OV9782"]),
            &PipelineRequest::new("rgb", "rgb", false),
        )
        .unwrap();

        assert_eq!(pipeline.topology, Topology::SensorArray);
        let names: Vec<_> = pipeline.nodes.iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(pipeline.links().count(), 0);
    }

    #[test]
    fn test_imu_always_last_and_unlinked() {
        for topology in ["rgb", "rgbd", "rgbstereo", "stereo", "depth", "camarray"] {
            let pipeline = create_pipeline(&oak_d(), &PipelineRequest::new(topology, "rgb", true)).unwrap();
            let last = pipeline.nodes.last().unwrap();
            assert_eq!(last.name(), IMU_NODE_NAME);
            assert_eq!(last.role(), NodeRole::InertialCapture);
            assert!(last.links().is_empty());
            assert_eq!(
                pipeline
                    .nodes
                    .iter()
                    .filter(|n| n.role() == NodeRole::InertialCapture)
                    .count(),
                1
            );
        }
    }

    #[test]
    fn test_serializes_to_json() {
        let pipeline = create_pipeline(&oak_d(), &PipelineRequest::new("rgbd", "rgb", true)).unwrap();
        let value = serde_json::to_value(&pipeline).unwrap();

        assert_eq!(value["topology"], "color_plus_depth");
        assert_eq!(value["nodes"][0]["role"], "neural_network_inference");
        assert_eq!(value["nodes"][0]["input"]["from"]["node"], "rgb");
        assert_eq!(value["nodes"][1]["socket"], "CAM_A");
        assert_eq!(value["nodes"][3]["role"], "inertial_capture");
    }
}
