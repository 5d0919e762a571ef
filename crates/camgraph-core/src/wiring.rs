//! Creation of inference nodes and their input links

use tracing::debug;

use crate::error::Result;
use crate::node::{
    find_port, ports, InferenceNode, Link, NodePorts, SpatialInferenceNode, StereoDepthNode,
};

/// Name given to inference nodes, plain or spatial
pub const NN_NODE_NAME: &str = "nn";

/// Create an inference node reading the color node's preview output
pub fn attach_inference(color: &impl NodePorts) -> Result<InferenceNode> {
    let preview = color.output_port(ports::PREVIEW)?;
    let input = find_port(NN_NODE_NAME, InferenceNode::INPUTS, ports::INPUT)?;
    let input = Link::between(color.name(), preview, NN_NODE_NAME, input)?;

    debug!(source = color.name(), "Attached inference node");
    Ok(InferenceNode {
        name: NN_NODE_NAME.to_string(),
        input,
    })
}

/// Create a spatial inference node reading color preview and stereo depth
///
/// Both links are made before the node exists, so a failure on either leaves
/// nothing half-wired.
pub fn attach_spatial_inference(
    color: &impl NodePorts,
    stereo: &StereoDepthNode,
) -> Result<SpatialInferenceNode> {
    let preview = color.output_port(ports::PREVIEW)?;
    let depth = stereo.output_port(ports::DEPTH)?;

    let input = Link::between(
        color.name(),
        preview,
        NN_NODE_NAME,
        find_port(NN_NODE_NAME, SpatialInferenceNode::INPUTS, ports::INPUT)?,
    )?;
    let input_depth = Link::between(
        stereo.name(),
        depth,
        NN_NODE_NAME,
        find_port(NN_NODE_NAME, SpatialInferenceNode::INPUTS, ports::INPUT_DEPTH)?,
    )?;

    debug!(
        color = color.name(),
        stereo = stereo.name(),
        "Attached spatial inference node"
    );
    Ok(SpatialInferenceNode {
        name: NN_NODE_NAME.to_string(),
        input,
        input_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::node::{CaptureNode, ChannelType};
    use crate::sensor::{SensorInfo, SensorSocket};

    fn capture(name: &str, socket: SensorSocket, model: &str) -> CaptureNode {
        CaptureNode::from_sensor(name, &SensorInfo::new(socket, model)).unwrap()
    }

    fn stereo() -> StereoDepthNode {
        StereoDepthNode::new(
            "stereo",
            capture("left", SensorSocket::LEFT, "OV9282"),
            capture("right", SensorSocket::RIGHT, "OV9282"),
        )
    }

    #[test]
    fn test_attach_inference_links_preview() {
        let rgb = capture("rgb", SensorSocket::RGB, "IMX378");
        let nn = attach_inference(&rgb).unwrap();

        assert_eq!(nn.name, "nn");
        assert_eq!(nn.input.from.node, "rgb");
        assert_eq!(nn.input.from.port, ports::PREVIEW);
        assert_eq!(nn.input.to.port, ports::INPUT);
    }

    #[test]
    fn test_attach_inference_to_mono_sensor_fails() {
        let left = capture("left", SensorSocket::LEFT, "OV9282");
        let err = attach_inference(&left).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownPort { .. }));
    }

    #[test]
    fn test_attach_spatial_inference_links_both_inputs() {
        let rgb = capture("rgb", SensorSocket::RGB, "IMX378");
        let nn = attach_spatial_inference(&rgb, &stereo()).unwrap();

        assert_eq!(nn.input.from.to_string(), "rgb.preview");
        assert_eq!(nn.input.channel, ChannelType::PreviewImage);
        assert_eq!(nn.input_depth.from.to_string(), "stereo.depth");
        assert_eq!(nn.input_depth.to.to_string(), "nn.input_depth");
        assert_eq!(nn.input_depth.channel, ChannelType::DepthMap);
    }
}
