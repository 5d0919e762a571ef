//! Error taxonomy for pipeline construction
//!
//! Every variant here is fatal: the build is aborted and no nodes are
//! returned. Recoverable conditions are reported as
//! [`BuildWarning`](crate::pipeline::BuildWarning) instead.

use thiserror::Error;

use crate::node::ChannelType;
use crate::sensor::SensorSocket;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Unknown {kind} value '{value}'")]
    UnknownConfigurationValue { kind: &'static str, value: String },
    #[error(
        "Unknown pipeline type specified or camera doesn't support given pipeline. Configuration: {configuration}"
    )]
    UnsupportedTopology { configuration: String },
    #[error("Topology {topology} needs a sensor on socket {socket}, but none was enumerated")]
    MissingSensor {
        socket: SensorSocket,
        topology: String,
    },
    #[error("Sensor {model} on socket {socket} is not supported")]
    UnsupportedSensor { model: String, socket: SensorSocket },
    #[error("Cannot link {from} ({output}) to {to} ({input})")]
    PortTypeMismatch {
        from: String,
        to: String,
        output: ChannelType,
        input: ChannelType,
    },
    #[error("Node {node} has no port named '{port}'")]
    UnknownPort { node: String, port: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
