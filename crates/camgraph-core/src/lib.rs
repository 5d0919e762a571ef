//! camgraph Core - On-device camera pipeline topology construction
//!
//! This crate maps a requested camera configuration and an enumerated sensor
//! inventory to a graph of processing nodes:
//! - Case-insensitive resolution of configuration strings
//! - Hardware feasibility checks with fallback topologies
//! - Per-topology node construction and typed port linking
//! - Catalog of supported image sensors and resolutions

pub mod builder;
pub mod error;
pub mod names;
pub mod node;
pub mod pipeline;
pub mod sensor;
pub mod topology;
pub mod wiring;

pub use builder::{array_node_name, TopologyBuilder};
pub use error::{PipelineError, Result};
pub use node::{ChannelType, Link, NodePorts, NodeRole, Port, ProcessingNode};
pub use pipeline::{create_pipeline, BuildWarning, Pipeline, PipelineRequest};
pub use sensor::{SensorInfo, SensorInventory, SensorResolution, SensorSocket};
pub use topology::{validate, NeuralNetworkMode, Topology, Validation};
