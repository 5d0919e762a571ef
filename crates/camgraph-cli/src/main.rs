//! camgraph - Main entry point
//!
//! Loads a device description, builds its camera pipeline and prints the
//! resulting node graph.

mod config;

use anyhow::Result;
use camgraph_core::{create_pipeline, BuildWarning, NodePorts, Pipeline, ProcessingNode};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "camgraph")]
#[command(about = "Build and inspect on-device camera pipeline topologies")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "camgraph.toml")]
    config: PathBuf,

    /// Override the topology (RGB, RGBD, RGBSTEREO, STEREO, DEPTH, CAMARRAY, RAE)
    #[arg(short, long)]
    topology: Option<String>,

    /// Override the neural-network mode (NONE, RGB, SPATIAL)
    #[arg(short, long)]
    nn_type: Option<String>,

    /// Override whether the inertial-measurement node is appended
    #[arg(long)]
    imu: Option<bool>,

    /// Print the pipeline as JSON
    #[arg(long)]
    json: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("camgraph v{}", env!("CARGO_PKG_VERSION"));

    if args.init {
        config::save_default_config(&args.config)?;
        info!(path = %args.config.display(), "Wrote default configuration");
        return Ok(());
    }

    let mut config = config::load_config(&args.config)?;

    if let Some(topology) = args.topology {
        config.pipeline.topology = topology;
    }
    if let Some(nn_type) = args.nn_type {
        config.pipeline.nn_type = nn_type;
    }
    if let Some(imu) = args.imu {
        config.pipeline.enable_imu = imu;
    }

    let pipeline = create_pipeline(&config.inventory(), &config.to_request())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pipeline)?);
    } else {
        print_pipeline(&pipeline);
    }

    Ok(())
}

fn print_pipeline(pipeline: &Pipeline) {
    println!(
        "Pipeline {} (nn: {}), {} nodes:",
        pipeline.topology,
        pipeline.nn_mode,
        pipeline.len()
    );

    for node in &pipeline.nodes {
        println!("  - {} [{:?}]", node.name(), node.role());
        match node {
            ProcessingNode::SensorCapture(capture) => {
                println!(
                    "    {} {} {} {}x{}",
                    capture.socket,
                    capture.model,
                    capture.resolution,
                    capture.size.0,
                    capture.size.1
                );
            }
            ProcessingNode::StereoDepth(stereo) => {
                for side in [&stereo.left, &stereo.right] {
                    println!("    {}: {} {}", side.name, side.socket, side.model);
                }
            }
            _ => {}
        }
        for link in node.links() {
            println!("    {} <- {} ({})", link.to.port, link.from, link.channel);
        }
        let outputs: Vec<_> = node.output_ports().iter().map(|p| p.name).collect();
        if !outputs.is_empty() {
            println!("    outputs: {}", outputs.join(", "));
        }
    }

    if !pipeline.warnings.is_empty() {
        println!("Warnings:");
        for warning in &pipeline.warnings {
            match warning {
                BuildWarning::TopologyCorrected {
                    requested,
                    effective,
                    sensor_count,
                } => println!(
                    "  - {} is not available with {} sensors, using {}",
                    requested, sensor_count, effective
                ),
                BuildWarning::NeuralNetworkModeMismatch { topology, mode } => println!(
                    "  - {} inference needs depth, {} has none; using plain inference",
                    mode, topology
                ),
            }
        }
    }
}
