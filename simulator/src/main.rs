use anyhow::Context;
use bridge::server::PacketBridge;
use clap::Parser;
use generator::plume::PlumeModel;
use link::GroundLink;
use plumecore::clock::{Clock, SystemClock};
use plumecore::SourceLocaliser;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use vehicle::SimulatedVehicle;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod bridge;
mod generator;
mod link;
mod vehicle;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Plume-tracking UAV localisation driver")]
struct Args {
    /// Fly one simulated mission against the synthetic plume and report it
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 40)]
    steps: usize,
    /// Search pattern: expanding_spiral, crosswind, anything else holds
    #[arg(long)]
    pattern: Option<String>,
    /// Serve the packet link over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value = "tools/data/mission_report.jsonl")]
    report: PathBuf,
    #[arg(long, default_value_t = bridge::server::default_bind_address())]
    bind: SocketAddr,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.steps, args.pattern.as_deref())
    };

    if args.offline {
        let runner = Runner::new(workflow_config.clone());
        let result = runner.execute().context("running offline mission")?;

        match result.final_estimate {
            Some(estimate) => println!(
                "Offline mission -> {} steps, estimate {:.6}, {:.6} (confidence {:.2}), error {:.1} m from {:.1} m, closest {:.1} m at step {}, homing from step {:?}",
                result.steps.len(),
                estimate.position.lat,
                estimate.position.lon,
                estimate.confidence,
                result.final_error_m.unwrap_or(f64::NAN),
                result.initial_error_m,
                result.closest_approach_m,
                result.closest_approach_step,
                result.first_homing_step
            ),
            None => println!(
                "Offline mission -> {} steps, no source estimate (max {:.1} ppm)",
                result.steps.len(),
                result.statistics.max_ppm
            ),
        }

        let line = serde_json::to_string(&result.summary(runner.config()))
            .context("serialising mission summary")?;
        append_report(&args.report, &line)?;
    }

    if args.serve {
        let link = build_link(&workflow_config);
        let bridge = PacketBridge::start(link, args.bind);
        bridge.publish_status("HTTP packet link running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}

/// Wall-clock link over a freshly spawned simulated vehicle.
fn build_link(config: &WorkflowConfig) -> Arc<GroundLink> {
    let plume = PlumeModel::new(config.plume.clone());
    let (vehicle, snapshots) = SimulatedVehicle::new(plume, config.max_leg_m, SystemClock.now());
    let engine = SourceLocaliser::new(config.localiser.clone());
    Arc::new(GroundLink::new(engine, snapshots, Box::new(vehicle)))
}

fn append_report(path: &PathBuf, line: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    writeln!(file, "{}", line).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn report_lines_are_appended() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("report.jsonl");
        append_report(&path, "{\"a\":1}").unwrap();
        append_report(&path, "{\"a\":2}").unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn served_link_runs_on_wall_clock_time() {
        let link = build_link(&WorkflowConfig::default());
        let started = link.latest_snapshot().timestamp;
        assert!(started > 1_600_000_000.0);

        let reply = link.handle("WIND,0.00,270.0,3.5").unwrap();
        assert!(reply.timestamp() >= started);
    }

    #[test]
    fn args_default_to_offline_disabled() {
        let args = Args::parse_from(["simulator", "--steps", "5", "--pattern", "crosswind"]);
        assert!(!args.offline);
        assert_eq!(args.steps, 5);
        assert_eq!(args.pattern.as_deref(), Some("crosswind"));
        assert_eq!(args.bind, bridge::server::default_bind_address());
    }
}
