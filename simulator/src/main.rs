use anyhow::Context;
use bridge::model::AnalysisModel;
use bridge::server::Bridge;
use clap::Parser;
use generator::profile::build_payload_from_config;
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Signal dynamics workflow driver")]
struct Args {
    /// Analyze the generated signal as a single batch and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Replay the generated signal through a rolling window
    #[arg(long, default_value_t = false)]
    stream: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Tone frequency in Hz, once per channel
    #[arg(long = "frequency", default_values_t = [440.0])]
    frequencies: Vec<f64>,
    /// Tone amplitude, paired with --frequency by position
    #[arg(long = "amplitude")]
    amplitudes: Vec<f64>,
    #[arg(long, default_value_t = 1.0)]
    duration: f64,
    #[arg(long, default_value_t = 1000)]
    sample_rate: u32,
    #[arg(long, default_value_t = 1000)]
    capacity: usize,
    #[arg(long, default_value_t = 100)]
    report_every: usize,
    /// Where offline and streaming summaries are appended
    #[arg(long, default_value = "tools/data/dynamics_report.log")]
    report: PathBuf,
    /// Keep the HTTP bridge alive for incoming samples
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn append_report(path: &Path, line: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    writeln!(file, "{}", line)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        let config = WorkflowConfig::from_args(
            &args.frequencies,
            &args.amplitudes,
            args.duration,
            args.sample_rate,
            args.capacity,
            args.report_every,
        );
        config.validate().context("validating command-line workflow")?;
        config
    };

    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let bridge = Bridge::new(runner.clone())?;
    let payload = build_payload_from_config(&workflow_config.generator)?;

    if args.offline {
        let result = runner.execute_payload(&payload)?;

        println!(
            "Offline run -> {} channels over {} samples",
            payload.channel_count(),
            result.sample_count
        );
        for (index, channel) in result.channels.iter().enumerate() {
            println!(
                "  channel {}: RMS {:.4}, ZCR {:.2} Hz",
                index, channel.rms, channel.zcr
            );
        }

        bridge.publish(&AnalysisModel::from_result(&result, runner.metrics()))?;
        bridge.publish_status("Offline workflow results ready.");

        let report = json!({
            "mode": "offline",
            "description": payload.description,
            "result": result,
            "metrics": runner.metrics(),
        });
        append_report(&args.report, &report.to_string())?;
    }

    if args.stream {
        let reports = runner.stream(&payload)?;
        for report in &reports {
            let summary = report
                .channels
                .iter()
                .map(|c| format!("RMS {:.4} ZCR {:.2}", c.rms, c.zcr))
                .collect::<Vec<_>>()
                .join(" | ");
            println!(
                "t={:.3}s length {} -> {}",
                report.time, report.window_len, summary
            );
        }

        let report = json!({
            "mode": "stream",
            "reports": reports,
            "metrics": runner.metrics(),
        });
        append_report(&args.report, &report.to_string())?;
    }

    if args.serve {
        let _server = bridge.serve(workflow_config.bridge_port);
        bridge.publish_status(&format!(
            "HTTP bridge running on port {} (Ctrl+C to stop)...",
            workflow_config.bridge_port
        ));
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
