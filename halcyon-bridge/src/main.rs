use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use halcyon_bridge::script::demo_script;
use halcyon_bridge::session::{SessionOptions, SessionReport, run_session};
use halcyon_core::EngineConfig;
use tracing_subscriber::EnvFilter;

/// About one 60 Hz refresh.
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    eprintln!("=== Halcyon Bridge Starting ===");

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let options = SessionOptions {
        frame_interval: FRAME_INTERVAL,
    };

    let first = run_session(&config, None, demo_script(config.sensor_channel_id), options)
        .context("First session failed")?;
    print_report("first", &first);

    // The platform relaunches the app with what it saved last time.
    let second = run_session(
        &config,
        first.saved_state.clone(),
        demo_script(config.sensor_channel_id),
        options,
    )
    .context("Restored session failed")?;
    print_report("restored", &second);

    Ok(())
}

fn print_report(label: &str, report: &SessionReport) {
    println!(
        "[{label}] iterations={} events={} frames={} input consumed={} unhandled={}",
        report.summary.iterations,
        report.summary.events,
        report.summary.frames,
        report.input_consumed,
        report.input_unhandled,
    );
    println!(
        "[{label}] state: angle={:.3} x={} y={} saved={} bytes last_clear={:?}",
        report.final_state.angle,
        report.final_state.x,
        report.final_state.y,
        report.saved_state.as_ref().map_or(0, Vec::len),
        report.last_clear,
    );
}
