use anyhow::Result;
use clap::Parser;
use handtrackd::config::load_config;
use handtrackd::{LandmarkSource, TrackerPipeline};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "handtrackd")]
#[command(about = "Hand gesture tracker: emits debounced gesture status lines on stdout")]
struct Cli {
    /// Path to a config file (defaults to the per-user config location)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Status lines go to stdout; all diagnostics stay on stderr so the
    // consumer's line parser never sees them.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    info!("handtrackd starting...");

    let mut source = LandmarkSource::spawn(&config.source.command, &config.source.args)?;
    let mut pipeline = TrackerPipeline::new(&config)?;

    let stdout = std::io::stdout();
    while let Some(frame) = source.next_frame() {
        if let Some(line) = pipeline.process_frame(&frame, Instant::now()) {
            let mut out = stdout.lock();
            writeln!(out, "{}", line)?;
            out.flush()?;
        }
    }

    info!("handtrackd exiting");
    source.stop();
    Ok(())
}
