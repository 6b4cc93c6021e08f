use anyhow::Result;
use clap::{Parser, ValueEnum};
use handctl::app::App;
use handctl::config::load_config;
use handctl::playback::{MediaBackend, NullBackend, RodioBackend};
use handctl::{Mode, TrackerProcess};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "handctl")]
#[command(about = "Gesture-controlled media playback")]
struct Cli {
    /// Audio file to play (defaults to the first mp3 in the current directory)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Control scheme
    #[arg(long, value_enum, default_value_t = CliMode::Static)]
    mode: CliMode,

    /// Path to a config file (defaults to the per-user config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without an audio device (state tracking only)
    #[arg(long)]
    no_audio: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliMode {
    Static,
    Slider,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Static => Mode::Static,
            CliMode::Slider => Mode::Slider,
        }
    }
}

fn find_default_mp3() -> Option<PathBuf> {
    let entries = std::fs::read_dir(".").ok()?;
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().map_or(false, |ext| ext == "mp3"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    let file = match cli.file.or_else(find_default_mp3) {
        Some(file) if file.exists() => file,
        Some(file) => {
            anyhow::bail!("Audio file not found: {}", file.display());
        }
        None => {
            anyhow::bail!("No audio file given and none found in the current directory; pass one with --file");
        }
    };
    info!("Using audio file: {}", file.display());

    let backend: Box<dyn MediaBackend> = if cli.no_audio {
        Box::new(NullBackend::new())
    } else {
        Box::new(RodioBackend::new()?)
    };

    let mut app = App::new(config.clone(), cli.mode.into(), backend);
    app.load(&file)?;

    let (mut tracker, rx) = TrackerProcess::spawn(
        &config.tracker.command,
        &config.tracker.args,
        config.queue.capacity,
    )?;

    let result = app.run(rx).await;
    tracker.stop();
    result
}
