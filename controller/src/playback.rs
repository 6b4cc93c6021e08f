use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MIN_VOLUME: i32 = 0;
pub const MAX_VOLUME: i32 = 100;
pub const MIN_RATE: f32 = 0.25;
pub const MAX_RATE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
    Ended,
    Error,
}

/// The playback engine seam. Volume is 0..100, rate 0.25..3.0; both are
/// clamped by implementations. `play` reports failure so callers can leave
/// their state flags untouched instead of assuming success.
pub trait MediaBackend {
    fn load(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: i32);
    fn get_volume(&self) -> i32;
    fn set_rate(&mut self, rate: f32);
    fn get_rate(&self) -> f32;
    fn state(&self) -> PlaybackState;
}

/// rodio-backed implementation. A `Sink` maps directly onto the contract:
/// `set_volume` takes a 0.0..1.0 gain, `set_speed` the playback rate.
pub struct RodioBackend {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    volume: i32,
    rate: f32,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("Failed to open audio output device")?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            path: None,
            volume: 60,
            rate: 1.0,
        })
    }

    fn build_sink(&self) -> Result<Sink> {
        let path = self.path.as_ref().context("No media file loaded")?;
        let file = File::open(path)
            .with_context(|| format!("Failed to open media file {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Failed to decode media file {}", path.display()))?;

        let sink = Sink::try_new(&self.handle).context("Failed to create playback sink")?;
        sink.append(source);
        sink.pause();
        sink.set_volume(self.volume as f32 / MAX_VOLUME as f32);
        sink.set_speed(self.rate);
        Ok(sink)
    }
}

impl MediaBackend for RodioBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.path = Some(path.to_path_buf());
        self.sink = Some(self.build_sink()?);
        info!("Loaded media file {}", path.display());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        // A drained sink means the track ended; rebuild to start over.
        if self.sink.as_ref().map_or(true, |s| s.empty()) {
            self.sink = Some(self.build_sink()?);
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, volume: i32) {
        self.volume = volume.clamp(MIN_VOLUME, MAX_VOLUME);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume as f32 / MAX_VOLUME as f32);
        }
    }

    fn get_volume(&self) -> i32 {
        self.volume
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = rate.clamp(MIN_RATE, MAX_RATE);
        if let Some(sink) = &self.sink {
            sink.set_speed(self.rate);
        }
    }

    fn get_rate(&self) -> f32 {
        self.rate
    }

    fn state(&self) -> PlaybackState {
        match &self.sink {
            None => PlaybackState::Stopped,
            Some(sink) if sink.empty() => PlaybackState::Ended,
            Some(sink) if sink.is_paused() => PlaybackState::Paused,
            Some(_) => PlaybackState::Playing,
        }
    }
}

/// Backend with no audio device behind it. Used by `--no-audio` runs and by
/// tests; records every command it receives so behavior can be asserted.
#[derive(Debug, Default)]
pub struct NullBackend {
    pub volume: i32,
    pub rate: f32,
    pub playing: bool,
    pub paused: bool,
    pub loaded: Option<PathBuf>,
    pub commands: Vec<String>,
    /// When set, `play` fails, simulating a backend error.
    pub fail_play: bool,
}

impl NullBackend {
    pub fn new() -> Self {
        Self {
            volume: 60,
            rate: 1.0,
            ..Self::default()
        }
    }
}

impl MediaBackend for NullBackend {
    fn load(&mut self, path: &Path) -> Result<()> {
        self.loaded = Some(path.to_path_buf());
        self.commands.push(format!("load:{}", path.display()));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.fail_play {
            anyhow::bail!("play failed");
        }
        self.playing = true;
        self.paused = false;
        self.commands.push("play".to_string());
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        self.commands.push("pause".to_string());
    }

    fn stop(&mut self) {
        self.playing = false;
        self.paused = false;
        self.commands.push("stop".to_string());
    }

    fn set_volume(&mut self, volume: i32) {
        self.volume = volume.clamp(MIN_VOLUME, MAX_VOLUME);
        self.commands.push(format!("volume:{}", self.volume));
    }

    fn get_volume(&self) -> i32 {
        self.volume
    }

    fn set_rate(&mut self, rate: f32) {
        self.rate = rate.clamp(MIN_RATE, MAX_RATE);
        self.commands.push(format!("rate:{:.3}", self.rate));
    }

    fn get_rate(&self) -> f32 {
        self.rate
    }

    fn state(&self) -> PlaybackState {
        if self.paused {
            PlaybackState::Paused
        } else if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_backend_clamps_volume_and_rate() {
        let mut backend = NullBackend::new();
        backend.set_volume(150);
        assert_eq!(backend.get_volume(), 100);
        backend.set_volume(-3);
        assert_eq!(backend.get_volume(), 0);
        backend.set_rate(9.0);
        assert_eq!(backend.get_rate(), 3.0);
        backend.set_rate(0.0);
        assert_eq!(backend.get_rate(), 0.25);
    }

    #[test]
    fn test_null_backend_state_transitions() {
        let mut backend = NullBackend::new();
        assert_eq!(backend.state(), PlaybackState::Stopped);
        backend.play().unwrap();
        assert_eq!(backend.state(), PlaybackState::Playing);
        backend.pause();
        assert_eq!(backend.state(), PlaybackState::Paused);
        backend.play().unwrap();
        assert_eq!(backend.state(), PlaybackState::Playing);
        backend.stop();
        assert_eq!(backend.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_null_backend_play_failure() {
        let mut backend = NullBackend::new();
        backend.fail_play = true;
        assert!(backend.play().is_err());
        assert!(!backend.playing);
    }
}
