use crate::config::Config;
use crate::control::{self, ControlState};
use crate::dispatch::{Dispatcher, Mode};
use crate::playback::MediaBackend;
use anyhow::Result;
use shared::protocol;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

/// The consumer-side control loop. One task owns the control state, the
/// dispatcher and the backend; the queue drain and the smoothing tick run
/// from the same periodic timer, so ordering discipline replaces locking.
pub struct App {
    pub state: ControlState,
    dispatcher: Dispatcher,
    backend: Box<dyn MediaBackend>,
    config: Config,
    stream_ended_reported: bool,
}

impl App {
    pub fn new(config: Config, mode: Mode, backend: Box<dyn MediaBackend>) -> Self {
        let dispatcher = Dispatcher::new(mode, config.slider.clone(), config.actions.clone());
        Self {
            state: ControlState::default(),
            dispatcher,
            backend,
            config,
            stream_ended_reported: false,
        }
    }

    pub async fn run(&mut self, mut rx: mpsc::Receiver<String>) -> Result<()> {
        let mut ticker =
            tokio::time::interval(Duration::from_millis(self.config.smoothing.tick_ms));
        loop {
            tokio::select! {
                _ = ticker.tick() => self.drain_and_tick(&mut rx),
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, shutting down");
                    break;
                }
            }
        }
        self.shutdown();
        Ok(())
    }

    /// One tick's work: consume a bounded batch of producer lines, then run
    /// the smoothing/fade step. The cap keeps a backlog from starving the
    /// tick; leftover lines wait for the next period.
    pub fn drain_and_tick(&mut self, rx: &mut mpsc::Receiver<String>) {
        let mut drained = 0;
        while drained < self.config.queue.max_lines_per_tick {
            match rx.try_recv() {
                Ok(line) => {
                    drained += 1;
                    match protocol::parse_line(&line) {
                        Ok(parsed) => {
                            self.dispatcher
                                .handle_line(&parsed, &mut self.state, self.backend.as_mut())
                        }
                        // Expected under partial reads; not fatal.
                        Err(e) => debug!("Skipping unparseable line: {}", e),
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.stream_ended_reported {
                        warn!("Tracker stream ended; camera unavailable");
                        self.stream_ended_reported = true;
                    }
                    break;
                }
            }
        }

        control::tick(&mut self.state, self.backend.as_mut(), &self.config.smoothing);
    }

    /// Final teardown: an in-flight fade is cancelled (restoring volume)
    /// before the backend stops.
    pub fn shutdown(&mut self) {
        control::cancel_fade(&mut self.state, self.backend.as_mut());
        self.backend.stop();
        info!("Playback stopped");
    }

    pub fn backend(&self) -> &dyn MediaBackend {
        self.backend.as_ref()
    }

    pub fn load(&mut self, path: &std::path::Path) -> Result<()> {
        self.backend.load(path)
    }
}
