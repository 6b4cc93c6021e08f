use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The spawned gesture tracker plus the background thread that pumps its
/// stdout into a bounded queue. The pipe read is blocking and lives on a
/// plain thread so the control loop never waits on I/O; the loop drains the
/// queue in small batches on its own tick.
pub struct TrackerProcess {
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
}

impl TrackerProcess {
    pub fn spawn(
        command: &str,
        args: &[String],
        queue_capacity: usize,
    ) -> Result<(Self, mpsc::Receiver<String>)> {
        info!("Spawning tracker: {} {:?}", command, args);
        let mut child = Command::new(command)
            .args(args)
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn tracker '{}'", command))?;

        let stdout = child.stdout.take().context("Tracker has no stdout")?;
        let (tx, rx) = mpsc::channel(queue_capacity);

        let reader = std::thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        let line = line.trim().to_string();
                        if line.is_empty() {
                            continue;
                        }
                        debug!("Tracker line: {}", line);
                        if tx.blocking_send(line).is_err() {
                            // Receiver gone; the controller is shutting down.
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Tracker pipe read error: {}", e);
                        break;
                    }
                }
            }
            info!("Tracker reader thread exiting");
        });

        Ok((
            Self {
                child: Some(child),
                reader: Some(reader),
            },
            rx,
        ))
    }

    /// Idempotent shutdown: kill the child, reap it with a timeout, then
    /// join the reader thread (which sees EOF once the child dies).
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let deadline = Instant::now() + Duration::from_secs(2);
            loop {
                match child.try_wait() {
                    Ok(Some(status)) => {
                        info!("Tracker exited: {}", status);
                        break;
                    }
                    Ok(None) if Instant::now() < deadline => {
                        std::thread::sleep(Duration::from_millis(50));
                    }
                    Ok(None) => {
                        warn!("Tracker did not exit after kill");
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to reap tracker: {}", e);
                        break;
                    }
                }
            }
        }
        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                warn!("Tracker reader thread panicked");
            }
        }
    }
}

impl Drop for TrackerProcess {
    fn drop(&mut self) {
        self.stop();
    }
}
