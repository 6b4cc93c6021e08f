use anyhow::{Context, Result};
use serde::Deserialize;
use shared::Handedness;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// MediaPipe hand landmark indices.
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;
}

/// 21 normalized [x, y, z] coordinates, image-space after the horizontal
/// flip (x grows rightward, y grows downward).
pub type Landmarks = [[f32; 3]; 21];

#[derive(Deserialize, Debug, Clone)]
pub struct HandRecord {
    pub label: String,
    pub landmarks: Landmarks,
}

impl HandRecord {
    pub fn handedness(&self) -> Option<Handedness> {
        Handedness::from_label(&self.label)
    }

    /// Wrist position in pixel coordinates.
    pub fn wrist_px(&self, width: u32, height: u32) -> (i32, i32) {
        let wrist = self.landmarks[index::WRIST];
        ((wrist[0] * width as f32) as i32, (wrist[1] * height as f32) as i32)
    }
}

/// One camera frame's worth of detections, zero to two hands.
#[derive(Deserialize, Debug, Clone)]
pub struct FrameRecord {
    pub width: u32,
    pub height: u32,
    pub hands: Vec<HandRecord>,
}

/// Line-oriented JSON stream from the external landmark model, normally a
/// spawned helper process holding the camera.
pub struct LandmarkSource {
    child: Option<Child>,
    reader: BufReader<Box<dyn Read + Send>>,
}

impl LandmarkSource {
    pub fn spawn(command: &str, args: &[String]) -> Result<Self> {
        info!("Spawning landmark source: {} {:?}", command, args);
        let mut child = Command::new(command)
            .args(args)
            .stdout(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to spawn landmark source '{}'", command))?;

        let stdout = child
            .stdout
            .take()
            .context("Landmark source has no stdout")?;

        Ok(Self {
            child: Some(child),
            reader: BufReader::new(Box::new(stdout)),
        })
    }

    /// Read frames from an arbitrary stream instead of a child process.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self {
            child: None,
            reader: BufReader::new(Box::new(reader)),
        }
    }

    /// Next frame, or `None` once the stream ends. Malformed lines are a
    /// collaborator contract violation: skipped with a warning, never fatal.
    pub fn next_frame(&mut self) -> Option<FrameRecord> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    info!("Landmark stream ended");
                    return None;
                }
                Ok(_) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<FrameRecord>(line) {
                        Ok(frame) => {
                            debug!("Frame: {} hand(s)", frame.hands.len());
                            return Some(frame);
                        }
                        Err(e) => {
                            warn!("Skipping malformed landmark frame: {}", e);
                        }
                    }
                }
                Err(e) => {
                    warn!("Landmark stream read error: {}", e);
                    return None;
                }
            }
        }
    }

    /// Idempotent shutdown: kill, then wait with a timeout before giving up
    /// on the child.
    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let deadline = Instant::now() + Duration::from_secs(2);
            loop {
                match child.try_wait() {
                    Ok(Some(status)) => {
                        info!("Landmark source exited: {}", status);
                        break;
                    }
                    Ok(None) if Instant::now() < deadline => {
                        std::thread::sleep(Duration::from_millis(50));
                    }
                    Ok(None) => {
                        warn!("Landmark source did not exit after kill");
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to reap landmark source: {}", e);
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for LandmarkSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_json(hands: &str) -> String {
        format!(r#"{{"width":640,"height":480,"hands":[{}]}}"#, hands)
    }

    fn hand_json(label: &str) -> String {
        let landmark = "[0.5,0.5,0.0]";
        let landmarks = vec![landmark; 21].join(",");
        format!(r#"{{"label":"{}","landmarks":[{}]}}"#, label, landmarks)
    }

    #[test]
    fn test_next_frame_decodes_hands() {
        let input = frame_json(&hand_json("Right"));
        let mut source = LandmarkSource::from_reader(std::io::Cursor::new(input));
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.width, 640);
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].handedness(), Some(Handedness::Right));
        assert_eq!(frame.hands[0].wrist_px(640, 480), (320, 240));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let input = format!("not json\n{}\n", frame_json(""));
        let mut source = LandmarkSource::from_reader(std::io::Cursor::new(input));
        let frame = source.next_frame().unwrap();
        assert!(frame.hands.is_empty());
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_eof_yields_none() {
        let mut source = LandmarkSource::from_reader(std::io::Cursor::new(""));
        assert!(source.next_frame().is_none());
    }
}
