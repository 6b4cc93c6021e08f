use crate::aggregate::Aggregator;
use crate::classify::{classify, classify_pointing, Vocabulary};
use crate::config::Config;
use crate::debounce::{ActivityGate, DebounceEngine};
use crate::fingers::finger_states;
use crate::landmarks::FrameRecord;
use anyhow::Result;
use shared::protocol::{HandReport, StatusUpdate};
use shared::{Gesture, Handedness};
use std::time::{Duration, Instant};
use tracing::debug;

/// The whole producer pipeline for one frame: extraction, classification,
/// debounce, aggregation. Pure with respect to time (the caller passes
/// `now`), so it tests without a camera or a clock.
pub struct TrackerPipeline {
    vocabulary: Vocabulary,
    buffer_scale: f32,
    debounce: DebounceEngine,
    gate: ActivityGate,
    aggregator: Aggregator,
}

impl TrackerPipeline {
    pub fn new(config: &Config) -> Result<Self> {
        let vocabulary = Vocabulary::from_name(&config.classify.vocabulary).ok_or_else(|| {
            anyhow::anyhow!("Unknown classify vocabulary: {}", config.classify.vocabulary)
        })?;

        Ok(Self {
            vocabulary,
            buffer_scale: config.classify.pointing_buffer_scale,
            debounce: DebounceEngine::new(Duration::from_millis(config.debounce.cooldown_ms)),
            gate: ActivityGate::new(config.gating.clone()),
            aggregator: Aggregator::new(),
        })
    }

    /// Process one frame; returns the status line to emit, if any.
    pub fn process_frame(&mut self, frame: &FrameRecord, now: Instant) -> Option<String> {
        let mut update = StatusUpdate::default();

        for hand in [Handedness::Left, Handedness::Right] {
            let record = frame
                .hands
                .iter()
                .find(|r| r.handedness() == Some(hand));

            let observed = record.and_then(|record| {
                let pos = record.wrist_px(frame.width, frame.height);
                if !self.gate.check(hand, pos, frame.width, frame.height) {
                    debug!("{} hand inactive (gated)", hand.as_str());
                    return None;
                }
                let fingers = finger_states(&record.landmarks, hand);
                let raw = match self.vocabulary {
                    Vocabulary::Basic => classify(&fingers),
                    Vocabulary::Pointing => {
                        classify_pointing(&fingers, &record.landmarks, self.buffer_scale)
                    }
                };
                Some((raw, pos))
            });

            if record.is_none() {
                self.gate.clear(hand);
            }

            let displayed = self.debounce.observe(hand, observed.map(|(g, _)| g), now);
            if displayed != Gesture::NoHand {
                if let Some((_, (x, y))) = observed {
                    let report = HandReport::new(displayed, x, y);
                    match hand {
                        Handedness::Left => update.left = Some(report),
                        Handedness::Right => update.right = Some(report),
                    }
                }
            }
        }

        self.aggregator.push(&update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{index, HandRecord, Landmarks};

    fn open_hand_landmarks() -> Landmarks {
        let mut lm = [[0.5, 0.5, 0.0]; 21];
        // Right-hand thumb abducted, four fingertips above their PIPs.
        lm[index::THUMB_TIP][0] = 0.40;
        lm[index::THUMB_IP][0] = 0.50;
        for (tip, pip) in [
            (index::INDEX_TIP, index::INDEX_PIP),
            (index::MIDDLE_TIP, index::MIDDLE_PIP),
            (index::RING_TIP, index::RING_PIP),
            (index::PINKY_TIP, index::PINKY_PIP),
        ] {
            lm[tip][1] = 0.30;
            lm[pip][1] = 0.45;
        }
        lm
    }

    fn frame_with_right_hand() -> FrameRecord {
        FrameRecord {
            width: 640,
            height: 480,
            hands: vec![HandRecord {
                label: "Right".to_string(),
                landmarks: open_hand_landmarks(),
            }],
        }
    }

    fn empty_frame() -> FrameRecord {
        FrameRecord {
            width: 640,
            height: 480,
            hands: Vec::new(),
        }
    }

    #[test]
    fn test_frame_produces_status_line() {
        let mut pipeline = TrackerPipeline::new(&Config::default()).unwrap();
        let line = pipeline
            .process_frame(&frame_with_right_hand(), Instant::now())
            .unwrap();
        assert_eq!(line, "L_Gesture:No Hand|R_Gesture:Open Hand|R_X:320|R_Y:240");
    }

    #[test]
    fn test_unchanged_frames_are_suppressed() {
        let mut pipeline = TrackerPipeline::new(&Config::default()).unwrap();
        let frame = frame_with_right_hand();
        let start = Instant::now();
        assert!(pipeline.process_frame(&frame, start).is_some());
        for i in 1..10 {
            let now = start + Duration::from_millis(33 * i);
            assert!(pipeline.process_frame(&frame, now).is_none());
        }
    }

    #[test]
    fn test_sentinel_once_on_hand_loss() {
        let mut pipeline = TrackerPipeline::new(&Config::default()).unwrap();
        let start = Instant::now();
        pipeline.process_frame(&frame_with_right_hand(), start);

        let line = pipeline
            .process_frame(&empty_frame(), start + Duration::from_millis(33))
            .unwrap();
        assert_eq!(line, shared::NO_HANDS_LINE);
        assert!(pipeline
            .process_frame(&empty_frame(), start + Duration::from_millis(66))
            .is_none());
    }

    #[test]
    fn test_unknown_vocabulary_rejected() {
        let mut config = Config::default();
        config.classify.vocabulary = "semaphore".to_string();
        assert!(TrackerPipeline::new(&config).is_err());
    }
}
