use crate::config::GatingConfig;
use shared::{Gesture, Handedness};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Debounce memory for one hand label. Exists only while that hand is in
/// frame; a full no-hand observation clears it so stale gesture memory
/// never leaks into a fresh session.
#[derive(Debug, Clone, Copy)]
struct HandState {
    displayed: Gesture,
    last_change: Instant,
    raw_prev: Gesture,
}

/// Per-hand gesture stabilizer. A changed raw classification is adopted
/// only after the displayed gesture has dwelt for the cooldown, which keeps
/// single-frame misclassifications from flickering into the output.
pub struct DebounceEngine {
    cooldown: Duration,
    left: Option<HandState>,
    right: Option<HandState>,
}

impl DebounceEngine {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            left: None,
            right: None,
        }
    }

    /// Feed one frame's raw classification for a hand label. `None` means
    /// the hand is absent this frame; disappearance takes effect
    /// immediately, with no cooldown.
    pub fn observe(&mut self, hand: Handedness, raw: Option<Gesture>, now: Instant) -> Gesture {
        let cooldown = self.cooldown;
        let slot = self.slot_mut(hand);

        let raw = match raw {
            Some(raw) => raw,
            None => {
                if slot.is_some() {
                    debug!("{} hand left the frame", hand.as_str());
                }
                *slot = None;
                return Gesture::NoHand;
            }
        };

        match slot {
            None => {
                // First sighting adopts the raw gesture immediately.
                info!("{} hand: No Hand -> {}", hand.as_str(), raw.as_str());
                *slot = Some(HandState {
                    displayed: raw,
                    last_change: now,
                    raw_prev: raw,
                });
                raw
            }
            Some(state) => {
                if raw != state.raw_prev {
                    debug!(
                        "{} hand raw gesture now {} (displayed {})",
                        hand.as_str(),
                        raw.as_str(),
                        state.displayed.as_str()
                    );
                }
                state.raw_prev = raw;
                if now.duration_since(state.last_change) < cooldown {
                    // Still settling; hold the displayed gesture.
                    state.displayed
                } else if raw != state.displayed {
                    info!(
                        "{} hand: {} -> {}",
                        hand.as_str(),
                        state.displayed.as_str(),
                        raw.as_str()
                    );
                    state.displayed = raw;
                    state.last_change = now;
                    raw
                } else {
                    state.displayed
                }
            }
        }
    }

    /// Drop one hand's memory outright.
    pub fn reset(&mut self, hand: Handedness) {
        *self.slot_mut(hand) = None;
    }

    pub fn reset_all(&mut self) {
        self.left = None;
        self.right = None;
    }

    fn slot_mut(&mut self, hand: Handedness) -> &mut Option<HandState> {
        match hand {
            Handedness::Left => &mut self.left,
            Handedness::Right => &mut self.right,
        }
    }
}

/// Optional stillness and position gate. A hand counts as active only when
/// its wrist sits inside the inner region of the frame and it has moved
/// less than the motion threshold since the previous frame, so hands
/// merely passing through the edge do not trigger actions.
pub struct ActivityGate {
    config: GatingConfig,
    prev_left: Option<(i32, i32)>,
    prev_right: Option<(i32, i32)>,
}

impl ActivityGate {
    pub fn new(config: GatingConfig) -> Self {
        Self {
            config,
            prev_left: None,
            prev_right: None,
        }
    }

    pub fn check(&mut self, hand: Handedness, pos: (i32, i32), width: u32, height: u32) -> bool {
        if !self.config.enabled {
            return true;
        }

        let prev = self.slot_mut(hand).replace(pos);

        let margin_x = (self.config.edge_margin * width as f32) as i32;
        let margin_y = (self.config.edge_margin * height as f32) as i32;
        let inside = pos.0 >= margin_x
            && pos.0 <= width as i32 - margin_x
            && pos.1 >= margin_y
            && pos.1 <= height as i32 - margin_y;
        if !inside {
            return false;
        }

        // Stillness needs a previous fix to compare against.
        match prev {
            Some((px, py)) => {
                let dx = (pos.0 - px) as f32;
                let dy = (pos.1 - py) as f32;
                (dx * dx + dy * dy).sqrt() <= self.config.motion_threshold_px as f32
            }
            None => false,
        }
    }

    pub fn clear(&mut self, hand: Handedness) {
        *self.slot_mut(hand) = None;
    }

    fn slot_mut(&mut self, hand: Handedness) -> &mut Option<(i32, i32)> {
        match hand {
            Handedness::Left => &mut self.prev_left,
            Handedness::Right => &mut self.prev_right,
        }
    }
}
