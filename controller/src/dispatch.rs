use crate::config::{ActionsConfig, SliderConfig};
use crate::control::{self, ControlState};
use crate::playback::{MediaBackend, MAX_RATE, MAX_VOLUME, MIN_RATE, MIN_VOLUME};
use shared::protocol::{Action, Line, StatusUpdate};
use shared::Gesture;
use tracing::info;

/// Control scheme. Static maps absolute two-hand gesture combinations to
/// absolute set-points; Slider maps one hand's relative motion to direct
/// value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Static,
    Slider,
}

/// Routes parsed producer lines into control-state changes and transport
/// commands under the active mode.
pub struct Dispatcher {
    mode: Mode,
    slider: SliderConfig,
    actions: ActionsConfig,
}

impl Dispatcher {
    pub fn new(mode: Mode, slider: SliderConfig, actions: ActionsConfig) -> Self {
        Self {
            mode,
            slider,
            actions,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Swap modes atomically: any in-flight fade is cancelled, slider
    /// memory dropped, and targets resynchronized to the actual values so
    /// a stale set-point cannot cause a jump on re-entry.
    pub fn set_mode(&mut self, mode: Mode, state: &mut ControlState, backend: &mut dyn MediaBackend) {
        if mode == self.mode {
            return;
        }
        control::cancel_fade(state, backend);
        state.clear_slider_memory();
        state.sync_targets();
        self.mode = mode;
        info!("Control mode switched to {:?}", mode);
    }

    pub fn handle_line(&mut self, line: &Line, state: &mut ControlState, backend: &mut dyn MediaBackend) {
        match line {
            Line::Hands(update) => match self.mode {
                Mode::Static => self.handle_static(update, state, backend),
                Mode::Slider => self.handle_slider(update, state, backend),
            },
            Line::Action(action) => self.handle_action(*action, state, backend),
            // Hand loss changes nothing by itself; targets have no decay.
            Line::NoHands => {}
        }
    }

    fn handle_static(
        &self,
        update: &StatusUpdate,
        state: &mut ControlState,
        backend: &mut dyn MediaBackend,
    ) {
        let left = update.left.map(|h| h.gesture);
        let right = update.right.map(|h| h.gesture);

        if left == Some(Gesture::OpenHand) && right == Some(Gesture::OpenHand) {
            control::try_play(state, backend);
        } else if left == Some(Gesture::ClosedFist) && right == Some(Gesture::ClosedFist) {
            control::begin_fade(state);
        }

        if let Some(volume) = left.and_then(static_volume) {
            state.set_target_volume(volume);
        }
        if let Some(rate) = right.and_then(static_rate) {
            state.set_target_rate(rate);
        }
    }

    fn handle_slider(
        &self,
        update: &StatusUpdate,
        state: &mut ControlState,
        backend: &mut dyn MediaBackend,
    ) {
        match update.left.map(|h| h.gesture) {
            Some(Gesture::OpenHand) => control::try_play(state, backend),
            Some(Gesture::ClosedFist) => control::begin_fade(state),
            _ => {}
        }

        match update.right {
            Some(hand) if hand.gesture == Gesture::OpenHand => {
                // Rate axis active; the volume axis memory must not survive.
                state.prev_slider_y = None;
                if let Some((x, _)) = hand.position {
                    match state.prev_slider_x {
                        Some(prev_x) => {
                            let dx = x - prev_x;
                            if dx.abs() > self.slider.rate_dead_zone_px {
                                let rate = (state.rate + dx as f32 * self.slider.rate_gain)
                                    .clamp(MIN_RATE, MAX_RATE);
                                // Direct manipulation: actual and target move
                                // together, no smoothing in between.
                                state.rate = rate;
                                state.target_rate = rate;
                                backend.set_rate(rate);
                                state.prev_slider_x = Some(x);
                            }
                        }
                        None => state.prev_slider_x = Some(x),
                    }
                }
            }
            Some(hand) if hand.gesture == Gesture::ClosedFist => {
                state.prev_slider_x = None;
                if state.is_fading() {
                    // The fade owns the volume until it finishes or is
                    // cancelled.
                    return;
                }
                if let Some((_, y)) = hand.position {
                    match state.prev_slider_y {
                        Some(prev_y) => {
                            let dy = y - prev_y;
                            if dy.abs() > self.slider.volume_dead_zone_px {
                                // Smaller y is higher on screen and should
                                // raise the volume.
                                let delta = (-(dy as f32) * self.slider.volume_gain) as i32;
                                let volume =
                                    (state.volume + delta).clamp(MIN_VOLUME, MAX_VOLUME);
                                state.volume = volume;
                                state.target_volume = volume;
                                backend.set_volume(volume);
                                state.prev_slider_y = Some(y);
                            }
                        }
                        None => state.prev_slider_y = Some(y),
                    }
                }
            }
            // Any other gesture, or no right hand, drops the stored
            // positions so re-entering a slider gesture later cannot
            // compute a spurious delta against a stale fix.
            _ => state.clear_slider_memory(),
        }
    }

    fn handle_action(
        &self,
        action: Action,
        state: &mut ControlState,
        backend: &mut dyn MediaBackend,
    ) {
        match action {
            Action::PlayResume => control::try_play(state, backend),
            Action::Pause => control::begin_fade(state),
            Action::VolumeUp => {
                state.set_target_volume(state.target_volume + self.actions.volume_step)
            }
            Action::VolumeDown => {
                state.set_target_volume(state.target_volume - self.actions.volume_step)
            }
            Action::SpeedUp => state.set_target_rate(state.target_rate + self.actions.rate_step),
            Action::SlowDown => state.set_target_rate(state.target_rate - self.actions.rate_step),
            Action::NoAction => {}
        }
    }
}

fn static_volume(gesture: Gesture) -> Option<i32> {
    match gesture {
        Gesture::OneFinger => Some(25),
        Gesture::TwoFingers => Some(50),
        Gesture::ThreeFingers => Some(75),
        Gesture::FourFingers => Some(100),
        _ => None,
    }
}

fn static_rate(gesture: Gesture) -> Option<f32> {
    match gesture {
        Gesture::OneFinger => Some(0.5),
        Gesture::TwoFingers => Some(0.75),
        Gesture::ThreeFingers => Some(1.0),
        Gesture::FourFingers => Some(1.5),
        _ => None,
    }
}
