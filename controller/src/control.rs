use crate::config::SmoothingConfig;
use crate::playback::{MediaBackend, MAX_RATE, MAX_VOLUME, MIN_RATE, MIN_VOLUME};
use tracing::{debug, error, info};

/// Fade-to-pause progress. While a fade is running it owns the volume
/// exclusively; the smoothing step keeps its hands off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadePhase {
    Idle,
    Fading { original_volume: i32 },
}

/// Process-lifetime control state. `target_volume` and `target_rate` are
/// the externally writable set-points; `volume` and `rate` belong to the
/// smoothing engine, except where slider gestures manipulate them directly
/// and keep the targets synchronized.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub is_playing: bool,
    pub is_paused: bool,
    pub fade: FadePhase,
    pub volume: i32,
    pub target_volume: i32,
    pub rate: f32,
    pub target_rate: f32,
    pub prev_slider_x: Option<i32>,
    pub prev_slider_y: Option<i32>,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_paused: false,
            fade: FadePhase::Idle,
            volume: 60,
            target_volume: 60,
            rate: 1.0,
            target_rate: 1.0,
            prev_slider_x: None,
            prev_slider_y: None,
        }
    }
}

impl ControlState {
    pub fn is_fading(&self) -> bool {
        matches!(self.fade, FadePhase::Fading { .. })
    }

    pub fn set_target_volume(&mut self, volume: i32) {
        self.target_volume = volume.clamp(MIN_VOLUME, MAX_VOLUME);
    }

    pub fn set_target_rate(&mut self, rate: f32) {
        self.target_rate = rate.clamp(MIN_RATE, MAX_RATE);
    }

    /// Pull the targets back to the actual values, so nothing stale can
    /// cause a jump after a mode switch.
    pub fn sync_targets(&mut self) {
        self.target_volume = self.volume;
        self.target_rate = self.rate;
    }

    pub fn clear_slider_memory(&mut self) {
        self.prev_slider_x = None;
        self.prev_slider_y = None;
    }
}

/// Start playback, or resume from pause. Backend failure is logged and the
/// state flags are left unchanged; success is never assumed.
pub fn try_play(state: &mut ControlState, backend: &mut dyn MediaBackend) {
    if state.is_playing && !state.is_paused {
        return;
    }
    match backend.play() {
        Ok(()) => {
            let was_paused = state.is_paused;
            state.is_playing = true;
            state.is_paused = false;
            info!(
                "{} playback",
                if was_paused { "Resumed" } else { "Started" }
            );
        }
        Err(e) => {
            error!("Backend play failed: {}", e);
        }
    }
}

/// Enter the fade-to-pause ramp. Only meaningful while actually playing.
pub fn begin_fade(state: &mut ControlState) {
    if !state.is_playing || state.is_paused || state.is_fading() {
        return;
    }
    info!("Fade to pause started from volume {}", state.volume);
    state.fade = FadePhase::Fading {
        original_volume: state.volume,
    };
}

/// Abort an in-flight fade, restoring the pre-fade volume immediately. A
/// fade must never be left dangling after a stop or a mode change.
pub fn cancel_fade(state: &mut ControlState, backend: &mut dyn MediaBackend) {
    if let FadePhase::Fading { original_volume } = state.fade {
        state.volume = original_volume;
        state.target_volume = original_volume;
        backend.set_volume(original_volume);
        state.fade = FadePhase::Idle;
        info!("Fade cancelled, volume restored to {}", original_volume);
    }
}

/// One smoothing period: advance the fade if one is running, otherwise
/// step the volume toward its target; the rate converges either way.
pub fn tick(state: &mut ControlState, backend: &mut dyn MediaBackend, cfg: &SmoothingConfig) {
    match state.fade {
        FadePhase::Fading { original_volume } => {
            let step = (original_volume / 10).max(1);
            state.volume -= step;
            if state.volume <= 0 {
                // Silence reached: pause for real, then put the volume back
                // so the next resume is audible at the expected level.
                backend.set_volume(0);
                backend.pause();
                state.volume = original_volume;
                state.target_volume = original_volume;
                backend.set_volume(original_volume);
                state.is_paused = true;
                state.fade = FadePhase::Idle;
                info!("Fade complete, playback paused");
            } else {
                backend.set_volume(state.volume);
            }
        }
        FadePhase::Idle => {
            if state.volume != state.target_volume {
                let gap = state.target_volume - state.volume;
                state.volume += gap.signum() * gap.abs().min(cfg.volume_step);
                backend.set_volume(state.volume);
                debug!("Volume {} -> target {}", state.volume, state.target_volume);
            }
        }
    }

    let gap = state.target_rate - state.rate;
    if gap.abs() > f32::EPSILON {
        if gap.abs() <= cfg.rate_step {
            state.rate = state.target_rate;
        } else {
            state.rate += cfg.rate_step * gap.signum();
        }
        backend.set_rate(state.rate);
    }
}
