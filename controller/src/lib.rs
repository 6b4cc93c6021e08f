pub mod app;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod playback;
pub mod tracker_proc;

pub use control::ControlState;
pub use dispatch::{Dispatcher, Mode};
pub use playback::{MediaBackend, NullBackend, PlaybackState};
pub use tracker_proc::TrackerProcess;
