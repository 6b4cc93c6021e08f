pub mod gesture;
pub mod protocol;

pub use gesture::{Gesture, Handedness};
pub use protocol::{Action, HandReport, Line, ProtocolError, StatusUpdate, NO_HANDS_LINE};
