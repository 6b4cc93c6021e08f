pub mod aggregate;
pub mod classify;
pub mod config;
pub mod debounce;
pub mod fingers;
pub mod landmarks;
pub mod pipeline;

pub use aggregate::Aggregator;
pub use debounce::{ActivityGate, DebounceEngine};
pub use landmarks::LandmarkSource;
pub use pipeline::TrackerPipeline;
