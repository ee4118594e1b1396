//! Finscope analysis orchestration.
//!
//! Wires image acquisition, the vision client and the formatter around an
//! explicit per-session state container.

pub mod analyzer;
pub mod example;
pub mod snapshot;

pub use analyzer::{FishAnalyzer, SharedSession};
pub use example::EXAMPLE_ANALYSIS;
pub use snapshot::SessionSnapshot;
