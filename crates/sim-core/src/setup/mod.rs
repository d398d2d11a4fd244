//! Setup
//!
//! Population spawning and initial funding.

pub mod agents;

pub use agents::{spawn_population, ROSTER_NAMES};
