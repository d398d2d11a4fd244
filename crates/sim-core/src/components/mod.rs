//! Components
//!
//! All ECS components and data-bearing resources for the simulation.

pub mod agent;
pub mod economy;
pub mod social;

pub use agent::*;
pub use economy::*;
pub use social::*;
