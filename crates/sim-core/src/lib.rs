//! Bond Economy Simulation Engine Library
//!
//! Public API for the simulation engine: autonomous agents with attachment
//! styles play a staked, iterated Prisoner's Dilemma, forming and breaking
//! bonds as trust evolves.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod history;
pub mod output;
pub mod setup;
pub mod style;
pub mod systems;

pub use components::*;
pub use config::{SettlementConfig, SimConfig};
pub use history::{MatchHistory, MatchLog};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Current simulation round, advanced by the driver before each schedule run
#[derive(Resource, Debug, Default)]
pub struct RoundClock {
    pub current_round: u64,
}
