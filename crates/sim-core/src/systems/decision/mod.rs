//! Decision Engine
//!
//! Pure functions mapping an agent's profile, relationship memory, and
//! context to partner choices, moves, stakes, and post-round learning.
//! Randomness always comes in through an explicit generator so behavior is
//! reproducible under a fixed seed.

pub mod learning;
pub mod moves;
pub mod partner;
pub mod stake;

pub use learning::update_after_game;
pub use moves::{decide_move, MoveDecision};
pub use partner::{compatibility, select_partner, wants_rematch};
pub use stake::calculate_stake;
