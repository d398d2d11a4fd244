//! Systems
//!
//! Matchmaking, round execution, bond lifecycle, and the decision engine.

pub mod bonds;
pub mod decision;
pub mod matchmaking;
pub mod round;

pub use bonds::{evaluate_bonds, BondRegistry};
pub use matchmaking::{create_matches, pair_population, PendingMatches};
pub use round::{execute_matches, SettlementLedger};
