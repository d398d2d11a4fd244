//! Shared record and snapshot types for the bond economy simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod receipt;
pub mod record;
pub mod summary;

// Re-export record types
pub use record::{generate_match_id, MatchOutcome, MatchRecord, MoveKind};

// Re-export settlement receipt types
pub use receipt::{SettlementReceipt, StepTx};

// Re-export summary types
pub use summary::{AgentSummary, RelationshipSummary, SimStats};
