//! Settlement Errors
//!
//! Everything the ledger oracle can reject. Protocol violations are
//! ordinary errors here, not panics: the orchestrator records them on the
//! match and moves on.

use thiserror::Error;

use crate::game::GamePhase;

/// Errors returned by the settlement oracle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    #[error("game {game_id} does not exist")]
    GameNotFound { game_id: u64 },

    #[error("{identity} is not a participant in game {game_id}")]
    NotAParticipant { game_id: u64, identity: String },

    #[error("game {game_id} is in phase {phase}, expected {expected}")]
    WrongPhase {
        game_id: u64,
        phase: GamePhase,
        expected: &'static str,
    },

    #[error("{identity} already committed a move for game {game_id}")]
    AlreadyCommitted { game_id: u64, identity: String },

    #[error("{identity} already revealed a move for game {game_id}")]
    AlreadyRevealed { game_id: u64, identity: String },

    #[error("reveal by {identity} for game {game_id} does not match the stored commitment")]
    CommitmentMismatch { game_id: u64, identity: String },

    #[error("game {game_id} has not reached its timeout window")]
    TimeoutNotElapsed { game_id: u64 },

    #[error("insufficient funds for {identity}: requested {requested}, available {available}")]
    InsufficientFunds {
        identity: String,
        requested: f64,
        available: f64,
    },

    #[error("stake must be positive, got {stake}")]
    NonPositiveStake { stake: f64 },

    #[error("only the creator can reclaim game {game_id} before the counterparty joins")]
    JoinPending { game_id: u64 },
}
