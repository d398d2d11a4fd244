//! Game State
//!
//! The per-game record the ledger oracle keeps, and its phase machine.
//! Phase transitions are driven by the [`LedgerContract`]; this module only
//! models the data and the queries on it.
//!
//! [`LedgerContract`]: crate::ledger::LedgerContract

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// Lifecycle phase of a commit-reveal game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Created and funded by one side; waiting for the counterparty's stake
    AwaitingJoin,
    /// Both staked; waiting for both commitments
    AwaitingCommits,
    /// Both committed; waiting for both reveals
    AwaitingReveals,
    /// Both reveals accepted and payouts released
    Settled,
    /// Resolved by a timeout claim before settlement
    TimedOut,
}

impl GamePhase {
    /// Terminal phases accept no further protocol calls.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Settled | GamePhase::TimedOut)
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::AwaitingJoin => write!(f, "awaiting_join"),
            GamePhase::AwaitingCommits => write!(f, "awaiting_commits"),
            GamePhase::AwaitingReveals => write!(f, "awaiting_reveals"),
            GamePhase::Settled => write!(f, "settled"),
            GamePhase::TimedOut => write!(f, "timed_out"),
        }
    }
}

/// One side of a game: identity, escrowed stake, and protocol progress.
#[derive(Debug, Clone)]
pub struct PartySlot {
    pub identity: String,
    /// Stake escrowed by this party; zero until it has actually been locked
    pub stake: f64,
    /// Stored commitment digest, set exactly once
    pub commitment: Option<Digest>,
    /// Revealed move, set exactly once after a matching reveal
    pub revealed: Option<bool>,
}

impl PartySlot {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            stake: 0.0,
            commitment: None,
            revealed: None,
        }
    }
}

/// Full state of one game held by the oracle.
#[derive(Debug, Clone)]
pub struct Game {
    pub id: u64,
    pub phase: GamePhase,
    pub creator: PartySlot,
    pub counterparty: PartySlot,
    /// Oracle clock tick at creation; the timeout window counts from here
    pub created_at: u64,
    /// Released payouts, present once settled
    pub payouts: Option<(f64, f64)>,
}

impl Game {
    pub fn new(id: u64, creator: impl Into<String>, counterparty: impl Into<String>, created_at: u64) -> Self {
        Self {
            id,
            phase: GamePhase::AwaitingJoin,
            creator: PartySlot::new(creator),
            counterparty: PartySlot::new(counterparty),
            created_at,
            payouts: None,
        }
    }

    pub fn is_participant(&self, identity: &str) -> bool {
        self.creator.identity == identity || self.counterparty.identity == identity
    }

    /// The slot for an identity, if it is a participant.
    pub fn party(&self, identity: &str) -> Option<&PartySlot> {
        if self.creator.identity == identity {
            Some(&self.creator)
        } else if self.counterparty.identity == identity {
            Some(&self.counterparty)
        } else {
            None
        }
    }

    /// Mutable slot for an identity, if it is a participant.
    pub fn party_mut(&mut self, identity: &str) -> Option<&mut PartySlot> {
        if self.creator.identity == identity {
            Some(&mut self.creator)
        } else if self.counterparty.identity == identity {
            Some(&mut self.counterparty)
        } else {
            None
        }
    }

    pub fn both_committed(&self) -> bool {
        self.creator.commitment.is_some() && self.counterparty.commitment.is_some()
    }

    pub fn both_revealed(&self) -> bool {
        self.creator.revealed.is_some() && self.counterparty.revealed.is_some()
    }

    /// Total funds currently escrowed for this game.
    pub fn escrowed(&self) -> f64 {
        self.creator.stake + self.counterparty.stake
    }
}
