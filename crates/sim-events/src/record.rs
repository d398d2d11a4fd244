//! Match Record Types
//!
//! Immutable log entries for executed rounds, matching the simulation
//! output schema. Records are append-only: once a round completes its
//! record is never modified.

use serde::{Deserialize, Serialize};

use crate::receipt::SettlementReceipt;

/// A single move in the staked Prisoner's Dilemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Cooperate,
    Defect,
}

impl MoveKind {
    /// Build a move from the raw cooperate flag used by decision code.
    pub fn from_cooperate(cooperate: bool) -> Self {
        if cooperate {
            MoveKind::Cooperate
        } else {
            MoveKind::Defect
        }
    }

    pub fn is_cooperate(&self) -> bool {
        matches!(self, MoveKind::Cooperate)
    }
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveKind::Cooperate => write!(f, "cooperate"),
            MoveKind::Defect => write!(f, "defect"),
        }
    }
}

/// Joint outcome of a round, from no particular side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    MutualCooperation,
    MutualDefection,
    /// Exactly one side defected.
    Unilateral,
}

impl MatchOutcome {
    /// Classify a pair of moves.
    pub fn of(move1: MoveKind, move2: MoveKind) -> Self {
        match (move1, move2) {
            (MoveKind::Cooperate, MoveKind::Cooperate) => MatchOutcome::MutualCooperation,
            (MoveKind::Defect, MoveKind::Defect) => MatchOutcome::MutualDefection,
            _ => MatchOutcome::Unilateral,
        }
    }
}

/// A complete record of one executed round between two agents.
///
/// Records are the atomic units of simulation history. Stakes and payouts
/// are denominated in the same credits the balance oracle tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique identifier (e.g., "match_00000042")
    pub match_id: String,
    /// Simulation round in which the match ran
    pub round: u64,
    pub agent1: String,
    pub agent2: String,
    pub agent1_move: MoveKind,
    pub agent2_move: MoveKind,
    pub agent1_stake: f64,
    pub agent2_stake: f64,
    pub agent1_payout: f64,
    pub agent2_payout: f64,
    /// Human-readable rationale each side gave for its move
    pub agent1_reason: String,
    pub agent2_reason: String,
    /// Rounds this pair's bond has lasted, including this one
    pub bond_rounds: u32,
    /// Present only for rounds run through the settlement oracle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementReceipt>,
}

impl MatchRecord {
    /// Joint outcome of this record's moves.
    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::of(self.agent1_move, self.agent2_move)
    }

    /// Net profit for agent 1.
    pub fn agent1_profit(&self) -> f64 {
        self.agent1_payout - self.agent1_stake
    }

    /// Net profit for agent 2.
    pub fn agent2_profit(&self) -> f64 {
        self.agent2_payout - self.agent2_stake
    }

    /// Checks if a specific agent took part in this match.
    pub fn involves_agent(&self, agent_id: &str) -> bool {
        self.agent1 == agent_id || self.agent2 == agent_id
    }

    /// Serializes the record to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates a match ID with the given sequence number.
pub fn generate_match_id(sequence: u64) -> String {
    format!("match_{:08}", sequence)
}
