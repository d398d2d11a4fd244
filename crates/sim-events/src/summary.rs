//! Summary Types
//!
//! Serialization structs for per-agent and per-relationship summaries and
//! whole-run statistics. These are read-only snapshots consumed by
//! reporting; nothing in the simulation reads them back.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of one agent's public state at reporting time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub name: String,
    /// Attachment style tag ("secure", "anxious", ...)
    pub attachment: String,
    pub goals: Vec<String>,
    pub balance: f64,
    pub reputation: f64,
    pub emotional_state: f64,
    pub risk_tolerance: f64,
    pub ethics_fairness: f64,
    pub ethics_reciprocity: f64,
    pub total_games: usize,
    pub total_profit: f64,
    pub active_relationships: usize,
}

/// Snapshot of one side of a relationship.
///
/// Relationships are asymmetric: the same pair produces two different
/// summaries depending on which side is asked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipSummary {
    pub partner: String,
    pub trust: f64,
    pub bond_strength: f64,
    pub total_games: u32,
    pub cooperations: u32,
    pub defections: u32,
    pub betrayals: u32,
    pub total_earnings: f64,
    /// Partner cooperation rate as a percentage of games played
    pub cooperation_rate: f64,
}

/// Whole-run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimStats {
    pub total_games: usize,
    pub skipped_rounds: usize,
    pub active_bonds: usize,
    pub agent_balances: HashMap<String, f64>,
    pub agent_reputations: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_summary_serialization() {
        let summary = AgentSummary {
            name: "Alice".to_string(),
            attachment: "secure".to_string(),
            goals: vec!["stability".to_string()],
            balance: 12.5,
            reputation: 51.0,
            emotional_state: 55.0,
            risk_tolerance: 0.5,
            ethics_fairness: 0.6,
            ethics_reciprocity: 0.7,
            total_games: 4,
            total_profit: 2.5,
            active_relationships: 2,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("secure"));
        assert!(json.contains("stability"));

        let parsed: AgentSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Alice");
        assert_eq!(parsed.total_games, 4);
    }

    #[test]
    fn test_relationship_summary_roundtrip() {
        let summary = RelationshipSummary {
            partner: "Bob".to_string(),
            trust: 62.0,
            bond_strength: 24.0,
            total_games: 5,
            cooperations: 4,
            defections: 1,
            betrayals: 1,
            total_earnings: 1.75,
            cooperation_rate: 80.0,
        };

        let json = serde_json::to_string(&summary).unwrap();
        let parsed: RelationshipSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.partner, "Bob");
        assert_eq!(parsed.cooperation_rate, 80.0);
    }
}
