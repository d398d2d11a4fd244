//! Social Components
//!
//! Relationship memories and the ledger that holds them. Each side of a
//! relationship keeps its own independent memory, so trust between two
//! agents need not be symmetric and nothing here ever reconciles the two
//! directions.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the partner did in the most recent game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastOutcome {
    Cooperated,
    Defected,
}

/// Memory of interactions with a specific partner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipMemory {
    /// Who this memory is about
    pub partner: String,
    /// Trust score, 0 to 100
    pub trust: f32,
    /// Bond strength, 0 to 100, grows with positive interactions
    pub bond_strength: f32,
    /// Games where the partner cooperated
    pub times_cooperated: u32,
    /// Games where the partner defected
    pub times_defected: u32,
    /// Games where we cooperated and the partner defected
    pub times_betrayed: u32,
    /// Games where we defected and the partner cooperated
    pub times_exploited: u32,
    pub total_games: u32,
    /// Cumulative net earnings across games with this partner
    pub total_earnings: f64,
    pub last_outcome: Option<LastOutcome>,
}

impl RelationshipMemory {
    /// Create a fresh memory with an attachment-style-dependent trust.
    pub fn new(partner: impl Into<String>, initial_trust: f32) -> Self {
        Self {
            partner: partner.into(),
            trust: initial_trust.clamp(0.0, 100.0),
            bond_strength: 0.0,
            times_cooperated: 0,
            times_defected: 0,
            times_betrayed: 0,
            times_exploited: 0,
            total_games: 0,
            total_earnings: 0.0,
            last_outcome: None,
        }
    }

    /// Adjust trust with clamping
    pub fn adjust_trust(&mut self, delta: f32) {
        self.trust = (self.trust + delta).clamp(0.0, 100.0);
    }

    /// Adjust bond strength with clamping
    pub fn adjust_bond(&mut self, delta: f32) {
        self.bond_strength = (self.bond_strength + delta).clamp(0.0, 100.0);
    }

    /// Partner cooperation rate as a percentage of games played.
    pub fn cooperation_rate(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        f64::from(self.times_cooperated) / f64::from(self.total_games) * 100.0
    }
}

/// Resource: every agent's memories of every partner, keyed by the ordered
/// (owner, partner) pair
#[derive(Resource, Debug, Default)]
pub struct RelationshipLedger {
    memories: HashMap<(String, String), RelationshipMemory>,
}

impl RelationshipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get one side's memory of a partner
    pub fn get(&self, owner: &str, partner: &str) -> Option<&RelationshipMemory> {
        self.memories
            .get(&(owner.to_string(), partner.to_string()))
    }

    /// Mutable access to one side's memory
    pub fn get_mut(&mut self, owner: &str, partner: &str) -> Option<&mut RelationshipMemory> {
        self.memories
            .get_mut(&(owner.to_string(), partner.to_string()))
    }

    pub fn has(&self, owner: &str, partner: &str) -> bool {
        self.memories
            .contains_key(&(owner.to_string(), partner.to_string()))
    }

    /// Create the memory lazily on first contact. The initial-trust closure
    /// runs only when the memory does not exist yet, so styles with random
    /// initial trust do not burn randomness on existing relationships.
    pub fn ensure_with(
        &mut self,
        owner: &str,
        partner: &str,
        initial_trust: impl FnOnce() -> f32,
    ) -> &mut RelationshipMemory {
        self.memories
            .entry((owner.to_string(), partner.to_string()))
            .or_insert_with(|| RelationshipMemory::new(partner, initial_trust()))
    }

    /// Replace one side's memory wholesale
    pub fn insert(&mut self, owner: &str, memory: RelationshipMemory) {
        let key = (owner.to_string(), memory.partner.clone());
        self.memories.insert(key, memory);
    }

    /// All memories owned by an agent
    pub fn memories_for(&self, owner: &str) -> Vec<&RelationshipMemory> {
        self.memories
            .iter()
            .filter(|((from, _), _)| from == owner)
            .map(|(_, memory)| memory)
            .collect()
    }
}
