//! Bond Lifecycle
//!
//! The registry of active bonds and the batch evaluation that breaks them.
//! A bond is keyed by the unordered pair of agent names and tracks only
//! how many rounds the pair has played; everything else about the
//! relationship lives in each side's own memory.

use bevy_ecs::prelude::*;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

use crate::components::agent::{AgentId, AgentProfile};
use crate::components::social::RelationshipLedger;
use crate::{RoundClock, SimConfig, SimRng};

use super::decision::wants_rematch;

/// Constants for bond evaluation
pub mod bond_constants {
    /// Trust below this on either side breaks the bond outright
    pub const TRUST_FLOOR: f32 = 20.0;
    /// Relationship fatigue threshold range, inclusive
    pub const FATIGUE_MIN_ROUNDS: u32 = 5;
    pub const FATIGUE_MAX_ROUNDS: u32 = 10;
}

/// Resource: rounds played per active bond
///
/// Ordered map so evaluation passes walk bonds in a stable order under a
/// fixed seed.
#[derive(Resource, Debug, Default)]
pub struct BondRegistry {
    bonds: BTreeMap<(String, String), u32>,
}

impl BondRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized unordered key
    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    /// Count a played round, creating the bond on first contact.
    /// Returns the updated round count.
    pub fn record_round(&mut self, a: &str, b: &str) -> u32 {
        let rounds = self.bonds.entry(Self::key(a, b)).or_insert(0);
        *rounds += 1;
        *rounds
    }

    /// Rounds played for a pair, if the bond is active.
    pub fn rounds(&self, a: &str, b: &str) -> Option<u32> {
        self.bonds.get(&Self::key(a, b)).copied()
    }

    pub fn remove(&mut self, a: &str, b: &str) -> bool {
        self.bonds.remove(&Self::key(a, b)).is_some()
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Snapshot of all active bonds.
    pub fn active(&self) -> Vec<((String, String), u32)> {
        self.bonds
            .iter()
            .map(|(pair, rounds)| (pair.clone(), *rounds))
            .collect()
    }
}

/// System: batch pass over all active bonds, breaking the ones that are
/// done.
///
/// Runs only on rounds divisible by the configured interval. One fatigue
/// threshold is sampled per pass and applied to every bond in it. A bond
/// terminates when it hits that threshold, when either side declines a
/// rematch, or when either side's trust has dropped below the floor.
pub fn evaluate_bonds(
    mut rng: ResMut<SimRng>,
    mut bonds: ResMut<BondRegistry>,
    relationships: Res<RelationshipLedger>,
    clock: Res<RoundClock>,
    config: Res<SimConfig>,
    query: Query<(&AgentId, &AgentProfile)>,
) {
    if config.bond_eval_interval == 0 || clock.current_round % config.bond_eval_interval != 0 {
        return;
    }

    use bond_constants::*;

    let fatigue_threshold = rng.0.gen_range(FATIGUE_MIN_ROUNDS..=FATIGUE_MAX_ROUNDS);

    let profiles: HashMap<&str, &AgentProfile> = query
        .iter()
        .map(|(id, profile)| (id.0.as_str(), profile))
        .collect();

    let mut broken: Vec<(String, String)> = Vec::new();
    for ((a, b), rounds) in bonds.active() {
        let Some(profile_a) = profiles.get(a.as_str()) else {
            continue;
        };
        let Some(profile_b) = profiles.get(b.as_str()) else {
            continue;
        };

        let memory_ab = relationships.get(&a, &b);
        let memory_ba = relationships.get(&b, &a);

        let fatigued = rounds >= fatigue_threshold;
        let declined = !wants_rematch(profile_a, memory_ab, &mut rng.0)
            || !wants_rematch(profile_b, memory_ba, &mut rng.0);
        let trust_collapsed = memory_ab.is_some_and(|m| m.trust < TRUST_FLOOR)
            || memory_ba.is_some_and(|m| m.trust < TRUST_FLOOR);

        if fatigued || declined || trust_collapsed {
            broken.push((a, b));
        }
    }

    for (a, b) in broken {
        bonds.remove(&a, &b);
        tracing::info!(agent1 = %a, agent2 = %b, "bond broken");
    }
}
