//! Matchmaking System
//!
//! Pairs the population each round: a shuffled greedy pass where every
//! agent picks its own partner, then a best-effort sweep that pairs
//! whoever is left.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::components::agent::{AgentId, AgentProfile};
use crate::components::social::RelationshipLedger;
use crate::SimRng;

use super::decision::select_partner;

/// Resource storing the pairs selected for the current round
#[derive(Resource, Debug, Default)]
pub struct PendingMatches {
    pub pairs: Vec<(String, String)>,
}

impl PendingMatches {
    pub fn new() -> Self {
        Self::default()
    }
}

/// System to build this round's matches
pub fn create_matches(
    mut rng: ResMut<SimRng>,
    mut pending: ResMut<PendingMatches>,
    relationships: Res<RelationshipLedger>,
    query: Query<(&AgentId, &AgentProfile)>,
) {
    let agents: Vec<(String, AgentProfile)> = query
        .iter()
        .map(|(id, profile)| (id.0.clone(), profile.clone()))
        .collect();

    pending.pairs = pair_population(&agents, &relationships, &mut rng.0);
}

/// Pair the population for one round.
///
/// First pass: in shuffled order, each not-yet-used agent runs its own
/// partner selection over the remaining unused pool. Second pass: agents
/// nobody picked are paired off two at a time in shuffle order; a final
/// odd agent sits the round out.
pub fn pair_population<R: Rng>(
    agents: &[(String, AgentProfile)],
    relationships: &RelationshipLedger,
    rng: &mut R,
) -> Vec<(String, String)> {
    let mut order: Vec<usize> = (0..agents.len()).collect();
    order.shuffle(rng);

    let mut pairs = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();

    // Autonomous selection pass
    for &i in &order {
        let (ref name, ref profile) = agents[i];
        if used.contains(name.as_str()) {
            continue;
        }

        let candidates: Vec<&AgentProfile> = order
            .iter()
            .map(|&j| &agents[j])
            .filter(|(other, _)| !used.contains(other.as_str()) && other != name)
            .map(|(_, other_profile)| other_profile)
            .collect();

        if let Some(partner) = select_partner(profile, relationships, &candidates, rng) {
            used.insert(name.as_str());
            // The partner profile came out of `agents`, so the name is live
            let partner_name = agents
                .iter()
                .find(|(other, _)| *other == partner.name)
                .map(|(other, _)| other.as_str());
            if let Some(partner_name) = partner_name {
                used.insert(partner_name);
                pairs.push((name.clone(), partner_name.to_string()));
            }
        }
    }

    // Best-effort pass for the leftovers, in shuffle order
    let mut remaining: Vec<&str> = order
        .iter()
        .map(|&i| agents[i].0.as_str())
        .filter(|name| !used.contains(name))
        .collect();
    while remaining.len() >= 2 {
        let first = remaining.remove(0);
        let second = remaining.remove(0);
        pairs.push((first.to_string(), second.to_string()));
    }

    pairs
}
