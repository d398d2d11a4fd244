//! Summary Output
//!
//! Builds the per-agent, per-relationship, and whole-run snapshots from
//! live world state and writes the final JSON report. Everything here is
//! read-only over the simulation.

use bevy_ecs::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sim_events::{AgentSummary, RelationshipSummary, SimStats};

use crate::components::agent::{AgentId, AgentProfile, EmotionalState};
use crate::components::economy::Balances;
use crate::components::social::RelationshipLedger;
use crate::history::MatchHistory;
use crate::systems::bonds::BondRegistry;

/// The complete end-of-run report
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub stats: SimStats,
    pub agents: Vec<AgentSummary>,
    pub relationships: HashMap<String, Vec<RelationshipSummary>>,
}

/// Build summaries for every agent, sorted by name.
pub fn agent_summaries(world: &mut World) -> Vec<AgentSummary> {
    let mut rows: Vec<(String, AgentProfile, f32)> = {
        let mut query = world.query::<(&AgentId, &AgentProfile, &EmotionalState)>();
        query
            .iter(world)
            .map(|(id, profile, emotion)| (id.0.clone(), profile.clone(), emotion.0))
            .collect()
    };
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let balances = world.resource::<Balances>();
    let relationships = world.resource::<RelationshipLedger>();
    let history = world.resource::<MatchHistory>();

    rows.into_iter()
        .map(|(name, profile, emotion)| {
            let records = history.records_for(&name);
            let total_profit: f64 = records
                .iter()
                .map(|record| {
                    if record.agent1 == name {
                        record.agent1_profit()
                    } else {
                        record.agent2_profit()
                    }
                })
                .sum();

            AgentSummary {
                attachment: profile.attachment_style.to_string(),
                goals: profile.goals.iter().map(ToString::to_string).collect(),
                balance: balances.balance(&name),
                reputation: f64::from(profile.reputation),
                emotional_state: f64::from(emotion),
                risk_tolerance: f64::from(profile.traits.risk_tolerance),
                ethics_fairness: f64::from(profile.traits.ethics_fairness),
                ethics_reciprocity: f64::from(profile.traits.ethics_reciprocity),
                total_games: records.len(),
                total_profit,
                active_relationships: relationships.memories_for(&name).len(),
                name,
            }
        })
        .collect()
}

/// Build one agent's relationship summaries, sorted by partner name.
pub fn relationship_summaries(world: &World, agent: &str) -> Vec<RelationshipSummary> {
    let relationships = world.resource::<RelationshipLedger>();
    let mut rows: Vec<RelationshipSummary> = relationships
        .memories_for(agent)
        .into_iter()
        .map(|memory| RelationshipSummary {
            partner: memory.partner.clone(),
            trust: f64::from(memory.trust),
            bond_strength: f64::from(memory.bond_strength),
            total_games: memory.total_games,
            cooperations: memory.times_cooperated,
            defections: memory.times_defected,
            betrayals: memory.times_betrayed,
            total_earnings: memory.total_earnings,
            cooperation_rate: memory.cooperation_rate(),
        })
        .collect();
    rows.sort_by(|a, b| a.partner.cmp(&b.partner));
    rows
}

/// Build the whole-run statistics.
pub fn build_stats(world: &mut World) -> SimStats {
    let (balances, reputations) = {
        let mut query = world.query::<(&AgentId, &AgentProfile)>();
        let balances_res = world.resource::<Balances>();
        let mut balances = HashMap::new();
        let mut reputations = HashMap::new();
        for (id, profile) in query.iter(world) {
            balances.insert(id.0.clone(), balances_res.balance(&id.0));
            reputations.insert(id.0.clone(), f64::from(profile.reputation));
        }
        (balances, reputations)
    };

    let history = world.resource::<MatchHistory>();
    let bonds = world.resource::<BondRegistry>();

    SimStats {
        total_games: history.len(),
        skipped_rounds: history.skipped,
        active_bonds: bonds.len(),
        agent_balances: balances,
        agent_reputations: reputations,
    }
}

/// Build and write the full report as pretty JSON.
pub fn write_report(world: &mut World, path: impl AsRef<Path>) -> std::io::Result<()> {
    let agents = agent_summaries(world);
    let relationships = agents
        .iter()
        .map(|summary| {
            (
                summary.name.clone(),
                relationship_summaries(world, &summary.name),
            )
        })
        .collect();
    let report = RunReport {
        stats: build_stats(world),
        agents,
        relationships,
    };

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::{Agent, AttachmentStyle, GoalTag, Traits};
    use crate::history::MatchLog;
    use crate::systems::{create_matches, execute_matches, PendingMatches};
    use crate::{RoundClock, SimConfig, SimRng};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn populated_world() -> World {
        let mut world = World::new();
        world.insert_resource(SimRng(SmallRng::seed_from_u64(42)));
        world.insert_resource(RoundClock { current_round: 1 });
        world.insert_resource(Balances::new());
        world.insert_resource(RelationshipLedger::new());
        world.insert_resource(BondRegistry::new());
        world.insert_resource(PendingMatches::new());
        world.insert_resource(MatchHistory::new());
        world.insert_resource(MatchLog::null());
        world.insert_resource(crate::systems::SettlementLedger::new(50));
        world.insert_resource(SimConfig::default());

        for name in ["Alice", "Bob"] {
            let profile = AgentProfile::new(
                name,
                AttachmentStyle::Secure,
                vec![GoalTag::Stability],
                Traits::default(),
                50.0,
            )
            .unwrap();
            world.spawn((
                Agent,
                AgentId(name.to_string()),
                profile,
                EmotionalState::default(),
            ));
            world.resource_mut::<Balances>().fund(name, 10.0);
        }
        world
    }

    #[test]
    fn test_summaries_after_one_round() {
        let mut world = populated_world();
        let mut schedule = Schedule::default();
        schedule.add_systems((create_matches, execute_matches).chain());
        schedule.run(&mut world);

        let agents = agent_summaries(&mut world);
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].name, "Alice");
        assert_eq!(agents[0].total_games, 1);
        assert_eq!(agents[0].active_relationships, 1);

        let relationships = relationship_summaries(&world, "Alice");
        assert_eq!(relationships.len(), 1);
        assert_eq!(relationships[0].partner, "Bob");
        assert_eq!(relationships[0].total_games, 1);

        let stats = build_stats(&mut world);
        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.active_bonds, 1);
        assert_eq!(stats.agent_balances.len(), 2);
    }

    #[test]
    fn test_empty_world_stats() {
        let mut world = populated_world();
        let stats = build_stats(&mut world);
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.active_bonds, 0);
        assert_eq!(stats.skipped_rounds, 0);
    }
}
