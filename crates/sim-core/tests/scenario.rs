//! End-to-end scenario tests
//!
//! Whole-pipeline checks: a forced cooperative round, the bond lifecycle,
//! a full seeded run in both settlement modes, and conservation of
//! credits offline.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use settlement::{payoffs, BalanceOracle};
use sim_core::components::agent::{
    Agent, AgentId, AgentProfile, AttachmentStyle, EmotionalState, GoalTag, Traits,
};
use sim_core::components::social::RelationshipLedger;
use sim_core::history::{MatchHistory, MatchLog};
use sim_core::output;
use sim_core::setup::spawn_population;
use sim_core::systems::decision::update_after_game;
use sim_core::systems::{
    create_matches, evaluate_bonds, execute_matches, BondRegistry, PendingMatches,
    SettlementLedger,
};
use sim_core::{Balances, RoundClock, SimConfig, SimRng};

fn secure_agent(name: &str) -> (AgentProfile, EmotionalState) {
    (
        AgentProfile::new(
            name,
            AttachmentStyle::Secure,
            vec![GoalTag::Stability],
            Traits::default(),
            50.0,
        )
        .unwrap(),
        EmotionalState::default(),
    )
}

/// Two fresh secure agents, stakes 1.0 each, both forced to cooperate:
/// payouts 1.5 each, balances 10.5 each, trust up by exactly 5.
#[test]
fn test_forced_cooperative_round() {
    let (mut alice, mut alice_emotion) = secure_agent("Alice");
    let (mut bob, mut bob_emotion) = secure_agent("Bob");

    let mut balances = Balances::new();
    balances.fund("Alice", 10.0);
    balances.fund("Bob", 10.0);

    // Secure agents start a fresh relationship at trust 70
    let mut relationships = RelationshipLedger::new();
    relationships.ensure_with("Alice", "Bob", || 70.0);
    relationships.ensure_with("Bob", "Alice", || 70.0);

    let (stake1, stake2) = (1.0, 1.0);
    balances.0.debit("Alice", stake1).unwrap();
    balances.0.debit("Bob", stake2).unwrap();

    let (payout1, payout2) = payoffs(true, true, stake1, stake2);
    assert_eq!((payout1, payout2), (1.5, 1.5));
    balances.0.credit("Alice", payout1);
    balances.0.credit("Bob", payout2);

    let mut alice_memory = relationships.get("Alice", "Bob").cloned().unwrap();
    let mut bob_memory = relationships.get("Bob", "Alice").cloned().unwrap();
    update_after_game(
        &mut alice,
        &mut alice_memory,
        &mut alice_emotion,
        true,
        true,
        stake1,
        payout1,
    );
    update_after_game(
        &mut bob,
        &mut bob_memory,
        &mut bob_emotion,
        true,
        true,
        stake2,
        payout2,
    );

    assert_eq!(balances.balance("Alice"), 10.5);
    assert_eq!(balances.balance("Bob"), 10.5);
    assert_eq!(alice_memory.trust, 75.0);
    assert_eq!(bob_memory.trust, 75.0);
    assert_eq!(alice_memory.total_games, 1);
    assert_eq!(alice_memory.times_cooperated, 1);
}

fn sim_world(config: SimConfig, seed: u64) -> World {
    let mut world = World::new();
    world.insert_resource(RoundClock::default());
    world.insert_resource(Balances::new());
    world.insert_resource(RelationshipLedger::new());
    world.insert_resource(BondRegistry::new());
    world.insert_resource(PendingMatches::new());
    world.insert_resource(MatchHistory::new());
    world.insert_resource(MatchLog::null());
    world.insert_resource(SettlementLedger::new(config.settlement.timeout_ticks));

    let mut rng = SmallRng::seed_from_u64(seed);
    world.insert_resource(config.clone());
    spawn_population(&mut world, &mut rng, &config);
    world.insert_resource(SimRng(rng));
    world
}

fn run_rounds(world: &mut World, rounds: u64) {
    let mut schedule = Schedule::default();
    schedule.add_systems((create_matches, execute_matches, evaluate_bonds).chain());
    for round in 1..=rounds {
        world.resource_mut::<RoundClock>().current_round = round;
        schedule.run(world);
    }
}

/// A bond whose trust has collapsed dies at the next evaluation pass no
/// matter how young it is.
#[test]
fn test_bond_lifecycle_trust_floor() {
    let mut world = World::new();
    world.insert_resource(SimRng(SmallRng::seed_from_u64(5)));
    world.insert_resource(BondRegistry::new());
    world.insert_resource(RelationshipLedger::new());
    world.insert_resource(RoundClock { current_round: 5 });
    world.insert_resource(SimConfig::default());

    for name in ["Alice", "Bob"] {
        let (profile, emotion) = secure_agent(name);
        world.spawn((Agent, AgentId(name.to_string()), profile, emotion));
    }

    world
        .resource_mut::<BondRegistry>()
        .record_round("Alice", "Bob");
    {
        let mut relationships = world.resource_mut::<RelationshipLedger>();
        relationships.ensure_with("Alice", "Bob", || 80.0);
        relationships.ensure_with("Bob", "Alice", || 19.9);
    }

    let mut schedule = Schedule::default();
    schedule.add_systems(evaluate_bonds);
    schedule.run(&mut world);

    assert!(
        world.resource::<BondRegistry>().is_empty(),
        "bond with trust below 20 must terminate at the next evaluation"
    );
}

/// A full offline run: every record is consistent and credits are
/// conserved relative to the payoff table.
#[test]
fn test_full_offline_run_is_consistent() {
    let config = SimConfig::default();
    let initial_total = config.initial_balance * config.agents as f64;
    let mut world = sim_world(config, 42);

    run_rounds(&mut world, 20);

    let names: Vec<String> = {
        let mut query = world.query::<&AgentId>();
        query.iter(&world).map(|id| id.0.clone()).collect()
    };
    let history = world.resource::<MatchHistory>();
    assert!(!history.is_empty(), "20 rounds of 10 agents should play games");

    // Each record's payouts match the payoff table for its moves
    let mut expected_drift = 0.0;
    for record in history.records() {
        let (payout1, payout2) = payoffs(
            record.agent1_move.is_cooperate(),
            record.agent2_move.is_cooperate(),
            record.agent1_stake,
            record.agent2_stake,
        );
        assert!((record.agent1_payout - payout1).abs() < 1e-9);
        assert!((record.agent2_payout - payout2).abs() < 1e-9);
        expected_drift += record.agent1_profit() + record.agent2_profit();
    }

    // Total credits moved exactly by the sum of profits
    let total: f64 = world.resource::<Balances>().0.total();
    assert!(
        (total - initial_total - expected_drift).abs() < 1e-6,
        "total {} vs initial {} with drift {}",
        total,
        initial_total,
        expected_drift
    );

    // Memory counters line up with history from each side's perspective
    let relationships = world.resource::<RelationshipLedger>();
    for name in names {
        for memory in relationships.memories_for(&name) {
            let games_with_partner = history
                .records()
                .iter()
                .filter(|r| r.involves_agent(&name) && r.involves_agent(&memory.partner))
                .count() as u32;
            assert_eq!(
                memory.total_games, games_with_partner,
                "{} vs {} memory disagrees with history",
                name, memory.partner
            );
        }
    }
}

/// A full verified run: every settled record carries a complete receipt
/// and no game is left open on the ledger.
#[test]
fn test_full_verified_run_settles_everything() {
    let config = SimConfig {
        verified: true,
        ..SimConfig::default()
    };
    let mut world = sim_world(config, 42);

    run_rounds(&mut world, 10);

    let history = world.resource::<MatchHistory>();
    assert!(!history.is_empty());
    for record in history.records() {
        let receipt = record
            .settlement
            .as_ref()
            .expect("verified rounds always carry a receipt");
        assert!(receipt.settled, "receipt failed: {:?}", receipt.error);
        assert_eq!(receipt.transactions.len(), 6);
    }

    let ledger = world.resource::<SettlementLedger>();
    assert_eq!(ledger.0.open_game_count(), 0);
}

/// Identical seeds give identical end-of-run reports.
#[test]
fn test_full_run_determinism() {
    let run = |seed: u64| -> (usize, Vec<(String, f64)>) {
        let mut world = sim_world(SimConfig::default(), seed);
        run_rounds(&mut world, 15);
        let stats = output::build_stats(&mut world);
        let mut balances: Vec<(String, f64)> = stats.agent_balances.into_iter().collect();
        balances.sort_by(|a, b| a.0.cmp(&b.0));
        (stats.total_games, balances)
    };

    assert_eq!(run(42), run(42));
}
