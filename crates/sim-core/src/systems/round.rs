//! Round Execution
//!
//! The exclusive system that runs every pending match. Both decisions are
//! computed from pre-round snapshots before anything mutates, so neither
//! side's move can depend on the other's. In verified mode the same
//! guarantee comes from the commit-reveal protocol on the settlement
//! ledger; offline it is simply a property of the execution order here.

use bevy_ecs::prelude::*;

use settlement::{
    commitment_digest, payoffs, random_salt, BalanceOracle, LedgerContract, SettlementError,
};
use sim_events::{MatchRecord, MoveKind, SettlementReceipt};

use crate::components::agent::{AgentId, AgentProfile, EmotionalState};
use crate::components::economy::Balances;
use crate::components::social::RelationshipLedger;
use crate::history::{MatchHistory, MatchLog};
use crate::style;
use crate::systems::bonds::BondRegistry;
use crate::systems::decision::{self, MoveDecision};
use crate::systems::matchmaking::PendingMatches;
use crate::{RoundClock, SimConfig, SimRng};

/// Resource: the trusted settlement oracle
#[derive(Resource)]
pub struct SettlementLedger(pub LedgerContract);

impl SettlementLedger {
    pub fn new(timeout_ticks: u64) -> Self {
        Self(LedgerContract::new(timeout_ticks))
    }
}

/// Pre-round snapshot of one side of a match
struct SideView {
    entity: Entity,
    name: String,
    profile: AgentProfile,
    emotion: f32,
    balance: f64,
}

/// System: run every pending match for this round
pub fn execute_matches(world: &mut World) {
    let pairs = std::mem::take(&mut world.resource_mut::<PendingMatches>().pairs);
    let round = world.resource::<RoundClock>().current_round;

    // Keep the settlement clock in step with the simulation rounds
    if world.resource::<SimConfig>().verified {
        world
            .resource_mut::<SettlementLedger>()
            .0
            .advance_to(round);
    }

    for (agent1, agent2) in pairs {
        run_match(world, round, &agent1, &agent2);
    }
}

/// Run a single match between two agents.
fn run_match(world: &mut World, round: u64, agent1: &str, agent2: &str) {
    let config = world.resource::<SimConfig>().clone();

    let Some(side1) = snapshot_side(world, agent1) else {
        return;
    };
    let Some(side2) = snapshot_side(world, agent2) else {
        return;
    };

    // Stake sizing sees only what already exists: no memory, no trust
    // multiplier on first contact
    let (stake1, stake2) = {
        let relationships = world.resource::<RelationshipLedger>();
        let memory1 = relationships.get(agent1, agent2);
        let memory2 = relationships.get(agent2, agent1);
        (
            decision::calculate_stake(&side1.profile, memory1, side1.balance),
            decision::calculate_stake(&side2.profile, memory2, side2.balance),
        )
    };

    let stake1 = cap_stake(stake1, side1.balance, &config);
    let stake2 = cap_stake(stake2, side2.balance, &config);

    // Stake validation happens before any state change, so a skipped
    // round is a true no-op
    if stake1 <= 0.0 || stake2 <= 0.0 {
        world.resource_mut::<MatchHistory>().skipped += 1;
        tracing::debug!(agent1, agent2, stake1, stake2, "round skipped: non-positive stake");
        return;
    }

    // First contact creates the memory with style-dependent initial trust
    let (memory1, memory2) = world.resource_scope(|world, mut relationships: Mut<RelationshipLedger>| {
        let mut rng = world.resource_mut::<SimRng>();
        relationships.ensure_with(agent1, agent2, || {
            style::initial_trust(side1.profile.attachment_style, &mut rng.0)
        });
        relationships.ensure_with(agent2, agent1, || {
            style::initial_trust(side2.profile.attachment_style, &mut rng.0)
        });
        (
            relationships.get(agent1, agent2).cloned(),
            relationships.get(agent2, agent1).cloned(),
        )
    });
    let (Some(memory1), Some(memory2)) = (memory1, memory2) else {
        return;
    };

    // Both moves are decided from the snapshots, before either is acted on
    let (decision1, decision2) = {
        let mut rng = world.resource_mut::<SimRng>();
        let decision1 = decision::decide_move(
            &side1.profile,
            &memory1,
            side1.emotion,
            stake1,
            side1.balance,
            &mut rng.0,
        );
        let decision2 = decision::decide_move(
            &side2.profile,
            &memory2,
            side2.emotion,
            stake2,
            side2.balance,
            &mut rng.0,
        );
        (decision1, decision2)
    };

    let outcome = if config.verified {
        run_verified(world, agent1, agent2, stake1, stake2, &decision1, &decision2)
    } else {
        run_offline(world, agent1, agent2, stake1, stake2, &decision1, &decision2)
    };

    let Some(outcome) = outcome else {
        // Stakes could not be locked; nothing was mutated
        world.resource_mut::<MatchHistory>().skipped += 1;
        return;
    };

    let bond_rounds = if outcome.settled {
        apply_updates(
            world,
            &side1,
            agent2,
            decision1.cooperate,
            decision2.cooperate,
            stake1,
            outcome.payout1,
        );
        apply_updates(
            world,
            &side2,
            agent1,
            decision2.cooperate,
            decision1.cooperate,
            stake2,
            outcome.payout2,
        );
        world
            .resource_mut::<BondRegistry>()
            .record_round(agent1, agent2)
    } else {
        // Failed on-chain attempt: agent state stays untouched and the
        // bond counter does not move
        world
            .resource_mut::<BondRegistry>()
            .rounds(agent1, agent2)
            .unwrap_or(0)
    };

    let record = MatchRecord {
        match_id: world.resource_mut::<MatchHistory>().next_id(),
        round,
        agent1: agent1.to_string(),
        agent2: agent2.to_string(),
        agent1_move: MoveKind::from_cooperate(decision1.cooperate),
        agent2_move: MoveKind::from_cooperate(decision2.cooperate),
        agent1_stake: stake1,
        agent2_stake: stake2,
        agent1_payout: outcome.payout1,
        agent2_payout: outcome.payout2,
        agent1_reason: decision1.reason,
        agent2_reason: decision2.reason,
        bond_rounds,
        settlement: outcome.receipt,
    };

    world.resource_scope(|world, mut log: Mut<MatchLog>| {
        if let Err(e) = log.log(&record) {
            tracing::warn!("failed to write match record: {}", e);
        }
        world.resource_mut::<MatchHistory>().push(record);
    });
}

/// Snapshot an agent's entity, profile, emotion, and balance by name.
fn snapshot_side(world: &mut World, name: &str) -> Option<SideView> {
    let mut query = world.query::<(Entity, &AgentId, &AgentProfile, &EmotionalState)>();
    let found = query
        .iter(world)
        .find(|(_, id, _, _)| id.0 == name)
        .map(|(entity, id, profile, emotion)| {
            (entity, id.0.clone(), profile.clone(), emotion.0)
        });
    let (entity, name, profile, emotion) = found?;
    let balance = world.resource::<Balances>().balance(&name);
    Some(SideView {
        entity,
        name,
        profile,
        emotion,
        balance,
    })
}

/// Cap a stake to the live balance, and under verified settlement to the
/// on-chain ceiling and the fee-buffer headroom.
fn cap_stake(stake: f64, balance: f64, config: &SimConfig) -> f64 {
    let mut stake = stake.min(balance);
    if config.verified {
        stake = stake
            .min(config.settlement.stake_ceiling)
            .min(balance - config.settlement.fee_buffer);
    }
    stake
}

/// Outcome of the settlement step, whichever mode produced it
struct RoundOutcome {
    payout1: f64,
    payout2: f64,
    receipt: Option<SettlementReceipt>,
    /// True when payouts were actually released and state may be updated
    settled: bool,
}

/// Offline path: lock stakes, apply the payoff table, release payouts.
///
/// Returns `None` if the stakes could not be locked, in which case no
/// balance has changed.
fn run_offline(
    world: &mut World,
    agent1: &str,
    agent2: &str,
    stake1: f64,
    stake2: f64,
    decision1: &MoveDecision,
    decision2: &MoveDecision,
) -> Option<RoundOutcome> {
    let mut balances = world.resource_mut::<Balances>();

    if balances.0.debit(agent1, stake1).is_err() {
        return None;
    }
    if balances.0.debit(agent2, stake2).is_err() {
        // Undo the first lock so the skip is a true no-op
        balances.0.credit(agent1, stake1);
        return None;
    }

    let (payout1, payout2) = payoffs(decision1.cooperate, decision2.cooperate, stake1, stake2);
    balances.0.credit(agent1, payout1);
    balances.0.credit(agent2, payout2);

    Some(RoundOutcome {
        payout1,
        payout2,
        receipt: None,
        settled: true,
    })
}

/// Verified path: drive the full commit-reveal protocol on the ledger.
///
/// Any step failure is captured into the receipt; payouts report zero and
/// the caller leaves agent state untouched.
fn run_verified(
    world: &mut World,
    agent1: &str,
    agent2: &str,
    stake1: f64,
    stake2: f64,
    decision1: &MoveDecision,
    decision2: &MoveDecision,
) -> Option<RoundOutcome> {
    let mut receipt = SettlementReceipt::default();

    let result = world.resource_scope(|world, mut ledger: Mut<SettlementLedger>| {
        let mut balances = world.resource_mut::<Balances>();
        drive_protocol(
            &mut ledger.0,
            &mut balances.0,
            &mut receipt,
            agent1,
            agent2,
            stake1,
            stake2,
            decision1.cooperate,
            decision2.cooperate,
        )
    });

    match result {
        Ok((payout1, payout2)) => {
            receipt.settled = true;
            Some(RoundOutcome {
                payout1,
                payout2,
                receipt: Some(receipt),
                settled: true,
            })
        }
        Err(e) => {
            tracing::warn!(agent1, agent2, error = %e, "settlement failed");
            receipt.fail(e.to_string());
            Some(RoundOutcome {
                payout1: 0.0,
                payout2: 0.0,
                receipt: Some(receipt),
                settled: false,
            })
        }
    }
}

/// The protocol sequence, strictly in order. Each accepted call records
/// its transaction reference before the next step runs.
#[allow(clippy::too_many_arguments)]
fn drive_protocol(
    contract: &mut LedgerContract,
    balances: &mut settlement::MemoryBalances,
    receipt: &mut SettlementReceipt,
    agent1: &str,
    agent2: &str,
    stake1: f64,
    stake2: f64,
    cooperate1: bool,
    cooperate2: bool,
) -> Result<(f64, f64), SettlementError> {
    let (game_id, tx) = contract.create_game(balances, agent1, agent2, stake1)?;
    receipt.game_id = Some(game_id);
    receipt.push_tx("create", agent1, tx.tx_id);

    let tx = contract.join_game(balances, game_id, agent2, stake2)?;
    receipt.push_tx("join", agent2, tx.tx_id);

    // Salts come from the OS random source, fresh per commit
    let salt1 = random_salt();
    let salt2 = random_salt();

    let tx = contract.commit_move(game_id, agent1, commitment_digest(cooperate1, &salt1))?;
    receipt.push_tx("commit", agent1, tx.tx_id);
    let tx = contract.commit_move(game_id, agent2, commitment_digest(cooperate2, &salt2))?;
    receipt.push_tx("commit", agent2, tx.tx_id);

    let tx = contract.reveal_move(balances, game_id, agent1, cooperate1, &salt1)?;
    receipt.push_tx("reveal", agent1, tx.tx_id);
    let tx = contract.reveal_move(balances, game_id, agent2, cooperate2, &salt2)?;
    receipt.push_tx("reveal", agent2, tx.tx_id);

    // The second accepted reveal settles the game
    let game = contract.get_game(game_id)?;
    Ok(game.payouts.unwrap_or((0.0, 0.0)))
}

/// Write back one side's post-game state.
fn apply_updates(
    world: &mut World,
    side: &SideView,
    partner: &str,
    my_move: bool,
    partner_move: bool,
    stake: f64,
    payout: f64,
) {
    world.resource_scope(|world, mut relationships: Mut<RelationshipLedger>| {
        let Some(mut memory) = relationships.get(&side.name, partner).cloned() else {
            return;
        };

        let mut profile = side.profile.clone();
        let mut emotion = EmotionalState(side.emotion);
        decision::update_after_game(
            &mut profile,
            &mut memory,
            &mut emotion,
            my_move,
            partner_move,
            stake,
            payout,
        );

        if let Some(mut component) = world.get_mut::<AgentProfile>(side.entity) {
            *component = profile;
        }
        if let Some(mut component) = world.get_mut::<EmotionalState>(side.entity) {
            component.0 = emotion.0;
        }
        relationships.insert(&side.name, memory);
    });
}
