//! Post-Round Learning
//!
//! State updates applied to each side independently after a game: counters
//! and last outcome, trust, bond strength, emotional state, reputation,
//! and the adaptive trait adjustment. Balance movement is the
//! orchestrator's job and never happens here.

use crate::components::agent::{AgentProfile, EmotionalState};
use crate::components::social::{LastOutcome, RelationshipMemory};

/// Constants for post-round updates
pub mod learning_constants {
    /// Trust delta when both cooperate
    pub const TRUST_MUTUAL_COOPERATION: f32 = 5.0;
    /// Trust delta when both defect
    pub const TRUST_MUTUAL_DEFECTION: f32 = -2.0;
    /// Trust delta when betrayed, before the style multiplier
    pub const TRUST_BETRAYAL: f32 = -15.0;
    /// Trust delta when exploiting a cooperator (guilt)
    pub const TRUST_EXPLOITATION_GUILT: f32 = -5.0;

    /// Bond delta when both cooperate
    pub const BOND_MUTUAL_COOPERATION: f32 = 8.0;
    /// Bond delta when both defect
    pub const BOND_MUTUAL_DEFECTION: f32 = -3.0;
    /// Bond delta on any unilateral outcome
    pub const BOND_UNILATERAL: f32 = -10.0;

    /// Emotional swing from a profitable or losing round
    pub const EMOTION_PROFIT_SWING: f32 = 5.0;

    /// Reputation gain for cooperating
    pub const REPUTATION_COOPERATION: f32 = 0.5;
    /// Reputation loss for defecting
    pub const REPUTATION_DEFECTION: f32 = 0.3;

    /// Base learning rate, scaled by adaptability
    pub const LEARNING_RATE: f32 = 0.01;
    /// Learned traits never leave [TRAIT_FLOOR, TRAIT_CEILING]
    pub const TRAIT_FLOOR: f32 = 0.1;
    pub const TRAIT_CEILING: f32 = 0.9;
}

/// Apply every post-round update for one side of a game.
///
/// `my_move`/`partner_move` are true for cooperation. `payout` is what
/// this side received for its `stake`.
pub fn update_after_game(
    profile: &mut AgentProfile,
    memory: &mut RelationshipMemory,
    emotional_state: &mut EmotionalState,
    my_move: bool,
    partner_move: bool,
    stake: f64,
    payout: f64,
) {
    use learning_constants::*;

    memory.total_games += 1;
    memory.total_earnings += payout - stake;

    if partner_move {
        memory.times_cooperated += 1;
        memory.last_outcome = Some(LastOutcome::Cooperated);
    } else {
        memory.times_defected += 1;
        memory.last_outcome = Some(LastOutcome::Defected);
    }

    if my_move && !partner_move {
        memory.times_betrayed += 1;
    } else if !my_move && partner_move {
        memory.times_exploited += 1;
    }

    update_trust(profile, memory, my_move, partner_move);
    update_bond(memory, my_move, partner_move);
    update_emotion(profile, emotional_state, my_move, partner_move, stake, payout);

    if my_move {
        profile.adjust_reputation(REPUTATION_COOPERATION);
    } else {
        profile.adjust_reputation(-REPUTATION_DEFECTION);
    }

    adapt_parameters(profile, partner_move, stake, payout);
}

/// Trust reacts to the joint outcome, scaled by attachment style for
/// betrayals.
fn update_trust(
    profile: &AgentProfile,
    memory: &mut RelationshipMemory,
    my_move: bool,
    partner_move: bool,
) {
    use learning_constants::*;

    let delta = match (my_move, partner_move) {
        (true, true) => TRUST_MUTUAL_COOPERATION,
        (false, false) => TRUST_MUTUAL_DEFECTION,
        (true, false) => {
            TRUST_BETRAYAL * profile.attachment_style.params().betrayal_trust_multiplier
        }
        (false, true) => TRUST_EXPLOITATION_GUILT,
    };
    memory.adjust_trust(delta);
}

fn update_bond(memory: &mut RelationshipMemory, my_move: bool, partner_move: bool) {
    use learning_constants::*;

    let delta = match (my_move, partner_move) {
        (true, true) => BOND_MUTUAL_COOPERATION,
        (false, false) => BOND_MUTUAL_DEFECTION,
        _ => BOND_UNILATERAL,
    };
    memory.adjust_bond(delta);
}

fn update_emotion(
    profile: &AgentProfile,
    emotional_state: &mut EmotionalState,
    my_move: bool,
    partner_move: bool,
    stake: f64,
    payout: f64,
) {
    use learning_constants::*;

    let profit = payout - stake;
    if profit > 0.0 {
        emotional_state.adjust(EMOTION_PROFIT_SWING);
    } else if profit < 0.0 {
        emotional_state.adjust(-EMOTION_PROFIT_SWING);
    }

    // Being betrayed hurts beyond the money
    if my_move && !partner_move {
        emotional_state.adjust(-profile.attachment_style.params().betrayal_emotion_penalty);
    }
}

/// Nudge risk tolerance and fairness toward whatever worked, at a rate set
/// by the adaptability skill.
fn adapt_parameters(profile: &mut AgentProfile, partner_move: bool, stake: f64, payout: f64) {
    use learning_constants::*;

    let profit = payout - stake;
    let rate = LEARNING_RATE * profile.traits.skill_adaptability;

    if profit > 0.0 {
        profile.traits.risk_tolerance += rate;
    } else {
        profile.traits.risk_tolerance -= rate;
    }

    if partner_move {
        profile.traits.ethics_fairness += rate;
    } else {
        // Defection teaches self-protection twice as fast
        profile.traits.ethics_fairness -= rate * 2.0;
    }

    profile.traits.risk_tolerance = profile.traits.risk_tolerance.clamp(TRAIT_FLOOR, TRAIT_CEILING);
    profile.traits.ethics_fairness = profile.traits.ethics_fairness.clamp(TRAIT_FLOOR, TRAIT_CEILING);
}
