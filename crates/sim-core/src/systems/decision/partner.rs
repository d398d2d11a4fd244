//! Partner Selection
//!
//! Compatibility scoring and the autonomous partner choice, plus the
//! rematch decision that feeds bond evaluation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::AgentProfile;
use crate::components::social::{RelationshipLedger, RelationshipMemory};
use crate::style::{self, RematchRule, SelectionRule};

/// Constants for compatibility scoring
pub mod compat_constants {
    /// Starting score before any adjustment
    pub const BASE_SCORE: f32 = 50.0;
    /// Bonus per shared goal
    pub const GOAL_OVERLAP_BONUS: f32 = 10.0;
    /// Bonus scale for balanced combined skill totals
    pub const SKILL_BALANCE_BONUS: f32 = 10.0;
    /// Weight on existing trust
    pub const TRUST_WEIGHT: f32 = 0.3;
    /// Weight on existing bond strength
    pub const BOND_WEIGHT: f32 = 0.2;
    /// Weight on the candidate's reputation
    pub const REPUTATION_WEIGHT: f32 = 0.1;
    /// Half-range of the jitter used for unlisted style pairs
    pub const STYLE_JITTER: i32 = 10;
}

/// Compatibility score with a candidate, clamped to [0, 100].
///
/// `my_memory` is this agent's memory of the candidate, if any; history
/// raises the score through trust and bond strength.
pub fn compatibility<R: Rng>(
    me: &AgentProfile,
    my_memory: Option<&RelationshipMemory>,
    candidate: &AgentProfile,
    rng: &mut R,
) -> f32 {
    use compat_constants::*;

    let mut score = BASE_SCORE;

    // Value alignment: how many goals overlap
    let overlap = me
        .goals
        .iter()
        .filter(|goal| candidate.has_goal(**goal))
        .count();
    score += overlap as f32 * GOAL_OVERLAP_BONUS;

    // Skill complementarity: similar combined totals bond better
    let skill_diff = (me.traits.skill_total() - candidate.traits.skill_total()).abs();
    score += (1.0 - skill_diff) * SKILL_BALANCE_BONUS;

    // Attachment style pairing, with symmetric jitter for unlisted pairs
    score += style::pair_affinity(me.attachment_style, candidate.attachment_style)
        .unwrap_or_else(|| rng.gen_range(-STYLE_JITTER..=STYLE_JITTER) as f32);

    // Shared history
    if let Some(memory) = my_memory {
        score += memory.trust * TRUST_WEIGHT;
        score += memory.bond_strength * BOND_WEIGHT;
    }

    score += candidate.reputation * REPUTATION_WEIGHT;

    score.clamp(0.0, 100.0)
}

/// Autonomously choose a partner from the candidate pool.
///
/// Candidates are ranked by compatibility and the top candidate is
/// accepted only above the style's threshold. The disorganized style
/// ignores scoring entirely. Returns `None` when nothing clears the bar or
/// the pool is empty.
pub fn select_partner<'a, R: Rng>(
    me: &AgentProfile,
    relationships: &RelationshipLedger,
    candidates: &[&'a AgentProfile],
    rng: &mut R,
) -> Option<&'a AgentProfile> {
    if candidates.is_empty() {
        return None;
    }

    match me.attachment_style.params().selection {
        SelectionRule::RandomChance(chance) => {
            if rng.gen_bool(chance) {
                candidates.choose(rng).copied()
            } else {
                None
            }
        }
        SelectionRule::ScoreAbove(threshold) => {
            let mut scored: Vec<(f32, &AgentProfile)> = candidates
                .iter()
                .filter(|candidate| candidate.name != me.name)
                .map(|candidate| {
                    let memory = relationships.get(&me.name, &candidate.name);
                    (compatibility(me, memory, candidate, rng), *candidate)
                })
                .collect();
            if scored.is_empty() {
                return None;
            }
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

            let (top_score, top) = scored[0];
            (top_score > threshold).then_some(top)
        }
    }
}

/// Does this agent want to keep playing this partner?
///
/// Defaults to yes before any shared history exists.
pub fn wants_rematch<R: Rng>(
    me: &AgentProfile,
    memory: Option<&RelationshipMemory>,
    rng: &mut R,
) -> bool {
    let Some(memory) = memory else {
        return true;
    };
    match me.attachment_style.params().rematch {
        RematchRule::TrustAbove(threshold) => memory.trust > threshold,
        RematchRule::CoinFlip => rng.gen_bool(0.5),
    }
}
