//! Stake Sizing
//!
//! How much an agent risks in a round, as a function of its balance, its
//! trust in the partner, and its risk tolerance. The orchestrator applies
//! the live-balance and settlement-mode caps on top.

use crate::components::agent::AgentProfile;
use crate::components::social::RelationshipMemory;

/// Constants for stake sizing
pub mod stake_constants {
    /// Fraction of balance used as the base stake
    pub const BASE_FRACTION: f64 = 0.1;
    /// Hard cap as a fraction of balance
    pub const MAX_FRACTION: f64 = 0.3;
    /// Trust multiplier floor (trust 0 halves the stake)
    pub const TRUST_MULTIPLIER_FLOOR: f64 = 0.5;
    /// Risk multiplier floor (risk tolerance 0 halves the stake)
    pub const RISK_MULTIPLIER_FLOOR: f64 = 0.5;
    /// Risk tolerance contribution to the multiplier
    pub const RISK_MULTIPLIER_SCALE: f64 = 0.5;
}

/// Compute the stake for a round with a partner.
///
/// A missing memory means first contact: no trust multiplier applies.
/// A non-positive balance yields a non-positive stake, which the
/// orchestrator turns into a skipped round.
pub fn calculate_stake(
    me: &AgentProfile,
    memory: Option<&RelationshipMemory>,
    balance: f64,
) -> f64 {
    use stake_constants::*;

    let mut stake = balance * BASE_FRACTION;

    if let Some(memory) = memory {
        stake *= TRUST_MULTIPLIER_FLOOR + f64::from(memory.trust) / 100.0;
    }

    stake *= RISK_MULTIPLIER_FLOOR + f64::from(me.traits.risk_tolerance) * RISK_MULTIPLIER_SCALE;

    stake.min(balance * MAX_FRACTION)
}
