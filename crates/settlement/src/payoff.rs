//! Payoff Calculation
//!
//! The staked Prisoner's Dilemma payoff table. Each side's payout is a
//! function only of its own stake and the joint outcome, never the
//! opponent's stake, which keeps asymmetric stakes safe.

/// Constants for the payoff table
pub mod payoff_constants {
    /// Multiplier on own stake when both sides cooperate
    pub const MUTUAL_COOPERATION: f64 = 1.5;
    /// Multiplier on own stake when both sides defect
    pub const MUTUAL_DEFECTION: f64 = 0.5;
    /// Multiplier on own stake for a unilateral defector
    pub const DEFECTOR_BONUS: f64 = 2.5;
    /// Payout for a unilaterally betrayed cooperator
    pub const SUCKER_PAYOUT: f64 = 0.0;
}

/// Compute both payouts for a round.
///
/// `true` means cooperate. Returns `(payout1, payout2)`.
pub fn payoffs(cooperate1: bool, cooperate2: bool, stake1: f64, stake2: f64) -> (f64, f64) {
    use payoff_constants::*;

    match (cooperate1, cooperate2) {
        (true, true) => (stake1 * MUTUAL_COOPERATION, stake2 * MUTUAL_COOPERATION),
        (false, false) => (stake1 * MUTUAL_DEFECTION, stake2 * MUTUAL_DEFECTION),
        (false, true) => (stake1 * DEFECTOR_BONUS, SUCKER_PAYOUT),
        (true, false) => (SUCKER_PAYOUT, stake2 * DEFECTOR_BONUS),
    }
}
