//! Attachment Style Parameters
//!
//! Every attachment-style-conditioned number in the decision engine lives
//! in one strategy table here, selected by lookup rather than scattered
//! branching. The values are behavioral tuning constants with no deeper
//! derivation; treat them as configuration.

use rand::Rng;

use crate::components::agent::AttachmentStyle;

/// How a style shifts the base cooperation probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoopBias {
    /// Fixed additive offset
    Offset(f32),
    /// Uniform random offset in [-range, range], drawn per decision
    Jitter(f32),
}

/// How a style accepts a ranked partner candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionRule {
    /// Accept the top candidate only above this compatibility score
    ScoreAbove(f32),
    /// Ignore scoring; pick a uniformly random candidate with this chance
    RandomChance(f64),
}

/// Initial trust toward a brand-new partner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrustInit {
    Fixed(f32),
    /// Uniform draw from [low, high)
    Uniform(f32, f32),
}

/// Willingness to keep playing an existing partner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RematchRule {
    TrustAbove(f32),
    /// Independent 50% chance each evaluation
    CoinFlip,
}

/// Per-style decision parameters
#[derive(Debug, Clone)]
pub struct StyleParams {
    pub coop_bias: CoopBias,
    /// Rationale attached when the bias fires
    pub coop_bias_reason: &'static str,
    /// Extra cooperation while the relationship is young (anxious)
    pub early_game_bonus: f32,
    /// Game count below which the early-game bonus applies
    pub early_game_cutoff: u32,
    /// Cooperation penalty per past betrayal (anxious)
    pub betrayal_coop_penalty: f32,
    pub selection: SelectionRule,
    pub initial_trust: TrustInit,
    /// Scales the trust loss when betrayed
    pub betrayal_trust_multiplier: f32,
    /// Emotional hit taken when betrayed
    pub betrayal_emotion_penalty: f32,
    pub rematch: RematchRule,
}

const SECURE: StyleParams = StyleParams {
    coop_bias: CoopBias::Offset(0.2),
    coop_bias_reason: "Securely building connection",
    early_game_bonus: 0.0,
    early_game_cutoff: 0,
    betrayal_coop_penalty: 0.0,
    selection: SelectionRule::ScoreAbove(50.0),
    initial_trust: TrustInit::Fixed(70.0),
    betrayal_trust_multiplier: 1.0,
    betrayal_emotion_penalty: 10.0,
    rematch: RematchRule::TrustAbove(40.0),
};

const ANXIOUS: StyleParams = StyleParams {
    coop_bias: CoopBias::Offset(0.0),
    coop_bias_reason: "",
    early_game_bonus: 0.3,
    early_game_cutoff: 3,
    betrayal_coop_penalty: 0.15,
    selection: SelectionRule::ScoreAbove(30.0),
    initial_trust: TrustInit::Fixed(50.0),
    betrayal_trust_multiplier: 2.0,
    betrayal_emotion_penalty: 20.0,
    rematch: RematchRule::TrustAbove(20.0),
};

const AVOIDANT: StyleParams = StyleParams {
    coop_bias: CoopBias::Offset(-0.3),
    coop_bias_reason: "Keeping emotional distance",
    early_game_bonus: 0.0,
    early_game_cutoff: 0,
    betrayal_coop_penalty: 0.0,
    selection: SelectionRule::ScoreAbove(70.0),
    initial_trust: TrustInit::Fixed(30.0),
    betrayal_trust_multiplier: 0.5,
    betrayal_emotion_penalty: 10.0,
    rematch: RematchRule::TrustAbove(70.0),
};

const DISORGANIZED: StyleParams = StyleParams {
    coop_bias: CoopBias::Jitter(0.3),
    coop_bias_reason: "Unpredictable emotional flux",
    early_game_bonus: 0.0,
    early_game_cutoff: 0,
    betrayal_coop_penalty: 0.0,
    selection: SelectionRule::RandomChance(0.5),
    initial_trust: TrustInit::Uniform(20.0, 80.0),
    betrayal_trust_multiplier: 1.0,
    betrayal_emotion_penalty: 10.0,
    rematch: RematchRule::CoinFlip,
};

impl AttachmentStyle {
    /// Decision parameters for this style.
    pub const fn params(self) -> &'static StyleParams {
        match self {
            AttachmentStyle::Secure => &SECURE,
            AttachmentStyle::Anxious => &ANXIOUS,
            AttachmentStyle::Avoidant => &AVOIDANT,
            AttachmentStyle::Disorganized => &DISORGANIZED,
        }
    }
}

/// Initial trust toward a new partner, drawing from the RNG only for
/// styles with a random range.
pub fn initial_trust<R: Rng>(style: AttachmentStyle, rng: &mut R) -> f32 {
    match style.params().initial_trust {
        TrustInit::Fixed(value) => value,
        TrustInit::Uniform(low, high) => rng.gen_range(low..high),
    }
}

/// Pairwise attachment-style affinity for compatibility scoring.
///
/// Unlisted pairs return `None`; the caller substitutes a symmetric random
/// jitter in [-10, 10].
pub fn pair_affinity(a: AttachmentStyle, b: AttachmentStyle) -> Option<f32> {
    use AttachmentStyle::{Anxious, Avoidant, Disorganized, Secure};
    match (a, b) {
        (Secure, Secure) => Some(20.0),
        (Secure, Anxious) => Some(10.0),
        (Secure, Avoidant) => Some(5.0),
        (Anxious, Secure) => Some(15.0),
        (Anxious, Anxious) => Some(-10.0),
        (Anxious, Avoidant) => Some(-20.0),
        (Avoidant, Secure) => Some(5.0),
        (Avoidant, Anxious) => Some(-15.0),
        (Avoidant, Avoidant) => Some(0.0),
        (Disorganized, Secure) => Some(0.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_style_has_params() {
        for style in AttachmentStyle::all() {
            // Lookup must be total; the multipliers are always positive
            assert!(style.params().betrayal_trust_multiplier > 0.0);
        }
    }

    #[test]
    fn test_betrayal_multipliers() {
        assert_eq!(
            AttachmentStyle::Anxious.params().betrayal_trust_multiplier,
            2.0
        );
        assert_eq!(
            AttachmentStyle::Avoidant.params().betrayal_trust_multiplier,
            0.5
        );
        assert_eq!(
            AttachmentStyle::Secure.params().betrayal_trust_multiplier,
            1.0
        );
    }

    #[test]
    fn test_fixed_initial_trust() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(initial_trust(AttachmentStyle::Secure, &mut rng), 70.0);
        assert_eq!(initial_trust(AttachmentStyle::Anxious, &mut rng), 50.0);
        assert_eq!(initial_trust(AttachmentStyle::Avoidant, &mut rng), 30.0);
    }

    #[test]
    fn test_disorganized_initial_trust_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let trust = initial_trust(AttachmentStyle::Disorganized, &mut rng);
            assert!((20.0..80.0).contains(&trust));
        }
    }

    #[test]
    fn test_affinity_table_listed_pairs() {
        use AttachmentStyle::{Anxious, Avoidant, Secure};
        assert_eq!(pair_affinity(Secure, Secure), Some(20.0));
        assert_eq!(pair_affinity(Anxious, Avoidant), Some(-20.0));
        // The table is intentionally not symmetric
        assert_eq!(pair_affinity(Secure, Anxious), Some(10.0));
        assert_eq!(pair_affinity(Anxious, Secure), Some(15.0));
    }

    #[test]
    fn test_affinity_table_unlisted_pairs() {
        use AttachmentStyle::{Anxious, Disorganized, Secure};
        assert_eq!(pair_affinity(Secure, Disorganized), None);
        assert_eq!(pair_affinity(Disorganized, Anxious), None);
        assert_eq!(pair_affinity(Disorganized, Disorganized), None);
    }
}
