//! Agent Components
//!
//! Components for individual agents: identity, personality profile, and
//! emotional state.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker component identifying an entity as an agent
#[derive(Component, Debug, Clone, Default)]
pub struct Agent;

/// Unique identifier for an agent
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

/// Attachment style - fixed at creation, parameterizes trust and risk
/// behavior throughout the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentStyle {
    Secure,
    Anxious,
    Avoidant,
    Disorganized,
}

impl AttachmentStyle {
    /// Returns all attachment style variants.
    pub fn all() -> &'static [AttachmentStyle] {
        &[
            AttachmentStyle::Secure,
            AttachmentStyle::Anxious,
            AttachmentStyle::Avoidant,
            AttachmentStyle::Disorganized,
        ]
    }
}

impl std::fmt::Display for AttachmentStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentStyle::Secure => write!(f, "secure"),
            AttachmentStyle::Anxious => write!(f, "anxious"),
            AttachmentStyle::Avoidant => write!(f, "avoidant"),
            AttachmentStyle::Disorganized => write!(f, "disorganized"),
        }
    }
}

/// What an agent is playing for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTag {
    /// Maximize credit earnings
    Profit,
    /// Try different partners
    Exploration,
    /// Optimize strategy over time
    Learning,
    /// Form long-term bonds
    Stability,
}

impl GoalTag {
    /// Returns all goal variants.
    pub fn all() -> &'static [GoalTag] {
        &[
            GoalTag::Profit,
            GoalTag::Exploration,
            GoalTag::Learning,
            GoalTag::Stability,
        ]
    }
}

impl std::fmt::Display for GoalTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalTag::Profit => write!(f, "profit"),
            GoalTag::Exploration => write!(f, "exploration"),
            GoalTag::Learning => write!(f, "learning"),
            GoalTag::Stability => write!(f, "stability"),
        }
    }
}

/// Agent personality traits
/// All values are 0.0 to 1.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traits {
    /// Willingness to risk larger stakes
    pub risk_tolerance: f32,
    /// How much they value fairness
    pub ethics_fairness: f32,
    /// How much they value tit-for-tat
    pub ethics_reciprocity: f32,
    /// Bargaining ability
    pub skill_negotiation: f32,
    /// Tolerance for slow-building relationships
    pub skill_patience: f32,
    /// How quickly parameters adapt after each game
    pub skill_adaptability: f32,
}

impl Traits {
    /// Combined skill total, used for complementarity scoring.
    pub fn skill_total(&self) -> f32 {
        self.skill_negotiation + self.skill_patience + self.skill_adaptability
    }

    fn validate(&self) -> Result<(), ProfileError> {
        let fields = [
            ("risk_tolerance", self.risk_tolerance),
            ("ethics_fairness", self.ethics_fairness),
            ("ethics_reciprocity", self.ethics_reciprocity),
            ("skill_negotiation", self.skill_negotiation),
            ("skill_patience", self.skill_patience),
            ("skill_adaptability", self.skill_adaptability),
        ];
        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ProfileError::TraitOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

impl Default for Traits {
    fn default() -> Self {
        Self {
            risk_tolerance: 0.5,
            ethics_fairness: 0.5,
            ethics_reciprocity: 0.5,
            skill_negotiation: 0.5,
            skill_patience: 0.5,
            skill_adaptability: 0.5,
        }
    }
}

/// Errors raised at agent construction. Malformed profiles fail fast here
/// instead of being silently clamped later.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("agent name must not be empty")]
    EmptyName,

    #[error("trait {name} must be in [0, 1], got {value}")]
    TraitOutOfRange { name: &'static str, value: f32 },

    #[error("reputation must be in [0, 100], got {value}")]
    ReputationOutOfRange { value: f32 },
}

/// Full agent profile: identity, personality, and goals
///
/// Mutated only by the post-round learning step and the reputation
/// adjustment; never destroyed during a run.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    pub attachment_style: AttachmentStyle,
    pub goals: Vec<GoalTag>,
    pub traits: Traits,
    /// Community reputation, 0 to 100
    pub reputation: f32,
}

impl AgentProfile {
    /// Build a validated profile.
    pub fn new(
        name: impl Into<String>,
        attachment_style: AttachmentStyle,
        goals: Vec<GoalTag>,
        traits: Traits,
        reputation: f32,
    ) -> Result<Self, ProfileError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        traits.validate()?;
        if !(0.0..=100.0).contains(&reputation) {
            return Err(ProfileError::ReputationOutOfRange { value: reputation });
        }
        Ok(Self {
            name,
            attachment_style,
            goals,
            traits,
            reputation,
        })
    }

    pub fn has_goal(&self, goal: GoalTag) -> bool {
        self.goals.contains(&goal)
    }

    /// Adjust reputation with clamping.
    pub fn adjust_reputation(&mut self, delta: f32) {
        self.reputation = (self.reputation + delta).clamp(0.0, 100.0);
    }
}

/// Mood scalar from 0 (despondent) to 100 (elated), feeding back into
/// cooperation probability
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalState(pub f32);

impl EmotionalState {
    /// Adjust with clamping to [0, 100].
    pub fn adjust(&mut self, delta: f32) {
        self.0 = (self.0 + delta).clamp(0.0, 100.0);
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self(50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_construction_validates_traits() {
        let mut traits = Traits::default();
        traits.risk_tolerance = 1.5;

        let err = AgentProfile::new(
            "Alice",
            AttachmentStyle::Secure,
            vec![GoalTag::Profit],
            traits,
            50.0,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ProfileError::TraitOutOfRange {
                name: "risk_tolerance",
                ..
            }
        ));
    }

    #[test]
    fn test_profile_rejects_empty_name() {
        let err = AgentProfile::new(
            "",
            AttachmentStyle::Secure,
            vec![],
            Traits::default(),
            50.0,
        )
        .unwrap_err();
        assert_eq!(err, ProfileError::EmptyName);
    }

    #[test]
    fn test_profile_rejects_bad_reputation() {
        let err = AgentProfile::new(
            "Alice",
            AttachmentStyle::Secure,
            vec![],
            Traits::default(),
            120.0,
        )
        .unwrap_err();
        assert!(matches!(err, ProfileError::ReputationOutOfRange { .. }));
    }

    #[test]
    fn test_reputation_clamps() {
        let mut profile = AgentProfile::new(
            "Alice",
            AttachmentStyle::Secure,
            vec![],
            Traits::default(),
            99.9,
        )
        .unwrap();

        profile.adjust_reputation(5.0);
        assert_eq!(profile.reputation, 100.0);
        for _ in 0..500 {
            profile.adjust_reputation(-0.3);
        }
        assert_eq!(profile.reputation, 0.0);
    }

    #[test]
    fn test_emotional_state_clamps() {
        let mut state = EmotionalState::default();
        state.adjust(70.0);
        assert_eq!(state.0, 100.0);
        state.adjust(-250.0);
        assert_eq!(state.0, 0.0);
    }

    #[test]
    fn test_skill_total() {
        let traits = Traits {
            skill_negotiation: 0.2,
            skill_patience: 0.3,
            skill_adaptability: 0.4,
            ..Traits::default()
        };
        assert!((traits.skill_total() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_style_serialization() {
        assert_eq!(
            serde_json::to_string(&AttachmentStyle::Disorganized).unwrap(),
            r#""disorganized""#
        );
        assert_eq!(serde_json::to_string(&GoalTag::Profit).unwrap(), r#""profit""#);
    }
}
