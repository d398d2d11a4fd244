//! Agent Spawning
//!
//! Builds a diverse roster: shuffled attachment-style distribution, random
//! goal sets, and uniformly drawn traits, funded through the balance
//! oracle.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::agent::{
    Agent, AgentId, AgentProfile, AttachmentStyle, EmotionalState, GoalTag, Traits,
};
use crate::components::economy::Balances;
use crate::config::SimConfig;

/// Default roster names, extended with numbered names past ten agents
pub const ROSTER_NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry", "Iris", "Jack",
];

/// Attachment distribution for a ten-agent roster: three secure, three
/// anxious, two avoidant, two disorganized, repeated for larger
/// populations and shuffled before assignment.
const STYLE_PATTERN: &[AttachmentStyle] = &[
    AttachmentStyle::Secure,
    AttachmentStyle::Secure,
    AttachmentStyle::Secure,
    AttachmentStyle::Anxious,
    AttachmentStyle::Anxious,
    AttachmentStyle::Anxious,
    AttachmentStyle::Avoidant,
    AttachmentStyle::Avoidant,
    AttachmentStyle::Disorganized,
    AttachmentStyle::Disorganized,
];

fn agent_name(index: usize) -> String {
    ROSTER_NAMES
        .get(index)
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| format!("Agent{:02}", index + 1))
}

fn style_distribution(count: usize, rng: &mut SmallRng) -> Vec<AttachmentStyle> {
    let mut styles: Vec<AttachmentStyle> = STYLE_PATTERN.iter().copied().cycle().take(count).collect();
    styles.shuffle(rng);
    styles
}

/// One to three distinct goals per agent
fn random_goals(rng: &mut SmallRng) -> Vec<GoalTag> {
    let mut goals: Vec<GoalTag> = GoalTag::all().to_vec();
    goals.shuffle(rng);
    let count = rng.gen_range(1..=3);
    goals.truncate(count);
    goals
}

fn random_traits(rng: &mut SmallRng) -> Traits {
    Traits {
        risk_tolerance: rng.gen_range(0.2..0.9),
        ethics_fairness: rng.gen_range(0.3..0.9),
        ethics_reciprocity: rng.gen_range(0.4..1.0),
        skill_negotiation: rng.gen_range(0.3..0.9),
        skill_patience: rng.gen_range(0.3..0.9),
        skill_adaptability: rng.gen_range(0.3..0.9),
    }
}

/// Spawn the whole population and fund every account.
///
/// Returns the spawned agent names in spawn order.
pub fn spawn_population(world: &mut World, rng: &mut SmallRng, config: &SimConfig) -> Vec<String> {
    let styles = style_distribution(config.agents, rng);
    let mut names = Vec::with_capacity(config.agents);

    for (index, style) in styles.into_iter().enumerate() {
        let name = agent_name(index);
        let goals = random_goals(rng);
        let traits = random_traits(rng);
        let reputation = rng.gen_range(40.0..60.0);

        // The draw ranges above are all inside the valid trait bounds
        let profile = AgentProfile::new(name.clone(), style, goals, traits, reputation)
            .expect("generated traits are in range");

        world.spawn((
            Agent,
            AgentId(name.clone()),
            profile,
            EmotionalState::default(),
        ));
        world
            .resource_mut::<Balances>()
            .fund(&name, config.initial_balance);
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn spawn_world(agents: usize, seed: u64) -> (World, Vec<String>) {
        let mut world = World::new();
        world.insert_resource(Balances::new());
        let config = SimConfig {
            agents,
            ..SimConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(seed);
        let names = spawn_population(&mut world, &mut rng, &config);
        (world, names)
    }

    #[test]
    fn test_spawns_requested_count_with_funding() {
        let (mut world, names) = spawn_world(10, 42);
        assert_eq!(names.len(), 10);

        let mut query = world.query::<(&AgentId, &AgentProfile, &EmotionalState)>();
        let mut seen = 0;
        for (id, profile, emotion) in query.iter(&world) {
            assert_eq!(id.0, profile.name);
            assert_eq!(emotion.0, 50.0);
            seen += 1;
        }
        assert_eq!(seen, 10);

        let balances = world.resource::<Balances>();
        for name in &names {
            assert_eq!(balances.balance(name), 10.0);
        }
    }

    #[test]
    fn test_ten_agent_style_distribution() {
        let (mut world, _) = spawn_world(10, 7);
        let mut query = world.query::<&AgentProfile>();

        let mut secure = 0;
        let mut anxious = 0;
        let mut avoidant = 0;
        let mut disorganized = 0;
        for profile in query.iter(&world) {
            match profile.attachment_style {
                AttachmentStyle::Secure => secure += 1,
                AttachmentStyle::Anxious => anxious += 1,
                AttachmentStyle::Avoidant => avoidant += 1,
                AttachmentStyle::Disorganized => disorganized += 1,
            }
        }
        assert_eq!((secure, anxious, avoidant, disorganized), (3, 3, 2, 2));
    }

    #[test]
    fn test_goals_and_traits_in_range() {
        let (mut world, _) = spawn_world(20, 11);
        let mut query = world.query::<&AgentProfile>();
        for profile in query.iter(&world) {
            assert!(!profile.goals.is_empty());
            assert!(profile.goals.len() <= 3);
            assert!((0.2..0.9).contains(&profile.traits.risk_tolerance));
            assert!((0.4..1.0).contains(&profile.traits.ethics_reciprocity));
            assert!((40.0..60.0).contains(&profile.reputation));
        }
    }

    #[test]
    fn test_names_extend_past_roster() {
        let (_, names) = spawn_world(12, 3);
        assert_eq!(names[0], "Alice");
        assert_eq!(names[9], "Jack");
        assert_eq!(names[10], "Agent11");
        assert_eq!(names[11], "Agent12");
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let (_, names1) = spawn_world(10, 99);
        let (_, names2) = spawn_world(10, 99);
        assert_eq!(names1, names2);
    }
}
