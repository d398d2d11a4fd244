//! Bond Economy Simulation Engine
//!
//! A population of autonomous agents with attachment styles repeatedly
//! plays a staked Prisoner's Dilemma, forming and breaking bonds as trust
//! evolves. Optionally, every match settles through a commit-reveal
//! protocol on a trusted ledger oracle.

use bevy_ecs::prelude::*;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;

use sim_core::components::social::RelationshipLedger;
use sim_core::history::{MatchHistory, MatchLog};
use sim_core::output;
use sim_core::setup;
use sim_core::systems::{
    create_matches, evaluate_bonds, execute_matches, BondRegistry, PendingMatches,
    SettlementLedger,
};
use sim_core::{Balances, RoundClock, SimConfig, SimRng};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "bond_sim")]
#[command(about = "A staked Prisoner's Dilemma economy of autonomous agents")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of rounds to simulate (overrides the config file)
    #[arg(long)]
    rounds: Option<u64>,

    /// Number of agents to spawn (overrides the config file)
    #[arg(long)]
    agents: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settle every match through the commit-reveal ledger
    #[arg(long)]
    verified: bool,

    /// JSONL match log output path
    #[arg(long, default_value = "output/matches.jsonl")]
    match_log: PathBuf,

    /// Final JSON report output path
    #[arg(long, default_value = "output/report.json")]
    report: PathBuf,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => match SimConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(agents) = args.agents {
        config.agents = agents;
    }
    if args.verified {
        config.verified = true;
    }

    println!("Bond Economy Simulation");
    println!("=======================");
    println!("Seed: {}", args.seed);
    println!("Agents: {}", config.agents);
    println!("Rounds: {}", config.rounds);
    println!(
        "Settlement: {}",
        if config.verified { "verified (commit-reveal)" } else { "offline" }
    );
    println!();

    // Ensure output directories exist
    for path in [&args.match_log, &args.report] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                eprintln!("Warning: Could not create output directory: {}", e);
            });
        }
    }

    // Initialize the ECS world
    let mut world = World::new();
    world.insert_resource(SimRng(SmallRng::seed_from_u64(args.seed)));
    world.insert_resource(RoundClock::default());
    world.insert_resource(Balances::new());
    world.insert_resource(RelationshipLedger::new());
    world.insert_resource(BondRegistry::new());
    world.insert_resource(PendingMatches::new());
    world.insert_resource(MatchHistory::new());
    world.insert_resource(SettlementLedger::new(config.settlement.timeout_ticks));

    let match_log = MatchLog::new(&args.match_log).unwrap_or_else(|e| {
        eprintln!("Warning: Could not open match log: {}", e);
        MatchLog::null()
    });
    world.insert_resource(match_log);
    world.insert_resource(config.clone());

    // Spawn agents
    println!("Spawning agents...");
    let roster = {
        // Take the RNG out to avoid borrow conflicts
        let mut sim_rng = world.remove_resource::<SimRng>().unwrap();
        let roster = setup::spawn_population(&mut world, &mut sim_rng.0, &config);
        world.insert_resource(sim_rng);
        roster
    };
    {
        let mut query = world.query::<&sim_core::AgentProfile>();
        for profile in query.iter(&world) {
            let goals: Vec<String> = profile.goals.iter().map(ToString::to_string).collect();
            println!(
                "  {:10} | {:12} | goals: {}",
                profile.name,
                profile.attachment_style.to_string(),
                goals.join(", ")
            );
        }
    }
    println!("  Spawned {} agents", roster.len());
    println!();

    // Create the schedule: matchmaking, round execution, bond evaluation
    let mut schedule = Schedule::default();
    schedule.add_systems((create_matches, execute_matches, evaluate_bonds).chain());

    println!("Starting simulation...");
    println!();

    // Main simulation loop
    let mut games_before = 0;
    for round in 1..=config.rounds {
        world.resource_mut::<RoundClock>().current_round = round;
        schedule.run(&mut world);

        let history = world.resource::<MatchHistory>();
        let played = history.len() - games_before;
        games_before = history.len();
        let bonds = world.resource::<BondRegistry>().len();
        println!(
            "[Round {:>3}] {} matches played, {} active bonds",
            round, played, bonds
        );
    }

    // Final statistics
    println!();
    println!("=======================");
    println!("Final Statistics");
    println!("=======================");
    let stats = output::build_stats(&mut world);
    println!("  Total games played: {}", stats.total_games);
    println!("  Skipped rounds: {}", stats.skipped_rounds);
    println!("  Active bonds remaining: {}", stats.active_bonds);

    println!();
    println!("Final standings:");
    let mut standings: Vec<(&String, &f64)> = stats.agent_balances.iter().collect();
    standings.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (rank, (name, balance)) in standings.iter().enumerate() {
        let profit = *balance - config.initial_balance;
        println!(
            "  #{:<2} {:10} | {:8.2} credits ({:+.2})",
            rank + 1,
            name,
            balance,
            profit
        );
    }

    // Write the report and flush the match log
    if let Err(e) = output::write_report(&mut world, &args.report) {
        eprintln!("Warning: Could not write report: {}", e);
    } else {
        println!();
        println!("Wrote {}", args.report.display());
    }
    if let Err(e) = world.resource_mut::<MatchLog>().flush() {
        eprintln!("Warning: Could not flush match log: {}", e);
    } else {
        println!("Wrote {}", args.match_log.display());
    }
}
