//! Murmuration - headless runner
//!
//! Loads a scenario, steps the simulation at a fixed frame rate and prints a summary.
//! Agents can be grown periodically through the dispatcher, the way an interactive host
//! would on a key press.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use murmuration::command::Command;
use murmuration::core::config::{FlockConfig, ScenarioConfig};
use murmuration::core::error::Result;
use murmuration::simulation::Simulation;

/// Headless boids runner
#[derive(Parser, Debug)]
#[command(name = "murmuration")]
#[command(about = "Run a flocking scenario headless and report what happened")]
struct Args {
    /// Scenario TOML file (defaults to one flock in the default bounds)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 20.0)]
    seconds: f32,

    /// Host frames per simulated second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Random seed, overrides the scenario's
    #[arg(long)]
    seed: Option<u64>,

    /// Enqueue `add_increment` agents into the first flock every N simulated seconds
    #[arg(long)]
    add_every: Option<f32>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FlockSummary {
    name: String,
    population: usize,
    predator: bool,
}

#[derive(Serialize)]
struct RunSummary {
    seed: Option<u64>,
    frames: u64,
    simulated_seconds: f32,
    wall_seconds: f64,
    flocking_ticks: u64,
    random_ticks: u64,
    obstacle_roam_ticks: u64,
    growth_jobs: usize,
    neighbor_contributions: usize,
    steering_contributions: usize,
    boundary_corrections: usize,
    obstacles: usize,
    flocks: Vec<FlockSummary>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("murmuration=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut config = match &args.scenario {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    if config.flocks.is_empty() {
        tracing::warn!("Scenario has no flocks, adding a default one");
        config.flocks.push(FlockConfig::named("flock"));
    }
    if args.seed.is_some() {
        config.engine.seed = args.seed;
    }

    let mut sim = Simulation::from_config(&config)?;
    let fps = args.fps.max(1);
    let dt = 1.0 / fps as f32;
    let frames = (args.seconds.max(0.0) * fps as f32).round() as u64;
    let grow_into = config.flocks[0].name.clone();
    let handle = sim.dispatcher.handle();

    tracing::info!(
        "Running {} frames at {} fps with {} agents",
        frames,
        fps,
        sim.world.agent_count()
    );

    let mut summary = RunSummary {
        seed: config.engine.seed,
        frames,
        simulated_seconds: frames as f32 * dt,
        wall_seconds: 0.0,
        flocking_ticks: 0,
        random_ticks: 0,
        obstacle_roam_ticks: 0,
        growth_jobs: 0,
        neighbor_contributions: 0,
        steering_contributions: 0,
        boundary_corrections: 0,
        obstacles: 0,
        flocks: Vec::new(),
    };

    let start = Instant::now();
    let mut since_growth = 0.0;
    for _ in 0..frames {
        if let Some(every) = args.add_every {
            since_growth += dt;
            if every > 0.0 && since_growth >= every {
                since_growth -= every;
                handle.enqueue_command(Command::AddAgentsByName {
                    flock: grow_into.clone(),
                    count: config.engine.add_increment,
                })?;
            }
        }

        let report = sim.step(dt);
        summary.growth_jobs += report.jobs_drained;
        summary.neighbor_contributions += report.flocking.contributions;
        summary.steering_contributions += report.frame.contributions;
        summary.boundary_corrections += report.frame.boundary_corrections;
    }

    // Growth queued on the final frame still lands
    sim.dispatcher.stop();
    summary.growth_jobs += sim.dispatcher.drain(&mut sim.world);

    summary.wall_seconds = start.elapsed().as_secs_f64();
    summary.flocking_ticks = sim.world.ticks.flocking;
    summary.random_ticks = sim.world.ticks.random;
    summary.obstacle_roam_ticks = sim.world.ticks.obstacle_roam;
    summary.obstacles = sim.world.obstacles().len();
    summary.flocks = sim
        .world
        .flocks()
        .iter()
        .map(|f| FlockSummary {
            name: f.name().to_string(),
            population: f.population(),
            predator: f.config.is_predator,
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== MURMURATION ===");
    match summary.seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: (entropy)"),
    }
    println!(
        "Frames: {} ({:.1}s simulated, {:.2}s wall)",
        summary.frames, summary.simulated_seconds, summary.wall_seconds
    );
    println!(
        "Ticks: flocking {}, random {}, obstacle roam {}",
        summary.flocking_ticks, summary.random_ticks, summary.obstacle_roam_ticks
    );
    println!("Growth jobs: {}", summary.growth_jobs);
    println!(
        "Contributions: {} neighbor, {} obstacle/predator",
        summary.neighbor_contributions, summary.steering_contributions
    );
    println!("Boundary corrections: {}", summary.boundary_corrections);
    println!("Obstacles: {}", summary.obstacles);
    println!("Flocks:");
    for flock in &summary.flocks {
        let role = if flock.predator { " (predator)" } else { "" };
        println!("  {:<16} {:>6}{}", flock.name, flock.population, role);
    }
}
