//! Schelling Segregation Simulation
//!
//! Headless step driver: runs the model until every agent is satisfied or
//! the step limit is hit, reporting the happy count each step and writing
//! JSON snapshots for viewers.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use schelling_core::config::{Config, DEFAULT_CONFIG_PATH};
use schelling_core::output::{self, SnapshotGenerator, StatsSummary};
use schelling_core::Simulation;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "schelling")]
#[command(about = "Schelling segregation model with two city centers")]
struct Args {
    /// TOML config file (defaults to schelling.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Chance for a cell to start populated
    #[arg(long)]
    density: Option<f64>,

    /// Chance for an agent to be in the minority
    #[arg(long)]
    minority_pc: Option<f64>,

    /// Minimum similar/unsimilar ratio away from the city centers
    #[arg(long)]
    homophily: Option<f64>,

    /// Neighbor search radius
    #[arg(long)]
    radius: Option<u32>,

    /// Manhattan distance that counts as near a city center
    #[arg(long)]
    distance: Option<u32>,

    /// Spacing of the two city centers
    #[arg(long)]
    city_distance: Option<f64>,

    /// Maximum number of steps to run
    #[arg(long)]
    steps: Option<u64>,

    /// Steps between snapshot files
    #[arg(long)]
    snapshot_interval: Option<u64>,

    #[arg(long)]
    output_dir: Option<String>,

    /// Do not write snapshot files
    #[arg(long)]
    no_snapshots: bool,

    /// Print the grid after every step
    #[arg(long)]
    render: bool,
}

impl Args {
    fn load_config(&self) -> Result<Config, schelling_core::ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load_or_default(),
            None => Config::default(),
        };

        let model = &mut config.model;
        if let Some(seed) = self.seed {
            model.seed = Some(seed);
        }
        if let Some(width) = self.width {
            model.width = width;
        }
        if let Some(height) = self.height {
            model.height = height;
        }
        if let Some(density) = self.density {
            model.density = density;
        }
        if let Some(minority_pc) = self.minority_pc {
            model.minority_pc = minority_pc;
        }
        if let Some(homophily) = self.homophily {
            model.homophily = homophily;
        }
        if let Some(radius) = self.radius {
            model.radius = radius;
        }
        if let Some(distance) = self.distance {
            model.distance = distance;
        }
        if let Some(city_distance) = self.city_distance {
            model.city_distance = Some(city_distance);
        }

        let run = &mut config.run;
        if let Some(steps) = self.steps {
            run.max_steps = steps;
        }
        if let Some(interval) = self.snapshot_interval {
            run.snapshot_interval = interval;
        }
        if let Some(dir) = &self.output_dir {
            run.output_dir = dir.clone();
        }
        if self.no_snapshots {
            run.write_snapshots = false;
        }
        if self.render {
            run.render = true;
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("schelling=info,schelling_core=info")),
        )
        .init();

    let args = Args::parse();
    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Could not load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let model = &config.model;
    println!("Schelling Segregation Model");
    println!("===========================");
    println!("Grid: {}x{}", model.width, model.height);
    println!("Density: {}  Minority: {}", model.density, model.minority_pc);
    println!("Homophily: {}  Radius: {}", model.homophily, model.radius);
    println!(
        "Near-city distance: {}  City distance: {:.2}",
        model.distance,
        model.effective_city_distance()
    );
    match model.seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: (entropy)"),
    }
    println!();

    let mut sim = match Simulation::new(config.model.clone()) {
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!("Invalid model: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let run = &config.run;
    let mut generator = SnapshotGenerator::new(run.snapshot_interval);
    emit(&sim, &mut generator, run.write_snapshots, &run.output_dir, false);
    if run.render {
        print!("{}", output::generate_snapshot(&sim, "preview").render_ascii());
    }

    while sim.steps() < run.max_steps {
        if sim.step().is_none() {
            break;
        }
        println!("[Step {:>4}] {}", sim.steps(), sim.happy_report());
        if run.render {
            print!("{}", output::generate_snapshot(&sim, "preview").render_ascii());
            println!();
        }
        emit(&sim, &mut generator, run.write_snapshots, &run.output_dir, false);
    }

    // Always capture the final state
    emit(&sim, &mut generator, run.write_snapshots, &run.output_dir, true);
    if run.write_snapshots {
        if let Err(e) = output::write_history(sim.history(), &run.output_dir) {
            tracing::warn!("Could not write history: {}", e);
        }
    }

    let summary = StatsSummary::collect(&sim);
    println!();
    if summary.converged {
        println!("Converged after {} steps.", summary.steps);
    } else {
        println!("Stopped after {} steps without converging.", summary.steps);
    }
    println!(
        "Satisfied: {} / {} ({:.1}%), peak {}",
        summary.final_satisfied,
        summary.total_agents,
        summary.satisfied_share() * 100.0,
        summary.peak_satisfied
    );
    if let Some(index) = summary.segregation_index {
        println!("Segregation index: {:.3}", index);
    }
    if run.write_snapshots {
        println!("Generated {} snapshots.", generator.snapshot_count());
    }

    ExitCode::SUCCESS
}

/// Write a snapshot when one is due (or `force`d) and not already written
/// for this step
fn emit(sim: &Simulation, generator: &mut SnapshotGenerator, enabled: bool, dir: &str, force: bool) {
    let step = sim.steps();
    let due = force || generator.should_snapshot(step);
    if !enabled || !due || generator.last_snapshot_step() == Some(step) {
        return;
    }

    let snapshot = output::generate_snapshot(sim, &generator.next_id());
    if let Err(e) = output::write_snapshot_to_dir(&snapshot, dir) {
        tracing::warn!("Could not write snapshot at step {}: {}", step, e);
    }
    if let Err(e) = output::write_current_state(&snapshot, dir) {
        tracing::warn!("Could not write current state at step {}: {}", step, e);
    }
    generator.mark_snapshot(step);
}
