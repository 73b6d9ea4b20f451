use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flapsim::config::AppConfig;
use flapsim::headless::{replay, RandomSearch, TraceWriter, TrainingEnv};
use flapsim_core::evaluator::{AlwaysFlap, Candidate, GapCentering, GenerationReport, NeverFlap};

/// Scripted controllers for a single-bird run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scripted {
    Never,
    Always,
    Centering,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RON configuration file (default: flapsim.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of generations to train
    #[arg(long)]
    generations: Option<u32>,

    /// Population size per generation
    #[arg(long)]
    population: Option<usize>,

    /// Simulation seed
    #[arg(long)]
    seed: Option<u64>,

    /// End each generation after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Score that counts as solved
    #[arg(long)]
    target_score: Option<u32>,

    /// Output directory for training reports
    #[arg(long)]
    output: Option<String>,

    /// Fly one scripted bird instead of training
    #[arg(long, value_enum)]
    scripted: Option<Scripted>,

    /// Write per-tick snapshots as JSON lines (scripted run, or the champion after training)
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Pace the traced run at the configured tick rate
    #[arg(long)]
    realtime: bool,

    /// Query controllers in parallel
    #[arg(long)]
    parallel: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(generations) = self.generations {
            config.training.generations = generations;
        }
        if let Some(population) = self.population {
            config.training.population_size = population;
        }
        if let Some(seed) = self.seed {
            config.sim.run.seed = seed;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.sim.run.max_ticks = Some(max_ticks);
        }
        if let Some(target) = self.target_score {
            config.training.target_score = Some(target);
        }
        if let Some(output) = &self.output {
            config.training.output_dir = output.clone();
        }
        if self.parallel {
            config.sim.run.parallel_decisions = true;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config
        .sim
        .validate()
        .context("Invalid simulation configuration")?;

    match args.scripted {
        Some(kind) => run_scripted(&args, &config, kind),
        None => run_training(&args, config),
    }
}

fn run_scripted(args: &Args, config: &AppConfig, kind: Scripted) -> Result<()> {
    let candidate = match kind {
        Scripted::Never => Candidate::new(NeverFlap),
        Scripted::Always => Candidate::new(AlwaysFlap),
        Scripted::Centering => Candidate::new(GapCentering::new(config.sim.bird.height as f32)),
    };

    let mut sim = config.sim.clone();
    if sim.run.max_score.is_none() {
        sim.run.max_score = config.training.target_score;
    }

    let report = traced_run(args, &sim, 0, vec![candidate])?;
    print_outcome(&report);
    Ok(())
}

fn run_training(args: &Args, config: AppConfig) -> Result<()> {
    let input_scale = 1.0 / config.sim.field.height;
    let source = RandomSearch::new(
        config.sim.run.seed,
        config.training.population_size,
        config.training.hidden_dim,
        input_scale,
    );

    let mut env = TrainingEnv::new(config.sim, config.training, source);
    env.run()?;
    println!("{}", env.report().summary());

    let Some(champion) = env.source().champion().cloned() else {
        log::warn!("No champion: every generation was empty");
        return Ok(());
    };

    let path = PathBuf::from(&env.config.output_dir).join("best_controller.json");
    champion.save_json(&path)?;
    log::info!(
        "Saved champion from generation {} (fitness {:.2}) to {}",
        champion.generation,
        champion.fitness,
        path.display()
    );

    if args.trace.is_some() {
        let candidate = Candidate::new(champion.controller);
        let report = traced_run(args, &env.sim, champion.generation, vec![candidate])?;
        print_outcome(&report);
    }
    Ok(())
}

fn traced_run(
    args: &Args,
    sim: &flapsim_core::SimConfig,
    generation: u32,
    population: Vec<Candidate>,
) -> Result<GenerationReport> {
    match &args.trace {
        Some(path) => {
            let mut trace = TraceWriter::create(path)?;
            let report = replay(sim, generation, population, Some(&mut trace), args.realtime)?;
            log::info!("Wrote {} snapshots to {}", trace.lines(), path.display());
            trace.finish()?;
            Ok(report)
        }
        None => replay::<std::io::Sink>(sim, generation, population, None, args.realtime),
    }
}

fn print_outcome(report: &GenerationReport) {
    println!(
        "{:?} after {} ticks, score {}",
        report.phase, report.ticks, report.score
    );
    for evaluation in &report.evaluations {
        let cause = evaluation
            .cause
            .map(|c| format!("{:?}", c))
            .unwrap_or_else(|| "survived".to_string());
        println!(
            "  {}: fitness {:.2}, {} ticks, {}",
            evaluation.id, evaluation.fitness, evaluation.ticks_alive, cause
        );
    }
}
