//! Training environment for controller search
//!
//! Runs one generation after another against a population source, keeps
//! per-generation statistics and writes them to `stats.json`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use flapsim_core::evaluator::{evaluate_generation, GenerationSummary, PopulationSource};
use flapsim_core::SimConfig;
use indicatif::{ProgressBar, ProgressStyle};

use super::report::TrainingReport;
use crate::config::TrainingSettings;

/// Main training environment
pub struct TrainingEnv<S: PopulationSource> {
    /// Simulation settings shared by every generation
    pub sim: SimConfig,
    /// Training configuration
    pub config: TrainingSettings,
    source: S,
    report: TrainingReport,
    show_progress: bool,
}

impl<S: PopulationSource> TrainingEnv<S> {
    /// Create a training environment
    ///
    /// When the simulation has no score budget of its own, the target score
    /// becomes the budget so a solving generation ends there.
    pub fn new(mut sim: SimConfig, config: TrainingSettings, source: S) -> Self {
        if sim.run.max_score.is_none() {
            sim.run.max_score = config.target_score;
        }
        let report = TrainingReport::new(sim.run.seed, config.target_score);

        Self {
            sim,
            config,
            source,
            report,
            show_progress: true,
        }
    }

    /// Disable the progress bar (tests, piped output)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn report(&self) -> &TrainingReport {
        &self.report
    }

    pub fn stats_history(&self) -> &[GenerationSummary] {
        &self.report.generations
    }

    pub fn stats_path(&self) -> PathBuf {
        PathBuf::from(&self.config.output_dir).join("stats.json")
    }

    fn progress_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }

    /// Run the training loop
    pub fn run(&mut self) -> Result<()> {
        self.sim
            .validate()
            .context("Invalid simulation configuration")?;

        let pb = if self.show_progress {
            ProgressBar::new(self.config.generations as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(Self::progress_style());
        pb.enable_steady_tick(Duration::from_millis(100));

        log::info!(
            "Training for up to {} generations (seed {}, target score {:?})",
            self.config.generations,
            self.sim.run.seed,
            self.config.target_score
        );

        let started = Instant::now();
        for generation in 0..self.config.generations {
            let summary = evaluate_generation(&mut self.source, &self.sim, generation)
                .with_context(|| format!("Failed to evaluate generation {}", generation))?;

            pb.set_message(format!(
                "best: {:.1} | mean: {:.1} | score: {}",
                summary.best_fitness, summary.mean_fitness, summary.score
            ));
            pb.inc(1);

            if generation % 5 == 0 {
                log::info!(
                    "Gen {}: best={:.2}, mean={:.2}, score={}, ticks={}",
                    generation,
                    summary.best_fitness,
                    summary.mean_fitness,
                    summary.score,
                    summary.ticks
                );
            }

            let solved = self.report.record(summary);
            if solved && self.config.stop_when_solved {
                pb.println(format!("Solved at generation {}", generation));
                break;
            }
        }
        self.report.duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        pb.finish_with_message("Training complete!");
        log::info!("{}", self.report.summary());

        let path = self.stats_path();
        self.report.save_json(&path)?;
        log::info!("Saved training statistics to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flapsim_core::evaluator::{Candidate, GapCentering, GenerationReport, NeverFlap};
    use flapsim_core::GenerationPhase;

    /// Proposes a fixed line-up and counts what comes back
    struct FixedSource {
        centering: bool,
        absorbed: u32,
    }

    impl PopulationSource for FixedSource {
        fn propose(&mut self, _generation: u32) -> Vec<Candidate> {
            let mut population = vec![Candidate::new(NeverFlap)];
            if self.centering {
                population.push(Candidate::new(GapCentering::new(48.0)));
            }
            population
        }

        fn absorb(&mut self, _report: GenerationReport) {
            self.absorbed += 1;
        }
    }

    fn settings(dir: &std::path::Path, generations: u32) -> TrainingSettings {
        TrainingSettings {
            generations,
            output_dir: dir.to_string_lossy().into_owned(),
            target_score: Some(3),
            ..TrainingSettings::default()
        }
    }

    #[test]
    fn test_target_score_becomes_budget() {
        let dir = tempfile::tempdir().unwrap();
        let source = FixedSource {
            centering: false,
            absorbed: 0,
        };
        let env = TrainingEnv::new(SimConfig::default(), settings(dir.path(), 1), source);
        assert_eq!(env.sim.run.max_score, Some(3));

        let mut sim = SimConfig::default();
        sim.run.max_score = Some(7);
        let source = FixedSource {
            centering: false,
            absorbed: 0,
        };
        let env = TrainingEnv::new(sim, settings(dir.path(), 1), source);
        assert_eq!(env.sim.run.max_score, Some(7));
    }

    #[test]
    fn test_runs_every_generation_when_unsolved() {
        let dir = tempfile::tempdir().unwrap();
        let source = FixedSource {
            centering: false,
            absorbed: 0,
        };
        let mut env =
            TrainingEnv::new(SimConfig::default(), settings(dir.path(), 4), source).without_progress();
        env.run().unwrap();

        assert_eq!(env.source().absorbed, 4);
        assert_eq!(env.stats_history().len(), 4);
        assert!(env
            .stats_history()
            .iter()
            .all(|s| s.phase == GenerationPhase::Extinct));
        assert_eq!(env.report().solved_at, None);

        let saved = TrainingReport::from_json(env.stats_path()).unwrap();
        assert_eq!(saved.generations.len(), 4);
    }

    #[test]
    fn test_stops_when_solved() {
        let dir = tempfile::tempdir().unwrap();
        let source = FixedSource {
            centering: true,
            absorbed: 0,
        };
        let mut env =
            TrainingEnv::new(SimConfig::default(), settings(dir.path(), 10), source).without_progress();
        env.run().unwrap();

        assert_eq!(env.report().solved_at, Some(0));
        assert_eq!(env.stats_history().len(), 1);
        assert_eq!(env.stats_history()[0].score, 3);
        assert_eq!(env.source().absorbed, 1);
    }
}
