//! Training results and reporting

use std::path::Path;

use anyhow::{Context, Result};
use flapsim_core::evaluator::GenerationSummary;
use flapsim_core::GenerationPhase;
use serde::{Deserialize, Serialize};

/// Report written at the end of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Seed the simulation was run with
    pub seed: u64,

    /// Score that counted as solved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_score: Option<u32>,

    /// First generation that reached the target score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solved_at: Option<u32>,

    /// Wall-clock time of the whole run (milliseconds)
    pub duration_ms: f64,

    /// One entry per evaluated generation
    pub generations: Vec<GenerationSummary>,
}

impl TrainingReport {
    pub fn new(seed: u64, target_score: Option<u32>) -> Self {
        Self {
            seed,
            target_score,
            solved_at: None,
            duration_ms: 0.0,
            generations: Vec::new(),
        }
    }

    /// Append a generation, marking the run solved on the first one that
    /// hits the target
    pub fn record(&mut self, summary: GenerationSummary) -> bool {
        let solved = self.is_solving(&summary);
        if solved && self.solved_at.is_none() {
            self.solved_at = Some(summary.generation);
        }
        self.generations.push(summary);
        solved
    }

    fn is_solving(&self, summary: &GenerationSummary) -> bool {
        match self.target_score {
            Some(target) => {
                summary.phase == GenerationPhase::BudgetExhausted && summary.score >= target
            }
            None => false,
        }
    }

    pub fn best_fitness(&self) -> f32 {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn best_score(&self) -> u32 {
        self.generations.iter().map(|g| g.score).max().unwrap_or(0)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        let solved = match self.solved_at {
            Some(generation) => format!("solved at generation {}", generation),
            None => "not solved".to_string(),
        };
        format!(
            "{} generations | best fitness: {:.2} | best score: {} | {} | {:.1}s",
            self.generations.len(),
            if self.generations.is_empty() {
                0.0
            } else {
                self.best_fitness()
            },
            self.best_score(),
            solved,
            self.duration_ms / 1000.0
        )
    }

    /// Save report to JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize training report to JSON")?;

        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path.as_ref(), json).with_context(|| {
            format!(
                "Failed to write training report: {}",
                path.as_ref().display()
            )
        })?;

        Ok(())
    }

    /// Load report from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read report file: {}", path.as_ref().display()))?;

        let report = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON report: {}", path.as_ref().display()))?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(generation: u32, phase: GenerationPhase, score: u32) -> GenerationSummary {
        GenerationSummary {
            generation,
            phase,
            ticks: 100,
            score,
            population: 10,
            best_fitness: score as f32 * 5.0 + 10.0,
            mean_fitness: 3.0,
        }
    }

    #[test]
    fn test_record_marks_first_solving_generation() {
        let mut report = TrainingReport::new(0, Some(5));
        assert!(!report.record(summary(0, GenerationPhase::Extinct, 2)));
        assert!(report.record(summary(1, GenerationPhase::BudgetExhausted, 5)));
        assert!(report.record(summary(2, GenerationPhase::BudgetExhausted, 5)));

        assert_eq!(report.solved_at, Some(1));
        assert_eq!(report.best_score(), 5);
        assert_eq!(report.best_fitness(), 35.0);
    }

    #[test]
    fn test_tick_budget_is_not_solving() {
        let mut report = TrainingReport::new(0, Some(5));
        // Tick budget ran out before the target score
        assert!(!report.record(summary(0, GenerationPhase::BudgetExhausted, 3)));
        assert_eq!(report.solved_at, None);

        let mut open_ended = TrainingReport::new(0, None);
        assert!(!open_ended.record(summary(0, GenerationPhase::BudgetExhausted, 99)));
    }

    #[test]
    fn test_training_report_json() {
        let mut report = TrainingReport::new(42, Some(3));
        report.record(summary(0, GenerationPhase::Extinct, 1));
        report.duration_ms = 1500.0;

        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"seed\": 42"));
        assert!(json.contains("\"Extinct\""));
        assert!(!json.contains("solved_at"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("stats.json");
        report.save_json(&path).unwrap();

        let loaded = TrainingReport::from_json(&path).unwrap();
        assert_eq!(loaded.seed, 42);
        assert_eq!(loaded.generations, report.generations);
    }

    #[test]
    fn test_summary_text() {
        let report = TrainingReport::new(0, None);
        assert!(report.summary().contains("0 generations"));
        assert!(report.summary().contains("not solved"));
    }
}
