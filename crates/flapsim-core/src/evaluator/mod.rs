//! Generational evaluation: controllers in, per-candidate fitness out

mod controller;
mod generation;
mod population;
mod snapshot;

pub use controller::{
    AlwaysFlap, Candidate, Controller, ControllerId, GapCentering, NeverFlap, Observation,
};
pub use generation::{
    Evaluation, GenerationPhase, GenerationReport, PopulationEvaluator,
};
pub use population::PopulationSource;
pub use snapshot::{BirdView, GroundView, PipeView, Snapshot};

/// Run a whole generation drawn from `source` and hand the report back to it
///
/// Returns the generation's summary (score, ticks, phase) after `absorb`.
pub fn evaluate_generation<S: PopulationSource + ?Sized>(
    source: &mut S,
    config: &crate::config::SimConfig,
    generation: u32,
) -> Result<GenerationSummary, crate::config::ConfigError> {
    let population = source.propose(generation);
    let report = PopulationEvaluator::new(config.clone(), generation, population)?.run();
    let summary = GenerationSummary::from_report(&report);
    source.absorb(report);
    Ok(summary)
}

/// Scalar outcome of a generation, kept after the report itself is handed off
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenerationSummary {
    pub generation: u32,
    pub phase: GenerationPhase,
    pub ticks: u64,
    pub score: u32,
    pub population: usize,
    pub best_fitness: f32,
    pub mean_fitness: f32,
}

impl GenerationSummary {
    pub fn from_report(report: &GenerationReport) -> Self {
        Self {
            generation: report.generation,
            phase: report.phase,
            ticks: report.ticks,
            score: report.score,
            population: report.evaluations.len(),
            best_fitness: report.best().map(|e| e.fitness).unwrap_or(0.0),
            mean_fitness: report.mean_fitness(),
        }
    }
}
