//! # flapsim-core - generational evaluation of flapping agents
//!
//! A population of birds, each flown by a pluggable [`Controller`], is run
//! through a procedurally generated field of pipe pairs on a fixed tick until
//! every bird has crashed or a budget runs out. The result is one fitness
//! value per controller.
//!
//! Nothing here renders, reads input or learns: those are the caller's job.

pub mod collision;
pub mod config;
pub mod entity;
pub mod evaluator;
pub mod world;

pub use config::{ConfigError, SimConfig};
pub use evaluator::{
    Candidate, Controller, ControllerId, GenerationPhase, GenerationReport, Observation,
    PopulationEvaluator, PopulationSource, Snapshot,
};

/// Common imports for callers driving the evaluator
pub mod prelude {
    pub use crate::collision::DeathCause;
    pub use crate::config::SimConfig;
    pub use crate::evaluator::{
        AlwaysFlap, Candidate, Controller, ControllerId, Evaluation, GapCentering,
        GenerationPhase, GenerationReport, NeverFlap, Observation, PopulationEvaluator,
        PopulationSource,
    };
}
