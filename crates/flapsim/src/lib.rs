//! # flapsim - headless population runs
//!
//! Wraps [`flapsim_core`] with layered configuration, a baseline population
//! source built on small feedforward networks, a multi-generation training
//! loop with JSON reports, and per-tick snapshot traces.

pub mod config;
pub mod headless;

pub use flapsim_core::{
    Candidate, Controller, GenerationPhase, GenerationReport, Observation, PopulationEvaluator,
    PopulationSource, SimConfig, Snapshot,
};
