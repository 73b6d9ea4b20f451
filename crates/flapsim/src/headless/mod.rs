//! Headless runs of the population evaluator
//!
//! - Feedforward network controllers
//! - A random-search population source with an elite of one
//! - The multi-generation training loop and its JSON report
//! - Per-tick snapshot traces for external viewers

mod neural;
mod random_search;
mod report;
mod trace;
mod training_env;

pub use neural::{FeedforwardController, INPUT_DIM};
pub use random_search::{Champion, RandomSearch};
pub use report::TrainingReport;
pub use trace::{replay, TraceWriter};
pub use training_env::TrainingEnv;
