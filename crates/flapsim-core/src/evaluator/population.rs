//! Boundary to whatever proposes and ranks controllers across generations

use super::{Candidate, GenerationReport};

/// Supplies each generation's candidates and receives their scores
///
/// The evaluator never selects, mutates or persists controllers; it only
/// hands the report back.
pub trait PopulationSource {
    /// Candidates for `generation`, in the order their results will be reported
    fn propose(&mut self, generation: u32) -> Vec<Candidate>;

    /// Final fitness for the generation just evaluated
    fn absorb(&mut self, report: GenerationReport);
}
