//! Controller id allocation at the edge of the id space
//!
//! Lives in its own test binary because `from_raw` moves the process-wide
//! counter.

use flapsim_core::evaluator::{Candidate, ControllerId, NeverFlap};

#[test]
fn test_from_raw_accepts_largest_id() {
    let id = ControllerId::from_raw(u64::MAX);
    assert_eq!(id.raw(), u64::MAX);
    assert_eq!(id.to_string(), format!("Controller({})", u64::MAX));

    let candidate = Candidate::with_id(id, Box::new(NeverFlap));
    assert_eq!(candidate.id, id);
}
