//! Controller capability and a few scripted policies
//!
//! The evaluator only ever holds `Box<dyn Controller>`; anything that maps an
//! observation to a scalar can fly a bird.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// What a controller sees each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Top of the bird sprite
    pub bird_y: f32,
    /// `bird_y - gap_top` of the reference pipe
    pub to_gap_top: f32,
    /// `bird_y - gap_bottom` of the reference pipe
    pub to_gap_bottom: f32,
}

impl Observation {
    pub fn new(bird_y: f32, gap_top: f32, gap_bottom: f32) -> Self {
        Self {
            bird_y,
            to_gap_top: bird_y - gap_top,
            to_gap_bottom: bird_y - gap_bottom,
        }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.bird_y, self.to_gap_top, self.to_gap_bottom]
    }
}

/// Policy deciding whether a bird jumps
///
/// Outputs above the configured threshold mean "jump". Non-finite outputs
/// are treated as "don't jump".
pub trait Controller: Send {
    fn decide(&mut self, observation: &Observation) -> f32;
}

impl<F> Controller for F
where
    F: FnMut(&Observation) -> f32 + Send,
{
    fn decide(&mut self, observation: &Observation) -> f32 {
        self(observation)
    }
}

/// Identifier the population source uses to match results to its candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControllerId(u64);

static NEXT_CONTROLLER_ID: AtomicU64 = AtomicU64::new(1);

impl ControllerId {
    /// Allocate a fresh process-unique id
    pub fn next() -> Self {
        ControllerId(NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn from_raw(id: u64) -> Self {
        NEXT_CONTROLLER_ID.fetch_max(id.saturating_add(1), Ordering::Relaxed);
        ControllerId(id)
    }
}

impl std::fmt::Display for ControllerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Controller({})", self.0)
    }
}

/// A controller entered into a generation
pub struct Candidate {
    pub id: ControllerId,
    pub controller: Box<dyn Controller>,
}

impl Candidate {
    pub fn new(controller: impl Controller + 'static) -> Self {
        Self {
            id: ControllerId::next(),
            controller: Box::new(controller),
        }
    }

    pub fn with_id(id: ControllerId, controller: Box<dyn Controller>) -> Self {
        Self { id, controller }
    }
}

impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate").field("id", &self.id).finish()
    }
}

/// Never jumps
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFlap;

impl Controller for NeverFlap {
    fn decide(&mut self, _observation: &Observation) -> f32 {
        0.0
    }
}

/// Jumps every tick
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFlap;

impl Controller for AlwaysFlap {
    fn decide(&mut self, _observation: &Observation) -> f32 {
        1.0
    }
}

/// Keeps the bird's centre hovering around the gap midpoint
///
/// Jumps whenever the sprite centre sinks more than `tolerance` below the
/// midpoint. With the default kinematics a jump lifts the bird ~96px, so a
/// tolerance of 35 keeps the whole sprite inside a 200px gap.
#[derive(Debug, Clone, Copy)]
pub struct GapCentering {
    pub bird_height: f32,
    pub tolerance: f32,
}

impl GapCentering {
    pub fn new(bird_height: f32) -> Self {
        Self {
            bird_height,
            tolerance: 35.0,
        }
    }
}

impl Controller for GapCentering {
    fn decide(&mut self, observation: &Observation) -> f32 {
        // centre - midpoint, expressed through the two gap distances
        let below_midpoint = self.bird_height / 2.0
            + (observation.to_gap_top + observation.to_gap_bottom) / 2.0;
        if below_midpoint > self.tolerance {
            1.0
        } else {
            0.0
        }
    }
}
