//! Read-only view of a completed tick for renderers and traces

use serde::{Deserialize, Serialize};

use super::GenerationPhase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirdView {
    pub x: f32,
    pub y: f32,
    pub tilt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeView {
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundView {
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generation: u32,
    pub tick: u64,
    pub score: u32,
    pub phase: GenerationPhase,
    pub birds: Vec<BirdView>,
    pub pipes: Vec<PipeView>,
    pub ground: GroundView,
}
