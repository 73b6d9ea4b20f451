//! Bird state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::BirdConfig;

/// One agent of the population
///
/// `position.x` never changes: the world scrolls past the bird.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top-left corner of the sprite
    pub position: Vec2,
    /// Velocity set by the most recent jump (negative = upward)
    pub velocity: f32,
    /// Ticks since the most recent jump
    pub tick_count: u32,
    /// Degrees, positive = nose up
    pub tilt: f32,
    /// Height recorded at the most recent jump
    pub jump_origin_y: f32,
    pub alive: bool,
    /// Index into the population this generation started with
    pub slot: usize,
}

impl Bird {
    /// Create a bird at the configured start position
    pub fn new(config: &BirdConfig, slot: usize) -> Self {
        Self {
            position: Vec2::new(config.start_x, config.start_y),
            velocity: 0.0,
            tick_count: 0,
            tilt: 0.0,
            jump_origin_y: config.start_y,
            alive: true,
            slot,
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }
}
