//! Procedural pipe generation, scrolling and retirement

use super::{Pipe, SpawnRng};
use crate::config::{FieldConfig, PipeConfig};

/// Places new pipes past the right edge and scrolls existing ones left
#[derive(Debug, Clone)]
pub struct PipeSpawner {
    config: PipeConfig,
    spawn_x: f32,
}

impl PipeSpawner {
    pub fn new(config: &PipeConfig, field: &FieldConfig) -> Self {
        Self {
            config: config.clone(),
            spawn_x: field.width + config.spawn_offset,
        }
    }

    /// Create a pipe at the spawn column with a random gap centre
    pub fn spawn<R: SpawnRng + ?Sized>(&self, rng: &mut R) -> Pipe {
        let gap_center_y = rng.gen_range_f32(self.config.gap_center_min, self.config.gap_center_max);
        Pipe::new(
            self.spawn_x,
            gap_center_y,
            self.config.gap_height,
            self.config.width as f32,
            self.config.height as f32,
        )
    }

    /// Scroll one tick
    pub fn step(&self, pipe: &mut Pipe) {
        pipe.x -= self.config.speed;
    }

    /// The whole pipe has left the field on the left
    pub fn is_off_field(&self, pipe: &Pipe) -> bool {
        pipe.trailing_edge() < 0.0
    }
}
