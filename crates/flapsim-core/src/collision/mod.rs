//! Bird-versus-pipe and bird-versus-boundary collision
//!
//! Pipe hits are tested on pixel masks with integer offsets. Positions are
//! rounded once, the same way for bird and pipe, so sub-pixel heights never
//! open or close a one-pixel seam.

mod mask;

pub use mask::Mask;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::config::{BirdConfig, FieldConfig, PipeConfig};
use crate::entity::Bird;
use crate::world::Pipe;

/// Why a bird left the population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Pipe,
    Ground,
    Ceiling,
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Open intersection; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    fn rounded(&self) -> Rect {
        Rect::new(self.x.round(), self.y.round(), self.width, self.height)
    }
}

/// Holds the sprite masks and answers collision queries
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    bird_mask: Mask,
    pipe_mask: Mask,
}

impl CollisionDetector {
    pub fn new(bird: &BirdConfig, pipe: &PipeConfig) -> Self {
        Self {
            bird_mask: Mask::ellipse(bird.width, bird.height),
            pipe_mask: Mask::solid(pipe.width, pipe.height),
        }
    }

    /// Bird sprite box at its rounded position
    pub fn bird_rect(&self, bird: &Bird) -> Rect {
        Rect::new(
            bird.x().round(),
            bird.y().round(),
            self.bird_mask.width() as f32,
            self.bird_mask.height() as f32,
        )
    }

    /// Cheap pre-check: does the bird's box touch either pipe body's box
    pub fn bounding_boxes_overlap(&self, bird: &Bird, pipe: &Pipe) -> bool {
        let bird_rect = self.bird_rect(bird);
        bird_rect.intersects(&pipe.top_region().rounded())
            || bird_rect.intersects(&pipe.bottom_region().rounded())
    }

    /// Pixel-accurate bird/pipe test
    pub fn collides(&self, bird: &Bird, pipe: &Pipe) -> bool {
        if !self.bounding_boxes_overlap(bird, pipe) {
            return false;
        }

        let origin = IVec2::new(bird.x().round() as i32, bird.y().round() as i32);
        [pipe.top_region(), pipe.bottom_region()]
            .iter()
            .any(|region| {
                let offset = IVec2::new(region.x.round() as i32, region.y.round() as i32) - origin;
                // Only scan the pipe body the bird's box actually touches
                self.bird_mask.bounding_overlap(&self.pipe_mask, offset)
                    && self.bird_mask.overlap(&self.pipe_mask, offset).is_some()
            })
    }

    /// Ground contact or escape above the ceiling allowance
    pub fn boundary_contact(
        &self,
        bird: &Bird,
        bird_config: &BirdConfig,
        field: &FieldConfig,
    ) -> Option<DeathCause> {
        let sprite_bottom = bird.y() + bird_config.height as f32 - field.ground_sink_allowance;
        if sprite_bottom >= field.ground_y {
            Some(DeathCause::Ground)
        } else if bird.y() < -field.ceiling_allowance {
            Some(DeathCause::Ceiling)
        } else {
            None
        }
    }
}
