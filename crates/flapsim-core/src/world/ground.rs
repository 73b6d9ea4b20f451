//! Looping ground strip
//!
//! Two congruent segments scroll left together. Whichever one has fully
//! left the field jumps to the right of the other, so the strip is endless
//! with constant state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
    segment_width: f32,
}

impl Ground {
    pub fn new(y: f32, segment_width: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: segment_width,
            segment_width,
        }
    }

    pub fn step(&mut self, speed: f32) {
        self.x1 -= speed;
        self.x2 -= speed;

        if self.x1 + self.segment_width < 0.0 {
            self.x1 = self.x2 + self.segment_width;
        }
        if self.x2 + self.segment_width < 0.0 {
            self.x2 = self.x1 + self.segment_width;
        }
    }
}
