//! A single pipe pair

use serde::{Deserialize, Serialize};

use crate::collision::Rect;

/// Two pipe bodies, above and below a vertical gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub gap_center_y: f32,
    pub gap_height: f32,
    pub width: f32,
    /// Length of each pipe body
    pub length: f32,
    /// Set once the lead bird has crossed the trailing edge
    pub passed: bool,
}

impl Pipe {
    pub fn new(x: f32, gap_center_y: f32, gap_height: f32, width: f32, length: f32) -> Self {
        Self {
            x,
            gap_center_y,
            gap_height,
            width,
            length,
            passed: false,
        }
    }

    /// Lower edge of the top pipe
    pub fn gap_top(&self) -> f32 {
        self.gap_center_y - self.gap_height / 2.0
    }

    /// Upper edge of the bottom pipe
    pub fn gap_bottom(&self) -> f32 {
        self.gap_center_y + self.gap_height / 2.0
    }

    /// Right edge
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    pub fn top_region(&self) -> Rect {
        Rect::new(self.x, self.gap_top() - self.length, self.width, self.length)
    }

    pub fn bottom_region(&self) -> Rect {
        Rect::new(self.x, self.gap_bottom(), self.width, self.length)
    }
}
