//! Per-pixel occupancy masks
//!
//! Collision between two sprites is decided on the pixels they actually
//! cover, not on their bounding boxes.

use glam::IVec2;

/// Row-major occupancy bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask by evaluating `covered(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, covered: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(covered(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Every pixel covered
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Ellipse inscribed in the `width` x `height` box
    pub fn ellipse(width: u32, height: u32) -> Self {
        let cx = (width as f32 - 1.0) / 2.0;
        let cy = (height as f32 - 1.0) / 2.0;
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 - cx) / rx;
            let dy = (y as f32 - cy) / ry;
            dx * dx + dy * dy <= 1.0
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel lookup; anything outside the mask is uncovered
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Intersection of the two masks' extents, as `(x0, y0, x1, y1)` in this
    /// mask's coordinates
    fn shared_extent(&self, other: &Mask, offset: IVec2) -> Option<(i32, i32, i32, i32)> {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Whether the masks' bounding rectangles overlap at `offset`
    pub fn bounding_overlap(&self, other: &Mask, offset: IVec2) -> bool {
        self.shared_extent(other, offset).is_some()
    }

    /// First pixel (in this mask's coordinates) covered by both masks, with
    /// `other`'s origin placed at `offset`
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let (x0, y0, x1, y1) = self.shared_extent(other, offset)?;

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }
}
