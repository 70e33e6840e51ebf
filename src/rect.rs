use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// Axis-aligned region: left-top corner and width-height, in frame pixels
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size whose center is at `center`.
    #[inline]
    pub fn centered(center: na::Point2<f64>, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    /// Only rectangles with positive area are ever tracked.
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    #[inline(always)]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline(always)]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline(always)]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    #[inline]
    pub fn center(&self) -> na::Point2<f64> {
        na::Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn with_size(&self, width: f64, height: f64) -> Self {
        Self::new(self.x, self.y, width, height)
    }

    /// Left-top, right-top and left-bottom corners; enough to pin an affine map.
    #[inline]
    pub fn corners(&self) -> [na::Point2<f64>; 3] {
        [
            na::Point2::new(self.x, self.y),
            na::Point2::new(self.right(), self.y),
            na::Point2::new(self.x, self.bottom()),
        ]
    }
}
