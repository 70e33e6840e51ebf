//! Overlay compositing.
//!
//! Every located slot gets its overlay image scaled by a damped area ratio,
//! centered on the tracked rectangle and alpha-blended over the frame. The blend
//! is a plain "over" composite that treats the base frame as opaque.

use crate::frame::{Frame, OverlayImage};
use crate::math::{affine_from_points, damp_toward_one, transform_point};
use crate::rect::Rect;

use nalgebra as na;

/// Weight pulling the overlay scale toward 1 so it does not jitter with every
/// small change of the tracked box.
pub const SIZE_DAMPING: f64 = 0.3;

pub const OUTLINE_COLOR: [u8; 3] = [0, 0, 255];
pub const OUTLINE_THICKNESS: usize = 2;

/// Where an overlay of `overlay_w`x`overlay_h` lands for `target`.
pub fn fit_overlay(overlay_w: f64, overlay_h: f64, target: &Rect) -> Rect {
    let area_ratio = (target.area() / (overlay_w * overlay_h)).sqrt();
    let ratio = damp_toward_one(area_ratio, SIZE_DAMPING);

    Rect::centered(target.center(), overlay_w * ratio, overlay_h * ratio)
}

/// Returns a copy of `base` with `overlay` composited onto `target`.
pub fn composite(base: &Frame, overlay: &OverlayImage, target: &Rect) -> Frame {
    let mut out = base.clone();
    composite_into(&mut out, overlay, target);
    out
}

/// In-place variant of [`composite`].
pub fn composite_into(base: &mut Frame, overlay: &OverlayImage, target: &Rect) {
    if overlay.is_empty() || base.is_empty() || !target.is_valid() {
        return;
    }

    let (ow, oh) = (overlay.width() as f64, overlay.height() as f64);
    let dst = fit_overlay(ow, oh, target);
    let src = Rect::new(0.0, 0.0, ow, oh);

    let inverse = match affine_from_points(&src.corners(), &dst.corners())
        .and_then(|m| m.try_inverse())
    {
        Some(m) => m,
        None => return,
    };

    // one pixel of slack on each side for the interpolation fringe
    let x0 = (dst.x - 1.0).floor().max(0.0) as usize;
    let y0 = (dst.y - 1.0).floor().max(0.0) as usize;
    let x1 = (dst.right() + 1.0).ceil().min(base.width() as f64) as usize;
    let y1 = (dst.bottom() + 1.0).ceil().min(base.height() as f64) as usize;

    for y in y0..y1 {
        for x in x0..x1 {
            let p = transform_point(&inverse, na::Point2::new(x as f64, y as f64));
            let sample = sample_bilinear(overlay, p.x, p.y);

            if sample[3] <= 0.0 {
                continue;
            }

            let alpha = sample[3] / 255.0;
            let under = base.pixel(x, y);
            let mut blended = [0u8; 3];

            for c in 0..3 {
                let v = sample[c] * alpha + under[c] as f32 * (1.0 - alpha);
                blended[c] = v.round().clamp(0.0, 255.0) as u8;
            }

            base.set_pixel(x, y, blended);
        }
    }
}

/// Bilinear BGRA sample at source position (`x`, `y`); taps outside the image
/// read as fully transparent black.
fn sample_bilinear(img: &OverlayImage, x: f64, y: f64) -> [f32; 4] {
    let fx = x.floor();
    let fy = y.floor();
    let (dx, dy) = ((x - fx) as f32, (y - fy) as f32);
    let (ix, iy) = (fx as i64, fy as i64);

    let taps = [
        (ix, iy, (1.0 - dx) * (1.0 - dy)),
        (ix + 1, iy, dx * (1.0 - dy)),
        (ix, iy + 1, (1.0 - dx) * dy),
        (ix + 1, iy + 1, dx * dy),
    ];

    let (w, h) = (img.width() as i64, img.height() as i64);
    let mut out = [0.0f32; 4];

    for (tx, ty, weight) in taps {
        if weight == 0.0 || tx < 0 || ty < 0 || tx >= w || ty >= h {
            continue;
        }

        for (c, acc) in out.iter_mut().enumerate() {
            *acc += img.data[[ty as usize, tx as usize, c]] as f32 * weight;
        }
    }

    out
}

/// Unfilled rectangle, `thickness` pixels wide, drawn inside `rect`'s bounds.
pub fn draw_outline(frame: &mut Frame, rect: &Rect, color: [u8; 3], thickness: usize) {
    if frame.is_empty() || !rect.is_valid() {
        return;
    }

    let t = thickness.max(1) as i64;
    let (left, top) = (rect.x.round() as i64, rect.y.round() as i64);
    let (right, bottom) = (
        rect.right().round() as i64 - 1,
        rect.bottom().round() as i64 - 1,
    );

    let (fw, fh) = (frame.width() as i64, frame.height() as i64);

    for y in top.max(0)..=bottom.min(fh - 1) {
        for x in left.max(0)..=right.min(fw - 1) {
            let on_edge =
                x < left + t || x > right - t || y < top + t || y > bottom - t;

            if on_edge {
                frame.set_pixel(x as usize, y as usize, color);
            }
        }
    }
}

/// Holds the session's overlay images, in slot order.
#[derive(Debug, Clone, Default)]
pub struct Compositor {
    overlays: Vec<OverlayImage>,
}

impl Compositor {
    pub fn new(overlays: Vec<OverlayImage>) -> Self {
        Self { overlays }
    }

    /// Draws every `(slot index, rect)` in the order given. Slot `i` uses
    /// overlay `i`; a slot with no overlay gets an outline.
    pub fn render<'a, I>(&self, frame: &mut Frame, slots: I)
    where
        I: IntoIterator<Item = (usize, &'a Rect)>,
    {
        for (idx, rect) in slots {
            match self.overlays.get(idx) {
                Some(overlay) => composite_into(frame, overlay, rect),
                None => draw_outline(frame, rect, OUTLINE_COLOR, OUTLINE_THICKNESS),
            }
        }
    }
}
