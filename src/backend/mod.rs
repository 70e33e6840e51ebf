//! OpenCV-backed frame source, trackers and window.

mod tracker;
mod video;
mod window;

pub use tracker::{CvTracker, CvTrackerFactory};
pub use video::VideoGrabber;
pub use window::Window;

use crate::error::Error;
use crate::frame::Frame;
use crate::rect::Rect;

use opencv::{
    core::{self, Mat, Scalar},
    prelude::*,
};

pub(crate) fn mat_to_frame(mat: &Mat) -> Result<Frame, Error> {
    if mat.typ() != core::CV_8UC3 {
        return Err(opencv::Error::new(
            core::StsUnmatchedFormats,
            format!("expected 8-bit BGR frame, got type {}", mat.typ()),
        )
        .into());
    }

    let owned;
    let mat = if mat.is_continuous() {
        mat
    } else {
        owned = mat.try_clone()?;
        &owned
    };

    Frame::from_bgr_vec(
        mat.cols() as usize,
        mat.rows() as usize,
        mat.data_bytes()?.to_vec(),
    )
}

pub(crate) fn frame_to_mat(frame: &Frame) -> Result<Mat, Error> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        core::CV_8UC3,
        Scalar::all(0.0),
    )?;

    match frame.data.as_slice() {
        Some(bytes) => mat.data_bytes_mut()?.copy_from_slice(bytes),
        None => mat.data_bytes_mut()?.copy_from_slice(&frame.to_bgr_vec()),
    }

    Ok(mat)
}

#[inline]
pub(crate) fn to_cv_rect(rect: &Rect) -> core::Rect {
    core::Rect::new(
        rect.x.round() as i32,
        rect.y.round() as i32,
        rect.width.round() as i32,
        rect.height.round() as i32,
    )
}

#[inline]
pub(crate) fn from_cv_rect(rect: core::Rect) -> Rect {
    Rect::new(
        rect.x as f64,
        rect.y as f64,
        rect.width as f64,
        rect.height as f64,
    )
}
