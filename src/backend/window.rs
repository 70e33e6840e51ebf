use super::{frame_to_mat, from_cv_rect};
use crate::error::Error;
use crate::frame::Frame;
use crate::rect::Rect;
use crate::scheduler::Command;
use crate::session::Hud;
use crate::Ui;

use opencv::{
    core::{self, Mat, Point, Scalar},
    highgui, imgproc,
};
use std::time::Duration;

/// Single HighGUI window used for playback, region selection and input.
pub struct Window {
    name: String,
}

impl Window {
    pub fn open(name: &str, frame: &Frame, position: (i32, i32)) -> Result<Self, Error> {
        highgui::named_window(name, highgui::WINDOW_AUTOSIZE)?;
        highgui::imshow(name, &frame_to_mat(frame)?)?;
        highgui::move_window(name, position.0, position.1)?;

        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn close(&self) -> Result<(), Error> {
        highgui::destroy_window(&self.name)?;
        Ok(())
    }
}

fn green() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn text(mat: &mut Mat, s: &str, at: Point, scale: f64, thickness: i32) -> Result<(), Error> {
    imgproc::put_text(
        mat,
        s,
        at,
        imgproc::FONT_HERSHEY_SIMPLEX,
        scale,
        green(),
        thickness,
        imgproc::LINE_AA,
        false,
    )?;

    Ok(())
}

fn draw_hud(mat: &mut Mat, hud: &Hud) -> Result<(), Error> {
    text(mat, &format!("#{:05}", hud.frame_id), Point::new(5, 30), 0.8, 2)?;

    let mut offset = Point::new(5, 50);
    let tracking = if hud.tracking { "T" } else { "F" };
    text(mat, &format!("tracking: {}", tracking), offset, 0.4, 1)?;

    for (idx, rect) in &hud.slots {
        offset.y += 16;
        let line = format!("[{}] ({:03},{:03})", idx, rect.x as i32, rect.y as i32);
        text(mat, &line, offset, 0.4, 1)?;
    }

    Ok(())
}

impl Ui for Window {
    fn show(&mut self, frame: &Frame, hud: &Hud) -> Result<(), Error> {
        let mut mat = frame_to_mat(frame)?;
        if hud.debug {
            draw_hud(&mut mat, hud)?;
        }

        highgui::imshow(&self.name, &mat)?;
        Ok(())
    }

    fn wait_command(&mut self, timeout: Duration) -> Result<Option<Command>, Error> {
        let ms = timeout.as_millis().clamp(1, i32::MAX as u128) as i32;

        Ok(Command::from_key(highgui::wait_key_ex(ms)?))
    }

    fn select_regions(&mut self, frame: &Frame) -> Result<Vec<Rect>, Error> {
        let mut mat = frame_to_mat(frame)?;
        text(&mut mat, "SELECT ROI", Point::new(5, 30), 0.8, 2)?;

        let mut boxes = core::Vector::<core::Rect>::new();
        highgui::select_rois(&self.name, &mat, &mut boxes, true, false, true)?;

        Ok(boxes.iter().map(from_cv_rect).collect())
    }
}
