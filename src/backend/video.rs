use super::mat_to_frame;
use crate::error::Error;
use crate::{FrameSource, Grab};

use log::debug;
use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::path::Path;

/// Video file reader that downscales frames to an optional bounding size.
pub struct VideoGrabber {
    capture: VideoCapture,
    max_size: Option<(u32, u32)>,
}

impl VideoGrabber {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let name = path.as_ref().to_string_lossy().into_owned();

        let capture = VideoCapture::from_file(&name, videoio::CAP_ANY)
            .map_err(|err| Error::SourceOpen(format!("{}: {}", name, err)))?;

        if !capture.is_opened()? {
            return Err(Error::SourceOpen(name));
        }

        debug!(
            "opened {}: {} frames",
            name,
            capture.get(videoio::CAP_PROP_FRAME_COUNT)?
        );

        Ok(Self {
            capture,
            max_size: None,
        })
    }

    pub fn close(&mut self) -> Result<(), Error> {
        if self.capture.is_opened()? {
            self.capture.release()?;
        }

        Ok(())
    }

    fn scale(&self) -> Result<f64, Error> {
        let (max_w, max_h) = match self.max_size {
            Some((w, h)) if w > 0 && h > 0 => (w as f64, h as f64),
            _ => return Ok(1.0),
        };

        let width = self.capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let height = self.capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;

        if width <= 0.0 || height <= 0.0 {
            return Ok(1.0);
        }

        Ok((max_w / width).min(max_h / height).min(1.0))
    }

    fn duration_ms(&self) -> Result<Option<f64>, Error> {
        let count = self.capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let fps = self.capture.get(videoio::CAP_PROP_FPS)?;

        if count > 0.0 && fps > 0.0 {
            Ok(Some(count / fps * 1000.0))
        } else {
            Ok(None)
        }
    }
}

impl FrameSource for VideoGrabber {
    fn next_frame(&mut self) -> Result<Grab, Error> {
        if !self.capture.is_opened()? {
            return Ok(Grab::NotOpened);
        }

        let scale = self.scale()?;
        let mut raw = Mat::default();

        if !self.capture.read(&mut raw)? || raw.empty() {
            return Ok(Grab::EndOfStream);
        }

        if scale < 1.0 {
            let mut resized = Mat::default();
            imgproc::resize(
                &raw,
                &mut resized,
                core::Size::default(),
                scale,
                scale,
                imgproc::INTER_LINEAR,
            )?;

            return Ok(Grab::Frame(mat_to_frame(&resized)?));
        }

        Ok(Grab::Frame(mat_to_frame(&raw)?))
    }

    fn seek(&mut self, offset_ms: i64, absolute: bool) -> Result<(), Error> {
        let mut target = offset_ms as f64;
        if !absolute {
            target += self.capture.get(videoio::CAP_PROP_POS_MSEC)?;
        }

        if let Some(end) = self.duration_ms()? {
            target = target.min(end);
        }

        self.capture
            .set(videoio::CAP_PROP_POS_MSEC, target.max(0.0))?;

        Ok(())
    }

    fn frame_rate(&self) -> Result<f64, Error> {
        Ok(self.capture.get(videoio::CAP_PROP_FPS)?)
    }

    fn position(&self) -> Result<i64, Error> {
        Ok(self.capture.get(videoio::CAP_PROP_POS_FRAMES)? as i64)
    }

    fn set_max_size(&mut self, width: u32, height: u32) {
        self.max_size = Some((width, height));
    }
}

impl Drop for VideoGrabber {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
