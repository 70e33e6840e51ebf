use crate::error::Error;
use crate::rect::Rect;

use serde_derive::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct SlotRecord<'a> {
    index: usize,
    rect: &'a Rect,
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: i64,
    slots: Vec<SlotRecord<'a>>,
}

/// Writes located rectangles as JSON lines, one line per displayed frame that
/// has at least one located slot.
pub struct TrackRecorder<W: Write> {
    out: W,
    last_frame: Option<i64>,
}

impl TrackRecorder<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> TrackRecorder<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_frame: None,
        }
    }

    /// Records `slots` for `frame`; repeated calls for the same frame (while
    /// paused) are skipped.
    pub fn record<'a, I>(&mut self, frame: i64, slots: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (usize, &'a Rect)>,
    {
        if self.last_frame == Some(frame) {
            return Ok(());
        }

        let slots: Vec<_> = slots
            .into_iter()
            .map(|(index, rect)| SlotRecord { index, rect })
            .collect();

        if slots.is_empty() {
            return Ok(());
        }

        serde_json::to_writer(&mut self.out, &FrameRecord { frame, slots })?;
        self.out.write_all(b"\n")?;
        self.last_frame = Some(frame);

        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        Ok(self.out.flush()?)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + 'static> TrackRecorder<W> {
    pub fn boxed(self) -> TrackRecorder<Box<dyn Write>> {
        TrackRecorder {
            out: Box::new(self.out),
            last_frame: self.last_frame,
        }
    }
}
