use crate::compositor::Compositor;
use crate::error::Error;
use crate::frame::Frame;
use crate::recorder::TrackRecorder;
use crate::rect::Rect;
use crate::scheduler::{Command, Pacer, Playback};
use crate::tracker::{valid_regions, MultiTracker};
use crate::{FrameSource, Grab, TrackerFactory, Ui};

use log::{debug, info, warn};
use std::io::Write;
use std::time::Instant;

/// What the window draws on top of the composited frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub frame_id: i64,
    pub tracking: bool,
    pub debug: bool,
    pub slots: Vec<(usize, Rect)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// All loop state of one review run.
///
/// Each [`step`](Session::step) is one iteration: update trackers on the
/// current frame, composite and show it, wait for one command, then fetch
/// the next frame if playing or if a seek happened.
pub struct Session<S: FrameSource, F: TrackerFactory> {
    source: S,
    tracker: MultiTracker<F>,
    compositor: Compositor,
    playback: Playback,
    pacer: Pacer,
    frame: Frame,
    recorder: Option<TrackRecorder<Box<dyn Write>>>,
}

impl<S: FrameSource, F: TrackerFactory> Session<S, F> {
    /// Reads the first frame and starts pacing at the source frame rate.
    pub fn new(
        mut source: S,
        tracker: MultiTracker<F>,
        compositor: Compositor,
        playback: Playback,
    ) -> Result<Self, Error> {
        let frame = match source.next_frame()? {
            Grab::Frame(frame) => frame,
            Grab::EndOfStream => {
                source.seek(0, true)?;
                match source.next_frame()? {
                    Grab::Frame(frame) => frame,
                    _ => return Err(Error::SourceOpen("no decodable frames".into())),
                }
            }
            Grab::NotOpened => return Err(Error::SourceOpen("source is not open".into())),
        };

        let frame_rate = source.frame_rate()?;
        info!(
            "source: {}x{} @ {:.2} fps",
            frame.width(),
            frame.height(),
            frame_rate
        );

        Ok(Self {
            source,
            tracker,
            compositor,
            playback,
            pacer: Pacer::new(frame_rate, Instant::now()),
            frame,
            recorder: None,
        })
    }

    pub fn with_recorder<W: Write + 'static>(mut self, recorder: TrackRecorder<W>) -> Self {
        self.recorder = Some(recorder.boxed());
        self
    }

    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub fn tracker(&self) -> &MultiTracker<F> {
        &self.tracker
    }

    #[inline]
    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Current frame with every located slot composited, in slot order.
    pub fn render(&self) -> Frame {
        let mut canvas = self.frame.clone();
        self.compositor.render(&mut canvas, self.tracker.located());
        canvas
    }

    pub fn hud(&self) -> Result<Hud, Error> {
        Ok(Hud {
            frame_id: self.source.position()?,
            tracking: self.tracker.any_located(),
            debug: self.playback.debug,
            slots: self.tracker.located().map(|(i, r)| (i, *r)).collect(),
        })
    }

    pub fn run<U: Ui>(&mut self, ui: &mut U) -> Result<(), Error> {
        while self.step(ui)? == Flow::Continue {}

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.flush()?;
        }

        Ok(())
    }

    pub fn step<U: Ui>(&mut self, ui: &mut U) -> Result<Flow, Error> {
        if self.playback.playing && self.tracker.is_active() && !self.tracker.update(&self.frame) {
            debug!("no region located in frame {}", self.source.position()?);
        }

        let canvas = self.render();
        let hud = self.hud()?;
        ui.show(&canvas, &hud)?;

        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record(hud.frame_id, hud.slots.iter().map(|(i, r)| (*i, r)))?;
        }

        let wait = self.pacer.next_wait(Instant::now());
        let command = ui.wait_command(wait)?;
        self.pacer.mark(Instant::now());

        let mut seeked = false;
        if let Some(command) = command {
            match self.apply(command, ui)? {
                Flow::Quit => return Ok(Flow::Quit),
                Flow::Continue => seeked = command.seek_offset().is_some(),
            }
        }

        if self.playback.playing || seeked {
            self.advance()?;
        }

        Ok(Flow::Continue)
    }

    /// Runs one command against the session.
    pub fn apply<U: Ui>(&mut self, command: Command, ui: &mut U) -> Result<Flow, Error> {
        debug!("command {:?}", command);

        match command {
            Command::Select => {
                let rects = valid_regions(ui.select_regions(&self.frame)?);
                if rects.is_empty() {
                    self.tracker.cancel();
                } else {
                    self.tracker.begin(&self.frame, rects);
                }
            }
            Command::TogglePlay => self.playback.toggle_play(),
            Command::ToggleDebug => self.playback.toggle_debug(),
            Command::SeekBackward | Command::SeekForward => {
                if let Some(offset) = command.seek_offset() {
                    self.source.seek(offset, false)?;
                }
            }
            Command::Quit => {
                info!("quit");
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    /// Fetches the next frame, looping back to the start at end of stream.
    pub fn advance(&mut self) -> Result<(), Error> {
        match self.source.next_frame()? {
            Grab::Frame(frame) => self.frame = frame,
            Grab::EndOfStream => {
                info!("end of stream, restarting from the beginning");
                self.source.seek(0, true)?;

                if let Grab::Frame(frame) = self.source.next_frame()? {
                    self.frame = frame;
                }
            }
            Grab::NotOpened => warn!("source is not open, keeping current frame"),
        }

        Ok(())
    }
}
