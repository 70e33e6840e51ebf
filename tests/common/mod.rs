#![allow(dead_code)]

use overtrack::error::Error;
use overtrack::{
    AlgorithmDescriptor, Command, Frame, FrameSource, Grab, Hud, Rect, TrackerFactory, Tracking, Ui,
};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const FRAME_W: usize = 160;
pub const FRAME_H: usize = 120;

/// Frame whose pixels encode `index`, so tests can tell frames apart.
pub fn numbered_frame(index: usize) -> Frame {
    Frame::filled(FRAME_W, FRAME_H, [(index % 256) as u8, (index / 256) as u8, 0])
}

pub fn frame_index(frame: &Frame) -> usize {
    let [lo, hi, _] = frame.pixel(FRAME_W - 1, FRAME_H - 1);
    lo as usize + hi as usize * 256
}

/// In-memory video: `len` numbered frames at `fps`.
pub struct ScriptedSource {
    pub len: usize,
    pub fps: f64,
    pub next: usize,
    pub opened: bool,
}

impl ScriptedSource {
    pub fn new(len: usize, fps: f64) -> Self {
        Self {
            len,
            fps,
            next: 0,
            opened: true,
        }
    }

    fn frame_ms(&self) -> f64 {
        1000.0 / self.fps
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Grab, Error> {
        if !self.opened {
            return Ok(Grab::NotOpened);
        }

        if self.next >= self.len {
            return Ok(Grab::EndOfStream);
        }

        let frame = numbered_frame(self.next);
        self.next += 1;

        Ok(Grab::Frame(frame))
    }

    fn seek(&mut self, offset_ms: i64, absolute: bool) -> Result<(), Error> {
        let current = self.next as f64 * self.frame_ms();
        let target = if absolute {
            offset_ms as f64
        } else {
            current + offset_ms as f64
        };

        let end = self.len as f64 * self.frame_ms();
        self.next = (target.clamp(0.0, end) / self.frame_ms()).round() as usize;

        Ok(())
    }

    fn frame_rate(&self) -> Result<f64, Error> {
        Ok(self.fps)
    }

    fn position(&self) -> Result<i64, Error> {
        Ok(self.next as i64)
    }

    fn set_max_size(&mut self, _width: u32, _height: u32) {}
}

/// Tracker replaying canned results; logs the rectangles it was started on.
pub struct ScriptedTracker {
    pub init_ok: bool,
    pub updates: VecDeque<(bool, Rect)>,
    pub inits: Rc<RefCell<Vec<Rect>>>,
}

impl ScriptedTracker {
    pub fn new(init_ok: bool, updates: Vec<(bool, Rect)>) -> Self {
        Self {
            init_ok,
            updates: updates.into(),
            inits: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Tracking for ScriptedTracker {
    type Image = Frame;

    fn init(&mut self, _frame: &Frame, rect: Rect) -> Result<bool, Error> {
        self.inits.borrow_mut().push(rect);
        Ok(self.init_ok)
    }

    fn update(&mut self, _frame: &Frame) -> Result<(bool, Rect), Error> {
        Ok(self.updates.pop_front().unwrap_or((false, Rect::default())))
    }
}

/// Hands out prepared trackers in order; creates failing ones when empty.
#[derive(Default)]
pub struct ScriptedFactory {
    pub trackers: VecDeque<ScriptedTracker>,
    pub created: usize,
    pub prepared: Rc<RefCell<usize>>,
}

impl ScriptedFactory {
    pub fn new(trackers: Vec<ScriptedTracker>) -> Self {
        Self {
            trackers: trackers.into(),
            ..Default::default()
        }
    }
}

impl TrackerFactory for ScriptedFactory {
    type Tracker = ScriptedTracker;

    fn prepare(&mut self, frame: &Frame) -> Result<Frame, Error> {
        *self.prepared.borrow_mut() += 1;
        Ok(frame.clone())
    }

    fn create(&mut self, _descriptor: &AlgorithmDescriptor) -> Result<ScriptedTracker, Error> {
        self.created += 1;

        Ok(self
            .trackers
            .pop_front()
            .unwrap_or_else(|| ScriptedTracker::new(false, Vec::new())))
    }
}

/// Ui double: plays back commands and selections, records what was shown.
#[derive(Default)]
pub struct ScriptedUi {
    pub commands: VecDeque<Option<Command>>,
    pub selections: VecDeque<Vec<Rect>>,
    pub shown: Vec<(Frame, Hud)>,
    pub waits: Vec<Duration>,
}

impl ScriptedUi {
    pub fn new(commands: Vec<Option<Command>>) -> Self {
        Self {
            commands: commands.into(),
            ..Default::default()
        }
    }

    pub fn with_selections(mut self, selections: Vec<Vec<Rect>>) -> Self {
        self.selections = selections.into();
        self
    }

    pub fn shown_indices(&self) -> Vec<usize> {
        self.shown.iter().map(|(f, _)| frame_index(f)).collect()
    }
}

impl Ui for ScriptedUi {
    fn show(&mut self, frame: &Frame, hud: &Hud) -> Result<(), Error> {
        self.shown.push((frame.clone(), hud.clone()));
        Ok(())
    }

    fn wait_command(&mut self, timeout: Duration) -> Result<Option<Command>, Error> {
        self.waits.push(timeout);
        Ok(self.commands.pop_front().unwrap_or(Some(Command::Quit)))
    }

    fn select_regions(&mut self, _frame: &Frame) -> Result<Vec<Rect>, Error> {
        Ok(self.selections.pop_front().unwrap_or_default())
    }
}

/// Ui double that behaves like a real window: showing costs `show_cost`
/// and every wait blocks for its full timeout. Quits after `iterations`.
pub struct SleepingUi {
    pub show_cost: Duration,
    pub iterations: usize,
    pub shown_at: Vec<Instant>,
}

impl SleepingUi {
    pub fn new(show_cost: Duration, iterations: usize) -> Self {
        Self {
            show_cost,
            iterations,
            shown_at: Vec::new(),
        }
    }

    pub fn mean_period(&self) -> Duration {
        match (self.shown_at.first(), self.shown_at.last()) {
            (Some(first), Some(last)) if self.shown_at.len() > 1 => {
                (*last - *first) / (self.shown_at.len() - 1) as u32
            }
            _ => Duration::ZERO,
        }
    }
}

impl Ui for SleepingUi {
    fn show(&mut self, _frame: &Frame, _hud: &Hud) -> Result<(), Error> {
        self.shown_at.push(Instant::now());
        std::thread::sleep(self.show_cost);
        Ok(())
    }

    fn wait_command(&mut self, timeout: Duration) -> Result<Option<Command>, Error> {
        std::thread::sleep(timeout);

        if self.shown_at.len() >= self.iterations {
            Ok(Some(Command::Quit))
        } else {
            Ok(None)
        }
    }

    fn select_regions(&mut self, _frame: &Frame) -> Result<Vec<Rect>, Error> {
        Ok(Vec::new())
    }
}
