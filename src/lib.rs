pub mod algorithm;
pub mod compositor;
pub mod config;
pub mod error;
pub mod frame;
pub mod math;
pub mod recorder;
pub mod rect;
pub mod scheduler;
pub mod session;
pub mod tracker;

#[cfg(feature = "opencv")]
pub mod backend;

pub use algorithm::{Algorithm, AlgorithmDescriptor};
pub use compositor::Compositor;
pub use frame::{Frame, OverlayImage};
pub use rect::Rect;
pub use scheduler::{Command, Pacer, Playback};
pub use session::{Flow, Hud, Session};
pub use tracker::{InitPolicy, MultiTracker, SlotState, TrackingState};

use error::Error;
use std::time::Duration;

/// Result of asking a [`FrameSource`] for the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Grab {
    Frame(Frame),
    EndOfStream,
    NotOpened,
}

/// Decoded video provider.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Grab, Error>;

    /// Moves the read position by `offset_ms`, or to `offset_ms` when
    /// `absolute`. Out-of-range targets are clamped by the source.
    fn seek(&mut self, offset_ms: i64, absolute: bool) -> Result<(), Error>;

    fn frame_rate(&self) -> Result<f64, Error>;

    /// Index of the next frame to be decoded.
    fn position(&self) -> Result<i64, Error>;

    /// Bounds decoded frames to `width`x`height`, keeping aspect ratio and
    /// never upscaling.
    fn set_max_size(&mut self, width: u32, height: u32);
}

/// One tracker instance following one region.
pub trait Tracking {
    /// Frame representation the tracker consumes.
    type Image;

    fn init(&mut self, image: &Self::Image, rect: Rect) -> Result<bool, Error>;
    fn update(&mut self, image: &Self::Image) -> Result<(bool, Rect), Error>;
}

pub trait TrackerFactory {
    type Tracker: Tracking;

    /// Converts a frame once so every slot can share it.
    fn prepare(&mut self, frame: &Frame) -> Result<<Self::Tracker as Tracking>::Image, Error>;

    fn create(&mut self, descriptor: &AlgorithmDescriptor) -> Result<Self::Tracker, Error>;
}

/// Display and input side of a session.
pub trait Ui {
    fn show(&mut self, frame: &Frame, hud: &Hud) -> Result<(), Error>;

    /// Blocks up to `timeout` for a single command.
    fn wait_command(&mut self, timeout: Duration) -> Result<Option<Command>, Error>;

    /// Lets the user draw zero or more regions over `frame`.
    fn select_regions(&mut self, frame: &Frame) -> Result<Vec<Rect>, Error>;
}
