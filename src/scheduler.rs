use serde_derive::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Relative seek applied by the arrow keys.
pub const SEEK_STEP_MS: i64 = 10_000;

/// Shortest wait handed to the input primitive; zero would block forever on
/// some window systems.
pub const MIN_WAIT: Duration = Duration::from_millis(1);

/// Used when the source reports no usable frame rate.
pub const FALLBACK_FRAME_RATE: f64 = 30.0;

/// Frame pacing: shortens each wait by the processing time spent since the
/// previous wait returned.
///
/// It does not correct for the wait primitive's own inaccuracy, and it never
/// drops frames; a slow iteration just gets the minimum wait.
#[derive(Debug, Clone)]
pub struct Pacer {
    ideal: Duration,
    last: Instant,
}

impl Pacer {
    pub fn new(frame_rate: f64, now: Instant) -> Self {
        let ideal = Some(frame_rate)
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .and_then(|fps| Duration::try_from_secs_f64(1.0 / fps).ok())
            .unwrap_or_else(|| {
                log::warn!(
                    "source frame rate {} unusable, pacing at {} fps",
                    frame_rate,
                    FALLBACK_FRAME_RATE
                );
                Duration::from_secs_f64(1.0 / FALLBACK_FRAME_RATE)
            });

        Self { ideal, last: now }
    }

    #[inline]
    pub fn ideal(&self) -> Duration {
        self.ideal
    }

    /// Starts a new processing interval; call when the wait returns.
    #[inline]
    pub fn mark(&mut self, now: Instant) {
        self.last = now;
    }

    /// `max(ideal - elapsed, MIN_WAIT)`, where `elapsed` runs from the last
    /// [`mark`](Pacer::mark) (or construction) to `now`.
    pub fn next_wait(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.last);

        self.ideal.saturating_sub(elapsed).max(MIN_WAIT)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select,
    TogglePlay,
    SeekBackward,
    SeekForward,
    ToggleDebug,
    Quit,
}

impl Command {
    /// Decodes a raw key code as returned by an extended wait-key call.
    ///
    /// Arrow keys show up either in the upper 16 bits (Windows virtual keys)
    /// or as X11 keysyms in the lower 16 bits.
    pub fn from_key(code: i32) -> Option<Command> {
        if code < 0 {
            return None;
        }

        let upper = (code >> 16) & 0xffff;
        let lower = code & 0xffff;

        match (upper, lower) {
            (_, 0x20) => Some(Command::Select),
            (_, 0x0a) | (_, 0x0d) | (_, 0xff8d) => Some(Command::TogglePlay),
            (_, 0x1b) => Some(Command::Quit),
            (0x25, _) | (_, 0xff51) => Some(Command::SeekBackward),
            (0x27, _) | (_, 0xff53) => Some(Command::SeekForward),
            (_, 0x64) | (_, 0x44) => Some(Command::ToggleDebug),
            _ => None,
        }
    }

    /// Seek offset in milliseconds for seek commands.
    pub fn seek_offset(&self) -> Option<i64> {
        match self {
            Command::SeekBackward => Some(-SEEK_STEP_MS),
            Command::SeekForward => Some(SEEK_STEP_MS),
            _ => None,
        }
    }
}

/// Play/pause and debug-overlay flags.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    pub playing: bool,
    pub debug: bool,
}

impl Playback {
    pub fn new(playing: bool) -> Self {
        Self {
            playing,
            debug: false,
        }
    }

    #[inline]
    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    #[inline]
    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(true)
    }
}
