use crate::algorithm::AlgorithmDescriptor;
use crate::frame::Frame;
use crate::rect::Rect;
use crate::{TrackerFactory, Tracking};

use log::{debug, info, warn};
use serde_derive::{Deserialize, Serialize};

/// How per-slot results fold into the session-wide tracking flag.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InitPolicy {
    /// Every slot must initialize and update; one failure drops them all for
    /// that call.
    #[default]
    AllOrNothing,
    /// Each slot stands on its own result.
    PerSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Uninitialized,
    Tracking,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// No slots.
    Idle,
    /// Slots exist and are updated every playing frame.
    Active,
    /// Slots were stored but initialization failed; nothing is tracked until
    /// the next selection.
    Stalled,
}

#[derive(Debug)]
pub struct TrackSlot<T> {
    tracker: Option<T>,
    pub rect: Rect,
    pub initial_size: (f64, f64),
    pub state: SlotState,
    pub located: bool,
}

impl<T: Tracking> TrackSlot<T> {
    fn new(tracker: Option<T>, rect: Rect) -> Self {
        Self {
            tracker,
            rect,
            initial_size: (rect.width, rect.height),
            state: SlotState::Uninitialized,
            located: false,
        }
    }

    fn init(&mut self, idx: usize, image: &T::Image) -> bool {
        let rect = self.rect;
        let ok = match self.tracker.as_mut() {
            Some(tracker) => tracker.init(image, rect).unwrap_or_else(|err| {
                warn!("slot {}: tracker init failed: {}", idx, err);
                false
            }),
            None => false,
        };

        if ok {
            self.initial_size = (rect.width, rect.height);
            self.state = SlotState::Tracking;
            self.located = true;
        }

        ok
    }

    fn update(&mut self, idx: usize, image: &T::Image, reports_size: bool) -> bool {
        if self.state == SlotState::Uninitialized {
            return false;
        }

        let result = match self.tracker.as_mut() {
            Some(tracker) => tracker.update(image).unwrap_or_else(|err| {
                warn!("slot {}: tracker update failed: {}", idx, err);
                (false, self.rect)
            }),
            None => (false, self.rect),
        };

        match result {
            (true, rect) => {
                self.rect = if reports_size {
                    rect
                } else {
                    rect.with_size(self.initial_size.0, self.initial_size.1)
                };
                self.state = SlotState::Tracking;
                self.located = true;
            }
            (false, _) => {
                self.state = SlotState::Lost;
                self.located = false;
            }
        }

        self.located
    }

    fn reset(&mut self) {
        self.state = SlotState::Uninitialized;
        self.located = false;
    }
}

/// Keeps only rectangles with positive area, in order.
pub fn valid_regions<I: IntoIterator<Item = Rect>>(rects: I) -> Vec<Rect> {
    rects.into_iter().filter(Rect::is_valid).collect()
}

/// Ordered set of independently tracked regions.
pub struct MultiTracker<F: TrackerFactory> {
    factory: F,
    descriptor: AlgorithmDescriptor,
    policy: InitPolicy,
    slots: Vec<TrackSlot<F::Tracker>>,
    active: bool,
}

impl<F: TrackerFactory> MultiTracker<F> {
    pub fn new(factory: F, descriptor: AlgorithmDescriptor, policy: InitPolicy) -> Self {
        Self {
            factory,
            descriptor,
            policy,
            slots: Vec::new(),
            active: false,
        }
    }

    #[inline]
    pub fn slots(&self) -> &[TrackSlot<F::Tracker>] {
        &self.slots
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> TrackingState {
        if self.slots.is_empty() {
            TrackingState::Idle
        } else if self.active {
            TrackingState::Active
        } else {
            TrackingState::Stalled
        }
    }

    /// Slots whose rectangle can be drawn this iteration, in index order.
    pub fn located(&self) -> impl Iterator<Item = (usize, &Rect)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.located)
            .map(|(idx, slot)| (idx, &slot.rect))
    }

    #[inline]
    pub fn any_located(&self) -> bool {
        self.slots.iter().any(|s| s.located)
    }

    /// Drops every slot and goes back to idle.
    pub fn cancel(&mut self) {
        if !self.slots.is_empty() {
            info!("tracking cancelled, {} slot(s) dropped", self.slots.len());
        }

        self.slots.clear();
        self.active = false;
    }

    /// Replaces all slots with one fresh tracker per valid rectangle.
    ///
    /// An empty selection (after dropping invalid rectangles) cancels
    /// tracking. Returns whether tracking is active afterwards.
    pub fn begin<I: IntoIterator<Item = Rect>>(&mut self, frame: &Frame, rects: I) -> bool {
        self.cancel();

        let rects = valid_regions(rects);
        if rects.is_empty() {
            debug!("empty selection");
            return false;
        }

        for rect in rects {
            let tracker = self
                .factory
                .create(&self.descriptor)
                .map_err(|err| warn!("failed to create {} tracker: {}", self.descriptor.algorithm, err))
                .ok();

            self.slots.push(TrackSlot::new(tracker, rect));
        }

        let mut initialized = 0;
        match self.factory.prepare(frame) {
            Ok(image) => {
                for (idx, slot) in self.slots.iter_mut().enumerate() {
                    if slot.init(idx, &image) {
                        initialized += 1;
                    }
                }
            }
            Err(err) => warn!("cannot prepare frame for tracking: {}", err),
        }

        self.active = match self.policy {
            InitPolicy::AllOrNothing => initialized == self.slots.len(),
            InitPolicy::PerSlot => initialized > 0,
        };

        if !self.active {
            warn!(
                "tracking init failed ({}/{} slots initialized)",
                initialized,
                self.slots.len()
            );

            self.slots.iter_mut().for_each(TrackSlot::reset);
        } else {
            info!(
                "tracking {} region(s) with {}",
                self.slots.len(),
                self.descriptor.algorithm
            );
        }

        self.active
    }

    /// Runs one update over all initialized slots. Returns whether anything
    /// is located this frame.
    pub fn update(&mut self, frame: &Frame) -> bool {
        if !self.active {
            return false;
        }

        let image = match self.factory.prepare(frame) {
            Ok(image) => image,
            Err(err) => {
                warn!("cannot prepare frame for tracking: {}", err);
                self.slots.iter_mut().for_each(|s| s.located = false);
                return false;
            }
        };

        let reports_size = self.descriptor.reports_size;
        let mut all_ok = true;

        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.state == SlotState::Uninitialized {
                continue;
            }

            all_ok &= slot.update(idx, &image, reports_size);
        }

        match self.policy {
            InitPolicy::AllOrNothing if !all_ok => {
                debug!("tracking update failed, no region located");
                self.slots.iter_mut().for_each(|s| s.located = false);
                false
            }
            _ => self.any_located(),
        }
    }
}
