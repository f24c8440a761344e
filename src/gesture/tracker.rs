//! Turns a raw pressed/released pointer signal into per-frame touch phases.

use crate::geometry::Point;

use super::state::{TouchPhase, TouchSample};

/// Tracks one pointer across frames.
///
/// Call [`update`](TouchTracker::update) once per frame with whether the
/// pointer is down; wheel movement accumulated with
/// [`add_scroll`](TouchTracker::add_scroll) is attached to the next sample.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    phase: TouchPhase,
    position: Point,
    scroll: Point,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase of the last produced sample.
    pub fn phase(&self) -> TouchPhase {
        self.phase
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Accumulate wheel movement for the next sample.
    pub fn add_scroll(&mut self, delta: Point) {
        self.scroll = self.scroll + delta;
    }

    /// Produce this frame's sample.
    ///
    /// A press continues as `Stay` after `Start`; a release reports `End`
    /// once and then `None`.
    pub fn update(&mut self, pressed: bool, position: Option<Point>) -> TouchSample {
        if let Some(position) = position {
            self.position = position;
        }
        self.phase = if pressed {
            match self.phase {
                TouchPhase::Start | TouchPhase::Stay => TouchPhase::Stay,
                TouchPhase::End | TouchPhase::None => TouchPhase::Start,
            }
        } else {
            match self.phase {
                TouchPhase::End | TouchPhase::None => TouchPhase::None,
                TouchPhase::Start | TouchPhase::Stay => TouchPhase::End,
            }
        };
        TouchSample {
            phase: self.phase,
            position: self.position,
            scroll: std::mem::take(&mut self.scroll),
        }
    }
}
