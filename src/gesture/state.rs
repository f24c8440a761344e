//! Shared gesture vocabulary: recognition states, touch samples, emitted
//! events and the [`GestureRecognizer`] trait.

use crate::geometry::{Point, Rect};
use crate::sound::Sound;

// ---------------------------------------------------------------------------
// States and samples
// ---------------------------------------------------------------------------

/// Recognition status of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    /// Touch is down but the gesture is not recognized yet.
    #[default]
    Unsure,
    /// The gesture was just recognized.
    Start,
    /// The recognized gesture continues.
    Stay,
    /// The gesture completed successfully.
    End,
    /// Recognition conditions were violated.
    Failed,
    /// Another recognizer claimed the gesture.
    Interrupted,
}

impl GestureState {
    /// Whether this is a sink state left only by a new touch-down.
    pub fn is_sink(self) -> bool {
        matches!(self, GestureState::Failed | GestureState::Interrupted)
    }
}

/// Phase of one frame's pointer observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TouchPhase {
    /// First frame of a touch.
    Start,
    /// Touch held.
    Stay,
    /// Touch released this frame.
    End,
    /// No touch.
    #[default]
    None,
}

/// One frame's pointer observation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchSample {
    pub phase: TouchPhase,
    pub position: Point,
    /// Wheel scroll accumulated this frame.
    pub scroll: Point,
}

impl TouchSample {
    pub fn new(phase: TouchPhase, position: Point) -> Self {
        Self { phase, position, scroll: Point::ZERO }
    }

    pub fn start(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Start, Point::new(x, y))
    }

    pub fn stay(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Stay, Point::new(x, y))
    }

    pub fn end(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::End, Point::new(x, y))
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// A wheel scroll at `position` with no touch in progress.
    pub fn wheel(position: Point, scroll: Point) -> Self {
        Self { phase: TouchPhase::None, position, scroll }
    }

    pub fn has_scroll(&self) -> bool {
        self.scroll != Point::ZERO
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Tap recognizer status delivered on each state transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapStatus {
    pub state: GestureState,
    pub position: Point,
}

/// Post-release fling derived from recent pointer velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlingAcceleration {
    /// Distance the content should keep travelling, per axis.
    pub distance: Point,
    /// Time the fling takes to come to rest, in seconds, per axis.
    pub time: Point,
}

/// Pan recognizer status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanStatus {
    pub state: GestureState,
    pub position: Point,
    pub start_position: Point,
    /// Movement since the previous frame.
    pub delta: Point,
    /// Present on `End`.
    pub acceleration: Option<FlingAcceleration>,
    /// Set when the status carries only a wheel delta and no touch.
    pub delta_only: bool,
}

/// A semantic event fired by a recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap(TapStatus),
    Pan(PanStatus),
}

impl GestureEvent {
    pub fn state(&self) -> GestureState {
        match self {
            GestureEvent::Tap(status) => status.state,
            GestureEvent::Pan(status) => status.state,
        }
    }
}

/// What a recognizer produced during one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureOutput {
    pub events: Vec<GestureEvent>,
    /// Feedback sound the caller should play, if any.
    pub sound: Option<Sound>,
}

impl GestureOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: GestureEvent) {
        self.events.push(event);
    }
}

// ---------------------------------------------------------------------------
// Recognizer trait
// ---------------------------------------------------------------------------

/// A per-frame gesture state machine attached to one node.
pub trait GestureRecognizer {
    /// Short name for log output (e.g. "tap", "pan").
    fn name(&self) -> &'static str;

    /// Feed one frame's sample.
    ///
    /// `frame` is the current geometry of the node the recognizer is
    /// attached to. Events are fired once per state transition, never once
    /// per frame.
    fn recognition_loop(&mut self, sample: &TouchSample, frame: Rect, out: &mut GestureOutput) -> GestureState;

    /// Force the recognizer into `Interrupted`.
    ///
    /// With `only_if_unsure`, a gesture that already committed is left alone.
    fn interrupt(&mut self, only_if_unsure: bool);

    /// Current state.
    fn state(&self) -> GestureState;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Whether the caller should play the recognizer's sound on touch.
    fn sound_on_touch(&self) -> bool {
        true
    }
}

/// Bookkeeping shared by every recognizer: enabled flag, current state and
/// the last state an event was fired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecognizerCore {
    pub enabled: bool,
    pub state: GestureState,
    pub last_state: GestureState,
}

impl RecognizerCore {
    pub fn new() -> Self {
        Self {
            enabled: true,
            state: GestureState::Failed,
            last_state: GestureState::Failed,
        }
    }

    /// If parked in a sink state, report it once and return it.
    ///
    /// `Some(state)` means the caller should stop processing this sample;
    /// `fire` is `true` when the sink state has not been reported yet.
    pub fn check_sink(&mut self, sample: &TouchSample) -> Option<(GestureState, bool)> {
        if sample.phase == TouchPhase::Start || !self.state.is_sink() {
            return None;
        }
        let fire = self.state != self.last_state;
        self.last_state = self.state;
        Some((self.state, fire))
    }

    /// Record the current state as observed, so a later sink state is
    /// reported again.
    pub fn observe(&mut self) {
        self.last_state = self.state;
    }

    pub fn interrupt(&mut self, only_if_unsure: bool) {
        if only_if_unsure && self.state != GestureState::Unsure {
            return;
        }
        self.state = GestureState::Interrupted;
    }
}
