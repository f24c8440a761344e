//! Gesture recognition: per-frame state machines turning pointer samples
//! into tap and pan events, plus the arena routing samples to them.

pub mod arena;
pub mod pan;
pub mod scroll;
pub mod state;
pub mod tap;
pub mod tracker;

pub use arena::{Dispatch, DispatchedEvent, GestureArena, RecognizerId};
pub use pan::{PanAxis, PanGestureRecognizer};
pub use scroll::ScrollGestureRecognizer;
pub use state::{
    FlingAcceleration, GestureEvent, GestureOutput, GestureRecognizer, GestureState, PanStatus, TapStatus,
    TouchPhase, TouchSample,
};
pub use tap::TapGestureRecognizer;
pub use tracker::TouchTracker;
