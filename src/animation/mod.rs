//! Property animation: easing curves, step queues and the per-frame
//! scheduler.

pub mod animatable;
pub mod easing;
pub mod engine;

pub use animatable::{Animatable, Step};
pub use easing::Easing;
pub use engine::{AnimationCommands, AnimationEngine, AnimationId, AnimationTag, Property};
