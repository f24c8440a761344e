//! Headless testing support.
//!
//! Use the [`Pilot`] to drive a [`Ui`](crate::ui::Ui) frame by frame without
//! a real input device and inspect focus, recognizer states and sounds.

pub mod pilot;

pub use pilot::{Pilot, FRAME_MS};
