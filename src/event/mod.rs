//! Input and actions: crossterm conversion, controller buttons and the
//! per-node action registry.

pub mod action;
pub mod input;

pub use action::{Action, ActionId, ActionListener, ActionRegistry, Triggered};
pub use input::{Button, FrameInput, InputEvent, WHEEL_STEP};
