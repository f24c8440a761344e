//! Focus: directional navigation, default-focus resolution and the
//! highlight feedback that follows focus around.

pub mod highlight;
pub mod navigator;
pub mod state;

pub use highlight::{click_pulse, highlight_alpha, play_click_pulse, shake_offset};
pub use navigator::{default_focus, find_target, next_focus};
pub use state::{FocusState, NavigationOutcome};
