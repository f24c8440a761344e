//! Feedback sounds requested by the interaction core.
//!
//! The core never plays audio. Navigation, gestures and actions push
//! [`Sound`] requests onto a queue that the host drains once per frame.

/// A feedback sound the host should play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sound {
    /// No sound.
    None,
    /// Focus moved to another node.
    #[default]
    FocusChange,
    /// Directional navigation found no target.
    FocusError,
    /// An action was triggered.
    Click,
    /// A primary press was not consumed by any action.
    ClickError,
    /// A touch left its node or was cancelled.
    TouchUnfocus,
    /// Focus moved onto a sidebar-style entry.
    FocusSidebar,
    /// Focus moved onto a toggle-style entry.
    FocusOption,
}
