//! # ember-ui
//!
//! The interaction engine of a retained-mode UI: directional focus
//! navigation, gesture recognition and property animation over a tree of
//! nodes, driven by a single once-per-frame clock.
//!
//! Rendering, windowing and audio stay with the host. The engine tells the
//! host which node is focused, how bright each highlight is, where a shake
//! displaces it, how far content is scrolled and which sounds to play.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: Slotmap-backed node arena with ordered children, id lookup and hit testing
//! - **[`focus`]**: Default-focus resolution, directional search, highlight feedback
//! - **[`gesture`]**: Tap, pan and scroll recognizers and the arena routing samples to them
//! - **[`animation`]**: Step-queued tweens with easing, callbacks and a per-frame engine
//! - **[`event`]**: Controller buttons, crossterm conversion, per-node actions
//! - **[`layout`]**: Taffy-powered flex layout writing node frames, list spacing rules
//! - **[`ui`]**: The context tying everything together, one `frame` call per tick
//! - **[`testing`]**: Headless `Pilot` for frame-by-frame tests
//! - **[`geometry`]**: Point and Rect primitives

// Foundation
pub mod config;
pub mod geometry;
pub mod sound;

// Core systems
pub mod animation;
pub mod dom;
pub mod focus;
pub mod gesture;
pub mod layout;

// Input
pub mod event;

// Context
pub mod ui;

// Testing
pub mod testing;

pub use config::{ConfigError, InteractionConfig};
pub use ui::{Ui, UiError};
