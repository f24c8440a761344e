//! Layout bridge: taffy integration and sibling spacing rules.

pub mod engine;
pub mod spacing;

pub use engine::{LayoutEngine, LayoutError};
pub use spacing::{custom_spacing, SpacingRole};
