//! Node tree: slotmap-backed arena with ordered children, weak parent links,
//! id lookup and hit testing.

pub mod node;
pub mod query;
pub mod tree;

pub use node::{Axis, Direction, LayoutHints, NodeData, NodeId, NodeKind, Route, Visibility};
pub use tree::{Dom, TreeError};
