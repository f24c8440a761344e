//! TaffyTree wrapper for layout computation.
//!
//! [`LayoutEngine`] mirrors the node tree into a taffy tree (container axis
//! as flex direction, [`LayoutHints`] as sizes and grow factors, sibling
//! spacing as trailing margins), runs layout, and writes absolute frames
//! back into every node.

use std::collections::{HashMap, HashSet};

use taffy::prelude::*;

use crate::dom::node::{Axis, LayoutHints, NodeId, Visibility};
use crate::dom::tree::Dom;
use crate::geometry::{Point, Rect};

use super::spacing::custom_spacing;

/// Errors reported by the layout bridge.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("taffy rejected the layout tree: {0}")]
    Taffy(String),
}

impl From<taffy::TaffyError> for LayoutError {
    fn from(err: taffy::TaffyError) -> Self {
        LayoutError::Taffy(format!("{err:?}"))
    }
}

/// Wraps a [`TaffyTree`] and maintains a mapping from node ids to taffy
/// node ids.
pub struct LayoutEngine {
    tree: TaffyTree<NodeId>,
    node_map: HashMap<NodeId, taffy::prelude::NodeId>,
    root: Option<taffy::prelude::NodeId>,
    /// Base spacing between siblings.
    spacing: f32,
}

impl LayoutEngine {
    /// Create a new, empty layout engine with the given base sibling spacing.
    pub fn new(spacing: f32) -> Self {
        Self {
            tree: TaffyTree::new(),
            node_map: HashMap::new(),
            root: None,
            spacing,
        }
    }

    /// Synchronize the taffy tree with the node tree.
    ///
    /// Stale taffy nodes (whose node no longer exists) are removed, live ones
    /// are created or restyled, and parent/child links are rebuilt.
    pub fn sync_tree(&mut self, dom: &Dom) -> Result<(), LayoutError> {
        let Some(dom_root) = dom.root() else {
            self.clear();
            return Ok(());
        };

        let live_nodes = dom.walk_depth_first(dom_root);
        let live_set: HashSet<NodeId> = live_nodes.iter().copied().collect();

        let stale: Vec<NodeId> = self
            .node_map
            .keys()
            .filter(|k| !live_set.contains(k))
            .copied()
            .collect();
        for key in stale {
            if let Some(taffy_id) = self.node_map.remove(&key) {
                self.tree.remove(taffy_id)?;
            }
        }

        for &dom_id in &live_nodes {
            let style = self.style_for(dom, dom_id);
            match self.node_map.get(&dom_id) {
                Some(&taffy_id) => self.tree.set_style(taffy_id, style)?,
                None => {
                    let taffy_id = self.tree.new_leaf_with_context(style, dom_id)?;
                    self.node_map.insert(dom_id, taffy_id);
                }
            }
        }

        for &dom_id in &live_nodes {
            let taffy_children: Vec<taffy::prelude::NodeId> = dom
                .children(dom_id)
                .iter()
                .filter_map(|child| self.node_map.get(child).copied())
                .collect();
            if let Some(&taffy_id) = self.node_map.get(&dom_id) {
                self.tree.set_children(taffy_id, &taffy_children)?;
            }
        }

        self.root = self.node_map.get(&dom_root).copied();
        Ok(())
    }

    /// Run layout on the root within `available_width` x `available_height`.
    pub fn compute(&mut self, available_width: f32, available_height: f32) -> Result<(), LayoutError> {
        if let Some(root) = self.root {
            self.tree.compute_layout(
                root,
                taffy::geometry::Size {
                    width: AvailableSpace::Definite(available_width),
                    height: AvailableSpace::Definite(available_height),
                },
            )?;
        }
        Ok(())
    }

    /// Layout of a single node relative to its parent.
    pub fn local_frame(&self, node: NodeId) -> Option<Rect> {
        let taffy_id = self.node_map.get(&node)?;
        let layout = self.tree.layout(*taffy_id).ok()?;
        Some(Rect::new(
            layout.location.x,
            layout.location.y,
            layout.size.width,
            layout.size.height,
        ))
    }

    /// Write absolute frames into every laid-out node.
    pub fn apply_frames(&self, dom: &mut Dom) {
        let Some(root) = dom.root() else {
            return;
        };
        let mut stack = vec![(root, Point::ZERO)];
        while let Some((node, parent_origin)) = stack.pop() {
            let Some(local) = self.local_frame(node) else {
                continue;
            };
            let frame = local.translate(parent_origin);
            if let Some(data) = dom.get_mut(node) {
                data.frame = frame;
            }
            for &child in dom.children(node) {
                stack.push((child, frame.origin()));
            }
        }
    }

    /// Sync, compute and write frames back in one call.
    pub fn layout(&mut self, dom: &mut Dom, width: f32, height: f32) -> Result<(), LayoutError> {
        self.sync_tree(dom)?;
        self.compute(width, height)?;
        self.apply_frames(dom);
        Ok(())
    }

    /// Build the taffy style of one node.
    fn style_for(&self, dom: &Dom, node: NodeId) -> Style {
        let mut style = Style::default();
        let Some(data) = dom.get(node) else {
            return style;
        };

        if data.visibility == Visibility::Gone {
            style.display = Display::None;
            return style;
        }

        apply_hints(&mut style, &data.layout);
        if let Some(axis) = data.axis() {
            style.flex_direction = match axis {
                Axis::Row => FlexDirection::Row,
                Axis::Column => FlexDirection::Column,
            };
        }

        if let Some(gap) = self.trailing_spacing(dom, node) {
            let parent_axis = dom.parent(node).and_then(|p| dom.get(p)).and_then(|p| p.axis());
            match parent_axis {
                Some(Axis::Row) => style.margin.right = LengthPercentageAuto::from_length(gap),
                Some(Axis::Column) => style.margin.bottom = LengthPercentageAuto::from_length(gap),
                None => {}
            }
        }
        style
    }

    /// Spacing after `node`, or `None` if it is the last laid-out sibling.
    fn trailing_spacing(&self, dom: &Dom, node: NodeId) -> Option<f32> {
        let parent = dom.parent(node)?;
        let current = dom.get(node)?;
        let next = dom
            .children(parent)
            .iter()
            .skip_while(|&&sibling| sibling != node)
            .skip(1)
            .filter_map(|&sibling| dom.get(sibling))
            .find(|sibling| sibling.visibility != Visibility::Gone)?;
        Some(custom_spacing(current.spacing_role, next.spacing_role, self.spacing))
    }

    fn clear(&mut self) {
        let keys: Vec<_> = self.node_map.drain().map(|(_, v)| v).collect();
        for taffy_id in keys {
            let _ = self.tree.remove(taffy_id);
        }
        self.root = None;
    }
}

fn apply_hints(style: &mut Style, hints: &LayoutHints) {
    style.size = taffy::geometry::Size {
        width: hints.width.map_or(Dimension::AUTO, Dimension::from_length),
        height: hints.height.map_or(Dimension::AUTO, Dimension::from_length),
    };
    style.flex_grow = hints.grow;
    if hints.width.is_some() || hints.height.is_some() {
        style.flex_shrink = 0.0;
    }
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("nodes", &self.node_map.len())
            .field("spacing", &self.spacing)
            .finish()
    }
}
