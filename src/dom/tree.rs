//! Tree operations: insert, attach, detach, remove, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{Direction, NodeData, NodeId, NodeKind, Route};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// Tree-integrity violations.
///
/// These are programming errors in the code building the tree, never
/// ordinary input outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),
    #[error("node {0:?} is not a container")]
    NotAContainer(NodeId),
    #[error("index {index} out of range for container with {len} children")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("node {0:?} already has a parent")]
    AlreadyAttached(NodeId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle { parent: NodeId, child: NodeId },
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("node {0:?} is not focusable and cannot carry a navigation route")]
    NotFocusable(NodeId),
}

/// The node tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps: children lists are owning (the order is traversal
/// order), parent links are plain back-references cleared on detach.
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a node without a parent.
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node and make it the root, replacing any previous root.
    pub fn insert_root(&mut self, data: NodeData) -> NodeId {
        let id = self.insert(data);
        self.root = Some(id);
        id
    }

    /// Create a node and append it to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId, TreeError> {
        let len = self.container_len(parent)?;
        self.add_child_at(parent, len, data)
    }

    /// Create a node and insert it at `index` among `parent`'s children.
    pub fn add_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        data: NodeData,
    ) -> Result<NodeId, TreeError> {
        let len = self.container_len(parent)?;
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.link(parent, id, index);
        Ok(id)
    }

    /// Attach an existing parentless node under `parent` at `index`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), TreeError> {
        let len = self.container_len(parent)?;
        if !self.nodes.contains_key(child) {
            return Err(TreeError::NodeNotFound(child));
        }
        if self.parent.contains_key(child) {
            return Err(TreeError::AlreadyAttached(child));
        }
        if child == parent || self.ancestors(parent).contains(&child) {
            return Err(TreeError::WouldCycle { parent, child });
        }
        if index > len {
            return Err(TreeError::IndexOutOfRange { index, len });
        }
        if self.root == Some(child) {
            self.root = None;
        }
        self.link(parent, child, index);
        Ok(())
    }

    /// Unlink `child` from its parent without destroying it.
    ///
    /// The back-reference is cleared; the subtree stays alive in the arena.
    pub fn detach(&mut self, child: NodeId) -> Result<(), TreeError> {
        if !self.nodes.contains_key(child) {
            return Err(TreeError::NodeNotFound(child));
        }
        if let Some(parent_id) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&c| c != child);
            }
        }
        Ok(())
    }

    /// Remove `child` from `parent` and destroy its subtree.
    ///
    /// Returns the ids of every destroyed node, `child` first. Callers own
    /// the cleanup of focus, animations and recognizers for those ids.
    pub(crate) fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<Vec<NodeId>, TreeError> {
        if !self.nodes.contains_key(parent) {
            return Err(TreeError::NodeNotFound(parent));
        }
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        Ok(self.remove(child))
    }

    /// Destroy a node and all its descendants.
    ///
    /// Returns the ids of the destroyed nodes in breadth-first order, or an
    /// empty vec if `id` did not exist.
    pub(crate) fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }

        let mut removed = Vec::new();
        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if self.nodes.remove(current).is_some() {
                removed.push(current);
            }
        }

        removed
    }

    /// Set (or clear) the preferred default-focus child of a container.
    pub fn set_default_focus_index(
        &mut self,
        container: NodeId,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        let data = self.nodes.get_mut(container).ok_or(TreeError::NodeNotFound(container))?;
        match &mut data.kind {
            NodeKind::Container { default_focus_index, .. } => {
                *default_focus_index = index;
                Ok(())
            }
            NodeKind::Leaf => Err(TreeError::NotAContainer(container)),
        }
    }

    /// Register a custom navigation route on a focusable node.
    pub fn set_custom_route(
        &mut self,
        node: NodeId,
        direction: Direction,
        route: Route,
    ) -> Result<(), TreeError> {
        let data = self.nodes.get_mut(node).ok_or(TreeError::NodeNotFound(node))?;
        if !data.focusable {
            return Err(TreeError::NotFocusable(node));
        }
        data.custom_routes.insert(direction, route);
        Ok(())
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Position of `child` among its parent's children.
    ///
    /// `Ok(None)` for a parentless node. A node whose parent link is set but
    /// which is missing from that parent's list is a broken tree.
    pub fn index_in_parent(&self, child: NodeId) -> Result<Option<usize>, TreeError> {
        if !self.nodes.contains_key(child) {
            return Err(TreeError::NodeNotFound(child));
        }
        let Some(parent) = self.parent(child) else {
            return Ok(None);
        };
        self.children(parent)
            .iter()
            .position(|&c| c == child)
            .map(Some)
            .ok_or(TreeError::NotAChild { parent, child })
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Number of ancestors of `id` (0 for a root).
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the arena contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    fn container_len(&self, parent: NodeId) -> Result<usize, TreeError> {
        let data = self.nodes.get(parent).ok_or(TreeError::NodeNotFound(parent))?;
        if !data.is_container() {
            return Err(TreeError::NotAContainer(parent));
        }
        Ok(self.children(parent).len())
    }

    fn link(&mut self, parent: NodeId, child: NodeId, index: usize) {
        self.parent.insert(child, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.insert(index, child);
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::Axis;

    /// Build a small test tree:
    /// ```text
    ///       root (column)
    ///      /    \
    ///    a (row)  b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Dom, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::container("Box", Axis::Column).with_id("root"));
        let a = dom.add_child(root, NodeData::container("Box", Axis::Row).with_id("a")).unwrap();
        let b = dom.add_child(root, NodeData::new("Label").with_id("b")).unwrap();
        let c = dom.add_child(a, NodeData::new("Button").with_id("c").focusable(true)).unwrap();
        let d = dom.add_child(a, NodeData::new("Button").with_id("d").focusable(true)).unwrap();
        (dom, root, a, b, c, d)
    }

    // ── Insertion ────────────────────────────────────────────────────

    #[test]
    fn insert_root_replaces_root() {
        let mut dom = Dom::new();
        let first = dom.insert(NodeData::container("Box", Axis::Row));
        assert_eq!(dom.root(), Some(first));
        let second = dom.insert_root(NodeData::container("Box", Axis::Column));
        assert_eq!(dom.root(), Some(second));
        assert!(dom.contains(first));
    }

    #[test]
    fn insert_sets_root() {
        let mut dom = Dom::new();
        let id = dom.insert(NodeData::new("Root"));
        assert_eq!(dom.root(), Some(id));
    }

    #[test]
    fn insert_second_does_not_change_root() {
        let mut dom = Dom::new();
        let first = dom.insert(NodeData::new("First"));
        let _second = dom.insert(NodeData::new("Second"));
        assert_eq!(dom.root(), Some(first));
    }

    #[test]
    fn add_child_parent_relationship() {
        let (dom, root, a, _b, c, _d) = build_tree();
        assert_eq!(dom.parent(a), Some(root));
        assert_eq!(dom.parent(c), Some(a));
        assert_eq!(dom.parent(root), None);
    }

    #[test]
    fn children_keep_insertion_order() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.children(root), &[a, b]);
        assert_eq!(dom.children(a), &[c, d]);
        assert!(dom.children(c).is_empty());
    }

    #[test]
    fn add_child_at_inserts_in_position() {
        let (mut dom, _root, a, _b, c, d) = build_tree();
        let e = dom.add_child_at(a, 1, NodeData::new("E")).unwrap();
        assert_eq!(dom.children(a), &[c, e, d]);
    }

    #[test]
    fn add_child_at_out_of_range() {
        let (mut dom, _root, a, ..) = build_tree();
        let err = dom.add_child_at(a, 5, NodeData::new("E")).unwrap_err();
        assert_eq!(err, TreeError::IndexOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn add_child_to_leaf_fails() {
        let (mut dom, _root, _a, b, ..) = build_tree();
        let err = dom.add_child(b, NodeData::new("E")).unwrap_err();
        assert_eq!(err, TreeError::NotAContainer(b));
    }

    // ── Attach / detach ──────────────────────────────────────────────

    #[test]
    fn detach_clears_back_reference() {
        let (mut dom, _root, a, _b, c, d) = build_tree();
        dom.detach(c).unwrap();
        assert_eq!(dom.parent(c), None);
        assert_eq!(dom.children(a), &[d]);
        assert!(dom.contains(c));
    }

    #[test]
    fn attach_detached_node() {
        let (mut dom, root, a, b, c, _d) = build_tree();
        dom.detach(c).unwrap();
        dom.attach(root, c, 1).unwrap();
        assert_eq!(dom.children(root), &[a, c, b]);
        assert_eq!(dom.parent(c), Some(root));
    }

    #[test]
    fn attach_rejects_attached_node() {
        let (mut dom, root, _a, _b, c, _d) = build_tree();
        assert_eq!(dom.attach(root, c, 0), Err(TreeError::AlreadyAttached(c)));
    }

    #[test]
    fn attach_rejects_cycle() {
        let (mut dom, root, a, ..) = build_tree();
        dom.detach(a).unwrap();
        let inner = dom.add_child(a, NodeData::container("Inner", Axis::Row)).unwrap();
        assert_eq!(
            dom.attach(inner, a, 0),
            Err(TreeError::WouldCycle { parent: inner, child: a })
        );
        assert!(dom.attach(root, a, 0).is_ok());
    }

    // ── Removal ──────────────────────────────────────────────────────

    #[test]
    fn remove_leaf() {
        let (mut dom, _root, a, _b, c, d) = build_tree();
        let removed = dom.remove(c);
        assert_eq!(removed, vec![c]);
        assert!(!dom.contains(c));
        assert_eq!(dom.children(a), &[d]);
        assert_eq!(dom.len(), 4);
    }

    #[test]
    fn remove_subtree_returns_all_ids() {
        let (mut dom, root, a, b, c, d) = build_tree();
        let removed = dom.remove(a);
        assert_eq!(removed, vec![a, c, d]);
        assert!(dom.contains(root));
        assert!(dom.contains(b));
        assert_eq!(dom.children(root), &[b]);
        assert_eq!(dom.len(), 2);
    }

    #[test]
    fn remove_root_clears_root() {
        let (mut dom, root, ..) = build_tree();
        dom.remove(root);
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
    }

    #[test]
    fn remove_stale_id_is_empty() {
        let mut dom = Dom::new();
        let id = dom.insert(NodeData::new("X"));
        dom.remove(id);
        assert!(dom.remove(id).is_empty());
    }

    #[test]
    fn stale_handle_does_not_alias_new_node() {
        let mut dom = Dom::new();
        let old = dom.insert(NodeData::new("Old"));
        dom.remove(old);
        let new = dom.insert(NodeData::new("New"));
        assert_ne!(old, new);
        assert!(dom.get(old).is_none());
    }

    #[test]
    fn remove_child_checks_parentage() {
        let (mut dom, root, _a, _b, c, _d) = build_tree();
        assert_eq!(
            dom.remove_child(root, c),
            Err(TreeError::NotAChild { parent: root, child: c })
        );
        assert!(dom.contains(c));
    }

    // ── Queries ──────────────────────────────────────────────────────

    #[test]
    fn index_in_parent() {
        let (dom, root, a, b, _c, d) = build_tree();
        assert_eq!(dom.index_in_parent(a), Ok(Some(0)));
        assert_eq!(dom.index_in_parent(b), Ok(Some(1)));
        assert_eq!(dom.index_in_parent(d), Ok(Some(1)));
        assert_eq!(dom.index_in_parent(root), Ok(None));
    }

    #[test]
    fn index_in_parent_detects_broken_link() {
        let (mut dom, _root, a, _b, c, _d) = build_tree();
        // Corrupt the tree: drop c from a's list but keep the back-reference.
        dom.children.get_mut(a).unwrap().retain(|&n| n != c);
        assert_eq!(dom.index_in_parent(c), Err(TreeError::NotAChild { parent: a, child: c }));
    }

    #[test]
    fn ancestors_and_depth() {
        let (dom, root, a, _b, c, _d) = build_tree();
        assert_eq!(dom.ancestors(c), vec![a, root]);
        assert_eq!(dom.depth(c), 2);
        assert_eq!(dom.depth(root), 0);
    }

    #[test]
    fn default_focus_index_only_on_containers() {
        let (mut dom, root, _a, b, ..) = build_tree();
        assert!(dom.set_default_focus_index(root, Some(1)).is_ok());
        assert_eq!(dom.set_default_focus_index(b, Some(0)), Err(TreeError::NotAContainer(b)));
    }

    #[test]
    fn custom_route_requires_focusable() {
        let (mut dom, _root, a, b, c, d) = build_tree();
        assert!(dom.set_custom_route(c, Direction::Down, Route::Node(d)).is_ok());
        assert_eq!(
            dom.set_custom_route(b, Direction::Up, Route::Node(a)),
            Err(TreeError::NotFocusable(b))
        );
        assert_eq!(dom.get(c).unwrap().custom_routes.get(&Direction::Down), Some(&Route::Node(d)));
    }

    #[test]
    fn walk_depth_first() {
        let (dom, root, a, b, c, d) = build_tree();
        assert_eq!(dom.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(dom.walk_depth_first(a), vec![a, c, d]);
    }

    #[test]
    fn default_impl() {
        let dom = Dom::default();
        assert!(dom.is_empty());
        assert_eq!(dom.root(), None);
    }
}
