//! Tree queries: id lookup in the nearest scope, pointer hit testing.

use super::node::{NodeId, Visibility};
use super::tree::Dom;
use crate::geometry::Point;

impl Dom {
    /// Find a node with the given string id in the subtree rooted at `start`.
    ///
    /// `start` itself is checked first, then its children in order,
    /// depth-first.
    pub fn find_in_subtree(&self, start: NodeId, id: &str) -> Option<NodeId> {
        self.walk_depth_first(start)
            .into_iter()
            .find(|&node| self.get(node).is_some_and(|data| data.id.as_deref() == Some(id)))
    }

    /// Resolve `id` from the point of view of `from`.
    ///
    /// Searches the subtree of `from` first, then the subtree of each
    /// ancestor in turn, so the closest match in tree distance wins.
    pub fn nearest_by_id(&self, from: NodeId, id: &str) -> Option<NodeId> {
        if !self.contains(from) {
            return None;
        }
        std::iter::once(from)
            .chain(self.ancestors(from))
            .find_map(|scope| self.find_in_subtree(scope, id))
    }

    /// The deepest visible node whose frame contains `point`.
    ///
    /// Later siblings are drawn on top of earlier ones, so they are tested
    /// first. Invisible and gone subtrees are skipped entirely.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        let root = self.root()?;
        self.hit_test_from(root, point)
    }

    fn hit_test_from(&self, node: NodeId, point: Point) -> Option<NodeId> {
        let data = self.get(node)?;
        if data.visibility != Visibility::Visible || !data.frame.contains(point) {
            return None;
        }
        self.children(node)
            .iter()
            .rev()
            .find_map(|&child| self.hit_test_from(child, point))
            .or(Some(node))
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::node::{Axis, NodeData, NodeId, Visibility};
    use crate::dom::tree::Dom;
    use crate::geometry::{Point, Rect};

    /// Build a test tree for queries:
    /// ```text
    ///        root (#root, 0,0 200x100)
    ///       /            \
    ///   left (#left)     right (#right)
    ///   0,0 100x100      100,0 100x100
    ///    /     \             \
    ///  save    cancel        save (duplicate id)
    /// ```
    fn build_query_tree() -> (Dom, [NodeId; 6]) {
        let mut dom = Dom::new();
        let root = dom.insert(
            NodeData::container("Box", Axis::Row)
                .with_id("root")
                .with_frame(Rect::new(0.0, 0.0, 200.0, 100.0)),
        );
        let left = dom
            .add_child(
                root,
                NodeData::container("Box", Axis::Column)
                    .with_id("left")
                    .with_frame(Rect::new(0.0, 0.0, 100.0, 100.0)),
            )
            .unwrap();
        let right = dom
            .add_child(
                root,
                NodeData::container("Box", Axis::Column)
                    .with_id("right")
                    .with_frame(Rect::new(100.0, 0.0, 100.0, 100.0)),
            )
            .unwrap();
        let save = dom
            .add_child(
                left,
                NodeData::new("Button").with_id("save").with_frame(Rect::new(0.0, 0.0, 100.0, 50.0)),
            )
            .unwrap();
        let cancel = dom
            .add_child(
                left,
                NodeData::new("Button").with_id("cancel").with_frame(Rect::new(0.0, 50.0, 100.0, 50.0)),
            )
            .unwrap();
        let right_save = dom
            .add_child(
                right,
                NodeData::new("Button").with_id("save").with_frame(Rect::new(100.0, 0.0, 100.0, 50.0)),
            )
            .unwrap();
        (dom, [root, left, right, save, cancel, right_save])
    }

    // ── Id lookup ────────────────────────────────────────────────────

    #[test]
    fn find_in_subtree_self_first() {
        let (dom, [root, ..]) = build_query_tree();
        assert_eq!(dom.find_in_subtree(root, "root"), Some(root));
    }

    #[test]
    fn find_in_subtree_depth_first_order() {
        let (dom, [root, _left, _right, save, ..]) = build_query_tree();
        assert_eq!(dom.find_in_subtree(root, "save"), Some(save));
    }

    #[test]
    fn find_in_subtree_missing() {
        let (dom, [root, ..]) = build_query_tree();
        assert!(dom.find_in_subtree(root, "nope").is_none());
    }

    #[test]
    fn nearest_by_id_prefers_closest_scope() {
        let (dom, [_root, _left, right, save, cancel, right_save]) = build_query_tree();
        // From the right column, "save" resolves inside its own subtree.
        assert_eq!(dom.nearest_by_id(right, "save"), Some(right_save));
        // From cancel, the search ascends to `left` and finds the left save.
        assert_eq!(dom.nearest_by_id(cancel, "save"), Some(save));
    }

    #[test]
    fn nearest_by_id_ascends_to_root() {
        let (dom, [_root, left, _right, _save, cancel, _]) = build_query_tree();
        assert_eq!(dom.nearest_by_id(cancel, "left"), Some(left));
    }

    #[test]
    fn nearest_by_id_unknown() {
        let (dom, [_root, _left, _right, save, ..]) = build_query_tree();
        assert!(dom.nearest_by_id(save, "ghost").is_none());
    }

    // ── Hit testing ──────────────────────────────────────────────────

    #[test]
    fn hit_test_deepest_node() {
        let (dom, [_root, _left, _right, save, cancel, right_save]) = build_query_tree();
        assert_eq!(dom.hit_test(Point::new(10.0, 10.0)), Some(save));
        assert_eq!(dom.hit_test(Point::new(10.0, 60.0)), Some(cancel));
        assert_eq!(dom.hit_test(Point::new(150.0, 10.0)), Some(right_save));
    }

    #[test]
    fn hit_test_falls_back_to_container() {
        let (dom, [_root, _left, right, ..]) = build_query_tree();
        assert_eq!(dom.hit_test(Point::new(150.0, 80.0)), Some(right));
    }

    #[test]
    fn hit_test_outside_root() {
        let (dom, _) = build_query_tree();
        assert!(dom.hit_test(Point::new(500.0, 10.0)).is_none());
    }

    #[test]
    fn hit_test_skips_invisible() {
        let (mut dom, [_root, left, _right, save, ..]) = build_query_tree();
        dom.get_mut(save).unwrap().visibility = Visibility::Invisible;
        assert_eq!(dom.hit_test(Point::new(10.0, 10.0)), Some(left));
    }

    #[test]
    fn queries_on_empty_dom() {
        let dom = Dom::new();
        assert!(dom.hit_test(Point::new(0.0, 0.0)).is_none());
    }
}
