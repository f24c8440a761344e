//! The current focus and the operations allowed to change it.

use tracing::debug;

use crate::animation::AnimationEngine;
use crate::config::InteractionConfig;
use crate::dom::node::{Direction, NodeId};
use crate::dom::tree::{Dom, TreeError};
use crate::sound::Sound;

use super::highlight;
use super::navigator::{default_focus, find_target};

/// Result of a directional navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Focus moved from `from` to `to`.
    Moved { from: NodeId, to: NodeId },
    /// Nothing lies in `direction`; `from` keeps focus and shakes.
    NoTarget { from: NodeId, direction: Direction },
    /// Nothing focused, or the focused node is a root.
    Unchanged,
}

impl NavigationOutcome {
    /// Sound the host should play for this outcome.
    pub fn sound(&self, dom: &Dom) -> Option<Sound> {
        match self {
            NavigationOutcome::Moved { to, .. } => dom.get(*to).map(|data| data.focus_sound),
            NavigationOutcome::NoTarget { .. } => Some(Sound::FocusError),
            NavigationOutcome::Unchanged => None,
        }
    }
}

/// Which node holds focus, if any.
///
/// Only [`navigate`](Self::navigate), [`request_focus`](Self::request_focus)
/// and [`clear_focus`](Self::clear_focus) change it, and each runs the
/// lost/gained highlight hooks.
#[derive(Debug, Clone, Default)]
pub struct FocusState {
    current: Option<NodeId>,
    /// Nodes with a shake in progress.
    shaking: Vec<NodeId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused node.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn is_focused(&self, node: NodeId) -> bool {
        self.current == Some(node)
    }

    /// Move focus from the current node in `direction`.
    ///
    /// When nothing lies that way, focus stays put and the focused node
    /// shakes. Only a broken tree is an error.
    pub fn navigate(
        &mut self,
        dom: &mut Dom,
        animations: &mut AnimationEngine,
        config: &InteractionConfig,
        direction: Direction,
    ) -> Result<NavigationOutcome, TreeError> {
        let Some(current) = self.current.filter(|&node| dom.contains(node)) else {
            return Ok(NavigationOutcome::Unchanged);
        };
        if dom.parent(current).is_none() {
            return Ok(NavigationOutcome::Unchanged);
        }

        match find_target(dom, current, direction)? {
            Some(target) => {
                self.give_focus(dom, animations, config, target);
                Ok(NavigationOutcome::Moved { from: current, to: target })
            }
            None => {
                debug!(node = ?current, ?direction, "no focus target");
                highlight::start_shake(dom, animations, config, current, direction);
                if !self.shaking.contains(&current) {
                    self.shaking.push(current);
                }
                Ok(NavigationOutcome::NoTarget { from: current, direction })
            }
        }
    }

    /// Focus `node`, or the node it delegates focus to.
    ///
    /// Returns the node that ended up focused, or `None` (focus unchanged)
    /// if nothing in `node`'s subtree can take focus.
    pub fn request_focus(
        &mut self,
        dom: &mut Dom,
        animations: &mut AnimationEngine,
        config: &InteractionConfig,
        node: NodeId,
    ) -> Option<NodeId> {
        let target = default_focus(dom, node)?;
        self.give_focus(dom, animations, config, target);
        Some(target)
    }

    /// Drop focus, fading out the old node's highlight.
    pub fn clear_focus(&mut self, dom: &mut Dom, animations: &mut AnimationEngine, config: &InteractionConfig) {
        if let Some(old) = self.current.take() {
            if dom.contains(old) {
                highlight::on_focus_lost(dom, animations, config, old);
            }
            debug!(from = ?old, "focus cleared");
        }
    }

    /// Forget destroyed nodes. Focus pointing into `removed` becomes `None`.
    pub fn forget(&mut self, removed: &[NodeId]) {
        if self.current.is_some_and(|node| removed.contains(&node)) {
            debug!(from = ?self.current, "focused node destroyed");
            self.current = None;
        }
        self.shaking.retain(|node| !removed.contains(node));
    }

    /// Clear the shake marker of nodes whose shake has finished.
    pub fn settle_shakes(&mut self, dom: &mut Dom, animations: &AnimationEngine) {
        self.shaking
            .retain(|&node| !highlight::settle_shake(dom, animations, node));
    }

    /// Run the lost/gained hooks and record `target` as focused.
    fn give_focus(&mut self, dom: &mut Dom, animations: &mut AnimationEngine, config: &InteractionConfig, target: NodeId) {
        let old = self.current;
        if old == Some(target) {
            return;
        }
        if let Some(old) = old.filter(|&node| dom.contains(node)) {
            highlight::on_focus_lost(dom, animations, config, old);
        }
        highlight::on_focus_gained(dom, animations, config, target);
        self.current = Some(target);
        debug!(from = ?old, to = ?target, "focus changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationTag;
    use crate::dom::node::{Axis, NodeData};
    use crate::focus::highlight::highlight_alpha;

    struct Harness {
        dom: Dom,
        animations: AnimationEngine,
        config: InteractionConfig,
        focus: FocusState,
    }

    impl Harness {
        fn new(dom: Dom) -> Self {
            Self {
                dom,
                animations: AnimationEngine::new(),
                config: InteractionConfig::default(),
                focus: FocusState::new(),
            }
        }

        fn request(&mut self, node: NodeId) -> Option<NodeId> {
            self.focus.request_focus(&mut self.dom, &mut self.animations, &self.config, node)
        }

        fn navigate(&mut self, direction: Direction) -> NavigationOutcome {
            self.focus
                .navigate(&mut self.dom, &mut self.animations, &self.config, direction)
                .unwrap()
        }
    }

    fn row_of_three() -> (Dom, NodeId, [NodeId; 3]) {
        let mut dom = Dom::new();
        let row = dom.insert(NodeData::container("Box", Axis::Row));
        let a = dom.add_child(row, NodeData::new("Button").focusable(true)).unwrap();
        let b = dom.add_child(row, NodeData::new("Button").focusable(true)).unwrap();
        let c = dom.add_child(row, NodeData::new("Button").focusable(true)).unwrap();
        (dom, row, [a, b, c])
    }

    #[test]
    fn request_focus_resolves_default() {
        let (dom, row, [a, ..]) = row_of_three();
        let mut h = Harness::new(dom);
        assert_eq!(h.request(row), Some(a));
        assert_eq!(h.focus.current(), Some(a));
        assert!(h.dom.get(a).unwrap().focused);
    }

    #[test]
    fn request_focus_on_unfocusable_subtree_keeps_focus() {
        let (mut dom, row, [a, ..]) = row_of_three();
        let empty = dom.add_child(row, NodeData::container("Box", Axis::Column)).unwrap();
        let mut h = Harness::new(dom);
        h.request(a);
        assert_eq!(h.request(empty), None);
        assert_eq!(h.focus.current(), Some(a));
    }

    #[test]
    fn navigate_moves_and_swaps_highlights() {
        let (dom, _row, [a, b, _]) = row_of_three();
        let mut h = Harness::new(dom);
        h.request(a);
        h.animations.tick(100.0);

        assert_eq!(h.navigate(Direction::Right), NavigationOutcome::Moved { from: a, to: b });
        assert!(!h.dom.get(a).unwrap().focused);
        assert!(h.dom.get(b).unwrap().focused);
        h.animations.tick(100.0);
        assert_eq!(highlight_alpha(&h.animations, a), 0.0);
        assert_eq!(highlight_alpha(&h.animations, b), 1.0);
    }

    #[test]
    fn navigate_miss_shakes() {
        let (dom, _row, [a, ..]) = row_of_three();
        let mut h = Harness::new(dom);
        h.request(a);
        let outcome = h.navigate(Direction::Left);
        assert_eq!(outcome, NavigationOutcome::NoTarget { from: a, direction: Direction::Left });
        assert_eq!(outcome.sound(&h.dom), Some(Sound::FocusError));
        assert_eq!(h.focus.current(), Some(a));
        assert!(h.animations.is_active(AnimationTag::shake(a)));
        assert_eq!(h.dom.get(a).unwrap().highlight_shake, Some(Direction::Left));

        h.animations.tick(500.0);
        h.focus.settle_shakes(&mut h.dom, &h.animations);
        assert_eq!(h.dom.get(a).unwrap().highlight_shake, None);
    }

    #[test]
    fn navigate_without_focus_or_parent_is_unchanged() {
        let (dom, row, _) = row_of_three();
        let mut h = Harness::new(dom);
        assert_eq!(h.navigate(Direction::Right), NavigationOutcome::Unchanged);

        h.dom.get_mut(row).unwrap().focusable = true;
        h.request(row);
        assert_eq!(h.focus.current(), Some(row));
        assert_eq!(h.navigate(Direction::Right), NavigationOutcome::Unchanged);
        assert_eq!(h.animations.active_count(), 1);
    }

    #[test]
    fn moved_outcome_carries_target_sound() {
        let (mut dom, _row, [a, b, _]) = row_of_three();
        dom.get_mut(b).unwrap().focus_sound = Sound::FocusSidebar;
        let mut h = Harness::new(dom);
        h.request(a);
        let outcome = h.navigate(Direction::Right);
        assert_eq!(outcome.sound(&h.dom), Some(Sound::FocusSidebar));
    }

    #[test]
    fn refocusing_same_node_is_a_no_op() {
        let (dom, _row, [a, ..]) = row_of_three();
        let mut h = Harness::new(dom);
        h.request(a);
        h.animations.tick(100.0);
        h.request(a);
        assert_eq!(h.animations.active_count(), 0);
    }

    #[test]
    fn clear_focus_fades_out() {
        let (dom, _row, [a, ..]) = row_of_three();
        let mut h = Harness::new(dom);
        h.request(a);
        h.focus.clear_focus(&mut h.dom, &mut h.animations, &h.config);
        assert_eq!(h.focus.current(), None);
        assert!(!h.dom.get(a).unwrap().focused);
        h.animations.tick(100.0);
        assert_eq!(highlight_alpha(&h.animations, a), 0.0);
    }

    #[test]
    fn forget_destroyed_focus() {
        let (dom, _row, [a, b, _]) = row_of_three();
        let mut h = Harness::new(dom);
        h.request(b);
        let removed = h.dom.remove(b);
        h.focus.forget(&removed);
        assert_eq!(h.focus.current(), None);

        h.request(a);
        h.focus.forget(&removed);
        assert_eq!(h.focus.current(), Some(a));
    }
}
