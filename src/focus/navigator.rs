//! Directional focus search over the node tree.
//!
//! These are pure queries: they pick a target and never change focus.
//! [`FocusState`](super::state::FocusState) applies the result.

use tracing::warn;

use crate::dom::node::{Direction, NodeId, NodeKind, Route, Visibility};
use crate::dom::tree::{Dom, TreeError};

/// The node that should receive focus when `node` is asked to take it.
///
/// A focusable visible node takes focus itself. A container tries its
/// preferred child first, then every child in order. Hidden subtrees
/// never yield a target.
pub fn default_focus(dom: &Dom, node: NodeId) -> Option<NodeId> {
    let data = dom.get(node)?;
    if data.visibility != Visibility::Visible {
        return None;
    }
    if data.focusable {
        return Some(node);
    }
    let NodeKind::Container { default_focus_index, .. } = data.kind else {
        return None;
    };

    let children = dom.children(node);
    if let Some(&preferred) = default_focus_index.and_then(|index| children.get(index)) {
        if let Some(found) = default_focus(dom, preferred) {
            return Some(found);
        }
    }
    children.iter().find_map(|&child| default_focus(dom, child))
}

/// Next focus target inside `container` when moving from its child `child`
/// in `direction`.
///
/// A container only resolves directions along its own axis; anything else
/// yields `None` so the search continues further up.
pub fn next_focus(dom: &Dom, container: NodeId, direction: Direction, child: NodeId) -> Result<Option<NodeId>, TreeError> {
    let data = dom.get(container).ok_or(TreeError::NodeNotFound(container))?;
    let Some(axis) = data.axis() else {
        return Err(TreeError::NotAContainer(container));
    };
    if dom.parent(child) != Some(container) {
        return Err(TreeError::NotAChild { parent: container, child });
    }
    if !direction.is_along(axis) {
        return Ok(None);
    }

    let index = dom
        .index_in_parent(child)?
        .ok_or(TreeError::NotAChild { parent: container, child })?;
    let children = dom.children(container);
    let found = match direction.step() {
        step if step > 0 => children[index + 1..].iter().find_map(|&sibling| default_focus(dom, sibling)),
        _ => children[..index].iter().rev().find_map(|&sibling| default_focus(dom, sibling)),
    };
    Ok(found)
}

/// Resolve a custom route registered on `from`.
///
/// Node routes must still be alive; id routes are looked up in the nearest
/// scope around `from`.
pub fn resolve_route(dom: &Dom, from: NodeId, route: &Route) -> Option<NodeId> {
    match route {
        Route::Node(target) => dom.contains(*target).then_some(*target),
        Route::Id(id) => dom.nearest_by_id(from, id),
    }
}

/// Find where focus should go from `current` in `direction`.
///
/// A custom route wins when it resolves to something focusable. Otherwise
/// each ancestor container is asked in turn, closest first, so every
/// container is visited at most once.
pub fn find_target(dom: &Dom, current: NodeId, direction: Direction) -> Result<Option<NodeId>, TreeError> {
    let data = dom.get(current).ok_or(TreeError::NodeNotFound(current))?;

    if let Some(route) = data.custom_routes.get(&direction) {
        match resolve_route(dom, current, route).and_then(|target| default_focus(dom, target)) {
            Some(target) => return Ok(Some(target)),
            None => warn!(
                node = %data.describe(),
                ?direction,
                ?route,
                "custom focus route did not resolve, using tree order"
            ),
        }
    }

    let mut child = current;
    while let Some(parent) = dom.parent(child) {
        if let Some(found) = next_focus(dom, parent, direction, child)? {
            return Ok(Some(found));
        }
        child = parent;
    }
    Ok(None)
}
