//! Button actions registered on nodes.
//!
//! [`ActionRegistry`] maps nodes to the actions they expose. A button press
//! travels from a node up to the root and is consumed by the first available
//! action whose listener returns `true`.

use std::collections::HashMap;
use std::fmt;

use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::sound::Sound;

use super::input::Button;

new_key_type! {
    /// Handle to a registered action.
    pub struct ActionId;
}

/// Action listener. Returns `true` when the press was consumed.
pub type ActionListener = Box<dyn FnMut(NodeId) -> bool>;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A button bound to a listener on one node.
pub struct Action {
    pub node: NodeId,
    pub button: Button,
    /// Label shown in a hint bar.
    pub hint: String,
    /// Played when the listener consumes the press.
    pub sound: Sound,
    /// Unavailable actions are skipped and hidden from hints.
    pub available: bool,
    listener: ActionListener,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("node", &self.node)
            .field("button", &self.button)
            .field("hint", &self.hint)
            .field("sound", &self.sound)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}

/// A press that some listener consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triggered {
    pub action: ActionId,
    pub node: NodeId,
    pub sound: Sound,
}

// ---------------------------------------------------------------------------
// ActionRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: SlotMap<ActionId, Action>,
    by_node: HashMap<NodeId, Vec<ActionId>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action on `node`.
    ///
    /// A node has at most one action per button: registering the same
    /// button again replaces the previous action and keeps its id.
    pub fn register_action(
        &mut self,
        node: NodeId,
        button: Button,
        hint: impl Into<String>,
        sound: Sound,
        listener: impl FnMut(NodeId) -> bool + 'static,
    ) -> ActionId {
        let hint = hint.into();
        if let Some(id) = self.find(node, button) {
            if let Some(action) = self.actions.get_mut(id) {
                action.hint = hint;
                action.sound = sound;
                action.available = true;
                action.listener = Box::new(listener);
                return id;
            }
        }
        let id = self.actions.insert(Action {
            node,
            button,
            hint,
            sound,
            available: true,
            listener: Box::new(listener),
        });
        self.by_node.entry(node).or_default().push(id);
        id
    }

    /// Remove one action. Returns `false` if it was already gone.
    pub fn unregister_action(&mut self, id: ActionId) -> bool {
        let Some(action) = self.actions.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_node.get_mut(&action.node) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.by_node.remove(&action.node);
            }
        }
        true
    }

    /// Remove every action of a destroyed node. Returns how many.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let ids = self.by_node.remove(&node).unwrap_or_default();
        for &id in &ids {
            self.actions.remove(id);
        }
        ids.len()
    }

    pub fn set_available(&mut self, id: ActionId, available: bool) {
        if let Some(action) = self.actions.get_mut(id) {
            action.available = available;
        }
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(id)
    }

    /// Actions registered on `node`, in registration order.
    pub fn actions_for(&self, node: NodeId) -> impl Iterator<Item = &Action> {
        self.by_node
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.actions.get(id))
    }

    /// Whether `node` itself has an available action for `button`.
    pub fn has_available(&self, node: NodeId, button: Button) -> bool {
        self.find(node, button)
            .and_then(|id| self.actions.get(id))
            .is_some_and(|action| action.available)
    }

    fn find(&self, node: NodeId, button: Button) -> Option<ActionId> {
        self.by_node
            .get(&node)?
            .iter()
            .copied()
            .find(|&id| self.actions.get(id).is_some_and(|action| action.button == button))
    }

    /// Run `node`'s own action for `button`, if available.
    pub fn trigger(&mut self, node: NodeId, button: Button) -> Option<Triggered> {
        let id = self.find(node, button)?;
        let action = self.actions.get_mut(id)?;
        if !action.available {
            return None;
        }
        if !(action.listener)(node) {
            return None;
        }
        debug!(?node, ?button, hint = %action.hint, "action consumed");
        Some(Triggered { action: id, node, sound: action.sound })
    }

    /// Offer `button` to `start` and then each of its ancestors until a
    /// listener consumes it.
    pub fn dispatch(&mut self, dom: &Dom, start: NodeId, button: Button) -> Option<Triggered> {
        std::iter::once(start)
            .chain(dom.ancestors(start))
            .find_map(|node| self.trigger(node, button))
    }

    /// Available hints visible from `start`, closest node first, one per
    /// button.
    pub fn hints(&self, dom: &Dom, start: NodeId) -> Vec<(Button, &str)> {
        let mut hints: Vec<(Button, &str)> = Vec::new();
        for node in std::iter::once(start).chain(dom.ancestors(start)) {
            for action in self.actions_for(node).filter(|action| action.available) {
                if !hints.iter().any(|&(button, _)| button == action.button) {
                    hints.push((action.button, action.hint.as_str()));
                }
            }
        }
        hints
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
