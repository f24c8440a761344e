//! Recognizer registry and per-frame dispatch through the responder chain.
//!
//! A touch is owned by the node under the pointer when it goes down (the
//! responder). Every sample of that touch is fed to the recognizers of the
//! responder and of each of its ancestors. The first recognizer to reach
//! `Start` claims the gesture: every other recognizer on the chain that is
//! still `Unsure` gets interrupted.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::geometry::Rect;
use crate::sound::Sound;

use super::state::{GestureEvent, GestureOutput, GestureRecognizer, GestureState, TouchPhase, TouchSample};

new_key_type! {
    /// Handle to a recognizer registered in a [`GestureArena`].
    pub struct RecognizerId;
}

/// An event together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchedEvent {
    pub recognizer: RecognizerId,
    pub node: NodeId,
    pub event: GestureEvent,
}

/// Result of dispatching one sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// Events in chain order: responder first, then ancestors.
    pub events: Vec<DispatchedEvent>,
    /// Feedback sound requested by the recognizer closest to the responder.
    pub sound: Option<Sound>,
}

struct Attached {
    node: NodeId,
    recognizer: Box<dyn GestureRecognizer>,
}

/// Owns every recognizer and routes touch samples to them.
#[derive(Default)]
pub struct GestureArena {
    recognizers: SlotMap<RecognizerId, Attached>,
    /// Recognizers per node, in registration order.
    by_node: HashMap<NodeId, Vec<RecognizerId>>,
    responder: Option<NodeId>,
}

impl GestureArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `recognizer` to `node`.
    pub fn attach(&mut self, node: NodeId, recognizer: impl GestureRecognizer + 'static) -> RecognizerId {
        let id = self.recognizers.insert(Attached { node, recognizer: Box::new(recognizer) });
        self.by_node.entry(node).or_default().push(id);
        id
    }

    /// Remove one recognizer.
    pub fn detach(&mut self, id: RecognizerId) -> Option<Box<dyn GestureRecognizer>> {
        let attached = self.recognizers.remove(id)?;
        if let Some(ids) = self.by_node.get_mut(&attached.node) {
            ids.retain(|&other| other != id);
            if ids.is_empty() {
                self.by_node.remove(&attached.node);
            }
        }
        Some(attached.recognizer)
    }

    /// Remove every recognizer attached to `node`. Returns how many.
    pub fn detach_node(&mut self, node: NodeId) -> usize {
        let ids = self.by_node.remove(&node).unwrap_or_default();
        for &id in &ids {
            self.recognizers.remove(id);
        }
        if self.responder == Some(node) {
            self.responder = None;
        }
        ids.len()
    }

    /// Recognizers attached to `node`, in registration order.
    pub fn recognizers_for(&self, node: NodeId) -> &[RecognizerId] {
        self.by_node.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Node a recognizer is attached to.
    pub fn node_of(&self, id: RecognizerId) -> Option<NodeId> {
        self.recognizers.get(id).map(|attached| attached.node)
    }

    pub fn get(&self, id: RecognizerId) -> Option<&dyn GestureRecognizer> {
        self.recognizers.get(id).map(|attached| attached.recognizer.as_ref())
    }

    pub fn get_mut(&mut self, id: RecognizerId) -> Option<&mut dyn GestureRecognizer> {
        match self.recognizers.get_mut(id) {
            Some(attached) => Some(attached.recognizer.as_mut()),
            None => None,
        }
    }

    pub fn state(&self, id: RecognizerId) -> Option<GestureState> {
        self.get(id).map(|recognizer| recognizer.state())
    }

    /// Node that owns the touch in progress.
    pub fn responder(&self) -> Option<NodeId> {
        self.responder
    }

    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }

    /// Feed one frame's sample to the responder chain.
    ///
    /// A touch-down picks the responder by hit testing; the responder is kept
    /// until the touch ends. A wheel sample without a touch goes to the node
    /// under the pointer.
    pub fn dispatch(&mut self, dom: &Dom, sample: &TouchSample) -> Dispatch {
        let target = match sample.phase {
            TouchPhase::Start => {
                self.responder = dom.hit_test(sample.position);
                self.responder
            }
            TouchPhase::Stay | TouchPhase::End => self.responder,
            TouchPhase::None if sample.has_scroll() => dom.hit_test(sample.position),
            TouchPhase::None => self.responder,
        }
        .filter(|&node| dom.contains(node));

        if matches!(sample.phase, TouchPhase::End | TouchPhase::None) {
            self.responder = None;
        }

        let mut dispatch = Dispatch::default();
        let Some(target) = target else {
            return dispatch;
        };

        let chain: Vec<(RecognizerId, NodeId)> = std::iter::once(target)
            .chain(dom.ancestors(target))
            .flat_map(|node| self.recognizers_for(node).iter().map(move |&id| (id, node)))
            .collect();

        let mut claimed = Vec::new();
        for &(id, node) in &chain {
            let frame = dom.get(node).map_or(Rect::EMPTY, |data| data.frame);
            let Some(attached) = self.recognizers.get_mut(id) else {
                continue;
            };
            let before = attached.recognizer.state();
            let mut out = GestureOutput::new();
            let state = attached.recognizer.recognition_loop(sample, frame, &mut out);
            if state == GestureState::Start && before != GestureState::Start {
                claimed.push(id);
            }
            if dispatch.sound.is_none() && attached.recognizer.sound_on_touch() {
                dispatch.sound = out.sound;
            }
            dispatch.events.extend(
                out.events
                    .into_iter()
                    .map(|event| DispatchedEvent { recognizer: id, node, event }),
            );
        }

        for winner in claimed {
            for &(id, _) in &chain {
                if id == winner {
                    continue;
                }
                if let Some(attached) = self.recognizers.get_mut(id) {
                    if attached.recognizer.state() == GestureState::Unsure {
                        tracing::trace!(
                            winner = ?winner,
                            loser = ?id,
                            name = attached.recognizer.name(),
                            "gesture claimed, interrupting"
                        );
                    }
                    attached.recognizer.interrupt(true);
                }
            }
        }

        dispatch
    }
}

impl std::fmt::Debug for GestureArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureArena")
            .field("recognizers", &self.recognizers.len())
            .field("responder", &self.responder)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::{Axis, NodeData};
    use crate::gesture::pan::{PanAxis, PanGestureRecognizer};
    use crate::gesture::tap::TapGestureRecognizer;

    /// A 100x200 column list with one 100x50 button at the top.
    fn list_with_button() -> (Dom, NodeId, NodeId) {
        let mut dom = Dom::new();
        let list = dom.insert(
            NodeData::container("List", Axis::Column).with_frame(Rect::new(0.0, 0.0, 100.0, 200.0)),
        );
        let button = dom
            .add_child(
                list,
                NodeData::new("Button").focusable(true).with_frame(Rect::new(0.0, 0.0, 100.0, 50.0)),
            )
            .unwrap();
        (dom, list, button)
    }

    fn states(dispatch: &Dispatch) -> Vec<(NodeId, GestureState)> {
        dispatch.events.iter().map(|e| (e.node, e.event.state())).collect()
    }

    #[test]
    fn touch_goes_to_responder_chain() {
        let (dom, list, button) = list_with_button();
        let mut arena = GestureArena::new();
        let tap = arena.attach(button, TapGestureRecognizer::new());
        let pan = arena.attach(list, PanGestureRecognizer::new(PanAxis::Vertical));

        let dispatch = arena.dispatch(&dom, &TouchSample::start(10.0, 10.0));
        assert_eq!(arena.responder(), Some(button));
        assert_eq!(states(&dispatch), vec![(button, GestureState::Unsure)]);
        assert_eq!(arena.state(tap), Some(GestureState::Unsure));
        assert_eq!(arena.state(pan), Some(GestureState::Unsure));
        assert_eq!(dispatch.sound, Some(Sound::FocusChange));
    }

    #[test]
    fn pan_claim_interrupts_unsure_tap() {
        let (dom, list, button) = list_with_button();
        let mut arena = GestureArena::new();
        let tap = arena.attach(button, TapGestureRecognizer::new());
        let pan = arena.attach(list, PanGestureRecognizer::new(PanAxis::Vertical));

        arena.dispatch(&dom, &TouchSample::start(10.0, 10.0));
        let dispatch = arena.dispatch(&dom, &TouchSample::stay(10.0, 40.0));
        assert_eq!(states(&dispatch), vec![(list, GestureState::Start)]);
        assert_eq!(arena.state(tap), Some(GestureState::Interrupted));
        assert_eq!(arena.state(pan), Some(GestureState::Start));

        // The interruption is reported on the next frame, exactly once.
        let dispatch = arena.dispatch(&dom, &TouchSample::stay(10.0, 60.0));
        assert_eq!(
            states(&dispatch),
            vec![(button, GestureState::Interrupted), (list, GestureState::Stay)]
        );
        let dispatch = arena.dispatch(&dom, &TouchSample::end(10.0, 60.0));
        assert_eq!(states(&dispatch), vec![(list, GestureState::End)]);
    }

    #[test]
    fn responder_kept_until_touch_ends() {
        let (dom, _list, button) = list_with_button();
        let mut arena = GestureArena::new();
        arena.attach(button, TapGestureRecognizer::new());

        arena.dispatch(&dom, &TouchSample::start(10.0, 10.0));
        // The pointer wanders outside the button; the button still owns it.
        let dispatch = arena.dispatch(&dom, &TouchSample::stay(10.0, 150.0));
        assert_eq!(states(&dispatch), vec![(button, GestureState::Failed)]);
        arena.dispatch(&dom, &TouchSample::end(10.0, 150.0));
        assert_eq!(arena.responder(), None);
    }

    #[test]
    fn wheel_goes_to_node_under_pointer() {
        let (dom, list, _button) = list_with_button();
        let mut arena = GestureArena::new();
        arena.attach(list, crate::gesture::scroll::ScrollGestureRecognizer::new(PanAxis::Vertical));

        let dispatch = arena.dispatch(
            &dom,
            &TouchSample::wheel(crate::geometry::Point::new(10.0, 120.0), crate::geometry::Point::new(0.0, 20.0)),
        );
        assert_eq!(states(&dispatch), vec![(list, GestureState::Stay)]);
    }

    #[test]
    fn miss_dispatches_nothing() {
        let (dom, _list, button) = list_with_button();
        let mut arena = GestureArena::new();
        arena.attach(button, TapGestureRecognizer::new());
        let dispatch = arena.dispatch(&dom, &TouchSample::start(500.0, 500.0));
        assert!(dispatch.events.is_empty());
        assert_eq!(arena.responder(), None);
    }

    #[test]
    fn detach_node_removes_all_recognizers() {
        let (dom, _list, button) = list_with_button();
        let mut arena = GestureArena::new();
        let first = arena.attach(button, TapGestureRecognizer::new());
        arena.attach(button, TapGestureRecognizer::new());
        arena.dispatch(&dom, &TouchSample::start(10.0, 10.0));

        assert_eq!(arena.detach_node(button), 2);
        assert!(arena.is_empty());
        assert!(arena.get(first).is_none());
        assert_eq!(arena.responder(), None);
        assert!(arena.recognizers_for(button).is_empty());
    }

    #[test]
    fn detach_single_recognizer() {
        let (_dom, _list, button) = list_with_button();
        let mut arena = GestureArena::new();
        let first = arena.attach(button, TapGestureRecognizer::new());
        let second = arena.attach(button, TapGestureRecognizer::new());
        assert!(arena.detach(first).is_some());
        assert_eq!(arena.recognizers_for(button), &[second]);
        assert_eq!(arena.node_of(second), Some(button));
        assert!(arena.detach(first).is_none());
    }

    #[test]
    fn destroyed_responder_is_ignored() {
        let (mut dom, _list, button) = list_with_button();
        let mut arena = GestureArena::new();
        arena.attach(button, TapGestureRecognizer::new());
        arena.dispatch(&dom, &TouchSample::start(10.0, 10.0));
        dom.remove(button);
        let dispatch = arena.dispatch(&dom, &TouchSample::end(10.0, 10.0));
        assert!(dispatch.events.is_empty());
    }
}
