//! The interaction context: one object owning the node tree and every
//! engine that reacts to input, driven once per frame.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::animation::{AnimationEngine, AnimationTag, Easing};
use crate::config::{ConfigError, InteractionConfig};
use crate::dom::node::{Axis, Direction, NodeData, NodeId};
use crate::dom::tree::{Dom, TreeError};
use crate::event::{ActionId, ActionRegistry, Button};
use crate::focus::{highlight, FocusState, NavigationOutcome};
use crate::geometry::Point;
use crate::gesture::{
    DispatchedEvent, GestureArena, GestureEvent, GestureState, PanAxis, PanStatus, RecognizerId,
    ScrollGestureRecognizer, TapGestureRecognizer, TapStatus, TouchSample,
};
use crate::layout::{LayoutEngine, LayoutError};
use crate::sound::Sound;

/// Errors surfaced by [`Ui`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UiError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Scroll state of a node made scrollable.
#[derive(Debug, Clone, Copy)]
struct Scrollable {
    axis: Axis,
    /// Offset when the current drag started.
    drag_origin: f32,
}

fn along(axis: Axis, point: Point) -> f32 {
    match axis {
        Axis::Row => point.x,
        Axis::Column => point.y,
    }
}

/// Owns the tree, focus, animations, recognizers and actions.
///
/// Each call to [`frame`](Ui::frame) runs gesture recognition, gesture
/// handling, button handling and then the animation tick, in that order.
pub struct Ui {
    dom: Dom,
    focus: FocusState,
    animations: AnimationEngine,
    gestures: GestureArena,
    actions: ActionRegistry,
    layout: LayoutEngine,
    config: InteractionConfig,
    scrollables: HashMap<NodeId, Scrollable>,
    sounds: Vec<Sound>,
    last_events: Vec<DispatchedEvent>,
}

impl Default for Ui {
    fn default() -> Self {
        Self::build(InteractionConfig::default())
    }
}

impl Ui {
    /// Create a context with a validated configuration.
    pub fn new(config: InteractionConfig) -> Result<Self, UiError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: InteractionConfig) -> Self {
        Self {
            dom: Dom::new(),
            focus: FocusState::new(),
            animations: AnimationEngine::new(),
            gestures: GestureArena::new(),
            actions: ActionRegistry::new(),
            layout: LayoutEngine::new(config.list_spacing),
            config,
            scrollables: HashMap::new(),
            sounds: Vec::new(),
            last_events: Vec::new(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn animations(&self) -> &AnimationEngine {
        &self.animations
    }

    pub fn animations_mut(&mut self) -> &mut AnimationEngine {
        &mut self.animations
    }

    pub fn gestures(&self) -> &GestureArena {
        &self.gestures
    }

    pub fn gestures_mut(&mut self) -> &mut GestureArena {
        &mut self.gestures
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    /// The focused node.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.current()
    }

    /// Events produced by the last frame's gesture recognition.
    pub fn last_events(&self) -> &[DispatchedEvent] {
        &self.last_events
    }

    /// Hand queued feedback sounds to the host, oldest first.
    pub fn drain_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    // ── Tree ─────────────────────────────────────────────────────────

    /// Insert a new root node, replacing any previous root.
    pub fn insert_root(&mut self, data: NodeData) -> NodeId {
        self.dom.insert_root(data)
    }

    pub fn add_child(&mut self, parent: NodeId, data: NodeData) -> Result<NodeId, UiError> {
        Ok(self.dom.add_child(parent, data)?)
    }

    /// Destroy `node` and its subtree.
    ///
    /// Focus inside the subtree is cleared, and the animations, recognizers
    /// and actions of every removed node are dropped. Returns the removed ids.
    pub fn destroy(&mut self, node: NodeId) -> Vec<NodeId> {
        let removed = self.dom.remove(node);
        self.forget_removed(&removed);
        debug!(?node, count = removed.len(), "destroyed subtree");
        removed
    }

    /// Remove `child` from `parent` and destroy its subtree, with the same
    /// cleanup as [`destroy`](Ui::destroy).
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<Vec<NodeId>, UiError> {
        let removed = self.dom.remove_child(parent, child)?;
        self.forget_removed(&removed);
        debug!(?parent, ?child, count = removed.len(), "removed child");
        Ok(removed)
    }

    fn forget_removed(&mut self, removed: &[NodeId]) {
        for &id in removed {
            self.animations.cancel_node(id);
            self.gestures.detach_node(id);
            self.actions.remove_node(id);
            self.scrollables.remove(&id);
        }
        self.focus.forget(removed);
    }

    /// Lay the tree out into `width` x `height` and write node frames.
    pub fn layout(&mut self, width: f32, height: f32) -> Result<(), UiError> {
        Ok(self.layout.layout(&mut self.dom, width, height)?)
    }

    // ── Wiring ───────────────────────────────────────────────────────

    /// Make `node` tappable: a tap focuses it and fires its `A` action.
    pub fn add_tap(&mut self, node: NodeId) -> RecognizerId {
        self.gestures.attach(node, TapGestureRecognizer::new())
    }

    /// Make `node` scroll its content along `axis` by drag, fling and wheel.
    pub fn make_scrollable(&mut self, node: NodeId, axis: Axis) -> RecognizerId {
        let pan_axis = match axis {
            Axis::Row => PanAxis::Horizontal,
            Axis::Column => PanAxis::Vertical,
        };
        self.scrollables.insert(node, Scrollable { axis, drag_origin: 0.0 });
        self.gestures
            .attach(node, ScrollGestureRecognizer::with_config(pan_axis, &self.config))
    }

    /// Register an action on `node`; see [`ActionRegistry::register_action`].
    pub fn register_action(
        &mut self,
        node: NodeId,
        button: Button,
        hint: impl Into<String>,
        sound: Sound,
        listener: impl FnMut(NodeId) -> bool + 'static,
    ) -> ActionId {
        self.actions.register_action(node, button, hint, sound, listener)
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Focus `node` or the node it delegates to.
    pub fn request_focus(&mut self, node: NodeId) -> Option<NodeId> {
        self.focus
            .request_focus(&mut self.dom, &mut self.animations, &self.config, node)
    }

    pub fn clear_focus(&mut self) {
        self.focus
            .clear_focus(&mut self.dom, &mut self.animations, &self.config);
    }

    /// Move focus in the direction of a D-pad press, queueing the matching
    /// sound.
    pub fn navigate(&mut self, direction: Direction) -> Result<NavigationOutcome, UiError> {
        let outcome = self
            .focus
            .navigate(&mut self.dom, &mut self.animations, &self.config, direction)?;
        if let Some(sound) = outcome.sound(&self.dom) {
            self.queue_sound(sound);
        }
        Ok(outcome)
    }

    // ── Rendering state ──────────────────────────────────────────────

    /// Highlight intensity of `node` in `[0, 1]`.
    pub fn highlight(&self, node: NodeId) -> f32 {
        highlight::highlight_alpha(&self.animations, node)
    }

    /// Click pulse of `node` in `[0, 1]`.
    pub fn click_pulse(&self, node: NodeId) -> f32 {
        highlight::click_pulse(&self.animations, node)
    }

    /// Shake displacement of `node`'s highlight.
    pub fn shake_offset(&self, node: NodeId) -> Point {
        highlight::shake_offset(&self.dom, &self.animations, &self.config, node)
    }

    /// Scroll offset of a scrollable node.
    pub fn scroll_offset(&self, node: NodeId) -> f32 {
        self.animations.value_or(AnimationTag::scroll_offset(node), 0.0)
    }

    /// Largest scroll offset of `node`: content extent past its frame.
    pub fn max_scroll(&self, node: NodeId) -> f32 {
        let (Some(scrollable), Some(data)) = (self.scrollables.get(&node), self.dom.get(node)) else {
            return 0.0;
        };
        let (origin, viewport) = match scrollable.axis {
            Axis::Row => (data.frame.x, data.frame.width),
            Axis::Column => (data.frame.y, data.frame.height),
        };
        let content = self
            .dom
            .children(node)
            .iter()
            .filter_map(|&child| self.dom.get(child))
            .map(|child| {
                let end = match scrollable.axis {
                    Axis::Row => child.frame.right(),
                    Axis::Column => child.frame.bottom(),
                };
                end - origin
            })
            .fold(0.0f32, f32::max);
        (content - viewport).max(0.0)
    }

    /// Queue `sound` for the host. `Sound::None` is dropped.
    fn queue_sound(&mut self, sound: Sound) {
        if sound != Sound::None {
            self.sounds.push(sound);
        }
    }

    // ── Frame ────────────────────────────────────────────────────────

    /// Run one frame.
    ///
    /// `sample` is this frame's pointer sample, `buttons` the buttons pressed
    /// since the previous frame and `delta_ms` the time elapsed.
    pub fn frame(&mut self, sample: &TouchSample, buttons: &[Button], delta_ms: f32) -> Result<(), UiError> {
        trace!(phase = ?sample.phase, buttons = buttons.len(), delta_ms, "frame");

        let dispatch = self.gestures.dispatch(&self.dom, sample);
        let mut gesture_sound = None;
        for event in &dispatch.events {
            match event.event {
                GestureEvent::Tap(status) => {
                    if let Some(sound) = self.handle_tap(event.node, status) {
                        gesture_sound = Some(sound);
                    }
                }
                GestureEvent::Pan(status) => self.handle_pan(event.node, status),
            }
        }
        if let Some(sound) = gesture_sound.or(dispatch.sound) {
            self.queue_sound(sound);
        }
        self.last_events = dispatch.events;

        for &button in buttons {
            self.handle_button(button)?;
        }

        self.animations.tick(delta_ms);
        self.focus.settle_shakes(&mut self.dom, &self.animations);
        Ok(())
    }

    /// A tap focuses its node. With an available `A` action the node also
    /// pulses, and a completed tap fires the action. A declined action
    /// leaves the node without feedback.
    fn handle_tap(&mut self, node: NodeId, status: TapStatus) -> Option<Sound> {
        if !self.dom.contains(node) {
            return None;
        }
        self.request_focus(node);
        if !self.actions.has_available(node, Button::A) {
            return None;
        }

        match status.state {
            GestureState::Unsure => {
                highlight::play_click_pulse(&mut self.animations, &self.config, node, false);
                Some(Sound::FocusChange)
            }
            GestureState::Failed | GestureState::Interrupted => {
                highlight::play_click_pulse(&mut self.animations, &self.config, node, true);
                Some(Sound::TouchUnfocus)
            }
            GestureState::End => match self.actions.trigger(node, Button::A) {
                Some(triggered) => {
                    highlight::play_click_pulse(&mut self.animations, &self.config, node, true);
                    Some(triggered.sound)
                }
                None => {
                    highlight::cancel_click_pulse(&mut self.animations, node);
                    None
                }
            },
            GestureState::Start | GestureState::Stay => None,
        }
    }

    fn handle_pan(&mut self, node: NodeId, status: PanStatus) {
        let Some(scrollable) = self.scrollables.get(&node).copied() else {
            return;
        };
        let tag = AnimationTag::scroll_offset(node);
        let max = self.max_scroll(node);
        let current = self.scroll_offset(node);
        let axis = scrollable.axis;

        if status.delta_only {
            let offset = (current + along(axis, status.delta)).clamp(0.0, max);
            self.animations.reset(tag, offset);
            return;
        }

        match status.state {
            GestureState::Start => {
                self.animations.reset_keep_value(tag);
                let origin = self.scroll_offset(node);
                if let Some(entry) = self.scrollables.get_mut(&node) {
                    entry.drag_origin = origin;
                }
                let moved = along(axis, status.position - status.start_position);
                self.animations.reset(tag, (origin - moved).clamp(0.0, max));
            }
            GestureState::Stay => {
                let moved = along(axis, status.position - status.start_position);
                self.animations
                    .reset(tag, (scrollable.drag_origin - moved).clamp(0.0, max));
            }
            GestureState::End => {
                let moved = along(axis, status.position - status.start_position);
                let released = (scrollable.drag_origin - moved).clamp(0.0, max);
                self.animations.reset(tag, released);
                let Some(fling) = status.acceleration else {
                    return;
                };
                let current = released;
                let target = (current - along(axis, fling.distance)).clamp(0.0, max);
                let duration_ms = (along(axis, fling.time) * 1000.0).round();
                if duration_ms < 1.0 || target == current {
                    return;
                }
                trace!(?node, target, duration_ms, "fling");
                self.animations.reset_keep_value(tag);
                self.animations
                    .add_step(tag, target, duration_ms as u32, Easing::QuadraticOut);
                self.animations.start(tag);
            }
            GestureState::Unsure | GestureState::Failed | GestureState::Interrupted => {}
        }
    }

    /// Offer `button` to the focus chain; unconsumed presses fall back to
    /// navigation (D-pad) or an error sound (`A`).
    fn handle_button(&mut self, button: Button) -> Result<(), UiError> {
        let Some(focused) = self.focus.current() else {
            if button.direction().is_some() {
                if let Some(root) = self.dom.root() {
                    self.request_focus(root);
                }
            }
            return Ok(());
        };

        if let Some(triggered) = self.actions.dispatch(&self.dom, focused, button) {
            self.queue_sound(triggered.sound);
            if button == Button::A {
                highlight::play_click_pulse(&mut self.animations, &self.config, focused, false);
            }
            return Ok(());
        }

        if let Some(direction) = button.direction() {
            self.navigate(direction)?;
        } else if button == Button::A {
            self.queue_sound(Sound::ClickError);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Ui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("nodes", &self.dom.len())
            .field("focused", &self.focus.current())
            .field("animations", &self.animations.len())
            .field("recognizers", &self.gestures.len())
            .field("actions", &self.actions.len())
            .field("pending_sounds", &self.sounds.len())
            .finish()
    }
}
