//! The tween scheduler: one [`Animatable`] per (node, property) tag, stepped
//! once per frame in registration order.
//!
//! Callbacks never touch the engine directly. They receive an
//! [`AnimationCommands`] buffer, and whatever they queue is applied after
//! the stepping loop finishes, so newly started animations are first
//! advanced on the next [`tick`](AnimationEngine::tick).

use std::collections::{HashMap, VecDeque};

use slotmap::{new_key_type, SlotMap};

use super::animatable::{Advance, Animatable, Start, Step};
use super::easing::Easing;
use crate::dom::node::NodeId;

new_key_type! {
    /// Handle to an animation slot inside an [`AnimationEngine`].
    pub struct AnimationId;
}

/// The semantic property an animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Focus highlight intensity, 0 (off) to 1 (fully highlighted).
    Highlight,
    /// Click pulse, 0 (rest) to 1 (fully pressed).
    ClickPulse,
    /// Progress of the "no target" shake, 0 to 1.
    Shake,
    /// Scroll offset along the scroll axis.
    ScrollOffset,
    /// Any other host-defined property.
    Custom(&'static str),
}

/// Cancellation key: at most one animation exists per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationTag {
    pub node: NodeId,
    pub property: Property,
}

impl AnimationTag {
    pub fn new(node: NodeId, property: Property) -> Self {
        Self { node, property }
    }

    pub fn highlight(node: NodeId) -> Self {
        Self::new(node, Property::Highlight)
    }

    pub fn click_pulse(node: NodeId) -> Self {
        Self::new(node, Property::ClickPulse)
    }

    pub fn shake(node: NodeId) -> Self {
        Self::new(node, Property::Shake)
    }

    pub fn scroll_offset(node: NodeId) -> Self {
        Self::new(node, Property::ScrollOffset)
    }
}

/// Called once per tick with the current value while the animation runs.
pub type TickCallback = Box<dyn FnMut(f32, &mut AnimationCommands)>;

/// Called when the animation ends; `true` if it ran to completion, `false`
/// if it was stopped or reset while active.
pub type EndCallback = Box<dyn FnMut(bool, &mut AnimationCommands)>;

enum Command {
    Reset(AnimationTag, Option<f32>),
    Step(AnimationTag, Step),
    Start(AnimationTag),
    Stop(AnimationTag),
    OnTick(AnimationTag, Option<TickCallback>),
    OnEnd(AnimationTag, Option<EndCallback>),
}

/// Deferred engine operations queued from inside a callback.
#[derive(Default)]
pub struct AnimationCommands {
    queue: VecDeque<Command>,
}

impl AnimationCommands {
    /// Queue [`AnimationEngine::reset`].
    pub fn reset(&mut self, tag: AnimationTag, value: f32) -> &mut Self {
        self.queue.push_back(Command::Reset(tag, Some(value)));
        self
    }

    /// Queue [`AnimationEngine::reset_keep_value`].
    pub fn reset_keep_value(&mut self, tag: AnimationTag) -> &mut Self {
        self.queue.push_back(Command::Reset(tag, None));
        self
    }

    /// Queue [`AnimationEngine::add_step`].
    pub fn add_step(&mut self, tag: AnimationTag, target: f32, duration_ms: u32, easing: Easing) -> &mut Self {
        self.queue
            .push_back(Command::Step(tag, Step::new(target, duration_ms, easing)));
        self
    }

    /// Queue [`AnimationEngine::start`].
    pub fn start(&mut self, tag: AnimationTag) -> &mut Self {
        self.queue.push_back(Command::Start(tag));
        self
    }

    /// Queue [`AnimationEngine::stop`].
    pub fn stop(&mut self, tag: AnimationTag) -> &mut Self {
        self.queue.push_back(Command::Stop(tag));
        self
    }

    /// Queue a tick callback replacement (`None` clears it).
    pub fn set_tick_callback(&mut self, tag: AnimationTag, callback: Option<TickCallback>) -> &mut Self {
        self.queue.push_back(Command::OnTick(tag, callback));
        self
    }

    /// Queue an end callback replacement (`None` clears it).
    pub fn set_end_callback(&mut self, tag: AnimationTag, callback: Option<EndCallback>) -> &mut Self {
        self.queue.push_back(Command::OnEnd(tag, callback));
        self
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl std::fmt::Debug for AnimationCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationCommands")
            .field("queued", &self.queue.len())
            .finish()
    }
}

struct Slot {
    tag: AnimationTag,
    animatable: Animatable,
    on_tick: Option<TickCallback>,
    on_end: Option<EndCallback>,
}

/// Owns every animation and steps the active ones once per frame.
pub struct AnimationEngine {
    slots: SlotMap<AnimationId, Slot>,
    by_tag: HashMap<AnimationTag, AnimationId>,
    /// Registration order, used as the stepping order.
    order: Vec<AnimationId>,
    pending: AnimationCommands,
}

impl AnimationEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            by_tag: HashMap::new(),
            order: Vec::new(),
            pending: AnimationCommands::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current value of the animation on `tag`, if one was ever created.
    pub fn value(&self, tag: AnimationTag) -> Option<f32> {
        self.slot(tag).map(|slot| slot.animatable.value())
    }

    /// Current value on `tag`, or `default` if no animation exists.
    pub fn value_or(&self, tag: AnimationTag, default: f32) -> f32 {
        self.value(tag).unwrap_or(default)
    }

    /// Whether the animation on `tag` is armed.
    pub fn is_active(&self, tag: AnimationTag) -> bool {
        self.slot(tag).is_some_and(|slot| slot.animatable.is_active())
    }

    /// Overall progress of the animation on `tag` in `[0, 1]`.
    pub fn progress(&self, tag: AnimationTag) -> Option<f32> {
        self.slot(tag).map(|slot| slot.animatable.progress())
    }

    /// Number of armed animations.
    pub fn active_count(&self) -> usize {
        self.slots.values().filter(|slot| slot.animatable.is_active()).count()
    }

    /// Number of animations of any state.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The underlying animatable for `tag`.
    pub fn animatable(&self, tag: AnimationTag) -> Option<&Animatable> {
        self.slot(tag).map(|slot| &slot.animatable)
    }

    /// Tags of every animation registered for `node`.
    pub fn tags_for(&self, node: NodeId) -> Vec<AnimationTag> {
        self.order
            .iter()
            .filter_map(|&id| self.slots.get(id))
            .filter(|slot| slot.tag.node == node)
            .map(|slot| slot.tag)
            .collect()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Stop any running animation on `tag`, drop its steps and set its value.
    ///
    /// An active animation reports `end(false)`.
    pub fn reset(&mut self, tag: AnimationTag, value: f32) {
        self.apply(Command::Reset(tag, Some(value)));
        self.flush();
    }

    /// Like [`reset`](Self::reset) but keeps the current value as the
    /// starting point for the next steps.
    pub fn reset_keep_value(&mut self, tag: AnimationTag) {
        self.apply(Command::Reset(tag, None));
        self.flush();
    }

    /// Queue a step on `tag`, creating the animation if needed.
    pub fn add_step(&mut self, tag: AnimationTag, target: f32, duration_ms: u32, easing: Easing) {
        self.apply(Command::Step(tag, Step::new(target, duration_ms, easing)));
    }

    /// Replace the tick callback of `tag`.
    pub fn set_tick_callback(
        &mut self,
        tag: AnimationTag,
        callback: impl FnMut(f32, &mut AnimationCommands) + 'static,
    ) {
        self.apply(Command::OnTick(tag, Some(Box::new(callback))));
    }

    /// Replace the end callback of `tag`.
    pub fn set_end_callback(
        &mut self,
        tag: AnimationTag,
        callback: impl FnMut(bool, &mut AnimationCommands) + 'static,
    ) {
        self.apply(Command::OnEnd(tag, Some(Box::new(callback))));
    }

    /// Remove both callbacks of `tag`.
    pub fn clear_callbacks(&mut self, tag: AnimationTag) {
        self.apply(Command::OnTick(tag, None));
        self.apply(Command::OnEnd(tag, None));
    }

    /// Arm `tag` from its current value.
    ///
    /// With no steps queued the animation completes at once: `end(true)` is
    /// invoked and nothing is armed.
    pub fn start(&mut self, tag: AnimationTag) {
        self.apply(Command::Start(tag));
        self.flush();
    }

    /// Halt `tag` without consuming its remaining steps.
    ///
    /// `end(false)` is invoked only if the animation was active.
    pub fn stop(&mut self, tag: AnimationTag) {
        self.apply(Command::Stop(tag));
        self.flush();
    }

    /// Drop every animation belonging to `node` without invoking callbacks.
    pub fn cancel_node(&mut self, node: NodeId) -> usize {
        let doomed: Vec<AnimationId> = self
            .order
            .iter()
            .copied()
            .filter(|&id| self.slots.get(id).is_some_and(|slot| slot.tag.node == node))
            .collect();
        for &id in &doomed {
            if let Some(slot) = self.slots.remove(id) {
                self.by_tag.remove(&slot.tag);
            }
        }
        self.order.retain(|id| !doomed.contains(id));
        if !doomed.is_empty() {
            tracing::trace!(?node, count = doomed.len(), "cancelled node animations");
        }
        doomed.len()
    }

    // ── Stepping ─────────────────────────────────────────────────────

    /// Advance every active animation by `delta_ms`, in registration order.
    ///
    /// Commands queued by callbacks during this tick are applied once the
    /// stepping loop has finished.
    pub fn tick(&mut self, delta_ms: f32) {
        let snapshot: Vec<AnimationId> = self.order.clone();
        for id in snapshot {
            let Some(slot) = self.slots.get_mut(id) else {
                continue;
            };
            let outcome = slot.animatable.advance(delta_ms);
            if outcome == Advance::Idle {
                continue;
            }

            let value = slot.animatable.value();
            if let Some(mut callback) = slot.on_tick.take() {
                callback(value, &mut self.pending);
                slot.on_tick.get_or_insert(callback);
            }
            if outcome == Advance::Finished {
                tracing::trace!(tag = ?slot.tag, value, "animation finished");
                if let Some(mut callback) = slot.on_end.take() {
                    callback(true, &mut self.pending);
                    slot.on_end.get_or_insert(callback);
                }
            }
        }
        self.flush();
    }

    // ── Internals ────────────────────────────────────────────────────

    fn slot(&self, tag: AnimationTag) -> Option<&Slot> {
        self.by_tag.get(&tag).and_then(|&id| self.slots.get(id))
    }

    fn slot_id(&mut self, tag: AnimationTag) -> AnimationId {
        if let Some(&id) = self.by_tag.get(&tag) {
            if self.slots.contains_key(id) {
                return id;
            }
        }
        let id = self.slots.insert(Slot {
            tag,
            animatable: Animatable::default(),
            on_tick: None,
            on_end: None,
        });
        self.by_tag.insert(tag, id);
        self.order.push(id);
        id
    }

    /// Invoke the end callback of `id`, routing its commands to `pending`.
    fn fire_end(&mut self, id: AnimationId, finished: bool) {
        let Some(slot) = self.slots.get_mut(id) else {
            return;
        };
        if let Some(mut callback) = slot.on_end.take() {
            callback(finished, &mut self.pending);
            slot.on_end.get_or_insert(callback);
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Reset(tag, value) => {
                let id = self.slot_id(tag);
                let was_active = match (self.slots.get_mut(id), value) {
                    (Some(slot), Some(value)) => slot.animatable.reset(value),
                    (Some(slot), None) => slot.animatable.reset_keep_value(),
                    (None, _) => false,
                };
                if was_active {
                    self.fire_end(id, false);
                }
            }
            Command::Step(tag, step) => {
                let id = self.slot_id(tag);
                if let Some(slot) = self.slots.get_mut(id) {
                    slot.animatable.add_step(step);
                }
            }
            Command::Start(tag) => {
                let id = self.slot_id(tag);
                let started = self.slots.get_mut(id).map(|slot| slot.animatable.start());
                if started == Some(Start::Empty) {
                    self.fire_end(id, true);
                }
            }
            Command::Stop(tag) => {
                let Some(&id) = self.by_tag.get(&tag) else {
                    return;
                };
                let was_active = self
                    .slots
                    .get_mut(id)
                    .is_some_and(|slot| slot.animatable.halt());
                if was_active {
                    self.fire_end(id, false);
                }
            }
            Command::OnTick(tag, callback) => {
                let id = self.slot_id(tag);
                if let Some(slot) = self.slots.get_mut(id) {
                    slot.on_tick = callback;
                }
            }
            Command::OnEnd(tag, callback) => {
                let id = self.slot_id(tag);
                if let Some(slot) = self.slots.get_mut(id) {
                    slot.on_end = callback;
                }
            }
        }
    }

    /// Apply queued commands until none remain. Commands queued while
    /// applying (end callbacks of stopped animations) are applied too.
    fn flush(&mut self) {
        while let Some(command) = self.pending.queue.pop_front() {
            self.apply(command);
        }
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnimationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationEngine")
            .field("animations", &self.slots.len())
            .field("active", &self.active_count())
            .finish()
    }
}

// ===== Tests =====
