//! Visual feedback driven by focus: highlight fades, click pulses and the
//! "no target" shake.

use crate::animation::{AnimationEngine, AnimationTag, Easing};
use crate::config::InteractionConfig;
use crate::dom::node::{Direction, NodeId};
use crate::dom::tree::Dom;
use crate::geometry::Point;

/// Angular frequency of the shake, per 10ms.
const SHAKE_FREQUENCY: f32 = 0.8;
/// Damping of the shake, per 10ms.
const SHAKE_DAMPING: f32 = 0.35;

/// Mark `node` focused and fade its highlight in.
pub fn on_focus_gained(dom: &mut Dom, animations: &mut AnimationEngine, config: &InteractionConfig, node: NodeId) {
    if let Some(data) = dom.get_mut(node) {
        data.focused = true;
    }
    fade_highlight(animations, config, node, 1.0);
}

/// Mark `node` unfocused and fade its highlight out.
pub fn on_focus_lost(dom: &mut Dom, animations: &mut AnimationEngine, config: &InteractionConfig, node: NodeId) {
    if let Some(data) = dom.get_mut(node) {
        data.focused = false;
    }
    fade_highlight(animations, config, node, 0.0);
}

/// Replace any running highlight fade on `node` with one toward `target`,
/// starting from the current intensity.
fn fade_highlight(animations: &mut AnimationEngine, config: &InteractionConfig, node: NodeId, target: f32) {
    let tag = AnimationTag::highlight(node);
    animations.reset_keep_value(tag);
    animations.add_step(tag, target, config.highlight_duration_ms, Easing::QuadraticOut);
    animations.start(tag);
}

/// Current highlight intensity of `node` in `[0, 1]`.
pub fn highlight_alpha(animations: &AnimationEngine, node: NodeId) -> f32 {
    animations.value_or(AnimationTag::highlight(node), 0.0)
}

/// Play the click pulse on `node`.
///
/// Forward grows 0 to 1 with ease-out and then decays back on its own;
/// `reverse` jumps to 1 and only decays, with ease-in.
pub fn play_click_pulse(animations: &mut AnimationEngine, config: &InteractionConfig, node: NodeId, reverse: bool) {
    let tag = AnimationTag::click_pulse(node);
    let duration = config.click_pulse_duration_ms;

    animations.reset(tag, if reverse { 1.0 } else { 0.0 });
    animations.clear_callbacks(tag);
    if reverse {
        animations.add_step(tag, 0.0, duration, Easing::QuadraticIn);
    } else {
        animations.add_step(tag, 1.0, duration, Easing::QuadraticOut);
        animations.set_end_callback(tag, move |finished, commands| {
            if finished {
                commands
                    .reset(tag, 1.0)
                    .set_end_callback(tag, None)
                    .add_step(tag, 0.0, duration, Easing::QuadraticIn)
                    .start(tag);
            }
        });
    }
    animations.start(tag);
}

/// Drop any click pulse on `node`, back to rest.
pub fn cancel_click_pulse(animations: &mut AnimationEngine, node: NodeId) {
    let tag = AnimationTag::click_pulse(node);
    animations.clear_callbacks(tag);
    animations.reset(tag, 0.0);
}

/// Current click pulse of `node` in `[0, 1]`.
pub fn click_pulse(animations: &AnimationEngine, node: NodeId) -> f32 {
    animations.value_or(AnimationTag::click_pulse(node), 0.0)
}

/// Start the "no target" shake on `node` toward `direction`.
pub fn start_shake(
    dom: &mut Dom,
    animations: &mut AnimationEngine,
    config: &InteractionConfig,
    node: NodeId,
    direction: Direction,
) {
    if let Some(data) = dom.get_mut(node) {
        data.highlight_shake = Some(direction);
    }
    let tag = AnimationTag::shake(node);
    animations.reset(tag, 0.0);
    animations.add_step(tag, 1.0, config.shake_duration_ms, Easing::Linear);
    animations.start(tag);
}

/// Clear the shake direction once the shake animation has finished.
///
/// Returns `true` if the shake on `node` is over.
pub fn settle_shake(dom: &mut Dom, animations: &AnimationEngine, node: NodeId) -> bool {
    if animations.is_active(AnimationTag::shake(node)) {
        return false;
    }
    if let Some(data) = dom.get_mut(node) {
        data.highlight_shake = None;
    }
    true
}

/// Displacement the renderer should apply to the highlight of `node`.
///
/// A damped sine along the shake direction; zero when not shaking.
pub fn shake_offset(dom: &Dom, animations: &AnimationEngine, config: &InteractionConfig, node: NodeId) -> Point {
    let tag = AnimationTag::shake(node);
    let Some(direction) = dom.get(node).and_then(|data| data.highlight_shake) else {
        return Point::ZERO;
    };
    if !animations.is_active(tag) {
        return Point::ZERO;
    }

    let progress = animations.value_or(tag, 1.0);
    let t = progress * config.shake_duration_ms as f32 / 10.0;
    let displacement = (config.shake_amplitude * (-SHAKE_DAMPING * t).exp() * (SHAKE_FREQUENCY * t).sin()).round();
    match direction {
        Direction::Right => Point::new(displacement, 0.0),
        Direction::Left => Point::new(-displacement, 0.0),
        Direction::Down => Point::new(0.0, displacement),
        Direction::Up => Point::new(0.0, -displacement),
    }
}
