//! A scalar value advanced through a queue of eased steps.
//!
//! [`Animatable`] is plain data: it knows nothing about callbacks, tags or
//! nodes. The [`AnimationEngine`](super::engine::AnimationEngine) owns one per
//! animated property and drives them once per frame.

use std::collections::VecDeque;

use super::easing::Easing;

/// One segment of an animation: move to `target` over `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub target: f32,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Step {
    pub fn new(target: f32, duration_ms: u32, easing: Easing) -> Self {
        Self { target, duration_ms, easing }
    }
}

/// Result of advancing an [`Animatable`] by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Not armed; nothing happened.
    Idle,
    /// Still has steps left.
    Running,
    /// The last step completed during this advance.
    Finished,
}

/// Result of [`Animatable::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Start {
    Started,
    /// No steps queued; the animation completes immediately.
    Empty,
}

/// A numeric value with a queue of pending steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Animatable {
    value: f32,
    steps: VecDeque<Step>,
    /// Value at the beginning of the head step.
    step_start: f32,
    /// Time spent inside the head step.
    elapsed_ms: f32,
    /// Duration of steps already consumed since `start`.
    consumed_ms: f32,
    /// Total duration of the queue at `start`.
    total_ms: f32,
    active: bool,
}

impl Animatable {
    /// Create an idle animatable resting at `value`.
    pub fn new(value: f32) -> Self {
        Self {
            value,
            steps: VecDeque::new(),
            step_start: value,
            elapsed_ms: 0.0,
            consumed_ms: 0.0,
            total_ms: 0.0,
            active: false,
        }
    }

    /// The current value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Whether the animatable is armed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Steps still queued, head first.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Overall progress in `[0, 1]` across all steps since `start`.
    pub fn progress(&self) -> f32 {
        if !self.active {
            return if self.steps.is_empty() { 1.0 } else { 0.0 };
        }
        if self.total_ms <= 0.0 {
            return 1.0;
        }
        ((self.consumed_ms + self.elapsed_ms) / self.total_ms).clamp(0.0, 1.0)
    }

    /// Disarm, drop all steps and jump to `value`.
    ///
    /// Returns whether the animatable was active.
    pub fn reset(&mut self, value: f32) -> bool {
        let was_active = self.halt();
        self.steps.clear();
        self.value = value;
        self.step_start = value;
        was_active
    }

    /// Disarm and drop all steps, keeping the current value.
    ///
    /// Returns whether the animatable was active.
    pub fn reset_keep_value(&mut self) -> bool {
        let value = self.value;
        self.reset(value)
    }

    /// Queue a step after the existing ones.
    pub fn add_step(&mut self, step: Step) {
        self.steps.push_back(step);
    }

    /// Arm the animatable from its current value.
    pub fn start(&mut self) -> Start {
        if self.steps.is_empty() {
            self.active = false;
            return Start::Empty;
        }
        self.step_start = self.value;
        self.elapsed_ms = 0.0;
        self.consumed_ms = 0.0;
        self.total_ms = self.steps.iter().map(|s| s.duration_ms as f32).sum();
        self.active = true;
        Start::Started
    }

    /// Disarm without consuming remaining steps. The value stays where it is.
    ///
    /// Returns whether the animatable was active.
    pub fn halt(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.elapsed_ms = 0.0;
        was_active
    }

    /// Advance by `delta_ms`.
    ///
    /// Every step whose duration is covered by the accumulated time is
    /// consumed (value snaps to its target), and the leftover time carries
    /// into the next step. The head step in progress is then interpolated.
    pub fn advance(&mut self, delta_ms: f32) -> Advance {
        if !self.active {
            return Advance::Idle;
        }
        self.elapsed_ms += delta_ms.max(0.0);

        while let Some(step) = self.steps.front().copied() {
            let duration = step.duration_ms as f32;
            if self.elapsed_ms >= duration {
                self.elapsed_ms -= duration;
                self.consumed_ms += duration;
                self.value = step.target;
                self.step_start = step.target;
                self.steps.pop_front();
                continue;
            }
            let progress = (self.elapsed_ms / duration).min(1.0);
            self.value = self.step_start + (step.target - self.step_start) * step.easing.apply(progress);
            break;
        }

        if self.steps.is_empty() {
            self.active = false;
            self.elapsed_ms = 0.0;
            Advance::Finished
        } else {
            Advance::Running
        }
    }
}

impl Default for Animatable {
    fn default() -> Self {
        Self::new(0.0)
    }
}
