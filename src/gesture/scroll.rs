//! Scroll recognition: a pan that also turns wheel deltas into movement.

use crate::config::InteractionConfig;
use crate::geometry::{Point, Rect};

use super::pan::{PanAxis, PanGestureRecognizer};
use super::state::{GestureEvent, GestureOutput, GestureRecognizer, GestureState, PanStatus, TouchSample};

/// A pan recognizer for scrollable content.
///
/// When no drag is recognized but the sample carries a wheel delta, a
/// delta-only `Stay` status is fired so the wheel scrolls the same content.
#[derive(Debug, Clone)]
pub struct ScrollGestureRecognizer {
    pan: PanGestureRecognizer,
}

impl ScrollGestureRecognizer {
    pub fn new(axis: PanAxis) -> Self {
        Self { pan: PanGestureRecognizer::new(axis) }
    }

    pub fn with_config(axis: PanAxis, config: &InteractionConfig) -> Self {
        Self { pan: PanGestureRecognizer::with_config(axis, config) }
    }

    pub fn axis(&self) -> PanAxis {
        self.pan.axis()
    }
}

impl GestureRecognizer for ScrollGestureRecognizer {
    fn name(&self) -> &'static str {
        "scroll"
    }

    fn recognition_loop(&mut self, sample: &TouchSample, frame: Rect, out: &mut GestureOutput) -> GestureState {
        if !self.pan.is_enabled() {
            return GestureState::Failed;
        }

        let result = self.pan.recognition_loop(sample, frame, out);
        if result == GestureState::Failed && sample.has_scroll() {
            out.emit(GestureEvent::Pan(PanStatus {
                state: GestureState::Stay,
                position: Point::ZERO,
                start_position: Point::ZERO,
                delta: sample.scroll,
                acceleration: None,
                delta_only: true,
            }));
        }
        result
    }

    fn interrupt(&mut self, only_if_unsure: bool) {
        self.pan.interrupt(only_if_unsure);
    }

    fn state(&self) -> GestureState {
        self.pan.state()
    }

    fn is_enabled(&self) -> bool {
        self.pan.is_enabled()
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.pan.set_enabled(enabled);
    }
}
