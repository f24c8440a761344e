//! Pan recognition with axis gating and post-release fling.

use std::collections::VecDeque;

use crate::config::InteractionConfig;
use crate::geometry::{Point, Rect};

use super::state::{
    FlingAcceleration, GestureEvent, GestureOutput, GestureRecognizer, GestureState, PanStatus, RecognizerCore,
    TouchPhase, TouchSample,
};

/// Positions kept for velocity estimation.
pub const HISTORY_CAPACITY: usize = 2;

/// Which movement a pan recognizer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanAxis {
    Horizontal,
    Vertical,
    #[default]
    Any,
}

impl PanAxis {
    /// Whether the frame's movement `delta` is dominant along this axis.
    pub fn accepts(self, delta: Point) -> bool {
        let delta = delta.abs();
        match self {
            PanAxis::Horizontal => delta.x > delta.y,
            PanAxis::Vertical => delta.x < delta.y,
            PanAxis::Any => true,
        }
    }
}

/// Recognizes a drag once it moves past a threshold along its axis.
#[derive(Debug, Clone)]
pub struct PanGestureRecognizer {
    core: RecognizerCore,
    axis: PanAxis,
    threshold: f32,
    frame_rate: f32,
    deceleration: f32,
    start_position: Point,
    position: Point,
    delta: Point,
    /// Recent positions, oldest first.
    history: VecDeque<Point>,
    acceleration: Option<FlingAcceleration>,
}

impl PanGestureRecognizer {
    /// Create a recognizer for `axis` with the default tuning.
    pub fn new(axis: PanAxis) -> Self {
        Self::with_config(axis, &InteractionConfig::default())
    }

    /// Create a recognizer for `axis` tuned by `config`.
    pub fn with_config(axis: PanAxis, config: &InteractionConfig) -> Self {
        Self {
            core: RecognizerCore::new(),
            axis,
            threshold: config.pan_threshold,
            frame_rate: config.frame_rate,
            deceleration: config.fling_deceleration,
            start_position: Point::ZERO,
            position: Point::ZERO,
            delta: Point::ZERO,
            history: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
            acceleration: None,
        }
    }

    pub fn axis(&self) -> PanAxis {
        self.axis
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Fling computed on the last `End`, if any.
    pub fn acceleration(&self) -> Option<FlingAcceleration> {
        self.acceleration
    }

    /// Status snapshot for the current state.
    pub fn status(&self) -> PanStatus {
        PanStatus {
            state: self.core.state,
            position: self.position,
            start_position: self.start_position,
            delta: self.delta,
            acceleration: self.acceleration,
            delta_only: false,
        }
    }

    fn push_history(&mut self, position: Point) {
        self.history.push_back(position);
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
    }

    /// Fling from the recent position history.
    ///
    /// Velocity is the travelled distance over `history_len / frame_rate`
    /// seconds; the fling decelerates at a constant rate until it stops.
    fn fling(&self) -> FlingAcceleration {
        let distance = match (self.history.front(), self.history.back()) {
            (Some(&oldest), Some(&newest)) if self.history.len() >= 2 => newest - oldest,
            _ => Point::ZERO,
        };
        let time = self.history.len() as f32 / self.frame_rate;
        if time <= 0.0 || self.deceleration >= 0.0 {
            return FlingAcceleration::default();
        }
        let velocity = distance * (1.0 / time);
        let time = Point::new(-velocity.x.abs() / self.deceleration, -velocity.y.abs() / self.deceleration);
        FlingAcceleration {
            distance: Point::new(velocity.x * time.x / 2.0, velocity.y * time.y / 2.0),
            time,
        }
    }
}

impl GestureRecognizer for PanGestureRecognizer {
    fn name(&self) -> &'static str {
        "pan"
    }

    fn recognition_loop(&mut self, sample: &TouchSample, _frame: Rect, out: &mut GestureOutput) -> GestureState {
        if !self.core.enabled {
            return GestureState::Failed;
        }

        if let Some((_, fire)) = self.core.check_sink(sample) {
            if fire {
                out.emit(GestureEvent::Pan(self.status()));
            }
            return self.core.state;
        }

        let previous = self.core.state;
        match sample.phase {
            TouchPhase::Start => {
                self.history.clear();
                self.core.state = GestureState::Unsure;
                self.start_position = sample.position;
                self.position = sample.position;
                self.delta = Point::ZERO;
                self.acceleration = None;
                self.push_history(sample.position);
                self.core.observe();
            }
            TouchPhase::Stay | TouchPhase::End
                if matches!(previous, GestureState::Unsure | GestureState::Start | GestureState::Stay) =>
            {
                self.delta = sample.position - self.position;
                self.position = sample.position;
                self.push_history(sample.position);

                if previous == GestureState::Unsure {
                    let moved = (self.start_position - sample.position).abs();
                    if (moved.x > self.threshold || moved.y > self.threshold) && self.axis.accepts(self.delta) {
                        self.core.state = GestureState::Start;
                    }
                } else if sample.phase == TouchPhase::Stay {
                    self.core.state = GestureState::Stay;
                } else {
                    self.core.state = GestureState::End;
                    self.acceleration = Some(self.fling());
                }

                if matches!(self.core.state, GestureState::Start | GestureState::Stay | GestureState::End) {
                    out.emit(GestureEvent::Pan(self.status()));
                }
                self.core.observe();
            }
            TouchPhase::Stay | TouchPhase::End => {}
            TouchPhase::None => {
                self.core.state = GestureState::Failed;
            }
        }

        if self.core.state != previous {
            tracing::trace!(from = ?previous, to = ?self.core.state, axis = ?self.axis, "pan transition");
        }
        self.core.state
    }

    fn interrupt(&mut self, only_if_unsure: bool) {
        self.core.interrupt(only_if_unsure);
    }

    fn state(&self) -> GestureState {
        self.core.state
    }

    fn is_enabled(&self) -> bool {
        self.core.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.core.enabled = enabled;
    }
}
