//! Pilot: programmatic interaction with a headless [`Ui`].
//!
//! The `Pilot` drives a [`Ui`] frame by frame: touch samples, button presses
//! and clock advancement. It records the state of watched recognizers after
//! every frame and collects the sounds the frames queued.

use std::collections::HashMap;

use crate::event::Button;
use crate::geometry::Point;
use crate::gesture::{GestureState, RecognizerId, TouchSample};
use crate::sound::Sound;
use crate::ui::{Ui, UiError};

/// Frame length at 60 frames per second.
pub const FRAME_MS: f32 = 1000.0 / 60.0;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless frame driver for testing.
///
/// # Examples
///
/// ```ignore
/// use ember_ui::testing::Pilot;
/// use ember_ui::event::Button;
///
/// let mut pilot = Pilot::new(ui);
/// pilot.press(Button::DpadRight)?;
/// pilot.advance(200.0)?;
/// ```
pub struct Pilot {
    ui: Ui,
    frame_ms: f32,
    watched: HashMap<RecognizerId, Vec<GestureState>>,
    sounds: Vec<Sound>,
    frames: usize,
}

impl Pilot {
    pub fn new(ui: Ui) -> Self {
        Self {
            ui,
            frame_ms: FRAME_MS,
            watched: HashMap::new(),
            sounds: Vec::new(),
            frames: 0,
        }
    }

    /// Use a different frame length.
    pub fn with_frame_ms(mut self, frame_ms: f32) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    /// Record the state of `recognizer` after every frame.
    pub fn watch(&mut self, recognizer: RecognizerId) {
        self.watched.entry(recognizer).or_default();
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Run one frame with `sample` and `buttons`.
    pub fn frame(&mut self, sample: TouchSample, buttons: &[Button]) -> Result<(), UiError> {
        self.ui.frame(&sample, buttons, self.frame_ms)?;
        self.frames += 1;
        for (&id, states) in &mut self.watched {
            if let Some(state) = self.ui.gestures().state(id) {
                states.push(state);
            }
        }
        self.sounds.extend(self.ui.drain_sounds());
        Ok(())
    }

    /// Run one frame with a touch sample and no buttons.
    pub fn touch(&mut self, sample: TouchSample) -> Result<(), UiError> {
        self.frame(sample, &[])
    }

    /// Press `button` during one idle frame.
    pub fn press(&mut self, button: Button) -> Result<(), UiError> {
        self.frame(TouchSample::none(), &[button])
    }

    /// Touch down and lift at the same point over two frames.
    pub fn tap(&mut self, x: f32, y: f32) -> Result<(), UiError> {
        self.touch(TouchSample::start(x, y))?;
        self.touch(TouchSample::end(x, y))
    }

    /// Drag from `from` to `to` in `steps` equal moves, then lift.
    pub fn drag(&mut self, from: Point, to: Point, steps: usize) -> Result<(), UiError> {
        self.touch(TouchSample::start(from.x, from.y))?;
        let steps = steps.max(1);
        for i in 1..=steps {
            let at = from.lerp(to, i as f32 / steps as f32);
            self.touch(TouchSample::stay(at.x, at.y))?;
        }
        self.touch(TouchSample::end(to.x, to.y))
    }

    /// Run idle frames until at least `ms` have elapsed.
    pub fn advance(&mut self, ms: f32) -> Result<(), UiError> {
        let mut elapsed = 0.0;
        while elapsed < ms {
            self.frame(TouchSample::none(), &[])?;
            elapsed += self.frame_ms;
        }
        Ok(())
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut Ui {
        &mut self.ui
    }

    /// States recorded for a watched recognizer, one per frame.
    pub fn states(&self, recognizer: RecognizerId) -> &[GestureState] {
        self.watched.get(&recognizer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sounds queued since the last call.
    pub fn take_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    /// Frames run so far.
    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl std::fmt::Debug for Pilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pilot")
            .field("ui", &self.ui)
            .field("frames", &self.frames)
            .field("watched", &self.watched.len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
