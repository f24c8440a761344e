//! Tap recognition: touch down, optional hold inside the node, release.

use crate::geometry::{Point, Rect};
use crate::sound::Sound;

use super::state::{
    GestureEvent, GestureOutput, GestureRecognizer, GestureState, RecognizerCore, TapStatus, TouchPhase,
    TouchSample,
};

/// Recognizes a tap on the node it is attached to.
///
/// Fires `Unsure` on touch down, `Failed` when the pointer leaves the node,
/// and `End` on release. Only `End` is a successful tap.
#[derive(Debug, Clone)]
pub struct TapGestureRecognizer {
    core: RecognizerCore,
    position: Point,
    callback_on_end_only: bool,
    play_sound: bool,
}

impl TapGestureRecognizer {
    pub fn new() -> Self {
        Self {
            core: RecognizerCore::new(),
            position: Point::ZERO,
            callback_on_end_only: false,
            play_sound: true,
        }
    }

    /// Only report `End`; touch-down and failure pass silently.
    pub fn callback_on_end_only(mut self, end_only: bool) -> Self {
        self.callback_on_end_only = end_only;
        self
    }

    /// Whether touch feedback sounds should be played (builder).
    pub fn with_sound_on_touch(mut self, play: bool) -> Self {
        self.play_sound = play;
        self
    }

    /// Position of the last observed sample.
    pub fn position(&self) -> Point {
        self.position
    }

    fn fire(&mut self, out: &mut GestureOutput, sound: Option<Sound>) {
        self.core.observe();
        out.emit(GestureEvent::Tap(TapStatus {
            state: self.core.state,
            position: self.position,
        }));
        if sound.is_some() {
            out.sound = sound;
        }
    }
}

impl Default for TapGestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecognizer for TapGestureRecognizer {
    fn name(&self) -> &'static str {
        "tap"
    }

    fn recognition_loop(&mut self, sample: &TouchSample, frame: Rect, out: &mut GestureOutput) -> GestureState {
        if !self.core.enabled {
            return GestureState::Failed;
        }

        if let Some((state, fire)) = self.core.check_sink(sample) {
            if fire && !self.callback_on_end_only {
                out.emit(GestureEvent::Tap(TapStatus { state, position: self.position }));
                out.sound = Some(Sound::TouchUnfocus);
            }
            return state;
        }

        let previous = self.core.state;
        match sample.phase {
            TouchPhase::Start => {
                self.core.state = GestureState::Unsure;
                self.position = sample.position;
                if self.callback_on_end_only {
                    self.core.observe();
                } else {
                    self.fire(out, Some(Sound::FocusChange));
                }
            }
            TouchPhase::Stay if previous == GestureState::Unsure => {
                self.position = sample.position;
                if !frame.encloses(sample.position) {
                    self.core.state = GestureState::Failed;
                    if self.callback_on_end_only {
                        self.core.observe();
                    } else {
                        self.fire(out, Some(Sound::TouchUnfocus));
                    }
                }
            }
            TouchPhase::End if previous == GestureState::Unsure => {
                self.position = sample.position;
                self.core.state = GestureState::End;
                // The sound for a completed tap belongs to the action it triggers.
                self.fire(out, None);
            }
            TouchPhase::Stay | TouchPhase::End => {}
            TouchPhase::None => {
                // Reported on the next call, through the sink check.
                self.core.state = GestureState::Failed;
            }
        }

        if self.core.state != previous {
            tracing::trace!(from = ?previous, to = ?self.core.state, "tap transition");
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

    fn sound_on_touch(&self) -> bool {
        self.play_sound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect { x: 0.0, y: 0.0, width: 100.0, height: 50.0 };

    /// Feed samples and collect the returned states.
    fn run(tap: &mut TapGestureRecognizer, samples: &[TouchSample]) -> (Vec<GestureState>, Vec<GestureState>) {
        let mut states = Vec::new();
        let mut fired = Vec::new();
        for sample in samples {
            let mut out = GestureOutput::new();
            states.push(tap.recognition_loop(sample, BOUNDS, &mut out));
            fired.extend(out.events.iter().map(GestureEvent::state));
        }
        (states, fired)
    }

    #[test]
    fn tap_success() {
        let mut tap = TapGestureRecognizer::new();
        let (states, fired) = run(
            &mut tap,
            &[TouchSample::start(10.0, 10.0), TouchSample::stay(12.0, 11.0), TouchSample::end(12.0, 11.0)],
        );
        insta::assert_debug_snapshot!(states, @r"
        [
            Unsure,
            Unsure,
            End,
        ]
        ");
        assert_eq!(fired, vec![GestureState::Unsure, GestureState::End]);
    }

    #[test]
    fn tap_abandoned() {
        let mut tap = TapGestureRecognizer::new();
        let (states, fired) = run(&mut tap, &[TouchSample::start(10.0, 10.0), TouchSample::stay(200.0, 10.0)]);
        assert_eq!(states, vec![GestureState::Unsure, GestureState::Failed]);
        assert_eq!(fired, vec![GestureState::Unsure, GestureState::Failed]);
    }

    #[test]
    fn leaving_bounds_fails_after_long_hold() {
        let mut tap = TapGestureRecognizer::new();
        let mut samples = vec![TouchSample::start(10.0, 10.0)];
        samples.extend((0..50).map(|_| TouchSample::stay(20.0, 20.0)));
        samples.push(TouchSample::stay(20.0, 80.0));
        let (states, _) = run(&mut tap, &samples);
        assert_eq!(states.last(), Some(&GestureState::Failed));
    }

    #[test]
    fn edges_count_as_inside() {
        let mut tap = TapGestureRecognizer::new();
        let (states, _) = run(&mut tap, &[TouchSample::start(10.0, 10.0), TouchSample::stay(100.0, 50.0)]);
        assert_eq!(states, vec![GestureState::Unsure, GestureState::Unsure]);
    }

    #[test]
    fn failed_state_fires_once() {
        let mut tap = TapGestureRecognizer::new();
        let (states, fired) = run(
            &mut tap,
            &[
                TouchSample::start(10.0, 10.0),
                TouchSample::stay(200.0, 10.0),
                TouchSample::stay(10.0, 10.0),
                TouchSample::end(10.0, 10.0),
                TouchSample::none(),
            ],
        );
        assert!(states[1..].iter().all(|&s| s == GestureState::Failed));
        assert_eq!(fired, vec![GestureState::Unsure, GestureState::Failed]);
    }

    #[test]
    fn none_fails_and_reports_on_next_call() {
        let mut tap = TapGestureRecognizer::new();
        let (states, fired) = run(
            &mut tap,
            &[TouchSample::start(10.0, 10.0), TouchSample::none(), TouchSample::none(), TouchSample::none()],
        );
        insta::assert_debug_snapshot!((states, fired), @r"
        (
            [
                Unsure,
                Failed,
                Failed,
                Failed,
            ],
            [
                Unsure,
                Failed,
            ],
        )
        ");
    }

    #[test]
    fn interrupt_reports_once() {
        let mut tap = TapGestureRecognizer::new();
        run(&mut tap, &[TouchSample::start(10.0, 10.0)]);
        tap.interrupt(true);
        assert_eq!(tap.state(), GestureState::Interrupted);
        let (_, fired) = run(&mut tap, &[TouchSample::stay(10.0, 10.0), TouchSample::stay(10.0, 10.0)]);
        assert_eq!(fired, vec![GestureState::Interrupted]);
    }

    #[test]
    fn interrupt_only_if_unsure_spares_finished_tap() {
        let mut tap = TapGestureRecognizer::new();
        run(&mut tap, &[TouchSample::start(10.0, 10.0), TouchSample::end(10.0, 10.0)]);
        tap.interrupt(true);
        assert_eq!(tap.state(), GestureState::End);
    }

    #[test]
    fn new_touch_resets_sink() {
        let mut tap = TapGestureRecognizer::new();
        run(&mut tap, &[TouchSample::start(10.0, 10.0), TouchSample::stay(200.0, 10.0)]);
        let (states, _) = run(&mut tap, &[TouchSample::start(10.0, 10.0), TouchSample::end(10.0, 10.0)]);
        assert_eq!(states, vec![GestureState::Unsure, GestureState::End]);
    }

    #[test]
    fn end_only_mode_reports_only_end() {
        let mut tap = TapGestureRecognizer::new().callback_on_end_only(true);
        let (_, fired) = run(
            &mut tap,
            &[TouchSample::start(10.0, 10.0), TouchSample::stay(11.0, 10.0), TouchSample::end(11.0, 10.0)],
        );
        assert_eq!(fired, vec![GestureState::End]);

        let (_, fired) = run(&mut tap, &[TouchSample::start(10.0, 10.0), TouchSample::stay(300.0, 10.0)]);
        assert!(fired.is_empty());
    }

    #[test]
    fn disabled_always_fails() {
        let mut tap = TapGestureRecognizer::new();
        tap.set_enabled(false);
        let (states, fired) = run(&mut tap, &[TouchSample::start(10.0, 10.0), TouchSample::end(10.0, 10.0)]);
        assert_eq!(states, vec![GestureState::Failed, GestureState::Failed]);
        assert!(fired.is_empty());
    }

    #[test]
    fn sounds_follow_state() {
        let mut tap = TapGestureRecognizer::new();
        let mut out = GestureOutput::new();
        tap.recognition_loop(&TouchSample::start(10.0, 10.0), BOUNDS, &mut out);
        assert_eq!(out.sound, Some(Sound::FocusChange));

        let mut out = GestureOutput::new();
        tap.recognition_loop(&TouchSample::stay(500.0, 10.0), BOUNDS, &mut out);
        assert_eq!(out.sound, Some(Sound::TouchUnfocus));

        let mut out = GestureOutput::new();
        tap.recognition_loop(&TouchSample::start(10.0, 10.0), BOUNDS, &mut out);
        let mut out = GestureOutput::new();
        tap.recognition_loop(&TouchSample::end(10.0, 10.0), BOUNDS, &mut out);
        assert_eq!(out.sound, None);
    }

    #[test]
    fn untouched_recognizer_is_silent() {
        let mut tap = TapGestureRecognizer::new();
        let (states, fired) = run(&mut tap, &[TouchSample::none(), TouchSample::stay(1.0, 1.0)]);
        assert_eq!(states, vec![GestureState::Failed, GestureState::Failed]);
        assert!(fired.is_empty());
    }
}
