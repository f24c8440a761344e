//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`Button`], [`InputEvent`] and [`FrameInput`]. Crossterm events
//! are converted via `From` impls so the rest of the crate never depends on
//! crossterm directly: keys become controller buttons, the left mouse
//! button becomes the touch pointer and the wheel becomes a scroll delta.

use crate::dom::node::Direction;
use crate::geometry::Point;
use crate::gesture::{TouchSample, TouchTracker};

/// Units scrolled per wheel notch.
pub const WHEEL_STEP: f32 = 3.0;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// Controller button, the unit actions are bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    Start,
    Back,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl Button {
    /// Navigation direction of a D-pad button.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Button::DpadUp => Some(Direction::Up),
            Button::DpadDown => Some(Direction::Down),
            Button::DpadLeft => Some(Direction::Left),
            Button::DpadRight => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Button::DpadUp,
            Direction::Down => Button::DpadDown,
            Direction::Left => Button::DpadLeft,
            Direction::Right => Button::DpadRight,
        }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A button went down.
    Button(Button),
    /// The pointer moved or changed press state.
    Pointer { pressed: bool, position: Point },
    /// Wheel movement at `position`.
    Scroll { position: Point, delta: Point },
    Resize { width: u16, height: u16 },
    /// Anything the interaction engine has no use for.
    Ignored,
}

fn convert_key(code: crossterm::event::KeyCode) -> Option<Button> {
    use crossterm::event::KeyCode;
    let button = match code {
        KeyCode::Up => Button::DpadUp,
        KeyCode::Down => Button::DpadDown,
        KeyCode::Left => Button::DpadLeft,
        KeyCode::Right => Button::DpadRight,
        KeyCode::Enter | KeyCode::Char(' ') => Button::A,
        KeyCode::Esc | KeyCode::Backspace => Button::B,
        KeyCode::Char('x') => Button::X,
        KeyCode::Char('y') => Button::Y,
        KeyCode::Char('+') => Button::Start,
        KeyCode::Char('-') => Button::Back,
        _ => return None,
    };
    Some(button)
}

fn cell(column: u16, row: u16) -> Point {
    Point::new(f32::from(column), f32::from(row))
}

/// Convert a crossterm `Event` into our `InputEvent`.
///
/// Key releases and repeats are ignored; only presses map to buttons.
impl From<crossterm::event::Event> for InputEvent {
    fn from(ct: crossterm::event::Event) -> Self {
        use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
        match ct {
            Event::Key(ke) if ke.kind == KeyEventKind::Press => {
                convert_key(ke.code).map_or(InputEvent::Ignored, InputEvent::Button)
            }
            Event::Mouse(me) => {
                let position = cell(me.column, me.row);
                match me.kind {
                    MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                        InputEvent::Pointer { pressed: true, position }
                    }
                    MouseEventKind::Up(MouseButton::Left) | MouseEventKind::Moved => {
                        InputEvent::Pointer { pressed: false, position }
                    }
                    MouseEventKind::ScrollUp => InputEvent::Scroll { position, delta: Point::new(0.0, -WHEEL_STEP) },
                    MouseEventKind::ScrollDown => InputEvent::Scroll { position, delta: Point::new(0.0, WHEEL_STEP) },
                    MouseEventKind::ScrollLeft => InputEvent::Scroll { position, delta: Point::new(-WHEEL_STEP, 0.0) },
                    MouseEventKind::ScrollRight => InputEvent::Scroll { position, delta: Point::new(WHEEL_STEP, 0.0) },
                    _ => InputEvent::Ignored,
                }
            }
            Event::Resize(width, height) => InputEvent::Resize { width, height },
            _ => InputEvent::Ignored,
        }
    }
}

// ---------------------------------------------------------------------------
// FrameInput
// ---------------------------------------------------------------------------

/// Collects the input events arriving between two frames.
///
/// [`take_frame`](FrameInput::take_frame) yields the touch sample and the
/// buttons pressed since the previous frame, ready for
/// [`Ui::frame`](crate::ui::Ui::frame).
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    tracker: TouchTracker,
    pressed: bool,
    position: Option<Point>,
    buttons: Vec<Button>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Button(button) => self.buttons.push(button),
            InputEvent::Pointer { pressed, position } => {
                self.pressed = pressed;
                self.position = Some(position);
            }
            InputEvent::Scroll { position, delta } => {
                self.position = Some(position);
                self.tracker.add_scroll(delta);
            }
            InputEvent::Resize { .. } | InputEvent::Ignored => {}
        }
    }

    /// Whether the pointer is currently held down.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// This frame's sample and pressed buttons.
    pub fn take_frame(&mut self) -> (TouchSample, Vec<Button>) {
        let sample = self.tracker.update(self.pressed, self.position.take());
        (sample, std::mem::take(&mut self.buttons))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
