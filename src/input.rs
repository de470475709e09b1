//! Keyboard, touch and gamepad input folded into one key state.
//!
//! Each device keeps its own [`KeyState`]; the game reads the union. Terminals
//! that never report key releases get a hold window instead: a key counts as
//! held until that many ticks pass without a press or auto-repeat.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

use crate::constants::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub shoot: bool,
}

impl KeyState {
    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Up => self.up = pressed,
            Control::Down => self.down = pressed,
            Control::Left => self.left = pressed,
            Control::Right => self.right = pressed,
            Control::Shoot => self.shoot = pressed,
        }
    }

    pub fn union(&self, other: &KeyState) -> KeyState {
        KeyState {
            up: self.up || other.up,
            down: self.down || other.down,
            left: self.left || other.left,
            right: self.right || other.right,
            shoot: self.shoot || other.shoot,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Shoot,
}

impl Control {
    pub const ALL: [Control; 5] = [Control::Up, Control::Down, Control::Left, Control::Right, Control::Shoot];

    fn index(self) -> usize {
        self as usize
    }
}

pub fn control_for_key(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Control::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Control::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Control::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Control::Right),
        KeyCode::Char(' ') => Some(Control::Shoot),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Any key press; carries the control it maps to, if any.
    KeyDown(Option<Control>),
    /// Auto-repeat of a held key. Never starts or restarts a game.
    KeyRepeat(Option<Control>),
    KeyUp(Control),
    /// Click or tap anywhere.
    Tap,
    TouchStart(Control),
    TouchEnd(Control),
}

pub fn translate_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(KeyEvent { code, kind, .. }) => match kind {
            KeyEventKind::Press => Some(InputEvent::KeyDown(control_for_key(*code))),
            KeyEventKind::Repeat => Some(InputEvent::KeyRepeat(control_for_key(*code))),
            KeyEventKind::Release => control_for_key(*code).map(InputEvent::KeyUp),
        },
        Event::Mouse(MouseEvent { kind: MouseEventKind::Down(_), .. }) => Some(InputEvent::Tap),
        _ => None,
    }
}

// --- Gamepad ---

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GamepadState {
    pub axes: [f32; 2], // Left stick x, y; down and right are positive
    pub buttons: Vec<bool>,
}

impl GamepadState {
    fn pressed(&self, button: usize) -> bool {
        self.buttons.get(button).copied().unwrap_or(false)
    }

    pub fn keys(&self, threshold: f32) -> KeyState {
        KeyState {
            up: self.axes[1] < -threshold || self.pressed(GAMEPAD_UP_BUTTON),
            down: self.axes[1] > threshold || self.pressed(GAMEPAD_DOWN_BUTTON),
            left: self.axes[0] < -threshold || self.pressed(GAMEPAD_LEFT_BUTTON),
            right: self.axes[0] > threshold || self.pressed(GAMEPAD_RIGHT_BUTTON),
            shoot: self.pressed(GAMEPAD_FIRE_BUTTON),
        }
    }

    /// Any button, or a stick pushed past the threshold.
    pub fn primary_action(&self, threshold: f32) -> bool {
        self.buttons.iter().any(|&b| b) || self.axes.iter().any(|a| a.abs() > threshold)
    }
}

pub trait GamepadSource {
    fn poll(&mut self) -> Vec<GamepadState>;
}

/// Stands in when no gamepad backend is available.
pub struct NoGamepads;

impl GamepadSource for NoGamepads {
    fn poll(&mut self) -> Vec<GamepadState> {
        Vec::new()
    }
}

// --- Aggregator ---

pub struct InputAggregator {
    keyboard: KeyState,
    touch: KeyState,
    gamepad: KeyState,
    hold_ticks: Option<u32>,
    held_until: [u32; 5],
    tick: u32,
    gamepad_threshold: f32,
    gamepad_was_active: bool,
}

impl InputAggregator {
    /// `hold_ticks` is `None` when the terminal reports key releases.
    pub fn new(hold_ticks: Option<u32>) -> Self {
        InputAggregator {
            keyboard: KeyState::default(),
            touch: KeyState::default(),
            gamepad: KeyState::default(),
            hold_ticks,
            held_until: [0; 5],
            tick: 0,
            gamepad_threshold: GAMEPAD_THRESHOLD,
            gamepad_was_active: false,
        }
    }

    pub fn with_gamepad_threshold(mut self, threshold: f32) -> Self {
        self.gamepad_threshold = threshold;
        self
    }

    pub fn keys(&self) -> KeyState {
        self.keyboard.union(&self.touch).union(&self.gamepad)
    }

    pub fn press(&mut self, control: Control) {
        self.keyboard.set(control, true);
        if let Some(hold) = self.hold_ticks {
            self.held_until[control.index()] = self.tick.saturating_add(hold);
        }
    }

    pub fn release(&mut self, control: Control) {
        self.keyboard.set(control, false);
    }

    pub fn touch_start(&mut self, control: Control) {
        self.touch.set(control, true);
    }

    pub fn touch_end(&mut self, control: Control) {
        self.touch.set(control, false);
    }

    /// Replaces the gamepad contribution. Returns true on the tick a primary
    /// action begins on any pad, so a button held through game over does not
    /// restart instantly.
    pub fn apply_gamepads(&mut self, pads: &[GamepadState]) -> bool {
        self.gamepad = pads
            .iter()
            .fold(KeyState::default(), |acc, pad| acc.union(&pad.keys(self.gamepad_threshold)));
        let active = pads.iter().any(|pad| pad.primary_action(self.gamepad_threshold));
        let started = active && !self.gamepad_was_active;
        self.gamepad_was_active = active;
        started
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.hold_ticks.is_none() {
            return;
        }
        for control in Control::ALL {
            if self.held_until[control.index()] <= self.tick {
                self.keyboard.set(control, false);
            }
        }
    }

    /// Drops keyboard and touch state; the gamepad is re-read every tick.
    pub fn clear(&mut self) {
        self.keyboard = KeyState::default();
        self.touch = KeyState::default();
        self.gamepad = KeyState::default();
    }
}

/// Hold window in ticks for a duration in milliseconds.
pub fn hold_ticks_for_ms(ms: u64) -> u32 {
    ((ms as f64 * FPS as f64) / 1000.0).ceil().max(1.0) as u32
}
