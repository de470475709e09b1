use std::collections::HashMap;
use std::io;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

// --- SimulatedInput for debugging ---
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
    current_frame: u64,
}

impl SimulatedInput {
    pub fn new(events: HashMap<u64, Vec<Event>>) -> Self {
        SimulatedInput { events, current_frame: 0 }
    }

    /// Appends an event to the given frame's batch.
    pub fn push(&mut self, frame: u64, event: Event) {
        self.events.entry(frame).or_default().push(event);
    }

    pub fn poll(&mut self, frame_count: u64) -> io::Result<bool> {
        self.current_frame = frame_count;
        Ok(self.events.contains_key(&frame_count))
    }

    /// Every event scheduled for the frame last polled.
    pub fn read(&mut self) -> io::Result<Vec<Event>> {
        Ok(self.events.remove(&self.current_frame).unwrap_or_default())
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press))
}

pub fn release(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release))
}

pub fn click() -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    })
}

/// Script for `--debug`: start from the intro, fly and shoot for a few
/// seconds, then quit.
pub fn debug_script() -> SimulatedInput {
    let mut input = SimulatedInput::new(HashMap::new());
    input.push(2, press(KeyCode::Enter));
    input.push(4, press(KeyCode::Up));
    input.push(4, press(KeyCode::Char(' ')));
    input.push(20, release(KeyCode::Up));
    input.push(20, press(KeyCode::Right));
    input.push(40, release(KeyCode::Right));
    input.push(40, press(KeyCode::Left));
    input.push(41, press(KeyCode::Down));
    input.push(60, release(KeyCode::Left));
    input.push(60, release(KeyCode::Down));
    input.push(80, release(KeyCode::Char(' ')));
    input.push(90, press(KeyCode::Char('q'))); // Quit after 90 frames
    input
}
