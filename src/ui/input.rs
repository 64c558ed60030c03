/// Terminal input collector.
///
/// Drains every pending crossterm event once per frame and sorts it into
/// key presses (in arrival order, so two quick turns inside one tick
/// reach the session in the order they were typed) and left-button mouse
/// presses and releases for clicks and swipes.
///
/// Key Release events are ignored; Repeat counts as a press so holding a
/// key in the menu keeps cycling. Resizes need no handling here: the
/// renderer polls the terminal size every frame.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// Left mouse button activity in terminal cell coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerEvent {
    Down { col: u16, row: u16 },
    Up { col: u16, row: u16 },
}

pub struct InputState {
    /// Keys pressed during the most recent drain_events() call.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    pub pointer: Vec<PointerEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            pointer: Vec::with_capacity(4),
        }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.pointer.clear();

        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => self.push(ev),
                Err(_) => break,
            }
        }
    }

    fn push(&mut self, ev: Event) {
        match ev {
            Event::Key(key) => {
                self.raw_events.push(key);
                if key.kind != KeyEventKind::Release {
                    self.fresh_presses.push(key.code);
                }
            }
            Event::Mouse(m) => match m.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    self.pointer.push(PointerEvent::Down { col: m.column, row: m.row });
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    self.pointer.push(PointerEvent::Up { col: m.column, row: m.row });
                }
                _ => {}
            },
            _ => {}
        }
    }

    /// Keys pressed this frame, oldest first.
    pub fn presses(&self) -> &[KeyCode] {
        &self.fresh_presses
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
