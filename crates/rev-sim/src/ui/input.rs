//! Key mapping and the pedal intent state machine.
//!
//! The pedal follows poll-and-release semantics rather than key press/release
//! event pairs: holding W keeps delivering press events through terminal
//! auto-repeat, and any frame where no accelerate key arrives while the pedal
//! is down releases it.

use crate::ui::console::Console;
use crossterm::event::KeyCode;
use rev_core::SharedState;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Accelerate,
    Reset,
    Quit,
}

pub fn map_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::Accelerate),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Reset),
        KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Everything seen on the keyboard during one render frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub accelerate: bool,
    pub reset: bool,
    pub quit: bool,
}

/// Drain all pending key events for this frame.
pub fn read_frame<C: Console>(console: &mut C) -> io::Result<FrameInput> {
    let mut frame = FrameInput::default();
    while let Some(action) = console.poll_key()? {
        match action {
            Action::Accelerate => frame.accelerate = true,
            Action::Reset => frame.reset = true,
            Action::Quit => frame.quit = true,
        }
    }
    Ok(frame)
}

/// Apply one frame of input to the shared flags.
///
/// Quit wins over everything; reset clears the pedal and suppresses an
/// accelerate seen in the same frame. The pedal is set on the not-pressed
/// edge and released by omission when no accelerate key arrived.
pub fn apply_frame(frame: &FrameInput, shared: &SharedState) {
    if frame.quit {
        shared.request_stop();
        return;
    }
    if frame.reset {
        shared.request_reset();
        shared.set_pedal(false);
        return;
    }
    if frame.accelerate {
        if !shared.pedal() {
            shared.set_pedal(true);
        }
    } else if shared.pedal() {
        shared.set_pedal(false);
    }
}
