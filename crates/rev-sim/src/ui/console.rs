use crate::ui::input::{map_key, Action};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue, style::Print};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Terminal seam for the input/render loop: raw-mode lifecycle, non-blocking
/// key polling and positioned text drawing. Production code uses
/// [`CrosstermConsole`]; tests script a fake.
pub trait Console {
    fn init(&mut self) -> io::Result<()>;
    fn shutdown(&mut self) -> io::Result<()>;
    /// Next pending recognized action, or `None` when no key is waiting.
    /// Unrecognized keys are consumed and ignored.
    fn poll_key(&mut self) -> io::Result<Option<Action>>;
    fn clear(&mut self) -> io::Result<()>;
    fn draw_text(&mut self, row: u16, col: u16, text: &str) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

pub struct CrosstermConsole {
    stdout: Stdout,
    active: bool,
}

impl CrosstermConsole {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            active: false,
        }
    }
}

impl Default for CrosstermConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for CrosstermConsole {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide)?;
        self.active = true;
        Ok(())
    }

    fn shutdown(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            execute!(self.stdout, cursor::Show, LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    fn poll_key(&mut self) -> io::Result<Option<Action>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                // Key-up events (delivered on some platforms) would defeat the
                // poll-and-release pedal semantics.
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = map_key(key.code) {
                    return Ok(Some(action));
                }
            }
        }
        Ok(None)
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.stdout, Clear(ClearType::All))
    }

    fn draw_text(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(col, row), Print(text))
    }

    fn present(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

// Restore the terminal even if the render loop unwinds.
impl Drop for CrosstermConsole {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
