// Terminal UI - four fixed panels driven by a modal key handler
// Built with ratatui; crossterm owns raw mode and the alternate screen

mod app;           // event loop + resize recovery
pub mod events;    // key -> action mapping per mode
pub mod layout;    // panel rectangles
pub mod navigator; // the mode state machine
pub mod render;    // panel drawing

pub use app::App;
pub use events::Action;
pub use navigator::{Mode, ModeKind, Navigator};

use anyhow::Result;
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use std::io;

/// What the event loop needs from a terminal: a place to draw and a way to rebuild it
pub trait Surface {
    fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame);

    fn size(&self) -> Result<Rect>;

    fn reinitialize(&mut self) -> Result<()>;
}

type Backend = CrosstermBackend<io::Stdout>;

pub struct TerminalManager {
    terminal: Terminal<Backend>,
    _cleanup_guard: CleanupGuard,
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Put the terminal back the way we found it - NO stdout printing here, the stream may be mid-frame
fn restore_terminal() {
    let _ = disable_raw_mode();

    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
}

fn setup_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

impl TerminalManager {
    pub fn new() -> Result<Self> {
        // Ensure clean terminal state first
        restore_terminal();

        Ok(Self {
            terminal: setup_terminal()?,
            _cleanup_guard: CleanupGuard,
        })
    }
}

impl Surface for TerminalManager {
    fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }

    fn size(&self) -> Result<Rect> {
        let size = self.terminal.size()?;
        Ok(Rect::new(0, 0, size.width, size.height))
    }

    /// Tear the surface down and bring it back up - used after a resize
    fn reinitialize(&mut self) -> Result<()> {
        restore_terminal();
        self.terminal = setup_terminal()?;
        Ok(())
    }
}

impl Drop for TerminalManager {
    fn drop(&mut self) {
        let _ = self.terminal.clear();
        let _ = self.terminal.show_cursor();

        // CleanupGuard will handle the rest
    }
}
