//! Terminal setup and teardown.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{DashError, Result};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn io_error(context: &str) -> impl FnOnce(io::Error) -> DashError + '_ {
    move |e| DashError::Io(format!("{context}: {e}"))
}

/// Switches stdout to raw mode on the alternate screen.
///
/// Also installs a panic hook that puts the terminal back before the panic
/// message is printed.
///
/// # Errors
///
/// Returns [`DashError::Io`] if stdout is not a TTY or any step fails; raw
/// mode is undone before returning.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(DashError::Io(
            "the dashboard requires an interactive terminal (TTY)".to_string(),
        ));
    }

    enable_raw_mode().map_err(io_error("failed to enable raw mode"))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(io_error("failed to enter alternate screen")(e));
    }

    let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            reset();
            return Err(io_error("failed to create terminal")(e));
        }
    };

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        reset();
        default_hook(info);
    }));

    Ok(terminal)
}

/// Best-effort restore used on failure paths and from the panic hook.
fn reset() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Restores the terminal to its original state.
///
/// # Errors
///
/// Returns [`DashError::Io`] if any step fails.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(io_error("failed to disable raw mode"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(io_error("failed to leave alternate screen"))?;
    terminal
        .show_cursor()
        .map_err(io_error("failed to show cursor"))?;
    Ok(())
}
