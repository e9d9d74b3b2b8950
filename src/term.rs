use std::io;

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};
use log::error;

/// Runs `restore` exactly once when dropped, including while unwinding from a panic.
pub struct TerminalGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> TerminalGuard<F> {
    pub fn new(restore: F) -> Self {
        TerminalGuard {
            restore: Some(restore),
        }
    }
}

impl<F: FnOnce()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// Leaves raw mode and the alternate screen and shows the cursor again.
/// Failures are logged, the rest of the steps still run.
pub fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        error!("failed to disable raw mode: {}", err);
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show) {
        error!("failed to leave alternate screen: {}", err);
    }
}
