use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use std::io::{self, Stdout};

/// Raw mode + alternate screen for as long as the guard lives
pub struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut out = io::stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = disable_raw_mode();
            return Err(err).context("failed to enter the alternate screen");
        }
        Ok(TerminalGuard { out })
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.out, Show, LeaveAlternateScreen) {
            log::warn!("failed to leave the alternate screen: {err}");
        }
        if let Err(err) = disable_raw_mode() {
            log::warn!("failed to disable raw mode: {err}");
        }
    }
}

/// Terminal size as `(cols, rows)`, falling back to 80x24
pub fn size() -> (u16, u16) {
    if let Some(size) = termsize::get() {
        return (size.cols, size.rows);
    }
    match terminal::size() {
        Ok(size) => size,
        Err(err) => {
            log::warn!("could not query terminal size, assuming 80x24: {err}");
            (80, 24)
        }
    }
}
