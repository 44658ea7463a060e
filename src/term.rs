use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use tracing::{debug, warn};

/// Hands the terminal to a child process and takes it back.
pub trait ModeSwitch {
    /// Save dashboard state and give the terminal to a foreground child.
    fn enter_passthrough(&mut self) -> io::Result<()>;
    /// Take the terminal back; the caller must force a full redraw.
    fn exit_passthrough(&mut self) -> io::Result<()>;
}

/// Scoped passthrough: dashboard mode is restored on drop if `release` was never reached.
pub struct Passthrough<'a, M: ModeSwitch + ?Sized> {
    modes: &'a mut M,
    released: bool,
}

impl<'a, M: ModeSwitch + ?Sized> Passthrough<'a, M> {
    /// Enter passthrough mode. If entering fails half-way, dashboard mode is
    /// re-established before the error is returned.
    ///
    /// # Errors
    /// Returns the error from the underlying mode switch.
    pub fn acquire(modes: &'a mut M) -> io::Result<Self> {
        if let Err(e) = modes.enter_passthrough() {
            if let Err(restore) = modes.exit_passthrough() {
                warn!(error = %restore, "failed to roll back partial passthrough");
            }
            return Err(e);
        }
        Ok(Self {
            modes,
            released: false,
        })
    }

    /// Return to dashboard mode, reporting failure.
    ///
    /// # Errors
    /// Returns error if the terminal could not be put back into dashboard mode.
    pub fn release(mut self) -> io::Result<()> {
        self.released = true;
        self.modes.exit_passthrough()
    }
}

impl<M: ModeSwitch + ?Sized> Drop for Passthrough<'_, M> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.modes.exit_passthrough() {
                warn!(error = %e, "failed to restore dashboard mode");
            }
        }
    }
}

/// Best-effort return to the OS default terminal state. Shared by normal quit,
/// signal-driven termination and the panic hook.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, Show);
}

/// Owns dashboard mode on the real terminal for the lifetime of the session.
#[derive(Debug)]
pub struct DashboardTerminal {
    passthrough: Arc<AtomicBool>,
}

impl DashboardTerminal {
    /// Raw mode, alternate screen, hidden cursor.
    ///
    /// # Errors
    /// Returns error if raw mode or the alternate screen cannot be entered.
    pub fn enter(passthrough: Arc<AtomicBool>) -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        // From here on Drop restores, even if the next call fails.
        let session = Self { passthrough };
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide).context("failed to enter alternate screen")?;
        debug!("dashboard mode entered");
        Ok(session)
    }
}

impl ModeSwitch for DashboardTerminal {
    fn enter_passthrough(&mut self) -> io::Result<()> {
        self.passthrough.store(true, Ordering::SeqCst);
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        debug!("passthrough mode entered");
        Ok(())
    }

    fn exit_passthrough(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        self.passthrough.store(false, Ordering::SeqCst);
        debug!("dashboard mode restored");
        Ok(())
    }
}

impl Drop for DashboardTerminal {
    fn drop(&mut self) {
        restore_terminal();
        self.passthrough.store(false, Ordering::SeqCst);
        debug!("terminal restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counting {
        enters: usize,
        exits: usize,
        fail_enter: bool,
    }

    impl ModeSwitch for Counting {
        fn enter_passthrough(&mut self) -> io::Result<()> {
            self.enters += 1;
            if self.fail_enter {
                return Err(io::Error::other("enter failed"));
            }
            Ok(())
        }

        fn exit_passthrough(&mut self) -> io::Result<()> {
            self.exits += 1;
            Ok(())
        }
    }

    #[test]
    fn release_exits_once() {
        let mut modes = Counting::default();
        let guard = Passthrough::acquire(&mut modes).unwrap();
        guard.release().unwrap();
        assert_eq!((modes.enters, modes.exits), (1, 1));
    }

    #[test]
    fn drop_without_release_still_exits() {
        let mut modes = Counting::default();
        {
            let _guard = Passthrough::acquire(&mut modes).unwrap();
        }
        assert_eq!((modes.enters, modes.exits), (1, 1));
    }

    #[test]
    fn failed_enter_rolls_back() {
        let mut modes = Counting {
            fail_enter: true,
            ..Counting::default()
        };
        assert!(Passthrough::acquire(&mut modes).is_err());
        assert_eq!((modes.enters, modes.exits), (1, 1));
    }
}
