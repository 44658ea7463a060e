use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use tracing::{debug, info};

use crate::term::restore_terminal;

#[cfg(unix)]
pub use signal_hook::consts::SIGINT;
#[cfg(not(unix))]
pub const SIGINT: i32 = 2;

/// Whether a delivered signal ends the dashboard. An interrupt while a child
/// owns the terminal belongs to the child, the way `system()` treats it.
#[must_use]
pub fn should_terminate(signal: i32, passthrough_active: bool) -> bool {
    !(signal == SIGINT && passthrough_active)
}

/// Consume delivered signals until one ends the session, then run `cleanup`
/// followed by `exit`. Returns when `signals` is exhausted or after `exit`.
pub fn handle_signals<I, C, X>(signals: I, passthrough: &AtomicBool, mut cleanup: C, mut exit: X)
where
    I: IntoIterator<Item = i32>,
    C: FnMut(),
    X: FnMut(i32),
{
    for signal in signals {
        if should_terminate(signal, passthrough.load(Ordering::SeqCst)) {
            info!(signal, "terminating on signal");
            cleanup();
            exit(signal);
            return;
        }
        debug!(signal, "interrupt forwarded to foreground command");
    }
}

/// Listen for SIGINT/SIGTERM/SIGHUP on a dedicated thread; a terminating
/// signal restores the terminal and exits with status 0.
///
/// # Errors
/// Returns error if the signal handlers cannot be registered.
#[cfg(unix)]
pub fn install(passthrough: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGHUP, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
    std::thread::Builder::new()
        .name("raven-signals".to_string())
        .spawn(move || {
            handle_signals(signals.forever(), &passthrough, restore_terminal, |_| {
                std::process::exit(0)
            });
        })?;
    Ok(())
}

#[cfg(not(unix))]
pub fn install(_passthrough: Arc<AtomicBool>) -> Result<()> {
    Ok(())
}

/// Restore the terminal before the previous hook prints the panic.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}
