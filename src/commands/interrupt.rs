//! Ctrl-C handling for long runs.

use tokio_util::sync::CancellationToken;

/// What an interrupt should do to the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Stop starting new books and let running ones finish.
    Cancel,
    /// The run was already cancelled; quit now.
    Exit,
}

/// Handles one interrupt. The first one cancels `cancel`, any later one
/// asks to exit.
pub fn on_interrupt(cancel: &CancellationToken) -> Interrupt {
    if cancel.is_cancelled() {
        Interrupt::Exit
    } else {
        cancel.cancel();
        Interrupt::Cancel
    }
}
