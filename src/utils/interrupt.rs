use crate::utils::error::{Result, WtreeError};
use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Installs the Ctrl-C handler. The handler only records the signal; bulk loops
/// poll [`is_interrupted`] between items and unwind normally.
pub fn install_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
        eprintln!("\n🛑 Interrupt received, stopping after the current item...");
    })
    .map_err(|e| WtreeError::repo_state(format!("Failed to install signal handler: {}", e)))
}

pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// `Err(Interrupted)` once `interrupted` reports a pending interrupt. Commands call
/// this right before each step that changes the repository.
pub fn check(interrupted: fn() -> bool) -> Result<()> {
    if interrupted() {
        return Err(WtreeError::Interrupted);
    }
    Ok(())
}
