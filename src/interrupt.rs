//! Cooperative cancellation of a corpus pass.
//!
//! SIGINT (Ctrl+C, via ctrlc) and SIGHUP (via signal_hook) both set one
//! shared flag. The pipeline checks it between header sets, so a pass stops
//! on a set boundary and the counters gathered so far stay consistent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared interrupt flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptGuard {
    interrupted: Arc<AtomicBool>,
}

impl InterruptGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register SIGINT and SIGHUP handlers that set the flag.
    ///
    /// Calling this more than once is harmless; later registrations of the
    /// Ctrl+C handler are ignored.
    pub fn register_signal_handlers(&self) {
        let flag = self.interrupted.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .ok();

        #[cfg(unix)]
        {
            use signal_hook::flag::register;
            let _ = register(libc::SIGHUP, self.interrupted.clone());
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Set the flag as a signal would.
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }
}
