//! Close authorization for the update/shutdown coordinator.
//!
//! Process-wide single-writer state: initially locked, settable exactly once
//! by `authorize`, never reset. The close guard reads it on every intercepted
//! close attempt; the coordinator outside this core sets it when an update or
//! a system-initiated shutdown needs the window gone.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The shared "close allowed" flag.
#[derive(Clone, Debug, Default)]
pub struct CloseAuth {
    allowed: Arc<AtomicBool>,
}

impl CloseAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Permanently allow the window to close. The first call wins; there is
    /// no way back to the locked state.
    pub fn authorize(&self) {
        if !self.allowed.swap(true, Ordering::SeqCst) {
            tracing::info!("close authorized, interception disabled");
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.allowed.load(Ordering::SeqCst)
    }
}
