//! Close interception.
//!
//! The window refuses every close attempt until the shared authorization
//! unlocks it. The guard only decides; the platform layers that observe the
//! actual close signals (Tauri close-requested events, the Win32 message
//! filter) enforce the decision at their own level.

use crate::shutdown::CloseAuth;

/// A close attempt, as reported by one of the interception layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseSignal {
    /// A close message aimed directly at the window (WM_CLOSE level).
    CloseMessage,
    /// The system-menu / caption-button close command (SC_CLOSE level).
    SystemClose,
    /// The conventional close accelerator (Alt+F4) at the input layer.
    CloseAccelerator,
    /// The high-level "window is closing" notification from the UI layer.
    UiCloseRequest,
}

/// Whether the reporting layer must swallow the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    Consumed,
    Passthrough,
}

/// Two states: locked (initial) and permanently unlocked via [`CloseAuth`].
#[derive(Clone)]
pub struct CloseGuard {
    auth: CloseAuth,
}

impl CloseGuard {
    pub fn new(auth: CloseAuth) -> Self {
        Self { auth }
    }

    /// Decide whether a close attempt may proceed.
    pub fn decide(&self, signal: CloseSignal) -> Interception {
        if self.auth.is_authorized() {
            return Interception::Passthrough;
        }
        tracing::debug!(?signal, "close attempt intercepted");
        Interception::Consumed
    }
}
