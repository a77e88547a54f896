//! Attention application: maps throttle decisions onto window operations.

use focus_policy::AttentionAction;

/// The native window operations the arbiter drives.
///
/// Implementations are best-effort. The arbiter absorbs every error, so a
/// failing call must not leave the implementation in a state that breaks
/// later calls.
pub trait WindowOps {
    fn is_minimized(&self) -> bool;
    fn restore(&self) -> anyhow::Result<()>;
    fn show(&self) -> anyhow::Result<()>;
    fn focus(&self) -> anyhow::Result<()>;
    /// Non-intrusive attention cue; must not alter foreground ownership.
    fn flash_taskbar(&self) -> anyhow::Result<()>;
    /// Transfer OS foreground ownership to this window even when another
    /// process currently holds it.
    fn force_foreground(&self) -> anyhow::Result<()>;
}

/// Applies an [`AttentionAction`] to the window.
pub struct FocusArbiter<W> {
    ops: W,
}

impl<W: WindowOps> FocusArbiter<W> {
    pub fn new(ops: W) -> Self {
        Self { ops }
    }

    /// Apply a throttle decision. Every step is best-effort: a failing
    /// native call is logged and the remaining steps still run.
    pub fn apply(&self, action: AttentionAction) {
        match action {
            AttentionAction::None => {}
            AttentionAction::Pulse => {
                self.restore_if_minimized();
                best_effort("flash taskbar", self.ops.flash_taskbar());
            }
            AttentionAction::ForceFocus => {
                self.restore_if_minimized();
                best_effort("show", self.ops.show());
                best_effort("focus", self.ops.focus());
                best_effort("force foreground", self.ops.force_foreground());
            }
        }
    }

    /// Restore a minimized window to its normal state; leave a non-minimized
    /// window untouched.
    fn restore_if_minimized(&self) {
        if self.ops.is_minimized() {
            best_effort("restore", self.ops.restore());
            best_effort("show", self.ops.show());
        }
    }
}

fn best_effort(step: &str, result: anyhow::Result<()>) {
    if let Err(e) = result {
        tracing::debug!("window operation `{step}` failed: {e}");
    }
}
