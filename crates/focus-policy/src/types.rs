//! Event and action type definitions.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Classification assigned by the content layer to an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A regular new-message signal, eligible for a taskbar pulse.
    Ordinary,
    /// A signal the content layer decided warrants interrupting the user.
    Urgent,
}

/// A single inbound notification event. Consumed by the throttle and dropped.
#[derive(Debug, Clone, Copy)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    /// Arrival time, supplied by the caller.
    pub at: Instant,
    /// Unread delta reported by the content layer. Advisory: recorded for
    /// inspection, never enforced on this side. The content layer already
    /// applied its threshold when it chose the event kind.
    pub unread_delta: Option<i64>,
}

impl NotificationEvent {
    pub fn new(kind: NotificationKind, at: Instant) -> Self {
        Self {
            kind,
            at,
            unread_delta: None,
        }
    }

    pub fn with_unread_delta(mut self, delta: i64) -> Self {
        self.unread_delta = Some(delta);
        self
    }
}

/// What the window should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionAction {
    /// Leave the window alone.
    None,
    /// Flash the taskbar indicator without touching foreground ownership.
    Pulse,
    /// Steal OS foreground focus.
    ForceFocus,
}
