//! Attention policy for the notification widget host.
//!
//! Decides, per inbound content event, whether the hosting window should
//! stay quiet, flash its taskbar indicator, or forcibly take OS foreground
//! focus. Pure decision logic with no windowing or I/O; callers supply
//! event timestamps and apply the resulting action themselves.

pub mod throttle;
pub mod types;

pub use throttle::{NotificationThrottle, ThrottlePolicy};
pub use types::{AttentionAction, NotificationEvent, NotificationKind};
