//! Per-event attention throttling.
//!
//! Two independent cooldowns: a minimum interval between ordinary pulses,
//! and a cooldown between foreground steals. An urgent event that lands
//! inside the steal cooldown degrades to a flash instead of going silent.

use std::time::{Duration, Instant};

use crate::types::{AttentionAction, NotificationEvent, NotificationKind};

/// The configuration subset the throttle runs on.
#[derive(Debug, Clone, Copy)]
pub struct ThrottlePolicy {
    /// Whether ordinary events may pulse the taskbar at all.
    pub pulse_on_new_message: bool,
    /// Minimum elapsed time between two pulses.
    pub pulse_min_interval: Duration,
    /// Whether urgent events may steal OS foreground focus.
    pub force_foreground_on_urgent: bool,
    /// Minimum elapsed time between two foreground steals.
    pub focus_steal_cooldown: Duration,
}

/// Throttle state: the last-action instants plus the advisory unread delta.
///
/// Lives for the window session and is never persisted.
#[derive(Debug, Default)]
pub struct NotificationThrottle {
    last_pulse_at: Option<Instant>,
    last_force_focus_at: Option<Instant>,
    last_unread_delta: Option<i64>,
}

impl NotificationThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what the window should do for `event`.
    ///
    /// The decision and its state update are a single step: a passing
    /// cooldown check records the new timestamp before this returns, so two
    /// sequential calls can never both clear the same cooldown.
    pub fn decide(&mut self, policy: &ThrottlePolicy, event: NotificationEvent) -> AttentionAction {
        if let Some(delta) = event.unread_delta {
            self.last_unread_delta = Some(delta);
        }

        match event.kind {
            NotificationKind::Ordinary => self.decide_pulse(policy, event.at),
            NotificationKind::Urgent => {
                if !policy.force_foreground_on_urgent {
                    // Urgent degrades to the ordinary pulse rule.
                    return self.decide_pulse(policy, event.at);
                }
                if cooldown_open(self.last_force_focus_at, event.at, policy.focus_steal_cooldown) {
                    self.last_force_focus_at = Some(event.at);
                    AttentionAction::ForceFocus
                } else {
                    // Inside the steal cooldown: flash only. The pulse timer
                    // is neither consulted nor advanced.
                    AttentionAction::Pulse
                }
            }
        }
    }

    /// Last unread delta the content layer reported, if any.
    pub fn last_unread_delta(&self) -> Option<i64> {
        self.last_unread_delta
    }

    fn decide_pulse(&mut self, policy: &ThrottlePolicy, now: Instant) -> AttentionAction {
        if !policy.pulse_on_new_message {
            return AttentionAction::None;
        }
        if !cooldown_open(self.last_pulse_at, now, policy.pulse_min_interval) {
            return AttentionAction::None;
        }
        self.last_pulse_at = Some(now);
        AttentionAction::Pulse
    }
}

/// A cooldown with no recorded action is always open.
fn cooldown_open(last: Option<Instant>, now: Instant, min: Duration) -> bool {
    match last {
        None => true,
        Some(at) => now.duration_since(at) >= min,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ThrottlePolicy {
        ThrottlePolicy {
            pulse_on_new_message: true,
            pulse_min_interval: Duration::from_millis(15_000),
            force_foreground_on_urgent: true,
            focus_steal_cooldown: Duration::from_millis(45_000),
        }
    }

    fn ordinary(at: Instant) -> NotificationEvent {
        NotificationEvent::new(NotificationKind::Ordinary, at)
    }

    fn urgent(at: Instant) -> NotificationEvent {
        NotificationEvent::new(NotificationKind::Urgent, at)
    }

    #[test]
    fn first_ordinary_event_pulses() {
        let mut throttle = NotificationThrottle::new();
        assert_eq!(
            throttle.decide(&policy(), ordinary(Instant::now())),
            AttentionAction::Pulse
        );
    }

    #[test]
    fn ordinary_event_inside_interval_is_silent() {
        let mut throttle = NotificationThrottle::new();
        let t0 = Instant::now();
        assert_eq!(throttle.decide(&policy(), ordinary(t0)), AttentionAction::Pulse);
        let t1 = t0 + Duration::from_millis(14_999);
        assert_eq!(throttle.decide(&policy(), ordinary(t1)), AttentionAction::None);
    }

    #[test]
    fn ordinary_event_after_interval_pulses_again() {
        let mut throttle = NotificationThrottle::new();
        let t0 = Instant::now();
        assert_eq!(throttle.decide(&policy(), ordinary(t0)), AttentionAction::Pulse);
        let t1 = t0 + Duration::from_millis(15_000);
        assert_eq!(throttle.decide(&policy(), ordinary(t1)), AttentionAction::Pulse);
    }

    #[test]
    fn pulses_disabled_silences_ordinary_events() {
        let mut throttle = NotificationThrottle::new();
        let p = ThrottlePolicy {
            pulse_on_new_message: false,
            ..policy()
        };
        assert_eq!(throttle.decide(&p, ordinary(Instant::now())), AttentionAction::None);
    }

    #[test]
    fn urgent_event_steals_focus_when_enabled() {
        let mut throttle = NotificationThrottle::new();
        assert_eq!(
            throttle.decide(&policy(), urgent(Instant::now())),
            AttentionAction::ForceFocus
        );
    }

    #[test]
    fn second_urgent_inside_cooldown_degrades_to_pulse() {
        let mut throttle = NotificationThrottle::new();
        let t0 = Instant::now();
        assert_eq!(throttle.decide(&policy(), urgent(t0)), AttentionAction::ForceFocus);
        let t1 = t0 + Duration::from_millis(44_999);
        assert_eq!(throttle.decide(&policy(), urgent(t1)), AttentionAction::Pulse);
    }

    #[test]
    fn urgent_after_cooldown_steals_again() {
        let mut throttle = NotificationThrottle::new();
        let t0 = Instant::now();
        assert_eq!(throttle.decide(&policy(), urgent(t0)), AttentionAction::ForceFocus);
        let t1 = t0 + Duration::from_millis(45_000);
        assert_eq!(throttle.decide(&policy(), urgent(t1)), AttentionAction::ForceFocus);
    }

    #[test]
    fn degraded_urgent_does_not_advance_pulse_timer() {
        let mut throttle = NotificationThrottle::new();
        let t0 = Instant::now();
        assert_eq!(throttle.decide(&policy(), urgent(t0)), AttentionAction::ForceFocus);
        // Inside the steal cooldown: flash-equivalent, bypassing the pulse timer.
        let t1 = t0 + Duration::from_millis(1_000);
        assert_eq!(throttle.decide(&policy(), urgent(t1)), AttentionAction::Pulse);
        // An ordinary event right after still sees an untouched pulse timer.
        let t2 = t0 + Duration::from_millis(2_000);
        assert_eq!(throttle.decide(&policy(), ordinary(t2)), AttentionAction::Pulse);
    }

    #[test]
    fn urgent_with_steal_disabled_follows_pulse_rule() {
        let mut throttle = NotificationThrottle::new();
        let p = ThrottlePolicy {
            force_foreground_on_urgent: false,
            ..policy()
        };
        let t0 = Instant::now();
        assert_eq!(throttle.decide(&p, urgent(t0)), AttentionAction::Pulse);
        // Second urgent inside the pulse interval is silent, not a flash.
        let t1 = t0 + Duration::from_millis(1_000);
        assert_eq!(throttle.decide(&p, urgent(t1)), AttentionAction::None);
    }

    #[test]
    fn unread_delta_is_recorded_but_not_enforced() {
        let mut throttle = NotificationThrottle::new();
        let t0 = Instant::now();
        let event = urgent(t0).with_unread_delta(1);
        // Delta below any threshold still steals focus: classification is
        // the content layer's job.
        assert_eq!(throttle.decide(&policy(), event), AttentionAction::ForceFocus);
        assert_eq!(throttle.last_unread_delta(), Some(1));
    }
}
