//! Content boundary: inbound widget messages and outbound script injection.
//!
//! The hosted content reports notification events as JSON messages with a
//! `type` field; anything unrecognized or malformed is dropped without
//! error. In the other direction the host injects the resolved configuration
//! at load completion and fires the content-defined force-open entry point
//! for urgent events, independent of the throttle decision.

use std::path::Path;
use std::time::Instant;

use focus_policy::{NotificationEvent, NotificationKind};
use serde::Serialize;
use serde_json::Value;

use crate::app::SharedState;
use crate::config::AppConfig;
use crate::window::focus::FocusArbiter;
use crate::window::native::TauriWindowOps;

/// Recognized inbound message types.
pub const MSG_NEW_MESSAGE: &str = "new_message";
pub const MSG_URGENT_MESSAGE: &str = "urgent_message";

const FORCE_OPEN_SCRIPT: &str =
    "(function(){ if (window.__BV_FORCE_OPEN__) window.__BV_FORCE_OPEN__(); })();";

/// The script-execution surface of the hosted content. The rendering engine
/// behind it is opaque to this module.
pub trait ContentHost {
    fn eval(&self, js: &str) -> anyhow::Result<()>;
}

impl ContentHost for tauri::WebviewWindow {
    fn eval(&self, js: &str) -> anyhow::Result<()> {
        tauri::WebviewWindow::eval(self, js)?;
        Ok(())
    }
}

/// Configuration snapshot handed to the content at boot.
///
/// Field names are the wire contract with the widget script; the unread
/// threshold is included because the content layer is its sole enforcement
/// point.
#[derive(Debug, Clone, Serialize)]
pub struct BootPayload<'a> {
    pub product_id: &'a str,
    pub user_id: &'a str,
    pub refresh_ms: i64,
    pub widget_width: i32,
    pub auto_open_on_launch: bool,
    pub manual_close_cooldown_ms: i64,
    pub pulse_on_new_message: bool,
    pub pulse_min_interval_ms: i64,
    pub urgent_focus_unread_delta: i32,
    pub config_path: String,
}

impl<'a> BootPayload<'a> {
    pub fn from_config(cfg: &'a AppConfig, config_path: &Path) -> Self {
        Self {
            product_id: &cfg.product_id,
            user_id: &cfg.user_id,
            refresh_ms: cfg.refresh_ms,
            widget_width: cfg.widget_width,
            auto_open_on_launch: cfg.auto_open_on_launch,
            manual_close_cooldown_ms: cfg.manual_close_cooldown_ms,
            pulse_on_new_message: cfg.pulse_on_new_message,
            pulse_min_interval_ms: cfg.pulse_min_interval_ms,
            urgent_focus_unread_delta: cfg.urgent_focus_unread_delta,
            config_path: config_path.display().to_string(),
        }
    }
}

/// Map an inbound content message to a notification kind plus the advisory
/// unread delta. `None` for anything unrecognized or malformed.
pub fn classify_message(message: &Value) -> Option<(NotificationKind, Option<i64>)> {
    let kind = match message.get("type").and_then(Value::as_str)?.trim() {
        MSG_NEW_MESSAGE => NotificationKind::Ordinary,
        MSG_URGENT_MESSAGE => NotificationKind::Urgent,
        _ => return None,
    };
    let delta = message.get("unread_delta").and_then(Value::as_i64);
    Some((kind, delta))
}

/// Handle one message from the hosted content.
pub fn handle_widget_message(state: &SharedState, window: &tauri::WebviewWindow, message: &Value) {
    let Some((kind, delta)) = classify_message(message) else {
        tracing::debug!("ignoring unrecognized widget message");
        return;
    };

    if kind == NotificationKind::Urgent {
        // The force-open signal fires regardless of the throttle decision.
        force_open_widget(window);
    }

    let mut event = NotificationEvent::new(kind, Instant::now());
    if let Some(delta) = delta {
        event = event.with_unread_delta(delta);
    }

    let action = state.decide(event);
    tracing::debug!(?kind, ?action, "widget message processed");
    FocusArbiter::new(TauriWindowOps::new(window.clone())).apply(action);
}

/// Push the resolved configuration into the content and invoke its boot
/// entry point, if one is registered.
pub fn inject_boot_payload<H: ContentHost>(host: &H, cfg: &AppConfig, config_path: &Path) {
    let payload = BootPayload::from_config(cfg, config_path);
    let json = match serde_json::to_string(&payload) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("boot payload serialization failed: {e}");
            return;
        }
    };
    let js = format!(
        "(function(){{ window.__BV_CFG__ = {json}; \
         if (typeof window.__BV_BOOT__ === 'function') window.__BV_BOOT__(); }})();"
    );
    if let Err(e) = host.eval(&js) {
        tracing::warn!("boot payload injection failed: {e}");
    }
}

/// Invoke the content-defined force-open entry point, if registered.
pub fn force_open_widget<H: ContentHost>(host: &H) {
    if let Err(e) = host.eval(FORCE_OPEN_SCRIPT) {
        tracing::warn!("force-open signal failed: {e}");
    }
}
