//! The persisted widget-host configuration.
//!
//! A flat record of scalar settings, written as pretty camelCase JSON and
//! read back case-insensitively. Every load path funnels through
//! [`AppConfig::normalize`], so out-of-range values never escape this module.

use std::time::Duration;

use focus_policy::ThrottlePolicy;
use serde::Serialize;
use serde_json::Value;

/// Fixed filename shared by the runtime file and the embedded template.
pub const CONFIG_FILE_NAME: &str = "beamerviewer.config.json";

/// Product identifier baked into the build.
pub const DEFAULT_PRODUCT_ID: &str = "vEjlRlWp82033";

const DEFAULT_REFRESH_MS: i64 = 60_000;
const DEFAULT_WIDGET_WIDTH: i32 = 520;
const DEFAULT_MANUAL_CLOSE_COOLDOWN_MS: i64 = 6_000;
const DEFAULT_PULSE_MIN_INTERVAL_MS: i64 = 15_000;
const DEFAULT_URGENT_UNREAD_DELTA: i32 = 3;
const DEFAULT_FOCUS_STEAL_COOLDOWN_MS: i64 = 45_000;

const MIN_REFRESH_MS: i64 = 15_000;
const MIN_WIDGET_WIDTH: i32 = 320;
const MAX_MANUAL_CLOSE_COOLDOWN_MS: i64 = 120_000;
const MAX_PULSE_MIN_INTERVAL_MS: i64 = 600_000;
const MIN_URGENT_UNREAD_DELTA: i32 = 1;
const MAX_URGENT_UNREAD_DELTA: i32 = 50;
const MAX_FOCUS_STEAL_COOLDOWN_MS: i64 = 600_000;

/// A configuration document that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document is not a JSON object")]
    NotAnObject,
    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),
}

/// Runtime configuration for the widget host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub product_id: String,
    pub user_id: String,
    pub refresh_ms: i64,
    pub widget_width: i32,
    pub auto_open_on_launch: bool,
    pub manual_close_cooldown_ms: i64,
    pub pulse_on_new_message: bool,
    pub pulse_min_interval_ms: i64,
    pub force_foreground_on_urgent: bool,
    pub urgent_focus_unread_delta: i32,
    pub focus_steal_cooldown_ms: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            product_id: DEFAULT_PRODUCT_ID.into(),
            user_id: String::new(),
            refresh_ms: DEFAULT_REFRESH_MS,
            widget_width: DEFAULT_WIDGET_WIDTH,
            auto_open_on_launch: true,
            manual_close_cooldown_ms: DEFAULT_MANUAL_CLOSE_COOLDOWN_MS,
            pulse_on_new_message: true,
            pulse_min_interval_ms: DEFAULT_PULSE_MIN_INTERVAL_MS,
            force_foreground_on_urgent: false,
            urgent_focus_unread_delta: DEFAULT_URGENT_UNREAD_DELTA,
            focus_steal_cooldown_ms: DEFAULT_FOCUS_STEAL_COOLDOWN_MS,
        }
    }
}

impl AppConfig {
    /// Parse a configuration document.
    ///
    /// Keys are matched case-insensitively, unknown keys are ignored, and
    /// missing fields keep their defaults. A present field of the wrong JSON
    /// type makes the whole document unusable; the caller treats that the
    /// same as a missing file.
    pub fn from_json(raw: &str) -> Result<Self, ConfigParseError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(ConfigParseError::NotAnObject);
        };

        let mut cfg = Self::default();
        for (key, val) in &map {
            match key.to_ascii_lowercase().as_str() {
                "productid" => cfg.product_id = as_string("productId", val)?,
                "userid" => cfg.user_id = as_string("userId", val)?,
                "refreshms" => cfg.refresh_ms = as_i64("refreshMs", val)?,
                "widgetwidth" => cfg.widget_width = as_i32("widgetWidth", val)?,
                "autoopenonlaunch" => {
                    cfg.auto_open_on_launch = as_bool("autoOpenOnLaunch", val)?;
                }
                "manualclosecooldownms" => {
                    cfg.manual_close_cooldown_ms = as_i64("manualCloseCooldownMs", val)?;
                }
                "pulseonnewmessage" => {
                    cfg.pulse_on_new_message = as_bool("pulseOnNewMessage", val)?;
                }
                "pulseminintervalms" => {
                    cfg.pulse_min_interval_ms = as_i64("pulseMinIntervalMs", val)?;
                }
                "forceforegroundonurgent" => {
                    cfg.force_foreground_on_urgent = as_bool("forceForegroundOnUrgent", val)?;
                }
                "urgentfocusunreaddelta" => {
                    cfg.urgent_focus_unread_delta = as_i32("urgentFocusUnreadDelta", val)?;
                }
                "focusstealcooldownms" => {
                    cfg.focus_steal_cooldown_ms = as_i64("focusStealCooldownMs", val)?;
                }
                _ => {}
            }
        }
        Ok(cfg)
    }

    /// Clamp every field into its documented range. Idempotent; applied
    /// unconditionally to every configuration before use, whatever its
    /// source.
    pub fn normalize(mut self) -> Self {
        if self.product_id.trim().is_empty() {
            self.product_id = DEFAULT_PRODUCT_ID.into();
        }
        if self.user_id.trim().is_empty() {
            self.user_id = format!("local-{}", uuid::Uuid::new_v4());
        }

        if self.refresh_ms < MIN_REFRESH_MS {
            self.refresh_ms = MIN_REFRESH_MS;
        }
        // Below the floor the width resets to the default, not the floor.
        if self.widget_width < MIN_WIDGET_WIDTH {
            self.widget_width = DEFAULT_WIDGET_WIDTH;
        }

        self.manual_close_cooldown_ms = self
            .manual_close_cooldown_ms
            .clamp(0, MAX_MANUAL_CLOSE_COOLDOWN_MS);
        self.pulse_min_interval_ms = self.pulse_min_interval_ms.clamp(0, MAX_PULSE_MIN_INTERVAL_MS);
        self.urgent_focus_unread_delta = self
            .urgent_focus_unread_delta
            .clamp(MIN_URGENT_UNREAD_DELTA, MAX_URGENT_UNREAD_DELTA);
        self.focus_steal_cooldown_ms = self
            .focus_steal_cooldown_ms
            .clamp(0, MAX_FOCUS_STEAL_COOLDOWN_MS);

        self
    }

    /// The subset the notification throttle runs on.
    pub fn throttle_policy(&self) -> ThrottlePolicy {
        ThrottlePolicy {
            pulse_on_new_message: self.pulse_on_new_message,
            pulse_min_interval: Duration::from_millis(self.pulse_min_interval_ms.max(0) as u64),
            force_foreground_on_urgent: self.force_foreground_on_urgent,
            focus_steal_cooldown: Duration::from_millis(self.focus_steal_cooldown_ms.max(0) as u64),
        }
    }
}

fn as_string(field: &'static str, value: &Value) -> Result<String, ConfigParseError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or(ConfigParseError::WrongType(field))
}

fn as_i64(field: &'static str, value: &Value) -> Result<i64, ConfigParseError> {
    value.as_i64().ok_or(ConfigParseError::WrongType(field))
}

fn as_i32(field: &'static str, value: &Value) -> Result<i32, ConfigParseError> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or(ConfigParseError::WrongType(field))
}

fn as_bool(field: &'static str, value: &Value) -> Result<bool, ConfigParseError> {
    value.as_bool().ok_or(ConfigParseError::WrongType(field))
}
