//! Shared application state.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use focus_policy::{AttentionAction, NotificationEvent, NotificationThrottle};

use crate::config::AppConfig;
use crate::shutdown::CloseAuth;

/// State shared between Tauri commands, window event handlers and the
/// content bridge.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<SharedStateInner>,
}

struct SharedStateInner {
    /// Resolved configuration; immutable for the life of the process.
    config: AppConfig,
    /// Where the configuration was (or would have been) persisted.
    config_path: PathBuf,
    /// Throttle state. The mutex serializes decisions so a cooldown check
    /// and its timestamp update are one atomic step.
    throttle: Mutex<NotificationThrottle>,
    /// One-way close authorization.
    close_auth: CloseAuth,
}

impl SharedState {
    pub fn new(config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            inner: Arc::new(SharedStateInner {
                config,
                config_path,
                throttle: Mutex::new(NotificationThrottle::new()),
                close_auth: CloseAuth::new(),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn config_path(&self) -> &Path {
        &self.inner.config_path
    }

    pub fn close_auth(&self) -> &CloseAuth {
        &self.inner.close_auth
    }

    /// Run one throttle decision under the lock.
    pub fn decide(&self, event: NotificationEvent) -> AttentionAction {
        let policy = self.inner.config.throttle_policy();
        let mut throttle = self
            .inner
            .throttle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        throttle.decide(&policy, event)
    }
}
