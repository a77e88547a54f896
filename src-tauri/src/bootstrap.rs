//! Startup wiring: configuration resolution and main-window guards.

use tauri::{Manager, WindowEvent};

use crate::app::SharedState;
use crate::config;
use crate::window::close_guard::{CloseGuard, CloseSignal, Interception};

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Resolve the configuration and build the shared state. Infallible: the
/// resolution cascade always produces a usable configuration.
pub fn init_foundation() -> SharedState {
    let (cfg, path) = config::store::load_or_create();
    tracing::info!(
        path = %path.display(),
        refresh_ms = cfg.refresh_ms,
        widget_width = cfg.widget_width,
        pulse_on_new_message = cfg.pulse_on_new_message,
        force_foreground_on_urgent = cfg.force_foreground_on_urgent,
        "configuration resolved"
    );
    SharedState::new(cfg, path)
}

/// Install the close interception layers on the main window.
pub fn wire_main_window(app: &tauri::App, state: &SharedState) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        tracing::error!("main window missing, close guard not installed");
        return;
    };

    let guard = CloseGuard::new(state.close_auth().clone());
    #[cfg(windows)]
    let msg_guard = guard.clone();

    // UI-level close requests: close button, programmatic close, system
    // shutdown prompts routed through the windowing layer.
    window.on_window_event(move |event| {
        if let WindowEvent::CloseRequested { api, .. } = event {
            if guard.decide(CloseSignal::UiCloseRequest) == Interception::Consumed {
                api.prevent_close();
            }
        }
    });

    // Message-level filter (WM_CLOSE, SC_CLOSE, Alt+F4), independent of the
    // event above.
    #[cfg(windows)]
    {
        match window.hwnd().map(|h| h.0 as isize) {
            Ok(raw) => {
                if let Err(e) = crate::window::win32::install_close_filter(raw, msg_guard) {
                    tracing::warn!("close-message filter not installed: {e}");
                }
            }
            Err(e) => tracing::warn!("window handle unavailable: {e}"),
        }
    }
}
