mod app;
mod bootstrap;
mod bridge;
mod config;
mod shutdown;
mod window;

use tauri::Manager;
use tauri::webview::PageLoadEvent;
use tracing_subscriber::EnvFilter;

use app::SharedState;

/// Entry point for messages posted by the hosted widget content.
#[tauri::command]
fn widget_message(
    window: tauri::WebviewWindow,
    state: tauri::State<'_, SharedState>,
    payload: serde_json::Value,
) {
    bridge::handle_widget_message(&state, &window, &payload);
}

/// Control surface for the update/shutdown coordinator: permanently allow
/// the window to close.
#[tauri::command]
fn authorize_close(state: tauri::State<'_, SharedState>) {
    state.close_auth().authorize();
}

#[tauri::command]
fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let state = bootstrap::init_foundation();
    let state_for_setup = state.clone();

    tauri::Builder::default()
        .manage(state)
        .setup(move |app| {
            bootstrap::wire_main_window(app, &state_for_setup);
            Ok(())
        })
        .on_page_load(|webview, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                let state = webview.state::<SharedState>();
                if let Some(window) = webview.app_handle().get_webview_window(webview.label()) {
                    bridge::inject_boot_payload(&window, state.config(), state.config_path());
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            widget_message,
            authorize_close,
            get_version,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
