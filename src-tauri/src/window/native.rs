//! Tauri-backed window operations.
//!
//! On Windows the attention-critical calls go straight to the Win32 backend
//! (the Tauri equivalents cannot flash the taskbar or steal foreground from
//! another process); everywhere else they degrade to the closest Tauri
//! operations.

use tauri::WebviewWindow;

use crate::window::focus::WindowOps;

pub struct TauriWindowOps {
    window: WebviewWindow,
}

impl TauriWindowOps {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }

    #[cfg(windows)]
    fn raw_hwnd(&self) -> Option<isize> {
        self.window.hwnd().ok().map(|h| h.0 as isize)
    }
}

impl WindowOps for TauriWindowOps {
    fn is_minimized(&self) -> bool {
        self.window.is_minimized().unwrap_or(false)
    }

    fn restore(&self) -> anyhow::Result<()> {
        #[cfg(windows)]
        {
            if let Some(raw) = self.raw_hwnd() {
                crate::window::win32::restore_if_iconic(raw);
            }
        }
        self.window.unminimize()?;
        Ok(())
    }

    fn show(&self) -> anyhow::Result<()> {
        self.window.show()?;
        Ok(())
    }

    fn focus(&self) -> anyhow::Result<()> {
        self.window.set_focus()?;
        Ok(())
    }

    fn flash_taskbar(&self) -> anyhow::Result<()> {
        #[cfg(windows)]
        {
            if let Some(raw) = self.raw_hwnd() {
                crate::window::win32::flash_taskbar(raw);
                return Ok(());
            }
        }
        self.window
            .request_user_attention(Some(tauri::UserAttentionType::Informational))?;
        Ok(())
    }

    fn force_foreground(&self) -> anyhow::Result<()> {
        #[cfg(windows)]
        {
            if let Some(raw) = self.raw_hwnd() {
                crate::window::win32::force_foreground(raw);
            }
        }
        #[cfg(not(windows))]
        {
            self.window.set_focus()?;
        }

        // The window is never left topmost; the pulse nudges the OS into
        // honoring the foreground transfer.
        self.window.set_always_on_top(true)?;
        self.window.set_always_on_top(false)?;
        Ok(())
    }
}
