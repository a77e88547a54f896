//! Win32 backend: taskbar flash, foreground steal, close-message filter.
//!
//! The filter subclasses the main window's wndproc so that WM_CLOSE,
//! SC_CLOSE and Alt+F4 are swallowed before the default handler ever sees
//! them while the close guard is locked. Foreground stealing attaches the
//! calling thread's input state to the current foreground owner's, which is
//! what makes the OS accept `SetForegroundWindow` from a background process.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicIsize, Ordering};

use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::{AttachThreadInput, GetCurrentThreadId};
use windows::Win32::UI::Input::KeyboardAndMouse::VK_F4;
use windows::Win32::UI::WindowsAndMessaging::{
    CallWindowProcW, DefWindowProcW, FLASHW_ALL, FLASHW_TIMERNOFG, FLASHWINFO, FlashWindowEx,
    GWLP_WNDPROC, GetForegroundWindow, GetWindowThreadProcessId, IsIconic, SC_CLOSE,
    SetForegroundWindow, SetWindowLongPtrW, ShowWindow, SW_RESTORE, WM_CLOSE, WM_SYSCOMMAND,
    WM_SYSKEYDOWN, WNDPROC,
};

use crate::window::close_guard::{CloseGuard, CloseSignal, Interception};

static CLOSE_GUARD: OnceLock<CloseGuard> = OnceLock::new();
static PREV_WNDPROC: AtomicIsize = AtomicIsize::new(0);

/// WM_SYSCOMMAND carries extra state in the low four bits of wParam.
const SYSCOMMAND_MASK: usize = 0xFFF0;
/// Context-code bit in key-down lParam: set when Alt is held.
const ALT_CONTEXT_BIT: u32 = 29;

fn hwnd(raw: isize) -> HWND {
    HWND(raw as *mut core::ffi::c_void)
}

/// Restore the window when it is minimized; no-op otherwise.
pub fn restore_if_iconic(raw: isize) {
    unsafe {
        let window = hwnd(raw);
        if IsIconic(window).as_bool() {
            let _ = ShowWindow(window, SW_RESTORE);
        }
    }
}

/// Flash the taskbar indicator without taking foreground ownership.
pub fn flash_taskbar(raw: isize) {
    let info = FLASHWINFO {
        cbSize: size_of::<FLASHWINFO>() as u32,
        hwnd: hwnd(raw),
        dwFlags: FLASHW_ALL | FLASHW_TIMERNOFG,
        uCount: 2,
        dwTimeout: 0,
    };
    unsafe {
        let _ = FlashWindowEx(&info);
    }
}

/// Transfer foreground ownership to the window, even when another process
/// currently holds it.
pub fn force_foreground(raw: isize) {
    unsafe {
        let target = hwnd(raw);
        let foreground = GetForegroundWindow();
        let owner_thread = GetWindowThreadProcessId(foreground, None);
        let this_thread = GetCurrentThreadId();

        if owner_thread != 0 && owner_thread != this_thread {
            let _ = AttachThreadInput(this_thread, owner_thread, true.into());
            let _ = SetForegroundWindow(target);
            let _ = AttachThreadInput(this_thread, owner_thread, false.into());
        } else {
            let _ = SetForegroundWindow(target);
        }
    }
}

/// Install the close-message filter on the window. Idempotent per process:
/// only the first call subclasses the wndproc.
pub fn install_close_filter(raw: isize, guard: CloseGuard) -> anyhow::Result<()> {
    if CLOSE_GUARD.set(guard).is_err() {
        return Ok(());
    }
    let prev = unsafe {
        SetWindowLongPtrW(hwnd(raw), GWLP_WNDPROC, guarded_wndproc as usize as isize)
    };
    if prev == 0 {
        anyhow::bail!("SetWindowLongPtrW failed to subclass the window");
    }
    PREV_WNDPROC.store(prev, Ordering::Release);
    tracing::info!("close-message filter installed");
    Ok(())
}

/// Map a window message to the close signal it represents, if any.
fn close_signal(msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<CloseSignal> {
    match msg {
        WM_CLOSE => Some(CloseSignal::CloseMessage),
        WM_SYSCOMMAND if (wparam.0 & SYSCOMMAND_MASK) == SC_CLOSE as usize => {
            Some(CloseSignal::SystemClose)
        }
        WM_SYSKEYDOWN
            if wparam.0 as u16 == VK_F4.0 && (lparam.0 as u32 >> ALT_CONTEXT_BIT) & 1 == 1 =>
        {
            Some(CloseSignal::CloseAccelerator)
        }
        _ => None,
    }
}

unsafe extern "system" fn guarded_wndproc(
    window: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if let Some(signal) = close_signal(msg, wparam, lparam) {
        if let Some(guard) = CLOSE_GUARD.get() {
            if guard.decide(signal) == Interception::Consumed {
                return LRESULT(0);
            }
        }
    }

    let prev = PREV_WNDPROC.load(Ordering::Acquire);
    if prev != 0 {
        let prev: WNDPROC = Some(unsafe {
            std::mem::transmute::<isize, unsafe extern "system" fn(HWND, u32, WPARAM, LPARAM) -> LRESULT>(
                prev,
            )
        });
        return unsafe { CallWindowProcW(prev, window, msg, wparam, lparam) };
    }
    unsafe { DefWindowProcW(window, msg, wparam, lparam) }
}
