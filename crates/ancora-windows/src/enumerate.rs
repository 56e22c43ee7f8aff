use ancora_core::WindowResult;
use ancora_core::window::Window as WindowTrait;

use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{EnumWindows, IsIconic, IsWindowVisible};
use windows::core::BOOL;

use crate::window::Window;

/// Enumerates all visible, non-minimized top-level windows that carry
/// a non-blank title.
///
/// This calls the Win32 `EnumWindows` API, which iterates over every
/// top-level window and invokes a callback for each one. Untitled
/// windows are dropped here because they can never match a rule —
/// they are almost always helper or background surfaces.
pub fn enumerate_windows() -> WindowResult<Vec<Window>> {
    let mut windows: Vec<Window> = Vec::new();

    // SAFETY: EnumWindows calls our callback for each top-level window.
    // We pass a pointer to our Vec as LPARAM (user data). The callback
    // casts it back to &mut Vec<Window> to collect results. This is safe
    // because EnumWindows runs synchronously — the Vec outlives the call.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut windows as *mut _ as isize),
        )?;
    }

    Ok(windows)
}

/// Callback invoked by `EnumWindows` for each top-level window.
///
/// Returns `TRUE` to continue enumeration, `FALSE` to stop. Win32
/// can't call Rust closures directly, so the collection Vec travels
/// through the `LPARAM` user-data slot.
unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is a pointer to our Vec<Window>, cast from enumerate_windows().
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<Window>) };

    if should_include_window(hwnd) {
        windows.push(Window::new(hwnd));
    }

    BOOL(1) // TRUE — continue enumerating
}

/// Determines whether a window should be included in the enumeration.
///
/// Minimized windows are skipped: their reported rect is the off-screen
/// icon position (-32000, -32000), which would read as "off monitor"
/// every cycle.
fn should_include_window(hwnd: HWND) -> bool {
    // SAFETY: These are simple query functions that read window state.
    unsafe {
        if !IsWindowVisible(hwnd).as_bool() {
            return false;
        }
        if IsIconic(hwnd).as_bool() {
            return false;
        }
    }

    has_real_title(hwnd)
}

fn has_real_title(hwnd: HWND) -> bool {
    Window::new(hwnd)
        .title()
        .map(|t| !t.trim().is_empty())
        .unwrap_or(false)
}
