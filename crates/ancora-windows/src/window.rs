use ancora_core::{Rect, WindowResult};

use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowRect, GetWindowTextLengthW, GetWindowTextW, IsWindow, IsWindowVisible,
    RealGetWindowClassW, SWP_NOACTIVATE, SWP_NOSIZE, SWP_NOZORDER, SetWindowPos,
};

/// A window on the Windows platform, wrapping a Win32 `HWND`.
///
/// `HWND` is an opaque handle — a number identifying a window to the
/// OS. This struct holds that handle and queries the OS lazily for
/// metadata, so a `Window` is valid to construct even for a handle
/// that has since died; every query simply fails or returns false.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    /// Creates a new `Window` from a raw `HWND`.
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    /// Creates a new `Window` from a raw handle value (pointer-sized
    /// integer), so callers need not depend on the `windows` crate.
    pub fn from_raw(handle: usize) -> Self {
        Self {
            hwnd: HWND(handle as *mut _),
        }
    }

    /// Returns the raw window handle.
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Returns the handle as a pointer-sized integer.
    pub fn raw(&self) -> usize {
        self.hwnd.0 as usize
    }
}

impl ancora_core::Window for Window {
    fn title(&self) -> WindowResult<String> {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW read window
        // text without modifying state.
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length == 0 {
                return Ok(String::new());
            }

            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            Ok(String::from_utf16_lossy(&buffer[..copied as usize]))
        }
    }

    fn class(&self) -> WindowResult<String> {
        // SAFETY: RealGetWindowClassW reads the window class name.
        // 256 is the maximum class name length in Win32.
        unsafe {
            let mut buffer = [0u16; 256];
            let length = RealGetWindowClassW(self.hwnd, &mut buffer);
            Ok(String::from_utf16_lossy(&buffer[..length as usize]))
        }
    }

    fn rect(&self) -> WindowResult<Rect> {
        let mut rc = RECT::default();
        // SAFETY: GetWindowRect fills the RECT for a valid HWND and
        // errors for a dead one.
        unsafe { GetWindowRect(self.hwnd, &mut rc)? };

        Ok(Rect::new(
            rc.left,
            rc.top,
            rc.right - rc.left,
            rc.bottom - rc.top,
        ))
    }

    fn set_position(&self, x: i32, y: i32) -> WindowResult<()> {
        // Move only: SWP_NOSIZE keeps the window's size, SWP_NOZORDER
        // and SWP_NOACTIVATE leave stacking and focus alone, so the
        // move is invisible to the user beyond the new position.
        // SAFETY: SetWindowPos with a valid HWND is safe.
        unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                x,
                y,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
            )?;
        }
        Ok(())
    }

    fn is_visible(&self) -> bool {
        // SAFETY: IsWindowVisible is a simple query returning a BOOL.
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    fn is_alive(&self) -> bool {
        // SAFETY: IsWindow checks whether the handle still refers to
        // an existing window.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }
}
