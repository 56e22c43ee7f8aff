//! Drag interruption for programmatic moves.
//!
//! Moving a window while the user holds it by the title bar leaves the
//! OS modal move loop convinced it still owns the window: the next
//! mouse movement snaps the window back under the cursor. Before a
//! forced move we cancel that modal loop, and afterwards we synthesize
//! a left-button-up so no stuck drag state survives the relocation.

use std::mem;

use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    GetAsyncKeyState, INPUT, INPUT_MOUSE, MOUSEEVENTF_LEFTUP, SendInput, VK_LBUTTON,
};
use windows::Win32::UI::WindowsAndMessaging::{
    SMTO_ABORTIFHUNG, SendMessageTimeoutW, WM_CANCELMODE,
};

/// Timeout for the cancel message, so a hung window cannot stall the
/// poll cycle.
const CANCEL_TIMEOUT_MS: u32 = 50;

/// Returns whether the physical left mouse button is currently down,
/// the cheapest available signal that a drag may be in progress.
fn left_button_down() -> bool {
    // SAFETY: GetAsyncKeyState reads global key state. The high bit
    // of the returned i16 is the "currently down" flag.
    unsafe { (GetAsyncKeyState(VK_LBUTTON.0 as i32) as u16) & 0x8000 != 0 }
}

/// Cancels any modal move/size loop the window is running.
///
/// Returns whether a drag was likely in progress (left button down at
/// the time), so the caller knows to synthesize a button-up after the
/// move. `WM_CANCELMODE` ends the modal loop and releases the mouse
/// capture the loop holds; it is harmless for a window that is not in
/// one.
pub fn interrupt_drag(hwnd: HWND) -> bool {
    let dragging = left_button_down();
    if dragging {
        // SAFETY: SendMessageTimeoutW with SMTO_ABORTIFHUNG returns
        // without delivering if the target stops responding.
        unsafe {
            SendMessageTimeoutW(
                hwnd,
                WM_CANCELMODE,
                WPARAM(0),
                LPARAM(0),
                SMTO_ABORTIFHUNG,
                CANCEL_TIMEOUT_MS,
                None,
            );
        }
    }
    dragging
}

/// Injects a left-button-up into the input stream.
///
/// Called after a forced move that interrupted a drag: the OS believes
/// the button is still held over the old position, and releasing it
/// programmatically resets the drag state machine.
pub fn synthesize_button_up() {
    let mut input = INPUT {
        r#type: INPUT_MOUSE,
        ..Default::default()
    };
    input.Anonymous.mi.dwFlags = MOUSEEVENTF_LEFTUP;

    // SAFETY: SendInput with one fully initialized INPUT structure.
    unsafe {
        SendInput(&[input], mem::size_of::<INPUT>() as i32);
    }
}
