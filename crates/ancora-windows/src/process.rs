use windows::Win32::Foundation::{CloseHandle, HWND};
use windows::Win32::System::ProcessStatus::K32GetModuleFileNameExW;
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE,
    PROCESS_VM_READ, TerminateProcess,
};
use windows::Win32::UI::WindowsAndMessaging::GetWindowThreadProcessId;

/// Returns the lowercase process name (exe file stem) owning a window.
///
/// Resolves HWND -> PID -> exe path, then keeps only the file stem:
/// `C:\Windows\notepad.exe` becomes `notepad`. Returns `None` for dead
/// windows and processes we lack permission to open.
pub fn process_name(hwnd: HWND) -> Option<String> {
    let mut pid: u32 = 0;
    // SAFETY: GetWindowThreadProcessId writes the owning PID.
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    if pid == 0 {
        return None;
    }

    let path = exe_path(pid)?;
    let file = path.rsplit(['\\', '/']).next()?;
    let stem = file.strip_suffix(".exe").unwrap_or(file);
    Some(stem.to_ascii_lowercase())
}

/// Returns the executable path for a process ID.
fn exe_path(pid: u32) -> Option<String> {
    // SAFETY: OpenProcess/K32GetModuleFileNameExW read process metadata;
    // the handle is closed before returning on every path.
    unsafe {
        let h = OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid).ok()?;
        let mut buf = [0u16; 1024];
        let len = K32GetModuleFileNameExW(Some(h), None, &mut buf);
        let _ = CloseHandle(h);
        if len == 0 {
            return None;
        }
        String::from_utf16(&buf[..len as usize]).ok()
    }
}

/// Checks whether a process with the given PID is still alive.
///
/// Uses `OpenProcess` with minimal access rights. If the handle can be
/// opened, the process exists. This detects stale PID files left
/// behind when the daemon is killed without a clean shutdown.
pub fn is_process_alive(pid: u32) -> bool {
    // SAFETY: PROCESS_QUERY_LIMITED_INFORMATION is the least-privilege
    // access right that still confirms the process exists.
    let result = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) };

    match result {
        Ok(handle) => {
            // SAFETY: We only opened the handle to check existence.
            unsafe {
                let _ = CloseHandle(handle);
            }
            true
        }
        Err(_) => false,
    }
}

/// Forcibly terminates a process. Last-resort fallback for `ancora
/// stop` when the daemon's IPC pipe has died.
pub fn kill_process(pid: u32) -> bool {
    // SAFETY: OpenProcess with PROCESS_TERMINATE, then TerminateProcess;
    // the handle is closed regardless of the termination result.
    unsafe {
        let Ok(handle) = OpenProcess(PROCESS_TERMINATE, false, pid) else {
            return false;
        };
        let killed = TerminateProcess(handle, 1).is_ok();
        let _ = CloseHandle(handle);
        killed
    }
}
