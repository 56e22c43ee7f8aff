/// Config directory change watcher.
pub mod config_watcher;

/// Ctrl+C handling for foreground runs.
pub mod ctrl_c;

/// Daemon entry point and thread wiring.
pub mod daemon;

/// Drag interruption for programmatic moves.
pub mod drag;

/// Win32 window enumeration.
pub mod enumerate;

/// IPC via Named Pipes.
pub mod ipc;

/// The window-keeping engine.
pub mod keeper;

/// Monitor enumeration and topology cache.
pub mod monitor;

/// Process utilities (name lookup, alive check).
pub mod process;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

pub use enumerate::enumerate_windows;
pub use keeper::Keeper;
pub use window::Window;
