//! System-window exclusion.
//!
//! The shell owns a number of top-level windows that must never be
//! tracked or repositioned: the desktop host, wallpaper workers, the
//! task switcher, and UWP frame containers. They are recognized by
//! class-name and title substrings rather than exact names because
//! several of them carry per-instance decorations.

/// Class-name fragments of shell and system surfaces.
const SYSTEM_CLASS_FRAGMENTS: &[&str] = &[
    "Progman",                   // desktop host
    "WorkerW",                   // wallpaper worker windows
    "MultitaskingViewFrame",     // Alt+Tab / Task View surface
    "TaskSwitcherWnd",           // legacy task switcher
    "ApplicationFrameWindow",    // UWP app frame container
    "Windows.UI.Core.CoreWindow",
];

/// Title fragments of shell overlay surfaces.
const SYSTEM_TITLE_FRAGMENTS: &[&str] = &[
    "Windows Shell Experience",
    "Task View",
    "Task Switching",
    "Start",
];

/// Returns whether a window belongs to the shell or OS chrome.
///
/// Excluded windows are invisible to the engine: they are never
/// tracked for movement and never matched against rules.
pub fn is_system_window(class: &str, title: &str) -> bool {
    SYSTEM_CLASS_FRAGMENTS
        .iter()
        .any(|frag| contains_ignore_case(class, frag))
        || SYSTEM_TITLE_FRAGMENTS
            .iter()
            .any(|frag| contains_ignore_case(title, frag))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
