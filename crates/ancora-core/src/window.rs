use crate::Rect;

/// A boxed error type for window and OS-call failures.
///
/// Any error type implementing the `Error` trait can be boxed into
/// this; OS-call failures, IO errors, and plain strings all flow
/// through the same channel.
pub type WindowResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Platform-agnostic window handle.
///
/// The platform crate (`ancora-windows`) provides the implementation;
/// the engine core only ever talks to this trait, which keeps the
/// placement and tracking logic testable without an OS.
pub trait Window {
    /// Returns the window title.
    fn title(&self) -> WindowResult<String>;

    /// Returns the window class name.
    fn class(&self) -> WindowResult<String>;

    /// Returns the window bounding rectangle.
    fn rect(&self) -> WindowResult<Rect>;

    /// Moves the window's top-left corner without resizing, changing
    /// z-order, or activating it.
    fn set_position(&self, x: i32, y: i32) -> WindowResult<()>;

    /// Returns whether the window is currently visible.
    fn is_visible(&self) -> bool;

    /// Returns whether the handle still refers to a live window.
    /// Checked immediately before every OS call that uses the handle.
    fn is_alive(&self) -> bool;
}
