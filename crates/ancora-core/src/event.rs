use crate::rect::{Point, Rect};

/// An observation the engine reports to its owner.
///
/// Delivered over an `mpsc` channel supplied at engine construction.
/// Marshaling onto a UI thread, if the receiver needs one, is the
/// receiver's concern.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A tracked window's rectangle changed since the last cycle.
    /// Fires for every window, matched by a rule or not.
    Moved {
        handle: usize,
        title: String,
        rect: Rect,
    },

    /// The engine forcibly moved a window back onto its target monitor.
    Repositioned {
        handle: usize,
        title: String,
        old: Point,
        new: Point,
        monitor: usize,
    },
}

impl EngineEvent {
    /// Returns the window handle the event refers to.
    pub fn handle(&self) -> usize {
        match self {
            Self::Moved { handle, .. } | Self::Repositioned { handle, .. } => *handle,
        }
    }

    /// Returns the window title captured when the event fired.
    pub fn title(&self) -> &str {
        match self {
            Self::Moved { title, .. } | Self::Repositioned { title, .. } => title,
        }
    }
}

impl std::fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Moved { handle, rect, .. } => {
                write!(
                    f,
                    "moved        0x{handle:X} to ({}, {}) {}x{}",
                    rect.x, rect.y, rect.width, rect.height
                )
            }
            Self::Repositioned {
                handle,
                old,
                new,
                monitor,
                ..
            } => {
                write!(
                    f,
                    "repositioned 0x{handle:X} ({}, {}) -> ({}, {}) on monitor {monitor}",
                    old.x, old.y, new.x, new.y
                )
            }
        }
    }
}
