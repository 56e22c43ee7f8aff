pub mod classify;
pub mod config;
pub mod event;
pub mod ipc;
pub mod log;
pub mod pid;
pub mod placement;
pub mod rect;
pub mod rule;
pub mod topology;
pub mod tracker;
pub mod window;

pub use event::EngineEvent;
pub use ipc::{Command, PIPE_NAME, Response};
pub use rect::{Point, Rect};
pub use rule::{MatchBy, Rule};
pub use tracker::WindowTracker;
pub use window::{Window, WindowResult};
