pub mod list;
pub mod watch;
