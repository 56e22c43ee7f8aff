pub mod daemon;
pub mod debug;
pub mod dormant;
pub mod init;
pub mod start;
pub mod status;
pub mod stop;
