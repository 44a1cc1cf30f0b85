pub mod dirs;
pub mod files;
pub mod session;
pub mod transfer;

pub const OK: &str = "OK";
pub const FAREWELL: &str = "Goodbye!";
