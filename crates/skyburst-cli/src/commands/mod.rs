//! CLI command implementations

pub mod init;
pub mod play;
pub mod shells;
pub mod simulate;
pub mod snapshot;
