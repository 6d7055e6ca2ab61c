//! CLI command implementations.

pub mod actions;
pub mod check;
pub mod init;
pub mod render;
