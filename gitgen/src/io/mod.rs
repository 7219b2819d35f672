//! I/O adapters used by the generation pipeline and the CLI.

pub mod config;
pub mod debug_log;
pub mod git;
pub mod invoker;
pub mod process;
