//! Pure, deterministic pipeline logic. Nothing in here touches the filesystem or spawns processes.

pub mod defence;
pub mod extract;
pub mod message;
pub mod parser;
pub mod prompt;
pub mod types;
