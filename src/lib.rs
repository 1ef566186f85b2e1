//! STAP tasks: stimulus-response experiments driven over JSON lines.

pub mod channels;
pub mod cli;
pub mod config;
pub mod error;
pub mod protocol;
pub mod tasks;
