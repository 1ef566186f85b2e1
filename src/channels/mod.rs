//! Channel abstraction for host I/O.

pub mod channel;
pub mod jsonl;

pub use channel::*;
pub use jsonl::{JsonlChannel, StdioChannel};
