//! Task programs driven over a [`TaskChannel`].
//!
//! Every task follows the same loop: announce itself to the host once, then
//! alternate between sending a batch of messages and blocking on one read
//! until its end condition. Session-wide randomization happens once, before
//! the first message, and is never touched again.

pub mod bandit;
pub mod categorization;
pub mod drawing;

use async_trait::async_trait;

use crate::channels::TaskChannel;
use crate::error::Result;

pub use bandit::{BanditOutcome, BanditSession, BanditTask};
pub use categorization::{CategorizationSession, CategorizationTask, RuleType, Stimulus, Summary};
pub use drawing::{DrawingOutcome, DrawingTask};

/// A runnable task.
#[async_trait]
pub trait Task: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run the task to completion over `channel`.
    ///
    /// Any channel failure (closed stream, malformed line, unexpected shape)
    /// ends the run with an error; there is no recovery.
    async fn run(&mut self, channel: &mut dyn TaskChannel) -> Result<TaskOutcome>;
}

/// What a finished task reports back to the binary.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Drawing(DrawingOutcome),
    Bandit(BanditOutcome),
    Categorization(Summary),
}
