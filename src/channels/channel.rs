//! The task side of the host channel.

use async_trait::async_trait;

use crate::error::ChannelError;
use crate::protocol::{InboundMessage, Message};

/// A strictly alternating request/response link to the host.
///
/// Tasks write one or more messages, then block on a single `recv`. The read
/// is the only suspension point; there is no timeout and no reconnection.
#[async_trait]
pub trait TaskChannel: Send {
    /// Channel name for logging.
    fn name(&self) -> &str;

    /// Write one message as a single JSON line and flush it.
    async fn send(&mut self, message: &Message) -> Result<(), ChannelError>;

    /// Wait for the next inbound line and decode it.
    ///
    /// Returns [`ChannelError::Closed`] when the host closes its end.
    async fn recv(&mut self) -> Result<InboundMessage, ChannelError>;
}

/// Collapse whitespace and cut `line` to `max_chars` characters for logs.
pub fn truncate_for_preview(line: &str, max_chars: usize) -> String {
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    // char_indices gives byte offsets at char boundaries, so the slice is valid UTF-8.
    match collapsed.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => format!("{}...", &collapsed[..byte_offset]),
        None => collapsed,
    }
}
