//! JSON-lines framing over any async byte stream.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tracing::debug;

use crate::channels::channel::{TaskChannel, truncate_for_preview};
use crate::error::ChannelError;
use crate::protocol::{InboundMessage, Message};

/// Maximum characters of a line echoed into debug logs.
const LOG_PREVIEW_CHARS: usize = 200;

/// The channel a task uses when launched by the host: stdin in, stdout out.
pub type StdioChannel = JsonlChannel<BufReader<Stdin>, Stdout>;

/// One JSON value per line in each direction.
pub struct JsonlChannel<R, W> {
    name: String,
    reader: R,
    writer: W,
    /// Reused between reads.
    line: String,
}

impl StdioChannel {
    pub fn stdio() -> Self {
        JsonlChannel::new("stdio", BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> JsonlChannel<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(name: impl Into<String>, reader: R, writer: W) -> Self {
        Self {
            name: name.into(),
            reader,
            writer,
            line: String::with_capacity(256),
        }
    }

    /// Take the channel apart, e.g. to inspect what a test task wrote.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

#[async_trait]
impl<R, W> TaskChannel for JsonlChannel<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&mut self, message: &Message) -> Result<(), ChannelError> {
        let mut line = serde_json::to_string(message).map_err(ChannelError::Serialize)?;
        debug!(
            channel = %self.name,
            line = %truncate_for_preview(&line, LOG_PREVIEW_CHARS),
            "-> host"
        );
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<InboundMessage, ChannelError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line).await? == 0 {
                debug!(channel = %self.name, "host closed the channel");
                return Err(ChannelError::Closed);
            }

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(
                channel = %self.name,
                line = %truncate_for_preview(trimmed, LOG_PREVIEW_CHARS),
                "<- host"
            );

            let value: serde_json::Value =
                serde_json::from_str(trimmed).map_err(ChannelError::Malformed)?;
            return InboundMessage::from_value(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Directive, Event};
    use serde_json::json;

    fn channel(input: &'static str) -> JsonlChannel<&'static [u8], Vec<u8>> {
        JsonlChannel::new("test", input.as_bytes(), Vec::new())
    }

    #[tokio::test]
    async fn send_writes_one_line_per_message() {
        let mut ch = channel("");
        ch.send(&Message::field("Trial", 1)).await.unwrap();
        ch.send(&Message::directives([Directive::Clear])).await.unwrap();

        let (_, out) = ch.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "{\"Trial\":1}\n[null]\n");
    }

    #[tokio::test]
    async fn recv_decodes_lines_in_order() {
        let mut ch = channel("[1,\"Draw\",[42,5,6]]\n\n  \n[2,\"Done\",true]\n");

        let first = ch.recv().await.unwrap();
        assert_eq!(first.field, "Draw");
        assert!(first.pointer().is_some());

        let second = ch.recv().await.unwrap();
        assert_eq!(second.field, "Done");
        assert_eq!(second.value, Some(Event::Scalar(json!(true))));
    }

    #[tokio::test]
    async fn recv_reports_closed_at_eof() {
        let mut ch = channel("[1,\"Done\"]\n");
        ch.recv().await.unwrap();
        assert!(matches!(ch.recv().await, Err(ChannelError::Closed)));
    }

    #[tokio::test]
    async fn recv_rejects_invalid_json() {
        let mut ch = channel("not json\n");
        assert!(matches!(ch.recv().await, Err(ChannelError::Malformed(_))));
    }

    #[tokio::test]
    async fn recv_rejects_wrong_shape() {
        let mut ch = channel("{\"a\":1}\n");
        assert!(matches!(ch.recv().await, Err(ChannelError::InvalidMessage(_))));
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let mut ch = channel("[3,\"Clear\",\"\"]");
        assert_eq!(ch.recv().await.unwrap().field, "Clear");
    }
}
