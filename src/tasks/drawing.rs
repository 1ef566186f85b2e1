//! Free-hand drawing task.
//!
//! The host owns a path canvas. The task listens for a press, switches the
//! canvas to move/release events while the button is down, and echoes every
//! pointer position back as a path command. A `Clear` click empties the
//! canvas; a `Done` click ends the task.
//!
//! Listener state is not validated: a move that arrives without a preceding
//! press is still appended to the path.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::channels::TaskChannel;
use crate::config::DrawingConfig;
use crate::error::{Result, TaskError};
use crate::protocol::{Directive, Element, EventCode, InboundMessage, Message, Options, PathCommand};
use crate::tasks::{Task, TaskOutcome};

/// Field that ends the task.
pub const DONE: &str = "Done";
/// Field that empties the canvas.
pub const CLEAR: &str = "Clear";

/// Counts reported when the task ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawingOutcome {
    /// Presses that started a stroke.
    pub strokes: u32,
    /// Points appended to strokes.
    pub points: u32,
    /// Times the canvas was cleared.
    pub clears: u32,
}

pub struct DrawingTask {
    config: DrawingConfig,
    outcome: DrawingOutcome,
}

impl DrawingTask {
    pub fn new(config: DrawingConfig) -> std::result::Result<Self, TaskError> {
        config.validate()?;
        Ok(Self {
            config,
            outcome: DrawingOutcome::default(),
        })
    }

    /// Canvas listening for presses, plus the Clear and Done buttons.
    pub fn setup(&self) -> Message {
        let canvas = Element::new(self.config.instructions.as_str()).with_options(
            Options::new()
                .path_canvas(
                    self.config.width,
                    self.config.height,
                    self.config.background.as_str(),
                )
                .listen(&[EventCode::MOUSEDOWN]),
        );
        Message::directives([
            Directive::from(canvas),
            Element::new(CLEAR).into(),
            Element::new(DONE).into(),
        ])
    }

    /// The reply to one inbound message, if it calls for one.
    pub fn respond(&mut self, msg: &InboundMessage) -> Option<Message> {
        // Two-element messages carry nothing to react to.
        if msg.value.is_none() {
            return None;
        }
        let canvas = Element::new(self.config.instructions.as_str());

        let element = match msg.pointer() {
            Some((EventCode::MOUSEDOWN, x, y)) => {
                self.outcome.strokes += 1;
                canvas
                    .with_payload(PathCommand::MoveTo {
                        x: x.clone(),
                        y: y.clone(),
                    })
                    .with_options(Options::new().listen(&[EventCode::MOUSEMOVE, EventCode::MOUSEUP]))
            }
            Some((EventCode::MOUSEUP, _, _)) => {
                canvas.with_options(Options::new().listen(&[EventCode::MOUSEDOWN]))
            }
            Some((EventCode::MOUSEMOVE, x, y)) => {
                self.outcome.points += 1;
                canvas.with_payload(PathCommand::LineTo {
                    x: x.clone(),
                    y: y.clone(),
                })
            }
            Some((code, _, _)) => {
                debug!(%code, field = %msg.field, "ignoring pointer event");
                return None;
            }
            None if msg.field == CLEAR => {
                self.outcome.clears += 1;
                canvas
                    .with_payload("")
                    .with_options(Options::new().listen(&[EventCode::MOUSEDOWN]))
            }
            None => return None,
        };
        Some(Message::directives([Directive::from(element)]))
    }

    pub fn outcome(&self) -> DrawingOutcome {
        self.outcome
    }
}

#[async_trait]
impl Task for DrawingTask {
    fn name(&self) -> &'static str {
        "draw"
    }

    async fn run(&mut self, channel: &mut dyn TaskChannel) -> Result<TaskOutcome> {
        channel.send(&self.setup()).await?;

        loop {
            let msg = channel.recv().await?;
            if let Some(reply) = self.respond(&msg) {
                channel.send(&reply).await?;
            }
            if msg.value.is_some() && msg.field == DONE {
                break;
            }
        }

        info!(
            strokes = self.outcome.strokes,
            points = self.outcome.points,
            "drawing finished"
        );
        Ok(TaskOutcome::Drawing(self.outcome))
    }
}
