//! Message types exchanged with the presentation host.

pub mod directive;
pub mod event;
pub mod message;

pub use directive::{Directive, Element, Item, Options, PathCommand, Payload, Shape};
pub use event::{Event, EventCode, InboundMessage};
pub use message::Message;
