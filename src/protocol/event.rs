//! Inbound event decoding.
//!
//! The host reports every interaction as `[timestamp_ms, field, value]`,
//! where `value` is either a plain JSON value (a button label, a text entry)
//! or a pointer triple `[code, x, y]`. The shape is decoded once here so the
//! tasks only ever match on [`Event`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::ChannelError;

/// Integer tag identifying a pointer interaction.
///
/// Unknown codes are carried through unchanged; tasks ignore the ones they
/// do not listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCode(pub i64);

impl EventCode {
    pub const MOUSEDOWN: EventCode = EventCode(42);
    pub const MOUSEUP: EventCode = EventCode(43);
    pub const MOUSEMOVE: EventCode = EventCode(44);
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MOUSEDOWN => write!(f, "mousedown"),
            Self::MOUSEUP => write!(f, "mouseup"),
            Self::MOUSEMOVE => write!(f, "mousemove"),
            EventCode(code) => write!(f, "event({code})"),
        }
    }
}

/// The value half of an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Any non-pointer value, e.g. the label of a clicked button.
    Scalar(Value),
    /// A pointer event. Coordinates keep the host's JSON number so they can
    /// be echoed back exactly.
    Pointer { code: EventCode, x: Number, y: Number },
}

impl Event {
    /// Decode a raw value. A 3-element array of numbers whose first element
    /// is an integer is a pointer event; everything else is a scalar.
    pub fn from_value(value: Value) -> Self {
        if let Value::Array(items) = &value {
            if let [Value::Number(code), Value::Number(x), Value::Number(y)] = items.as_slice() {
                if let Some(code) = code.as_i64() {
                    return Event::Pointer {
                        code: EventCode(code),
                        x: x.clone(),
                        y: y.clone(),
                    };
                }
            }
        }
        Event::Scalar(value)
    }

    /// Whether a scalar value names `label`: a string containing it, or an
    /// array holding it as one of its elements.
    pub fn mentions(&self, label: &str) -> bool {
        match self {
            Event::Scalar(Value::String(s)) => s.contains(label),
            Event::Scalar(Value::Array(items)) => {
                items.iter().any(|item| item.as_str() == Some(label))
            }
            _ => false,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Event::Pointer { .. })
    }
}

/// One decoded line from the host.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Host clock at the time of the event, in milliseconds.
    pub timestamp_ms: f64,
    /// Name of the element (or title-bar field) the event came from.
    pub field: String,
    /// Absent for 2-element messages.
    pub value: Option<Event>,
}

impl InboundMessage {
    pub fn new(timestamp_ms: f64, field: impl Into<String>, value: Option<Event>) -> Self {
        Self {
            timestamp_ms,
            field: field.into(),
            value,
        }
    }

    /// Decode a parsed JSON line.
    pub fn from_value(value: Value) -> Result<Self, ChannelError> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(ChannelError::InvalidMessage(format!(
                    "expected a 2 or 3 element array, got {}",
                    kind_of(&other)
                )));
            }
        };

        let len = items.len();
        let mut items = items.into_iter();
        let (Some(timestamp), Some(field), value, None) =
            (items.next(), items.next(), items.next(), items.next())
        else {
            return Err(ChannelError::InvalidMessage(format!(
                "expected a 2 or 3 element array, got {len} elements"
            )));
        };

        let timestamp_ms = match timestamp {
            Value::Number(n) => n.as_f64().ok_or_else(|| {
                ChannelError::InvalidMessage(format!("timestamp {n} is out of range"))
            })?,
            other => {
                return Err(ChannelError::InvalidMessage(format!(
                    "timestamp must be a number, got {}",
                    kind_of(&other)
                )));
            }
        };
        let field = match field {
            Value::String(s) => s,
            other => {
                return Err(ChannelError::InvalidMessage(format!(
                    "field name must be a string, got {}",
                    kind_of(&other)
                )));
            }
        };
        let value = value.map(Event::from_value);

        Ok(Self {
            timestamp_ms,
            field,
            value,
        })
    }

    /// The pointer triple carried by this message, if any.
    pub fn pointer(&self) -> Option<(EventCode, &Number, &Number)> {
        match &self.value {
            Some(Event::Pointer { code, x, y }) => Some((*code, x, y)),
            _ => None,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
