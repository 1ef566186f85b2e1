//! Outbound messages: one JSON line per [`Message`].

use serde::Serialize;
use serde_json::{Map, Value};

use super::directive::Directive;

/// One line sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// Title-bar/state fields and host control keys, as a JSON object.
    Fields(Map<String, Value>),
    /// Display directives, as a JSON array.
    Directives(Vec<Directive>),
}

impl Message {
    /// A field update with a single entry.
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Message::Fields(Map::new()).with_field(name, value)
    }

    /// Add another entry to a field update. Has no effect on a directive list.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Message::Fields(fields) = &mut self {
            fields.insert(name.into(), value.into());
        }
        self
    }

    pub fn directives(directives: impl IntoIterator<Item = Directive>) -> Self {
        Message::Directives(directives.into_iter().collect())
    }

    /// Show `value` in the host's popup; `Value::Null` closes it.
    pub fn popup(value: impl Into<Value>) -> Self {
        Message::field("_pp", value)
    }

    /// Ask the host to answer the next read once its clock reaches `end_ms`.
    pub fn resume_at(end_ms: f64) -> Self {
        Message::field("_S", json_number(end_ms)).with_field("_R", 0)
    }

    /// Ask the host to answer the next read after `seconds` have passed.
    pub fn pause_for(seconds: f64) -> Self {
        Message::field("T", json_number(seconds)).with_field("R", Value::Array(Vec::new()))
    }
}

/// Whole values are written as integers so host timestamps round-trip as
/// they arrived.
pub fn json_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn field_update_is_an_object() {
        let msg = Message::field("Trial", 3).with_field("Score", 1);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"Trial": 3, "Score": 1})
        );
    }

    #[test]
    fn directive_list_is_an_array() {
        let msg = Message::directives([Directive::Clear, Directive::text("hi")]);
        assert_eq!(serde_json::to_value(&msg).unwrap(), json!([null, "hi"]));
    }

    #[test]
    fn with_field_ignores_directive_lists() {
        let msg = Message::directives([Directive::Clear]).with_field("x", 1);
        assert_eq!(serde_json::to_value(&msg).unwrap(), json!([null]));
    }

    #[test]
    fn popup_open_and_close() {
        assert_eq!(
            serde_json::to_value(Message::popup(json!({"Reward": 1}))).unwrap(),
            json!({"_pp": {"Reward": 1}})
        );
        assert_eq!(
            serde_json::to_value(Message::popup(Value::Null)).unwrap(),
            json!({"_pp": null})
        );
    }

    #[test]
    fn resume_at_keeps_integer_timestamps() {
        assert_eq!(
            serde_json::to_value(Message::resume_at(1500.0)).unwrap(),
            json!({"_S": 1500, "_R": 0})
        );
        assert_eq!(
            serde_json::to_value(Message::resume_at(1500.25)).unwrap(),
            json!({"_S": 1500.25, "_R": 0})
        );
    }

    #[test]
    fn pause_for_seconds() {
        assert_eq!(
            serde_json::to_value(Message::pause_for(0.5)).unwrap(),
            json!({"T": 0.5, "R": []})
        );
    }
}
