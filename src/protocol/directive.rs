//! Outbound directives.
//!
//! A directive is one instruction to the host: clear the display, show a
//! line of text, update a named element, or place an item. Directives are
//! built with the constructors here and only turned into JSON when the
//! channel writes them.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Number;

use super::event::EventCode;

/// One outbound instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Directive {
    /// Remove everything currently displayed. Serialized as `null`.
    Clear,
    /// A bare line of text.
    Text(String),
    /// `[target, payload, options]`, trailing parts omitted when absent.
    Element(Element),
    /// `{"id": .., "v": .., ...options}`.
    Item(Item),
}

impl Directive {
    pub fn text(text: impl Into<String>) -> Self {
        Directive::Text(text.into())
    }
}

impl From<Element> for Directive {
    fn from(element: Element) -> Self {
        Directive::Element(element)
    }
}

impl From<Item> for Directive {
    fn from(item: Item) -> Self {
        Directive::Item(item)
    }
}

/// Positional update of a named element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub target: String,
    pub payload: Option<Payload>,
    pub options: Option<Options>,
}

impl Element {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            payload: None,
            options: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(self.payload.is_some()) + usize::from(self.options.is_some());
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.target)?;
        if let Some(payload) = &self.payload {
            seq.serialize_element(payload)?;
        }
        if let Some(options) = &self.options {
            seq.serialize_element(options)?;
        }
        seq.end()
    }
}

/// Keyed item, optionally nested inside another item's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "v", skip_serializing_if = "Option::is_none")]
    pub value: Option<Payload>,
    #[serde(flatten)]
    pub options: Options,
}

impl Item {
    pub fn new(id: impl Into<String>, value: impl Into<Payload>) -> Self {
        Self {
            id: Some(id.into()),
            value: Some(value.into()),
            options: Options::default(),
        }
    }

    /// An item with a value but no id, e.g. an anonymous button row.
    pub fn anonymous(value: impl Into<Payload>) -> Self {
        Self {
            id: None,
            value: Some(value.into()),
            options: Options::default(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

/// Content carried by an element or item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Int(i64),
    Bool(bool),
    Path(PathCommand),
    Shapes(Vec<Shape>),
    Items(Vec<Item>),
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<i64> for Payload {
    fn from(n: i64) -> Self {
        Payload::Int(n)
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Bool(b)
    }
}

impl From<PathCommand> for Payload {
    fn from(cmd: PathCommand) -> Self {
        Payload::Path(cmd)
    }
}

impl From<Vec<Shape>> for Payload {
    fn from(shapes: Vec<Shape>) -> Self {
        Payload::Shapes(shapes)
    }
}

impl From<Vec<Item>> for Payload {
    fn from(items: Vec<Item>) -> Self {
        Payload::Items(items)
    }
}

/// Path drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    /// Start a new stroke: `["M", x, y]`.
    MoveTo { x: Number, y: Number },
    /// Extend the current stroke: `[x, y]`.
    LineTo { x: Number, y: Number },
}

impl Serialize for PathCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PathCommand::MoveTo { x, y } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("M")?;
                seq.serialize_element(x)?;
                seq.serialize_element(y)?;
                seq.end()
            }
            PathCommand::LineTo { x, y } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(x)?;
                seq.serialize_element(y)?;
                seq.end()
            }
        }
    }
}

/// A simple glyph: a `w`x`h` box with fill color `bg`, a line of width `lw`
/// in color `lc`, and a `shape` index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub w: u32,
    pub h: u32,
    pub lw: u32,
    pub bg: u8,
    pub lc: u8,
    pub shape: u8,
}

/// Behavior flags attached to an element or item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Options {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Event codes the element should report.
    #[serde(rename = "e", skip_serializing_if = "Option::is_none")]
    pub listen: Option<Vec<EventCode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    /// Upper bound shown next to a numeric field.
    #[serde(rename = "<=", skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(mut self, codes: &[EventCode]) -> Self {
        self.listen = Some(codes.to_vec());
        self
    }

    /// A path canvas of the given size and background.
    pub fn path_canvas(mut self, w: u32, h: u32, bg: impl Into<String>) -> Self {
        self.kind = Some("path".to_string());
        self.w = Some(w);
        self.h = Some(h);
        self.bg = Some(bg.into());
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    #[test]
    fn element_omits_absent_parts() {
        let bare = Directive::from(Element::new("Clear"));
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!(["Clear"]));

        let opts_only =
            Directive::from(Element::new("Draw").with_options(Options::new().listen(&[EventCode::MOUSEDOWN])));
        assert_eq!(serde_json::to_value(&opts_only).unwrap(), json!(["Draw", {"e": [42]}]));
    }

    #[test]
    fn element_with_path_payload_and_options() {
        let element = Element::new("Draw")
            .with_payload(PathCommand::MoveTo {
                x: Number::from(3),
                y: Number::from(4),
            })
            .with_options(Options::new().listen(&[EventCode::MOUSEMOVE, EventCode::MOUSEUP]));
        assert_eq!(
            serde_json::to_value(&element).unwrap(),
            json!(["Draw", ["M", 3, 4], {"e": [44, 43]}])
        );
    }

    #[test]
    fn clear_and_text_directives() {
        assert_eq!(serde_json::to_value(Directive::Clear).unwrap(), Value::Null);
        assert_eq!(
            serde_json::to_value(Directive::text("bye")).unwrap(),
            json!("bye")
        );
    }

    #[test]
    fn item_flattens_options() {
        let item = Item::new("Trial", 3_i64).with_options(Options::new().max(32));
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"id": "Trial", "v": 3, "<=": 32})
        );
    }

    #[test]
    fn anonymous_item_of_buttons() {
        let row = Item::anonymous(vec![Item::new("A", false), Item::new("B", false)]);
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"v": [{"id": "A", "v": false}, {"id": "B", "v": false}]})
        );
    }

    #[test]
    fn canvas_options() {
        let opts = Options::new()
            .path_canvas(400, 300, "white")
            .listen(&[EventCode::MOUSEDOWN]);
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"type": "path", "e": [42], "w": 400, "h": 300, "bg": "white"})
        );
    }

    #[test]
    fn shape_payload() {
        let shape = Shape {
            w: 40,
            h: 40,
            lw: 10,
            bg: 1,
            lc: 2,
            shape: 0,
        };
        let item = Item::new("stim", vec![shape]);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"id": "stim", "v": [{"w": 40, "h": 40, "lw": 10, "bg": 1, "lc": 2, "shape": 0}]})
        );
    }
}
