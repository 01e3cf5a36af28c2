//! Rich-text document model.
//!
//! Notes store their body as editor JSON: a `doc` node holding block nodes,
//! which hold inline `text` nodes carrying marks. Parsing is lenient on
//! purpose. Any valid JSON turns into a [`Document`], and node or mark kinds
//! this model does not know are kept as `Unknown` so the renderer can skip
//! them instead of rejecting content written by a newer editor.

mod json;
mod render;
mod validate;

pub use render::{
    render_content, render_document, Element, HeadingStyle, Rendered, Rendition, Tag,
    EMPTY_MESSAGE, UNRENDERABLE_MESSAGE,
};
pub(crate) use json::parse_json;
pub(crate) use render::escape_html;
pub use validate::{
    validate_content_json, validate_title, ContentError, TitleError, MAX_CONTENT_SIZE,
    MAX_TITLE_LENGTH,
};

use serde_json::{json, Map, Value};

use json::{STACK_RED_ZONE, STACK_SEGMENT};

/// Deepest node kept when reading a document; anything below is dropped.
pub const MAX_NESTING_DEPTH: usize = 1024;

/// Root of a note's content tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub content: Vec<ContentNode>,
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Doc { content: Vec<ContentNode> },
    Paragraph { content: Vec<ContentNode> },
    Heading { level: i64, content: Vec<ContentNode> },
    BulletList { content: Vec<ContentNode> },
    OrderedList { content: Vec<ContentNode> },
    ListItem { content: Vec<ContentNode> },
    CodeBlock { content: Vec<ContentNode> },
    Blockquote { content: Vec<ContentNode> },
    HorizontalRule,
    Text { text: String, marks: Vec<Mark> },
    /// A node kind this model does not know, kept verbatim.
    Unknown(Value),
}

/// Inline formatting applied to a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Code,
    Unknown(String),
}

impl Document {
    pub fn new(content: Vec<ContentNode>) -> Self {
        Self { content }
    }

    /// Build a document from an already parsed JSON value.
    ///
    /// Never fails: a value without a usable `content` array yields an empty
    /// document.
    pub fn from_value(value: &Value) -> Self {
        Self {
            content: children_of(value, 0),
        }
    }

    /// Build a document with one paragraph per non-blank line.
    pub fn from_plain_text(text: &str) -> Self {
        let content = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(|line| ContentNode::paragraph(vec![ContentNode::text(line)]))
            .collect();
        Self { content }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Serialize back to editor JSON.
    pub fn to_value(&self) -> Value {
        json!({
            "type": "doc",
            "content": self.content.iter().map(ContentNode::to_value).collect::<Vec<_>>(),
        })
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl ContentNode {
    pub fn paragraph(content: Vec<ContentNode>) -> Self {
        Self::Paragraph { content }
    }

    pub fn heading(level: i64, content: Vec<ContentNode>) -> Self {
        Self::Heading { level, content }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self::Text {
            text: text.into(),
            marks,
        }
    }

    /// Parse one node. Anything that is not an object with a known `type`
    /// becomes `Unknown`.
    pub fn from_value(value: &Value) -> Self {
        Self::from_value_at(value, 0)
    }

    fn from_value_at(value: &Value, depth: usize) -> Self {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            Self::parse_node(value, depth)
        })
    }

    fn parse_node(value: &Value, depth: usize) -> Self {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or("");
        match kind {
            "doc" => Self::Doc {
                content: children_of(value, depth),
            },
            "paragraph" => Self::Paragraph {
                content: children_of(value, depth),
            },
            "heading" => Self::Heading {
                level: heading_level(value),
                content: children_of(value, depth),
            },
            "bulletList" => Self::BulletList {
                content: children_of(value, depth),
            },
            "orderedList" => Self::OrderedList {
                content: children_of(value, depth),
            },
            "listItem" => Self::ListItem {
                content: children_of(value, depth),
            },
            "codeBlock" => Self::CodeBlock {
                content: children_of(value, depth),
            },
            "blockquote" => Self::Blockquote {
                content: children_of(value, depth),
            },
            "horizontalRule" => Self::HorizontalRule,
            "text" => Self::Text {
                text: value
                    .get("text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                marks: value
                    .get("marks")
                    .and_then(Value::as_array)
                    .map(|marks| marks.iter().map(Mark::from_value).collect())
                    .unwrap_or_default(),
            },
            _ => Self::Unknown(unknown_raw(value)),
        }
    }

    /// The editor's name for this node kind.
    pub fn kind(&self) -> &str {
        match self {
            Self::Doc { .. } => "doc",
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::BulletList { .. } => "bulletList",
            Self::OrderedList { .. } => "orderedList",
            Self::ListItem { .. } => "listItem",
            Self::CodeBlock { .. } => "codeBlock",
            Self::Blockquote { .. } => "blockquote",
            Self::HorizontalRule => "horizontalRule",
            Self::Text { .. } => "text",
            Self::Unknown(raw) => raw.get("type").and_then(Value::as_str).unwrap_or("unknown"),
        }
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[ContentNode] {
        match self {
            Self::Doc { content }
            | Self::Paragraph { content }
            | Self::Heading { content, .. }
            | Self::BulletList { content }
            | Self::OrderedList { content }
            | Self::ListItem { content }
            | Self::CodeBlock { content }
            | Self::Blockquote { content } => content,
            Self::HorizontalRule | Self::Text { .. } | Self::Unknown(_) => &[],
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Heading { level, content } => json!({
                "type": "heading",
                "attrs": { "level": level },
                "content": content.iter().map(Self::to_value).collect::<Vec<_>>(),
            }),
            Self::HorizontalRule => json!({ "type": "horizontalRule" }),
            Self::Text { text, marks } => {
                let mut node = Map::new();
                node.insert("type".into(), json!("text"));
                node.insert("text".into(), json!(text));
                if !marks.is_empty() {
                    node.insert(
                        "marks".into(),
                        Value::Array(marks.iter().map(Mark::to_value).collect()),
                    );
                }
                Value::Object(node)
            }
            Self::Unknown(raw) => raw.clone(),
            _ => json!({
                "type": self.kind(),
                "content": self.children().iter().map(Self::to_value).collect::<Vec<_>>(),
            }),
        }
    }
}

impl Mark {
    pub fn from_value(value: &Value) -> Self {
        match value.get("type").and_then(Value::as_str).unwrap_or("") {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "code" => Self::Code,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Code => "code",
            Self::Unknown(name) => name,
        }
    }

    pub fn to_value(&self) -> Value {
        json!({ "type": self.name() })
    }
}

/// The raw value kept for an unknown node. Values nested past the cap keep
/// only their `type`.
fn unknown_raw(value: &Value) -> Value {
    if !nests_deeper_than(value, MAX_NESTING_DEPTH) {
        return value.clone();
    }
    match value.get("type").and_then(Value::as_str) {
        Some(kind) => json!({ "type": kind }),
        None => Value::Null,
    }
}

fn nests_deeper_than(value: &Value, limit: usize) -> bool {
    let mut pending = vec![(value, 0)];
    while let Some((value, depth)) = pending.pop() {
        if depth > limit {
            return true;
        }
        match value {
            Value::Array(items) => pending.extend(items.iter().map(|v| (v, depth + 1))),
            Value::Object(fields) => pending.extend(fields.values().map(|v| (v, depth + 1))),
            _ => {}
        }
    }
    false
}

/// Children of the node at `depth`; none once the nesting cap is reached.
fn children_of(value: &Value, depth: usize) -> Vec<ContentNode> {
    if depth >= MAX_NESTING_DEPTH {
        return Vec::new();
    }
    value
        .get("content")
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .map(|node| ContentNode::from_value_at(node, depth + 1))
                .collect()
        })
        .unwrap_or_default()
}

/// `attrs.level`, defaulting to 1 when absent, zero or not a number.
/// Fractional levels are truncated.
fn heading_level(value: &Value) -> i64 {
    let level = value.get("attrs").and_then(|attrs| attrs.get("level"));
    level
        .and_then(Value::as_i64)
        .or_else(|| level.and_then(Value::as_f64).map(|level| level.trunc() as i64))
        .filter(|level| *level != 0)
        .unwrap_or(1)
}
