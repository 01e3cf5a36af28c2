//! Document rendering.
//!
//! Turns a stored document into a presentational tree and serializes that tree
//! to HTML. Rendering is total: malformed input becomes a placeholder, never an
//! error.

use serde::Serialize;

use super::json::{parse_json, STACK_RED_ZONE, STACK_SEGMENT};
use super::{ContentNode, Document, Mark};

pub const UNRENDERABLE_MESSAGE: &str = "Unable to render note content.";
pub const EMPTY_MESSAGE: &str = "This note is empty.";

/// Output of the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "nodes", rename_all = "snake_case")]
pub enum Rendition {
    /// The content was not valid JSON.
    Unrenderable,
    /// The document has no block content.
    Empty,
    /// Rendered block elements, in document order.
    Tree(Vec<Rendered>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rendered {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: Tag,
    /// `"{kind}-{index}"`, unique among siblings only.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Rendered>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    P,
    H1,
    H2,
    H3,
    Ul,
    Ol,
    Li,
    Pre,
    Code,
    Hr,
    Blockquote,
    Span,
    Strong,
    Em,
}

/// Presentational heading style. Levels outside 1..=3 share `Minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingStyle {
    H1,
    H2,
    H3,
    Minor,
}

impl HeadingStyle {
    pub fn from_level(level: i64) -> Self {
        match level {
            1 => Self::H1,
            2 => Self::H2,
            3 => Self::H3,
            _ => Self::Minor,
        }
    }

    /// Level 1 and 2 keep their own tag; everything else renders as `h3`.
    pub fn tag(self) -> Tag {
        match self {
            Self::H1 => Tag::H1,
            Self::H2 => Tag::H2,
            Self::H3 | Self::Minor => Tag::H3,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::H1 => "heading-1",
            Self::H2 => "heading-2",
            Self::H3 => "heading-3",
            Self::Minor => "heading-minor",
        }
    }
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Self::P => "p",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::Ul => "ul",
            Self::Ol => "ol",
            Self::Li => "li",
            Self::Pre => "pre",
            Self::Code => "code",
            Self::Hr => "hr",
            Self::Blockquote => "blockquote",
            Self::Span => "span",
            Self::Strong => "strong",
            Self::Em => "em",
        }
    }

    fn is_void(self) -> bool {
        matches!(self, Self::Hr)
    }
}

impl Element {
    fn new(tag: Tag, key: impl Into<String>, children: Vec<Rendered>) -> Self {
        Self {
            tag,
            key: key.into(),
            class: None,
            children,
        }
    }

    fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Rendered {
    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Element(el) => el.children.iter().map(Self::text_content).collect(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            Self::Text(_) => None,
        }
    }
}

/// Render serialized document JSON.
pub fn render_content(content: &str) -> Rendition {
    match parse_json(content) {
        Ok(value) => render_document(&Document::from_value(&value)),
        Err(e) => {
            tracing::debug!(error = %e, "note content is not valid JSON");
            Rendition::Unrenderable
        }
    }
}

pub fn render_document(doc: &Document) -> Rendition {
    if doc.is_empty() {
        return Rendition::Empty;
    }
    Rendition::Tree(render_children(&doc.content))
}

fn render_children(nodes: &[ContentNode]) -> Vec<Rendered> {
    nodes
        .iter()
        .enumerate()
        .filter_map(|(i, node)| render_node(node, i))
        .collect()
}

fn render_node(node: &ContentNode, index: usize) -> Option<Rendered> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || render_element(node, index))
}

fn render_element(node: &ContentNode, index: usize) -> Option<Rendered> {
    let key = format!("{}-{}", node.kind(), index);

    let element = match node {
        ContentNode::Text { text, marks } => {
            Element::new(Tag::Span, key, vec![render_marks(text, marks)])
        }
        ContentNode::Paragraph { content } => Element::new(Tag::P, key, render_children(content)),
        ContentNode::Heading { level, content } => {
            let style = HeadingStyle::from_level(*level);
            Element::new(style.tag(), key, render_children(content)).with_class(style.class())
        }
        ContentNode::BulletList { content } => Element::new(Tag::Ul, key, render_children(content)),
        ContentNode::OrderedList { content } => {
            Element::new(Tag::Ol, key, render_children(content))
        }
        ContentNode::ListItem { content } => {
            Element::new(Tag::Li, key, render_list_item_children(content))
        }
        ContentNode::CodeBlock { content } => {
            let code = Element::new(Tag::Code, "code", vec![Rendered::Text(code_text(content))]);
            Element::new(Tag::Pre, key, vec![Rendered::Element(code)])
        }
        ContentNode::HorizontalRule => Element::new(Tag::Hr, key, Vec::new()),
        ContentNode::Blockquote { content } => {
            Element::new(Tag::Blockquote, key, render_children(content))
        }
        ContentNode::Doc { .. } | ContentNode::Unknown(_) => return None,
    };

    Some(Rendered::Element(element))
}

/// Paragraph children of a list item are inlined: the paragraph wrapper is
/// dropped and its own children render in its place.
fn render_list_item_children(content: &[ContentNode]) -> Vec<Rendered> {
    let mut rendered = Vec::new();
    for (i, child) in content.iter().enumerate() {
        match child {
            ContentNode::Paragraph { content: inner } => {
                rendered.extend(render_children(inner));
            }
            other => rendered.extend(render_node(other, i)),
        }
    }
    rendered
}

/// Each mark wraps the result so far, so the last mark ends up outermost.
fn render_marks(text: &str, marks: &[Mark]) -> Rendered {
    marks
        .iter()
        .fold(Rendered::Text(text.to_string()), |inner, mark| match mark {
            Mark::Bold => Rendered::Element(Element::new(Tag::Strong, "bold", vec![inner])),
            Mark::Italic => Rendered::Element(Element::new(Tag::Em, "italic", vec![inner])),
            Mark::Code => Rendered::Element(
                Element::new(Tag::Code, "code", vec![inner]).with_class("inline-code"),
            ),
            Mark::Unknown(_) => inner,
        })
}

fn code_text(content: &[ContentNode]) -> String {
    content
        .iter()
        .filter_map(|node| match node {
            ContentNode::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

impl Rendition {
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree(_))
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Unrenderable => format!("<p class=\"note-placeholder\">{}</p>", UNRENDERABLE_MESSAGE),
            Self::Empty => format!(
                "<p class=\"note-placeholder note-empty\">{}</p>",
                EMPTY_MESSAGE
            ),
            Self::Tree(nodes) => {
                let mut out = String::from("<div class=\"note-content\">");
                for node in nodes {
                    write_html(node, &mut out);
                }
                out.push_str("</div>");
                out
            }
        }
    }
}

fn write_html(node: &Rendered, out: &mut String) {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || write_node_html(node, out))
}

fn write_node_html(node: &Rendered, out: &mut String) {
    match node {
        Rendered::Text(text) => out.push_str(&escape_html(text)),
        Rendered::Element(el) => {
            out.push('<');
            out.push_str(el.tag.name());
            if let Some(class) = el.class {
                out.push_str(" class=\"");
                out.push_str(class);
                out.push('"');
            }
            out.push('>');
            if el.tag.is_void() {
                return;
            }
            for child in &el.children {
                write_html(child, out);
            }
            out.push_str("</");
            out.push_str(el.tag.name());
            out.push('>');
        }
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
