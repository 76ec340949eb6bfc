//! A minimal content tree the reveal effect operates on.
//!
//! This stands in for a document element: it holds text, nested inline elements, line breaks,
//! and, once the text has been split, the per character units the effect animates.

use crate::reveal::unit::{CharacterUnit, Unit};
use tl::{NodeHandle, Parser, ParserOptions};

const LINE_BREAK_TAG: &str = "br";

/// Tags that never have any content.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "wbr"];

/// A node in a content tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
    Comment(String),
    Unit(Unit),
}

impl Node {
    /// The text this node displays, ignoring any markup.
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Element(element) => element.text_content(),
            Self::Comment(_) => String::new(),
            Self::Unit(Unit::Char(unit)) => unit.ch().to_string(),
            Self::Unit(Unit::Spacer(_)) => " ".into(),
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An element with a tag and children.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: String,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new<S: Into<String>>(tag: S, children: Vec<Node>) -> Self {
        Self { tag: tag.into(), children }
    }

    /// Construct a `<br>` element.
    pub fn line_break() -> Self {
        Self::new(LINE_BREAK_TAG, Vec::new())
    }

    pub fn is_line_break(&self) -> bool {
        self.tag.eq_ignore_ascii_case(LINE_BREAK_TAG)
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }
}

/// How whitespace within an element is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WhiteSpace {
    /// Whitespace runs are collapsed.
    #[default]
    Normal,

    /// Whitespace is kept exactly as authored.
    Pre,
}

/// The element whose text gets revealed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostElement {
    children: Vec<Node>,
    white_space: WhiteSpace,
}

impl HostElement {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children, white_space: WhiteSpace::default() }
    }

    /// Construct an element containing a single text node.
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Self::new(vec![Node::Text(text.into())])
    }

    /// Parse inline markup, e.g. `Hello <b>world</b><br>again`, into an element.
    pub fn from_markup(input: &str) -> Result<Self, MarkupError> {
        let input = separate_self_closing(input);
        let dom = tl::parse(&input, ParserOptions::default()).map_err(|e| MarkupError(format!("{e:?}")))?;
        let parser = dom.parser();
        let mut children = Vec::new();
        convert_nodes(dom.children(), parser, &mut children);
        Ok(Self::new(children))
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Remove and return all of this element's children.
    pub(crate) fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn append(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn white_space(&self) -> WhiteSpace {
        self.white_space
    }

    pub(crate) fn set_white_space(&mut self, white_space: WhiteSpace) {
        self.white_space = white_space;
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Get the character unit at the given child position, if that child is one.
    pub(crate) fn character_unit_mut(&mut self, index: usize) -> Option<&mut CharacterUnit> {
        match self.children.get_mut(index) {
            Some(Node::Unit(Unit::Char(unit))) => Some(unit),
            _ => None,
        }
    }

    pub(crate) fn character_units_mut(&mut self) -> impl Iterator<Item = &mut CharacterUnit> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Unit(Unit::Char(unit)) => Some(unit),
            _ => None,
        })
    }

    /// Iterate over all character units, in reading order.
    pub fn character_units(&self) -> impl Iterator<Item = &CharacterUnit> {
        self.children.iter().filter_map(|node| match node {
            Node::Unit(Unit::Char(unit)) => Some(unit),
            _ => None,
        })
    }
}

// The parser reads `<br/>` as a tag named `br/` which then swallows everything after it, while
// `<br />` is understood as self closing.
fn separate_self_closing(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_tag = false;
    let mut previous: Option<char> = None;
    while let Some(c) = chars.next() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            '/' if in_tag && chars.peek() == Some(&'>') => {
                if previous.is_some_and(|p| p != '<' && !p.is_whitespace()) {
                    output.push(' ');
                }
            }
            _ => (),
        };
        output.push(c);
        previous = Some(c);
    }
    output
}

fn convert_nodes(handles: &[NodeHandle], parser: &Parser, output: &mut Vec<Node>) {
    for handle in handles {
        let Some(node) = handle.get(parser) else {
            continue;
        };
        match node {
            tl::Node::Tag(tag) => {
                let name = tag.name().as_utf8_str().to_lowercase();
                let mut children = Vec::new();
                convert_nodes(tag.children().top().as_slice(), parser, &mut children);
                if VOID_TAGS.contains(&name.as_str()) {
                    // Anything the parser nested inside a void tag actually follows it.
                    output.push(Node::Element(Element::new(name, Vec::new())));
                    output.extend(children);
                } else {
                    output.push(Node::Element(Element::new(name, children)));
                }
            }
            tl::Node::Raw(text) => output.push(Node::Text(decode_entities(&text.as_utf8_str()))),
            tl::Node::Comment(text) => output.push(Node::Comment(text.as_utf8_str().into_owned())),
        }
    }
}

fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Markup could not be parsed.
#[derive(thiserror::Error, Debug)]
#[error("invalid markup: {0}")]
pub struct MarkupError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parse_plain_text() {
        let element = HostElement::from_markup("hello there").expect("parse failed");
        assert_eq!(element.children(), &[Node::from("hello there")]);
    }

    #[test]
    fn parse_nested_markup() {
        let element = HostElement::from_markup("Hi <b>big</b><br/>world").expect("parse failed");
        let expected = vec![
            Node::from("Hi "),
            Element::new("b", vec![Node::from("big")]).into(),
            Element::new("br", vec![]).into(),
            Node::from("world"),
        ];
        assert_eq!(element.children(), expected);
    }

    #[rstest]
    #[case::void("a<br>b")]
    #[case::self_closing("a<br/>b")]
    #[case::spaced_self_closing("a<br />b")]
    #[case::upper_case("a<BR>b")]
    fn parse_line_breaks(#[case] input: &str) {
        let element = HostElement::from_markup(input).expect("parse failed");
        let expected = vec![Node::from("a"), Element::line_break().into(), Node::from("b")];
        assert_eq!(element.children(), expected);
    }

    #[test]
    fn line_break_inside_element() {
        let element = HostElement::from_markup("<b>one<br/>two</b> three").expect("parse failed");
        let expected = vec![
            Element::new("b", vec![Node::from("one"), Element::line_break().into(), Node::from("two")]).into(),
            Node::from(" three"),
        ];
        assert_eq!(element.children(), expected);
    }

    #[rstest]
    #[case::line_break("a<br/>b", "a<br />b")]
    #[case::already_spaced("a<br />b", "a<br />b")]
    #[case::closing_tag("<b>x</b>", "<b>x</b>")]
    #[case::outside_tags("1/>2", "1/>2")]
    fn self_closing_tags_are_separated(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(separate_self_closing(input), expected);
    }

    #[rstest]
    #[case::ampersand("a &amp; b", "a & b")]
    #[case::angle_brackets("&lt;tag&gt;", "<tag>")]
    #[case::numeric("caf&#233;", "café")]
    #[case::plain("no entities", "no entities")]
    fn parse_decodes_entities(#[case] input: &str, #[case] expected: &str) {
        let element = HostElement::from_markup(input).expect("parse failed");
        assert_eq!(element.text_content(), expected);
    }

    #[test]
    fn line_break_matches_any_case() {
        assert!(Element::new("BR", vec![]).is_line_break());
        assert!(Element::line_break().is_line_break());
        assert!(!Element::new("b", vec![]).is_line_break());
    }

    #[test]
    fn text_content_flattens_elements() {
        let element = HostElement::new(vec![
            Node::from("a "),
            Element::new("em", vec![Node::from("b"), Element::new("i", vec![Node::from("c")]).into()]).into(),
            Node::Comment("ignored".into()),
        ]);
        assert_eq!(element.text_content(), "a bc");
    }
}
