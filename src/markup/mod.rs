//! Read-only view over a parsed XML tree.
//!
//! Layer parsing only needs three things from a node: its tag name, its
//! attributes with default-producing accessors, and its element children in
//! document order. `Node` wraps a `roxmltree::Node` to provide exactly that.

use crate::error::Result;

/// Parse XML text into a document tree.
///
/// The returned document borrows `source`.
pub fn parse_document(source: &str) -> Result<roxmltree::Document<'_>> {
    Ok(roxmltree::Document::parse(source)?)
}

/// An element node.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a, 'input> {
    inner: roxmltree::Node<'a, 'input>,
}

impl<'a, 'input> From<roxmltree::Node<'a, 'input>> for Node<'a, 'input> {
    fn from(inner: roxmltree::Node<'a, 'input>) -> Self {
        Self { inner }
    }
}

impl<'a, 'input> Node<'a, 'input> {
    /// The root element of a document.
    pub fn root(document: &'a roxmltree::Document<'input>) -> Self {
        document.root_element().into()
    }

    /// Local tag name (e.g. `group`).
    pub fn name(&self) -> &'a str {
        self.inner.tag_name().name()
    }

    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.inner.attribute(key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.inner.has_attribute(key)
    }

    /// String attribute, empty when absent.
    pub fn attr_str(&self, key: &str) -> &'a str {
        self.attribute(key).unwrap_or("")
    }

    pub fn attr_i32(&self, key: &str, default: i32) -> i32 {
        self.attr_parsed(key).unwrap_or(default)
    }

    pub fn attr_u32(&self, key: &str, default: u32) -> u32 {
        self.attr_parsed(key).unwrap_or(default)
    }

    pub fn attr_f32(&self, key: &str, default: f32) -> f32 {
        self.attr_parsed(key).unwrap_or(default)
    }

    /// Boolean attribute.
    ///
    /// A present value is true when it starts with one of `1 t T y Y`, so
    /// both `visible="0"` and `infinite="true"` read as expected.
    pub fn attr_bool(&self, key: &str, default: bool) -> bool {
        match self.attribute(key) {
            Some(value) => parse_bool(value),
            None => default,
        }
    }

    /// Element children in document order. Text and comments are skipped.
    pub fn children(&self) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
        self.inner
            .children()
            .filter(|n| n.is_element())
            .map(Node::from)
    }

    /// First element child with the given tag name.
    pub fn child(&self, name: &str) -> Option<Node<'a, 'input>> {
        self.children().find(|c| c.name() == name)
    }

    /// Text content of the node, empty when it has none.
    pub fn text(&self) -> &'a str {
        self.inner.text().unwrap_or("")
    }

    fn attr_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.attribute(key).and_then(|v| v.trim().parse().ok())
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().chars().next(), Some('1' | 't' | 'T' | 'y' | 'Y'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TmxError;

    #[test]
    fn test_defaults_when_absent() {
        let doc = parse_document(r#"<group/>"#).unwrap();
        let node = Node::root(&doc);

        assert_eq!(node.name(), "group");
        assert_eq!(node.attr_str("name"), "");
        assert_eq!(node.attr_i32("offsetx", 0), 0);
        assert_eq!(node.attr_u32("width", 7), 7);
        assert_eq!(node.attr_f32("opacity", 1.0), 1.0);
        assert!(node.attr_bool("visible", true));
    }

    #[test]
    fn test_typed_accessors() {
        let doc = parse_document(
            r#"<layer name="ground" offsetx="-4" width="12" opacity="0.5" visible="0"/>"#,
        )
        .unwrap();
        let node = Node::root(&doc);

        assert_eq!(node.attr_str("name"), "ground");
        assert_eq!(node.attr_i32("offsetx", 0), -4);
        assert_eq!(node.attr_u32("width", 0), 12);
        assert_eq!(node.attr_f32("opacity", 1.0), 0.5);
        assert!(!node.attr_bool("visible", true));
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let doc = parse_document(r#"<layer opacity="lots" width="-3" offsetx="1.5"/>"#).unwrap();
        let node = Node::root(&doc);

        assert_eq!(node.attr_f32("opacity", 1.0), 1.0);
        assert_eq!(node.attr_u32("width", 0), 0);
        assert_eq!(node.attr_i32("offsetx", 0), 0);
    }

    #[test]
    fn test_bool_spellings() {
        for (text, expected) in [("1", true), ("true", true), ("Yes", true), ("0", false), ("false", false), ("", false)] {
            assert_eq!(parse_bool(text), expected, "{text:?}");
        }
    }

    #[test]
    fn test_children_skip_text_and_comments() {
        let doc = parse_document("<group>text<!-- c --><layer/>\n<objectgroup/></group>").unwrap();
        let names: Vec<&str> = Node::root(&doc).children().map(|c| c.name()).collect();
        assert_eq!(names, vec!["layer", "objectgroup"]);
    }

    #[test]
    fn test_text_content() {
        let doc = parse_document("<data encoding=\"csv\">1,2,3</data>").unwrap();
        assert_eq!(Node::root(&doc).text(), "1,2,3");

        let doc = parse_document("<data/>").unwrap();
        assert_eq!(Node::root(&doc).text(), "");
    }

    #[test]
    fn test_invalid_xml_is_an_error() {
        let err = parse_document("<map><layer></map>").unwrap_err();
        assert!(matches!(err, TmxError::Xml(_)));
    }
}
