//! Typed custom properties.
//!
//! Maps, layers and objects all carry a property bag. The bag is an ordered
//! sequence rather than a map: declaration order is kept, and duplicate
//! names are allowed (lookup by name returns the last one declared).
//!
//! ```xml
//! <properties>
//!   <property name="music" type="file" value="sfx/cave.ogg"/>
//!   <property name="spawn" type="object" value="12"/>
//!   <property name="weather" type="class" propertytype="Weather">
//!     <properties>
//!       <property name="rain" type="bool" value="true"/>
//!     </properties>
//!   </property>
//! </properties>
//! ```

use std::fmt;

use crate::diagnostics::Diagnostics;
use crate::markup::Node;
use crate::types::Colour;

/// The declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    String,
    Int,
    Float,
    Bool,
    Colour,
    File,
    Object,
    Class,
}

impl PropertyType {
    /// Look up a type by its TMX spelling (`color`, not `colour`).
    pub fn from_tmx(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "color" => Some(Self::Colour),
            "file" => Some(Self::File),
            "object" => Some(Self::Object),
            "class" => Some(Self::Class),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Colour => "color",
            Self::File => "file",
            Self::Object => "object",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property value together with its type.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Int(i32),
    Float(f32),
    Bool(bool),
    Colour(Colour),
    /// Path as written in the document, relative to the map file.
    File(String),
    /// Object ID; 0 means no object.
    Object(u32),
    Class {
        property_type: String,
        properties: Properties,
    },
}

impl PropertyValue {
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::String(_) => PropertyType::String,
            Self::Int(_) => PropertyType::Int,
            Self::Float(_) => PropertyType::Float,
            Self::Bool(_) => PropertyType::Bool,
            Self::Colour(_) => PropertyType::Colour,
            Self::File(_) => PropertyType::File,
            Self::Object(_) => PropertyType::Object,
            Self::Class { .. } => PropertyType::Class,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::File(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::File(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Colour(c) => write!(f, "{}", c),
            Self::Object(id) => write!(f, "object #{}", id),
            Self::Class {
                property_type,
                properties,
            } => write!(f, "{} ({} members)", property_type, properties.len()),
        }
    }
}

/// A single named property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn property_type(&self) -> PropertyType {
        self.value.property_type()
    }

    /// Parse one `<property>` element.
    ///
    /// Returns `None` (with a warning) for elements that are not properties
    /// or declare an unknown type. Unparseable scalars fall back to the
    /// type's zero value.
    pub fn parse(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Option<Self> {
        if node.name() != "property" {
            diagnostics.warning(
                "tmx::property::unexpected-node",
                format!("Expected <property>, found <{}>: node skipped", node.name()),
            );
            return None;
        }

        let name = node.attr_str("name").to_string();
        let type_name = node.attribute("type").unwrap_or("string");
        let Some(property_type) = PropertyType::from_tmx(type_name) else {
            diagnostics.warning(
                "tmx::property::unknown-type",
                format!("Property '{}' has unknown type '{}': skipped", name, type_name),
            );
            return None;
        };

        // Multi-line strings are written as element text instead of `value`.
        let raw = node.attribute("value").unwrap_or_else(|| node.text());

        let value = match property_type {
            PropertyType::String => PropertyValue::String(raw.to_string()),
            PropertyType::Int => PropertyValue::Int(raw.trim().parse().unwrap_or(0)),
            PropertyType::Float => PropertyValue::Float(raw.trim().parse().unwrap_or(0.0)),
            PropertyType::Bool => PropertyValue::Bool(node.attr_bool("value", false)),
            PropertyType::Colour => PropertyValue::Colour(parse_colour(&name, raw, diagnostics)),
            PropertyType::File => PropertyValue::File(raw.to_string()),
            PropertyType::Object => PropertyValue::Object(raw.trim().parse().unwrap_or(0)),
            PropertyType::Class => {
                let mut properties = Properties::new();
                if let Some(members) = node.child("properties") {
                    properties.parse_children(members, diagnostics);
                }
                PropertyValue::Class {
                    property_type: node.attr_str("propertytype").to_string(),
                    properties,
                }
            }
        };

        Some(Self { name, value })
    }
}

fn parse_colour(name: &str, raw: &str, diagnostics: &mut Diagnostics) -> Colour {
    if raw.trim().is_empty() {
        return Colour::TRANSPARENT;
    }
    match Colour::from_hex(raw) {
        Ok(colour) => colour,
        Err(e) => {
            diagnostics.warning(
                "tmx::property::invalid-colour",
                format!("Property '{}': {}", name, e),
            );
            Colour::TRANSPARENT
        }
    }
}

/// Ordered property bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    items: Vec<Property>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: Property) {
        self.items.push(property);
    }

    /// Parse every child of a `<properties>` element, appending in order.
    pub fn parse_children(&mut self, node: Node<'_, '_>, diagnostics: &mut Diagnostics) {
        for child in node.children() {
            if let Some(property) = Property::parse(child, diagnostics) {
                self.push(property);
            }
        }
    }

    /// Look up a property by name. The last declaration wins.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.items.iter().rev().find(|p| p.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name).map(Property::value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{parse_document, Node};
    use pretty_assertions::assert_eq;

    fn parse_bag(xml: &str) -> (Properties, Diagnostics) {
        let doc = parse_document(xml).unwrap();
        let mut diagnostics = Diagnostics::new();
        let mut bag = Properties::new();
        bag.parse_children(Node::root(&doc), &mut diagnostics);
        (bag, diagnostics)
    }

    #[test]
    fn test_parse_scalar_types() {
        let (bag, diagnostics) = parse_bag(
            r##"<properties>
                <property name="title" value="Cave"/>
                <property name="lives" type="int" value="3"/>
                <property name="gravity" type="float" value="9.5"/>
                <property name="dark" type="bool" value="true"/>
                <property name="fog" type="color" value="#80102030"/>
                <property name="music" type="file" value="sfx/cave.ogg"/>
                <property name="spawn" type="object" value="12"/>
            </properties>"##,
        );

        assert!(diagnostics.is_empty());
        assert_eq!(bag.len(), 7);
        assert_eq!(bag.value("title"), Some(&PropertyValue::String("Cave".into())));
        assert_eq!(bag.value("lives").and_then(PropertyValue::as_int), Some(3));
        assert_eq!(bag.value("gravity").and_then(PropertyValue::as_float), Some(9.5));
        assert_eq!(bag.value("dark").and_then(PropertyValue::as_bool), Some(true));
        assert_eq!(
            bag.value("fog"),
            Some(&PropertyValue::Colour(Colour::new(0x10, 0x20, 0x30, 0x80)))
        );
        assert_eq!(bag.value("music").and_then(PropertyValue::as_str), Some("sfx/cave.ogg"));
        assert_eq!(bag.value("spawn"), Some(&PropertyValue::Object(12)));
    }

    #[test]
    fn test_declaration_order_and_duplicates() {
        let (bag, _) = parse_bag(
            r#"<properties>
                <property name="b" value="one"/>
                <property name="a" value="two"/>
                <property name="b" value="three"/>
            </properties>"#,
        );

        let names: Vec<&str> = bag.iter().map(Property::name).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
        assert_eq!(bag.value("b").and_then(PropertyValue::as_str), Some("three"));
    }

    #[test]
    fn test_multiline_string_from_text() {
        let (bag, _) = parse_bag(
            "<properties><property name=\"dialogue\">line one\nline two</property></properties>",
        );
        assert_eq!(
            bag.value("dialogue").and_then(PropertyValue::as_str),
            Some("line one\nline two")
        );
    }

    #[test]
    fn test_class_property_nests() {
        let (bag, _) = parse_bag(
            r#"<properties>
                <property name="weather" type="class" propertytype="Weather">
                    <properties>
                        <property name="rain" type="bool" value="true"/>
                    </properties>
                </property>
            </properties>"#,
        );

        let Some(PropertyValue::Class {
            property_type,
            properties,
        }) = bag.value("weather")
        else {
            panic!("expected class property");
        };
        assert_eq!(property_type, "Weather");
        assert_eq!(properties.value("rain").and_then(PropertyValue::as_bool), Some(true));
    }

    #[test]
    fn test_unknown_type_is_skipped_with_warning() {
        let (bag, diagnostics) = parse_bag(
            r#"<properties>
                <property name="x" type="vector" value="1,2"/>
                <property name="y" type="int" value="2"/>
            </properties>"#,
        );

        assert_eq!(bag.len(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.iter().any(|d| d.message.contains("vector")));
    }

    #[test]
    fn test_malformed_scalars_use_zero_values() {
        let (bag, diagnostics) = parse_bag(
            r#"<properties>
                <property name="n" type="int" value="many"/>
                <property name="c" type="color" value="nope"/>
                <property name="e" type="color" value=""/>
            </properties>"#,
        );

        assert_eq!(bag.value("n"), Some(&PropertyValue::Int(0)));
        assert_eq!(bag.value("c"), Some(&PropertyValue::Colour(Colour::TRANSPARENT)));
        assert_eq!(bag.value("e"), Some(&PropertyValue::Colour(Colour::TRANSPARENT)));
        assert_eq!(diagnostics.with_code("tmx::property::invalid-colour").count(), 1);
    }

    #[test]
    fn test_non_property_child_is_skipped() {
        let (bag, diagnostics) = parse_bag(r#"<properties><thing name="x"/></properties>"#);
        assert!(bag.is_empty());
        assert_eq!(diagnostics.warning_count(), 1);
    }
}
