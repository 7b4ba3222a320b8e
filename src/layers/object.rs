//! Object groups and placed objects.

use super::{check_tag, layer_variant, parse_layer_attributes, Layer, LayerAttributes, LayerKind, LayerVariant, ParseContext};
use crate::diagnostics::Diagnostics;
use crate::layers::Tile;
use crate::markup::Node;
use crate::types::{Colour, Properties, Vector2f};

/// Rendering order of the objects in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawOrder {
    /// Sorted by y coordinate.
    #[default]
    TopDown,
    /// Document order.
    Index,
}

/// Text drawn by a text object.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub font_family: String,
    pub pixel_size: u32,
    pub wrap: bool,
    pub colour: Colour,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub kerning: bool,
    pub halign: String,
    pub valign: String,
    pub content: String,
}

impl Text {
    fn parse(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Self {
        let colour = match node.attribute("color") {
            Some(value) if !value.is_empty() => Colour::from_hex(value).unwrap_or_else(|e| {
                diagnostics.warning("tmx::object::invalid-colour", format!("Text colour: {}", e));
                Colour::BLACK
            }),
            _ => Colour::BLACK,
        };

        Self {
            font_family: node.attribute("fontfamily").unwrap_or("sans-serif").to_string(),
            pixel_size: node.attr_u32("pixelsize", 16),
            wrap: node.attr_bool("wrap", false),
            colour,
            bold: node.attr_bool("bold", false),
            italic: node.attr_bool("italic", false),
            underline: node.attr_bool("underline", false),
            strikeout: node.attr_bool("strikeout", false),
            kerning: node.attr_bool("kerning", true),
            halign: node.attribute("halign").unwrap_or("left").to_string(),
            valign: node.attribute("valign").unwrap_or("top").to_string(),
            content: node.text().to_string(),
        }
    }
}

/// Geometry kind of an object.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ObjectShape {
    #[default]
    Rectangle,
    Ellipse,
    Point,
    /// Points relative to the object position.
    Polygon(Vec<Vector2f>),
    Polyline(Vec<Vector2f>),
    Text(Text),
}

/// An object placed in an object group.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    id: u32,
    name: String,
    class: String,
    position: Vector2f,
    size: Vector2f,
    rotation: f32,
    tile: Option<Tile>,
    visible: bool,
    template: Option<String>,
    shape: ObjectShape,
    properties: Properties,
}

impl Object {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn position(&self) -> Vector2f {
        self.position
    }

    pub fn size(&self) -> Vector2f {
        self.size
    }

    /// Clockwise rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set for tile objects.
    pub fn tile(&self) -> Option<Tile> {
        self.tile
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Template file path as written in the document.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn shape(&self) -> &ObjectShape {
        &self.shape
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    fn parse(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Self {
        // "type" is the pre-1.9 spelling of "class".
        let class = node.attribute("class").or_else(|| node.attribute("type")).unwrap_or("");
        let gid = node.attr_u32("gid", 0);

        let mut object = Self {
            id: node.attr_u32("id", 0),
            name: node.attr_str("name").to_string(),
            class: class.to_string(),
            position: Vector2f::new(node.attr_f32("x", 0.0), node.attr_f32("y", 0.0)),
            size: Vector2f::new(node.attr_f32("width", 0.0), node.attr_f32("height", 0.0)),
            rotation: node.attr_f32("rotation", 0.0),
            tile: (gid != 0).then(|| Tile::from_gid(gid)),
            visible: node.attr_bool("visible", true),
            template: node.attribute("template").map(str::to_string),
            shape: ObjectShape::Rectangle,
            properties: Properties::new(),
        };

        for child in node.children() {
            match child.name() {
                "properties" => object.properties.parse_children(child, diagnostics),
                "ellipse" => object.shape = ObjectShape::Ellipse,
                "point" => object.shape = ObjectShape::Point,
                "polygon" => object.shape = ObjectShape::Polygon(parse_points(child, object.id, diagnostics)),
                "polyline" => object.shape = ObjectShape::Polyline(parse_points(child, object.id, diagnostics)),
                "text" => object.shape = ObjectShape::Text(Text::parse(child, diagnostics)),
                other => diagnostics.warning(
                    "tmx::object::unknown-element",
                    format!("Object {}: unidentified name {}: node skipped", object.id, other),
                ),
            }
        }

        object
    }
}

/// Parse a `points="x,y x,y ..."` attribute, skipping malformed pairs.
fn parse_points(node: Node<'_, '_>, object_id: u32, diagnostics: &mut Diagnostics) -> Vec<Vector2f> {
    let mut points = Vec::new();
    for pair in node.attr_str("points").split_whitespace() {
        let parsed = pair
            .split_once(',')
            .and_then(|(x, y)| Some(Vector2f::new(x.parse().ok()?, y.parse().ok()?)));
        match parsed {
            Some(point) => points.push(point),
            None => diagnostics.warning(
                "tmx::object::invalid-point",
                format!("Object {}: invalid point '{}' skipped", object_id, pair),
            ),
        }
    }
    points
}

/// A layer holding placed objects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectGroup {
    attributes: LayerAttributes,
    colour: Option<Colour>,
    draw_order: DrawOrder,
    objects: Vec<Object>,
}

layer_variant!(ObjectGroup, Object);

impl ObjectGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects in document order.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Display colour used by the editor.
    pub fn colour(&self) -> Option<Colour> {
        self.colour
    }

    pub fn draw_order(&self) -> DrawOrder {
        self.draw_order
    }
}

impl LayerVariant for ObjectGroup {
    const KIND: LayerKind = LayerKind::Object;

    fn attributes(&self) -> &LayerAttributes {
        &self.attributes
    }

    fn parse(&mut self, node: Node<'_, '_>, ctx: &mut ParseContext<'_>) -> bool {
        if !check_tag(node, LayerKind::Object, ctx.diagnostics) {
            return false;
        }

        parse_layer_attributes(node, &mut self.attributes, ctx.diagnostics);

        if let Some(value) = node.attribute("color").filter(|v| !v.is_empty()) {
            match Colour::from_hex(value) {
                Ok(colour) => self.colour = Some(colour),
                Err(e) => ctx.diagnostics.warning(
                    "tmx::object::invalid-colour",
                    format!("Object group '{}': {}", self.name(), e),
                ),
            }
        }

        self.draw_order = match node.attr_str("draworder") {
            "index" => DrawOrder::Index,
            _ => DrawOrder::TopDown,
        };

        for child in node.children() {
            match child.name() {
                "properties" => self.attributes.properties_mut().parse_children(child, ctx.diagnostics),
                "object" => self.objects.push(Object::parse(child, ctx.diagnostics)),
                other => ctx.diagnostics.warning(
                    "tmx::object::unknown-element",
                    format!("Object group '{}': unidentified name {}: node skipped", self.name(), other),
                ),
            }
        }

        true
    }

    fn from_layer(layer: &Layer) -> Option<&Self> {
        match layer {
            Layer::Object(group) => Some(group),
            _ => None,
        }
    }
}
