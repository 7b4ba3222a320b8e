//! Attributes common to every layer kind.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::markup::Node;
use crate::types::{Colour, Properties, Vector2f, Vector2i, Vector2u};

/// Name, class, visibility and placement shared by all layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerAttributes {
    name: String,
    class: String,
    opacity: f32,
    visible: bool,
    offset: Vector2i,
    size: Vector2u,
    parallax_factor: Vector2f,
    tint_colour: Option<Colour>,
    properties: Properties,
}

impl Default for LayerAttributes {
    fn default() -> Self {
        Self {
            name: String::new(),
            class: String::new(),
            opacity: 1.0,
            visible: true,
            offset: Vector2i::new(0, 0),
            size: Vector2u::new(0, 0),
            parallax_factor: Vector2f::new(1.0, 1.0),
            tint_colour: None,
            properties: Properties::new(),
        }
    }
}

impl LayerAttributes {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    /// Opacity in `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Offset in pixels.
    pub fn offset(&self) -> Vector2i {
        self.offset
    }

    /// Size in tiles.
    pub fn size(&self) -> Vector2u {
        self.size
    }

    pub fn parallax_factor(&self) -> Vector2f {
        self.parallax_factor
    }

    /// `None` when the document declares no tint.
    pub fn tint_colour(&self) -> Option<Colour> {
        self.tint_colour
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

/// Read the shared layer attributes from `node` onto `target`.
///
/// Every attribute is optional; missing or malformed values take their
/// defaults. An unparseable `tintcolor` is reported as a warning and leaves
/// the tint unset.
pub fn parse_layer_attributes(node: Node<'_, '_>, target: &mut LayerAttributes, diagnostics: &mut Diagnostics) {
    target.name = node.attr_str("name").to_string();
    target.class = node.attr_str("class").to_string();
    target.opacity = node.attr_f32("opacity", 1.0).clamp(0.0, 1.0);
    target.visible = node.attr_bool("visible", true);
    target.offset = Vector2i::new(node.attr_i32("offsetx", 0), node.attr_i32("offsety", 0));
    target.size = Vector2u::new(node.attr_u32("width", 0), node.attr_u32("height", 0));
    target.parallax_factor = Vector2f::new(node.attr_f32("parallaxx", 1.0), node.attr_f32("parallaxy", 1.0));

    let tint = node.attr_str("tintcolor");
    if !tint.is_empty() {
        match Colour::from_hex(tint) {
            Ok(colour) => target.tint_colour = Some(colour),
            Err(e) => diagnostics.push(
                Diagnostic::warning(
                    "tmx::layer::invalid-tint",
                    format!("Layer '{}': {}", target.name, e),
                )
                .with_help("Use #RRGGBB or #AARRGGBB format"),
            ),
        }
    }
}
