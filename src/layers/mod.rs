//! Layer model and layer tree construction.
//!
//! A map's layers form a rooted tree. Leaves are tile layers, object groups
//! and image layers; interior nodes are [`LayerGroup`]s, which may nest to
//! any depth permitted by [`LoadOptions::max_group_depth`].
//!
//! Every layer kind shares the same attribute set ([`LayerAttributes`]) and
//! the same capability set ([`LayerVariant`]). [`Layer`] is the closed sum of
//! the four kinds; consumers branch on [`Layer::kind`] and downcast with
//! [`Layer::layer_as`].
//!
//! # Usage
//!
//! ```ignore
//! use tiledforge::layers::{Layer, LayerGroup, LayerKind};
//!
//! for layer in map.layers() {
//!     if layer.kind() == LayerKind::Group {
//!         let group = layer.layer_as::<LayerGroup>();
//!         println!("{} has {} sublayers", group.name(), group.layers().len());
//!     }
//! }
//! ```

mod attributes;
mod group;
mod image;
mod object;
mod tile;

pub use attributes::{parse_layer_attributes, LayerAttributes};
pub use group::{Descendants, LayerGroup};
pub use image::{Image, ImageLayer};
pub use object::{DrawOrder, Object, ObjectGroup, ObjectShape, Text};
pub use tile::{Chunk, Compression, DataEncoding, Tile, TileLayer};

pub(crate) use image::resolve_path;

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::config::LoadOptions;
use crate::diagnostics::Diagnostics;
use crate::map::MapInfo;
use crate::markup::Node;
use crate::types::{Colour, Properties, Vector2f, Vector2i, Vector2u};

/// Discriminant of a [`Layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LayerKind {
    Tile,
    Object,
    Image,
    Group,
}

impl LayerKind {
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Tile => "Tile",
            LayerKind::Object => "Object",
            LayerKind::Image => "Image",
            LayerKind::Group => "Group",
        }
    }

    /// The element tag that declares this kind of layer.
    pub fn tag(self) -> &'static str {
        match self {
            LayerKind::Tile => "layer",
            LayerKind::Object => "objectgroup",
            LayerKind::Image => "imagelayer",
            LayerKind::Group => "group",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of an element found among a map's or group's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildTag<'a> {
    Properties,
    Layer(LayerKind),
    Unknown(&'a str),
}

impl<'a> ChildTag<'a> {
    pub fn classify(name: &'a str) -> Self {
        match name {
            "properties" => ChildTag::Properties,
            "layer" => ChildTag::Layer(LayerKind::Tile),
            "objectgroup" => ChildTag::Layer(LayerKind::Object),
            "imagelayer" => ChildTag::Layer(LayerKind::Image),
            "group" => ChildTag::Layer(LayerKind::Group),
            other => ChildTag::Unknown(other),
        }
    }
}

/// State threaded through a single load.
pub struct ParseContext<'a> {
    /// Map-wide settings of the document being loaded.
    pub map: &'a MapInfo,
    pub options: &'a LoadOptions,
    pub diagnostics: &'a mut Diagnostics,
    /// Number of groups currently being parsed above this point.
    depth: usize,
}

impl<'a> ParseContext<'a> {
    pub fn new(map: &'a MapInfo, options: &'a LoadOptions, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            map,
            options,
            diagnostics,
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Capabilities shared by every concrete layer kind.
pub trait LayerVariant: Sized {
    const KIND: LayerKind;

    fn attributes(&self) -> &LayerAttributes;

    /// Parse `node` into this layer.
    ///
    /// Returns `false` (after recording an error) when the node's tag does
    /// not declare this kind of layer; the layer is left untouched.
    fn parse(&mut self, node: Node<'_, '_>, ctx: &mut ParseContext<'_>) -> bool;

    fn from_layer(layer: &Layer) -> Option<&Self>;

    fn kind(&self) -> LayerKind {
        Self::KIND
    }
}

/// Record the error for a node handed to the wrong layer kind.
pub(crate) fn check_tag(node: Node<'_, '_>, kind: LayerKind, diagnostics: &mut Diagnostics) -> bool {
    if node.name() == kind.tag() {
        return true;
    }
    diagnostics.error(
        "tmx::layer::unexpected-node",
        format!(
            "Node <{}> was not a {} layer (<{}>): node skipped",
            node.name(),
            kind.name().to_lowercase(),
            kind.tag()
        ),
    );
    false
}

/// A layer of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Tile(TileLayer),
    Object(ObjectGroup),
    Image(ImageLayer),
    Group(LayerGroup),
}

impl Layer {
    /// Create an empty layer of the given kind.
    pub fn new(kind: LayerKind, working_dir: &Path, tile_count: Vector2u) -> Self {
        match kind {
            LayerKind::Tile => Layer::Tile(TileLayer::new(tile_count.area())),
            LayerKind::Object => Layer::Object(ObjectGroup::new()),
            LayerKind::Image => Layer::Image(ImageLayer::new(working_dir)),
            LayerKind::Group => Layer::Group(LayerGroup::new(working_dir, tile_count)),
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Tile(_) => LayerKind::Tile,
            Layer::Object(_) => LayerKind::Object,
            Layer::Image(_) => LayerKind::Image,
            Layer::Group(_) => LayerKind::Group,
        }
    }

    pub fn parse(&mut self, node: Node<'_, '_>, ctx: &mut ParseContext<'_>) -> bool {
        match self {
            Layer::Tile(layer) => layer.parse(node, ctx),
            Layer::Object(layer) => layer.parse(node, ctx),
            Layer::Image(layer) => layer.parse(node, ctx),
            Layer::Group(layer) => layer.parse(node, ctx),
        }
    }

    pub fn attributes(&self) -> &LayerAttributes {
        match self {
            Layer::Tile(layer) => layer.attributes(),
            Layer::Object(layer) => layer.attributes(),
            Layer::Image(layer) => layer.attributes(),
            Layer::Group(layer) => layer.attributes(),
        }
    }

    /// Borrow the concrete layer.
    ///
    /// # Panics
    ///
    /// Panics if the layer is not a `T`. Check [`Layer::kind`] first, or use
    /// [`Layer::try_layer_as`].
    pub fn layer_as<T: LayerVariant>(&self) -> &T {
        match T::from_layer(self) {
            Some(layer) => layer,
            None => panic!(
                "layer '{}' is a {} layer, not a {} layer",
                self.name(),
                self.kind(),
                T::KIND
            ),
        }
    }

    pub fn try_layer_as<T: LayerVariant>(&self) -> Option<&T> {
        T::from_layer(self)
    }

    pub fn name(&self) -> &str {
        self.attributes().name()
    }

    pub fn class(&self) -> &str {
        self.attributes().class()
    }

    pub fn opacity(&self) -> f32 {
        self.attributes().opacity()
    }

    pub fn visible(&self) -> bool {
        self.attributes().visible()
    }

    pub fn offset(&self) -> Vector2i {
        self.attributes().offset()
    }

    pub fn size(&self) -> Vector2u {
        self.attributes().size()
    }

    pub fn parallax_factor(&self) -> Vector2f {
        self.attributes().parallax_factor()
    }

    pub fn tint_colour(&self) -> Option<Colour> {
        self.attributes().tint_colour()
    }

    pub fn properties(&self) -> &Properties {
        self.attributes().properties()
    }
}

/// Construct the layer for `kind`, parse `node` into it, and append it.
///
/// Shared by the map root and by groups so both classify and build layers
/// the same way. Groups deeper than `max_group_depth` are skipped.
pub(crate) fn append_layer(
    layers: &mut Vec<Layer>,
    kind: LayerKind,
    node: Node<'_, '_>,
    working_dir: &Path,
    tile_count: Vector2u,
    ctx: &mut ParseContext<'_>,
) {
    if kind == LayerKind::Group && ctx.depth >= ctx.options.max_group_depth {
        ctx.diagnostics.push(
            crate::diagnostics::Diagnostic::error(
                "tmx::layer::max-depth",
                format!(
                    "Group '{}' is nested deeper than {} groups: node skipped",
                    node.attr_str("name"),
                    ctx.options.max_group_depth
                ),
            )
            .with_help("Raise max_group_depth in tiledforge.yaml if the nesting is intended"),
        );
        return;
    }

    let mut layer = Layer::new(kind, working_dir, tile_count);
    layer.parse(node, ctx);
    layers.push(layer);
}

macro_rules! layer_variant {
    ($ty:ident, $arm:ident) => {
        impl From<$ty> for $crate::layers::Layer {
            fn from(layer: $ty) -> Self {
                $crate::layers::Layer::$arm(layer)
            }
        }

        impl $ty {
            pub fn name(&self) -> &str {
                self.attributes.name()
            }

            pub fn properties(&self) -> &$crate::types::Properties {
                self.attributes.properties()
            }
        }
    };
}

pub(crate) use layer_variant;
