//! The map document.
//!
//! A `<map>` element carries map-wide settings ([`MapInfo`]), the map's own
//! property bag, tileset references and the root-level layer sequence.
//!
//! # Example
//!
//! ```xml
//! <map version="1.10" orientation="orthogonal" renderorder="right-down"
//!      width="30" height="20" tilewidth="16" tileheight="16" infinite="0">
//!   <tileset firstgid="1" source="terrain.tsx"/>
//!   <layer name="ground" width="30" height="20">
//!     <data encoding="csv">...</data>
//!   </layer>
//!   <group name="decor">
//!     <objectgroup name="props"/>
//!   </group>
//! </map>
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::LoadOptions;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, TmxError};
use crate::layers::{append_layer, resolve_path, ChildTag, Layer, ParseContext};
use crate::markup::{parse_document, Node};
use crate::types::{Colour, Properties, Vector2, Vector2f, Vector2u};

/// Document format version, e.g. `1.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Version {
    /// Parse `major.minor`; missing or malformed parts read as 0.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.trim().split('.');
        let mut next = || parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        let major = next();
        let minor = next();
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

impl Orientation {
    fn from_tmx(s: &str) -> Option<Self> {
        match s {
            "orthogonal" => Some(Self::Orthogonal),
            "isometric" => Some(Self::Isometric),
            "staggered" => Some(Self::Staggered),
            "hexagonal" => Some(Self::Hexagonal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Orthogonal => "orthogonal",
            Self::Isometric => "isometric",
            Self::Staggered => "staggered",
            Self::Hexagonal => "hexagonal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Order in which tiles are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

impl RenderOrder {
    fn from_tmx(s: &str) -> Option<Self> {
        match s {
            "right-down" => Some(Self::RightDown),
            "right-up" => Some(Self::RightUp),
            "left-down" => Some(Self::LeftDown),
            "left-up" => Some(Self::LeftUp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StaggerAxis {
    X,
    #[default]
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StaggerIndex {
    #[default]
    Odd,
    Even,
}

/// Map-wide settings read from the `<map>` element's attributes.
///
/// Layers receive a reference to this while they are built.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    pub version: Version,
    /// Version of the editor that saved the document.
    pub tiled_version: String,
    pub class: String,
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    /// Size in tiles.
    pub tile_count: Vector2u,
    /// Tile size in pixels.
    pub tile_size: Vector2u,
    pub hex_side_length: u32,
    pub stagger_axis: StaggerAxis,
    pub stagger_index: StaggerIndex,
    pub background_colour: Option<Colour>,
    pub parallax_origin: Vector2f,
    pub infinite: bool,
    pub next_layer_id: u32,
    pub next_object_id: u32,
}

impl Default for MapInfo {
    fn default() -> Self {
        Self {
            version: Version::default(),
            tiled_version: String::new(),
            class: String::new(),
            orientation: Orientation::default(),
            render_order: RenderOrder::default(),
            tile_count: Vector2u::new(0, 0),
            tile_size: Vector2u::new(0, 0),
            hex_side_length: 0,
            stagger_axis: StaggerAxis::default(),
            stagger_index: StaggerIndex::default(),
            background_colour: None,
            parallax_origin: Vector2f::new(0.0, 0.0),
            infinite: false,
            next_layer_id: 0,
            next_object_id: 0,
        }
    }
}

impl MapInfo {
    fn parse(node: Node<'_, '_>, diagnostics: &mut Diagnostics) -> Self {
        let orientation = match node.attribute("orientation") {
            None => Orientation::Orthogonal,
            Some(value) => Orientation::from_tmx(value).unwrap_or_else(|| {
                diagnostics.warning(
                    "tmx::map::unknown-orientation",
                    format!("Unknown orientation '{}', using orthogonal", value),
                );
                Orientation::Orthogonal
            }),
        };

        let render_order = match node.attribute("renderorder") {
            None => RenderOrder::RightDown,
            Some(value) => RenderOrder::from_tmx(value).unwrap_or_else(|| {
                diagnostics.warning(
                    "tmx::map::unknown-render-order",
                    format!("Unknown render order '{}', using right-down", value),
                );
                RenderOrder::RightDown
            }),
        };

        let background_colour = match node.attribute("backgroundcolor").filter(|v| !v.is_empty()) {
            Some(value) => match Colour::from_hex(value) {
                Ok(colour) => Some(colour),
                Err(e) => {
                    diagnostics.warning("tmx::map::invalid-colour", format!("Map background: {}", e));
                    None
                }
            },
            None => None,
        };

        Self {
            version: Version::parse(node.attr_str("version")),
            tiled_version: node.attr_str("tiledversion").to_string(),
            class: node.attr_str("class").to_string(),
            orientation,
            render_order,
            tile_count: Vector2u::new(node.attr_u32("width", 0), node.attr_u32("height", 0)),
            tile_size: Vector2u::new(node.attr_u32("tilewidth", 0), node.attr_u32("tileheight", 0)),
            hex_side_length: node.attr_u32("hexsidelength", 0),
            stagger_axis: match node.attr_str("staggeraxis") {
                "x" => StaggerAxis::X,
                _ => StaggerAxis::Y,
            },
            stagger_index: match node.attr_str("staggerindex") {
                "even" => StaggerIndex::Even,
                _ => StaggerIndex::Odd,
            },
            background_colour,
            parallax_origin: Vector2f::new(node.attr_f32("parallaxoriginx", 0.0), node.attr_f32("parallaxoriginy", 0.0)),
            infinite: node.attr_bool("infinite", false),
            next_layer_id: node.attr_u32("nextlayerid", 0),
            next_object_id: node.attr_u32("nextobjectid", 0),
        }
    }
}

/// A `<tileset>` reference. Tileset contents are not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetRef {
    pub first_gid: u32,
    /// External `.tsx` file, resolved against the map's directory.
    pub source: Option<PathBuf>,
    /// Name of an embedded tileset.
    pub name: String,
}

/// A loaded map document.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    info: MapInfo,
    working_dir: PathBuf,
    properties: Properties,
    tilesets: Vec<TilesetRef>,
    layers: Vec<Layer>,
}

/// A map together with the diagnostics produced while building it.
#[derive(Debug, Clone)]
pub struct MapLoad {
    pub map: Map,
    pub diagnostics: Diagnostics,
}

impl Map {
    /// Read and build the map at `path`.
    ///
    /// Relative paths in the document resolve against the file's directory.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<MapLoad> {
        let source = std::fs::read_to_string(path).map_err(|e| TmxError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read map: {}", e),
        })?;
        let working_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Self::parse_str(&source, &working_dir, options)
    }

    /// Build a map from TMX text.
    ///
    /// Only malformed XML or a root element other than `<map>` is an error;
    /// everything else is recorded in the returned diagnostics.
    pub fn parse_str(source: &str, working_dir: &Path, options: &LoadOptions) -> Result<MapLoad> {
        let document = parse_document(source)?;
        let root = Node::root(&document);

        if root.name() != "map" {
            return Err(TmxError::Parse {
                message: format!("Expected root element <map>, found <{}>", root.name()),
                help: Some("Tilesets (.tsx) and templates (.tx) cannot be loaded as maps".to_string()),
            });
        }

        let mut diagnostics = Diagnostics::new();
        let info = MapInfo::parse(root, &mut diagnostics);
        let mut map = Map {
            info,
            working_dir: working_dir.to_path_buf(),
            properties: Properties::new(),
            tilesets: Vec::new(),
            layers: Vec::new(),
        };
        map.parse_children(root, options, &mut diagnostics);

        Ok(MapLoad { map, diagnostics })
    }

    fn parse_children(&mut self, root: Node<'_, '_>, options: &LoadOptions, diagnostics: &mut Diagnostics) {
        let mut ctx = ParseContext::new(&self.info, options, diagnostics);
        for child in root.children() {
            match child.name() {
                "tileset" => self.tilesets.push(TilesetRef {
                    first_gid: child.attr_u32("firstgid", 1),
                    source: child
                        .attribute("source")
                        .map(|source| resolve_path(&self.working_dir, source)),
                    name: child.attr_str("name").to_string(),
                }),
                "editorsettings" => ctx.diagnostics.info(
                    "tmx::map::editor-settings",
                    "Editor settings are not part of the map model: node skipped",
                ),
                name => match ChildTag::classify(name) {
                    ChildTag::Properties => self.properties.parse_children(child, ctx.diagnostics),
                    ChildTag::Layer(kind) => {
                        append_layer(&mut self.layers, kind, child, &self.working_dir, self.info.tile_count, &mut ctx)
                    }
                    ChildTag::Unknown(name) => ctx.diagnostics.warning(
                        "tmx::map::unknown-element",
                        format!("Unidentified name {}: node skipped", name),
                    ),
                },
            }
        }
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn version(&self) -> Version {
        self.info.version
    }

    pub fn class(&self) -> &str {
        &self.info.class
    }

    pub fn is_infinite(&self) -> bool {
        self.info.infinite
    }

    /// Map bounds in pixels, widened so large maps cannot overflow.
    pub fn bounds(&self) -> Vector2<u64> {
        let (count, size) = (self.info.tile_count, self.info.tile_size);
        Vector2::new(
            u64::from(count.x) * u64::from(size.x),
            u64::from(count.y) * u64::from(size.y),
        )
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn tilesets(&self) -> &[TilesetRef] {
        &self.tilesets
    }

    /// Root-level layers in declaration order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}
