//! Tile layers and tile data decoding.
//!
//! Tile data lives in a `<data>` element in one of four forms:
//! - XML: one `<tile gid="..."/>` element per cell
//! - `encoding="csv"`: comma separated global IDs
//! - `encoding="base64"`: little-endian `u32` IDs, optionally compressed
//!   with `zlib`, `gzip` or `zstd`
//!
//! Infinite maps split the data into `<chunk>` elements, each encoded the
//! same way as the surrounding `<data>`.

use std::fmt;
use std::io::Read;

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use flate2::read::{GzDecoder, ZlibDecoder};

use super::{check_tag, layer_variant, parse_layer_attributes, Layer, LayerAttributes, LayerKind, LayerVariant, ParseContext};
use crate::error::{Result, TmxError};
use crate::markup::Node;
use crate::types::{Vector2i, Vector2u};

/// Mask of the ID bits of a global tile ID; the top four bits are flags.
const GID_MASK: u32 = 0x0FFF_FFFF;

/// One cell of tile data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    /// Global tile ID with the flip bits removed. 0 is an empty cell.
    pub id: u32,
    pub flip_flags: u8,
}

impl Tile {
    pub const FLIP_HORIZONTAL: u8 = 0x8;
    pub const FLIP_VERTICAL: u8 = 0x4;
    pub const FLIP_DIAGONAL: u8 = 0x2;
    /// 120° rotation on hexagonal maps.
    pub const ROTATED_HEX: u8 = 0x1;

    /// Split a raw global ID into its ID and flip flags.
    pub fn from_gid(gid: u32) -> Self {
        Self {
            id: gid & GID_MASK,
            flip_flags: (gid >> 28) as u8,
        }
    }

    pub fn is_empty(self) -> bool {
        self.id == 0
    }

    pub fn is_flipped(self, flag: u8) -> bool {
        self.flip_flags & flag != 0
    }
}

/// Compression applied to base64 tile data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    None,
    Zlib,
    Gzip,
    Zstd,
}

/// How a layer's tile data was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataEncoding {
    Xml,
    Csv,
    Base64(Compression),
}

impl DataEncoding {
    fn from_attributes(encoding: &str, compression: &str) -> Result<Self> {
        let compression = match compression {
            "" => Compression::None,
            "zlib" => Compression::Zlib,
            "gzip" => Compression::Gzip,
            "zstd" => Compression::Zstd,
            other => return Err(TmxError::decode(format!("unsupported compression '{}'", other))),
        };

        match (encoding, compression) {
            ("", Compression::None) => Ok(DataEncoding::Xml),
            ("csv", Compression::None) => Ok(DataEncoding::Csv),
            ("base64", compression) => Ok(DataEncoding::Base64(compression)),
            ("", _) | ("csv", _) => Err(TmxError::decode("compression requires base64 encoding")),
            (other, _) => Err(TmxError::decode(format!("unsupported encoding '{}'", other))),
        }
    }
}

impl fmt::Display for DataEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataEncoding::Xml => write!(f, "xml"),
            DataEncoding::Csv => write!(f, "csv"),
            DataEncoding::Base64(Compression::None) => write!(f, "base64"),
            DataEncoding::Base64(Compression::Zlib) => write!(f, "base64+zlib"),
            DataEncoding::Base64(Compression::Gzip) => write!(f, "base64+gzip"),
            DataEncoding::Base64(Compression::Zstd) => write!(f, "base64+zstd"),
        }
    }
}

/// A rectangular block of tiles in an infinite map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in tiles.
    pub position: Vector2i,
    /// Size in tiles.
    pub size: Vector2u,
    pub tiles: Vec<Tile>,
}

/// A layer holding a grid of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    attributes: LayerAttributes,
    expected_tiles: usize,
    encoding: Option<DataEncoding>,
    tiles: Vec<Tile>,
    chunks: Vec<Chunk>,
}

layer_variant!(TileLayer, Tile);

impl TileLayer {
    /// `tile_count` is the number of cells in the map.
    pub fn new(tile_count: usize) -> Self {
        Self {
            attributes: LayerAttributes::default(),
            expected_tiles: tile_count,
            encoding: None,
            tiles: Vec::new(),
            chunks: Vec::new(),
        }
    }

    pub fn expected_tile_count(&self) -> usize {
        self.expected_tiles
    }

    /// Tiles of a finite map, row-major. Empty for infinite maps.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Chunks of an infinite map.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// `None` when the layer has no `<data>` element.
    pub fn encoding(&self) -> Option<DataEncoding> {
        self.encoding
    }

    fn parse_data(&mut self, node: Node<'_, '_>, ctx: &mut ParseContext<'_>) {
        let encoding = match DataEncoding::from_attributes(node.attr_str("encoding"), node.attr_str("compression")) {
            Ok(encoding) => encoding,
            Err(e) => {
                ctx.diagnostics.error(
                    "tmx::tile::unsupported-encoding",
                    format!("Layer '{}': {}", self.name(), e),
                );
                return;
            }
        };
        self.encoding = Some(encoding);

        let has_chunks = node.children().any(|c| c.name() == "chunk");
        if ctx.map.infinite || has_chunks {
            for chunk in node.children().filter(|c| c.name() == "chunk") {
                match decode_chunk(chunk, encoding) {
                    Ok(chunk) => self.chunks.push(chunk),
                    Err(e) => ctx.diagnostics.error(
                        "tmx::tile::invalid-data",
                        format!("Layer '{}': chunk skipped: {}", self.name(), e),
                    ),
                }
            }
            return;
        }

        match decode_tiles(node, encoding) {
            Ok(tiles) => {
                if self.expected_tiles != 0 && tiles.len() != self.expected_tiles {
                    ctx.diagnostics.warning(
                        "tmx::tile::count-mismatch",
                        format!(
                            "Layer '{}' has {} tiles, expected {}",
                            self.name(),
                            tiles.len(),
                            self.expected_tiles
                        ),
                    );
                }
                self.tiles = tiles;
            }
            Err(e) => ctx.diagnostics.error(
                "tmx::tile::invalid-data",
                format!("Layer '{}': tile data skipped: {}", self.name(), e),
            ),
        }
    }
}

impl LayerVariant for TileLayer {
    const KIND: LayerKind = LayerKind::Tile;

    fn attributes(&self) -> &LayerAttributes {
        &self.attributes
    }

    fn parse(&mut self, node: Node<'_, '_>, ctx: &mut ParseContext<'_>) -> bool {
        if !check_tag(node, LayerKind::Tile, ctx.diagnostics) {
            return false;
        }

        parse_layer_attributes(node, &mut self.attributes, ctx.diagnostics);

        for child in node.children() {
            match child.name() {
                "properties" => self.attributes.properties_mut().parse_children(child, ctx.diagnostics),
                "data" => self.parse_data(child, ctx),
                other => ctx.diagnostics.warning(
                    "tmx::tile::unknown-element",
                    format!("Layer '{}': unidentified name {}: node skipped", self.name(), other),
                ),
            }
        }

        true
    }

    fn from_layer(layer: &Layer) -> Option<&Self> {
        match layer {
            Layer::Tile(tiles) => Some(tiles),
            _ => None,
        }
    }
}

fn decode_chunk(node: Node<'_, '_>, encoding: DataEncoding) -> Result<Chunk> {
    Ok(Chunk {
        position: Vector2i::new(node.attr_i32("x", 0), node.attr_i32("y", 0)),
        size: Vector2u::new(node.attr_u32("width", 0), node.attr_u32("height", 0)),
        tiles: decode_tiles(node, encoding)?,
    })
}

/// Decode the tiles held directly by a `<data>` or `<chunk>` element.
fn decode_tiles(node: Node<'_, '_>, encoding: DataEncoding) -> Result<Vec<Tile>> {
    match encoding {
        DataEncoding::Xml => Ok(node
            .children()
            .filter(|c| c.name() == "tile")
            .map(|t| Tile::from_gid(t.attr_u32("gid", 0)))
            .collect()),
        DataEncoding::Csv => decode_csv(node.text()),
        DataEncoding::Base64(compression) => decode_base64(node.text(), compression),
    }
}

fn decode_csv(text: &str) -> Result<Vec<Tile>> {
    text.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<u32>()
                .map(Tile::from_gid)
                .map_err(|_| TmxError::decode(format!("invalid CSV tile ID '{}'", v)))
        })
        .collect()
}

fn decode_base64(text: &str, compression: Compression) -> Result<Vec<Tile>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let raw = BASE64_STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| TmxError::decode(format!("invalid base64 tile data: {}", e)))?;

    let bytes = match compression {
        Compression::None => raw,
        Compression::Zlib => read_all(ZlibDecoder::new(&raw[..]), "zlib")?,
        Compression::Gzip => read_all(GzDecoder::new(&raw[..]), "gzip")?,
        Compression::Zstd => zstd::stream::decode_all(&raw[..])
            .map_err(|e| TmxError::decode(format!("zstd decompression failed: {}", e)))?,
    };

    if bytes.len() % 4 != 0 {
        return Err(TmxError::decode(format!(
            "tile data is {} bytes, not a multiple of 4",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|b| Tile::from_gid(u32::from_le_bytes([b[0], b[1], b[2], b[3]])))
        .collect())
}

fn read_all(mut reader: impl Read, label: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| TmxError::decode(format!("{} decompression failed: {}", label, e)))?;
    Ok(out)
}
