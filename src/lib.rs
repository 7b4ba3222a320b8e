//! tiledforge - Tiled (TMX) map loading
//!
//! Builds an in-memory model of a TMX map: map settings, property bags and
//! the layer tree of tile layers, object groups, image layers and groups.
//!
//! ```no_run
//! use std::path::Path;
//! use tiledforge::{LoadOptions, Map};
//!
//! let loaded = Map::load(Path::new("maps/level-1.tmx"), &LoadOptions::default())?;
//! for layer in loaded.map.layers() {
//!     println!("{} layer '{}'", layer.kind(), layer.name());
//! }
//! # Ok::<(), tiledforge::TmxError>(())
//! ```

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod layers;
pub mod map;
pub mod markup;
pub mod output;
pub mod types;

pub use config::{Config, LoadOptions};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Result, TmxError};
pub use layers::{
    parse_layer_attributes, ImageLayer, Layer, LayerAttributes, LayerGroup, LayerKind, LayerVariant, ObjectGroup,
    ParseContext, TileLayer,
};
pub use map::{Map, MapInfo, MapLoad, TilesetRef};
pub use types::{Colour, Properties, Property, PropertyType, PropertyValue, Vector2f, Vector2i, Vector2u};
