//! Summary command implementation.
//!
//! Loads one map and prints its settings and layer tree, as indented text or
//! as JSON.

use std::fmt;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::config::Config;
use crate::diagnostics::print_diagnostics;
use crate::error::{Result, TmxError};
use crate::layers::{ImageLayer, Layer, LayerGroup, LayerKind, ObjectGroup, TileLayer};
use crate::map::Map;
use crate::output::{display_path, Printer};
use crate::types::{Properties, Vector2u};

/// Print a map's settings and layer tree
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Map file to summarize
    pub file: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SummaryArgs) -> Result<()> {
    let printer = Printer::new();
    let config = match args.file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Config::discover(dir)?,
        _ => Config::default(),
    };

    let loaded = Map::load(&args.file, &config.load_options())?;
    if !loaded.diagnostics.is_empty() {
        print_diagnostics(&display_path(&args.file), &loaded.diagnostics, &printer);
    }

    let summary = MapSummary::new(&loaded.map);
    if args.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|e| TmxError::Parse {
            message: format!("Failed to serialize summary: {}", e),
            help: None,
        })?;
        println!("{}", json);
    } else {
        print!("{}", summary);
    }

    Ok(())
}

#[derive(Debug, Serialize)]
pub struct MapSummary {
    pub version: String,
    pub tiled_version: String,
    pub class: String,
    pub orientation: String,
    pub tile_count: Vector2u,
    pub tile_size: Vector2u,
    pub infinite: bool,
    pub tilesets: Vec<TilesetSummary>,
    pub properties: Vec<PropertySummary>,
    pub layers: Vec<LayerSummary>,
}

#[derive(Debug, Serialize)]
pub struct TilesetSummary {
    pub first_gid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PropertySummary {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct LayerSummary {
    pub kind: LayerKind,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class: String,
    pub size: Vector2u,
    pub visible: bool,
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiles: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<LayerSummary>,
}

impl MapSummary {
    pub fn new(map: &Map) -> Self {
        let info = map.info();
        Self {
            version: info.version.to_string(),
            tiled_version: info.tiled_version.clone(),
            class: info.class.clone(),
            orientation: info.orientation.to_string(),
            tile_count: info.tile_count,
            tile_size: info.tile_size,
            infinite: info.infinite,
            tilesets: map
                .tilesets()
                .iter()
                .map(|tileset| TilesetSummary {
                    first_gid: tileset.first_gid,
                    source: tileset.source.as_ref().map(|p| p.display().to_string()),
                    name: tileset.name.clone(),
                })
                .collect(),
            properties: summarize_properties(map.properties()),
            layers: map.layers().iter().map(LayerSummary::new).collect(),
        }
    }
}

impl LayerSummary {
    pub fn new(layer: &Layer) -> Self {
        let mut summary = Self {
            kind: layer.kind(),
            name: layer.name().to_string(),
            class: layer.class().to_string(),
            size: layer.size(),
            visible: layer.visible(),
            opacity: layer.opacity(),
            tint: layer.tint_colour().map(|c| c.to_string()),
            properties: summarize_properties(layer.properties()),
            tiles: None,
            encoding: None,
            objects: None,
            image: None,
            layers: Vec::new(),
        };

        match layer.kind() {
            LayerKind::Tile => {
                let tiles = layer.layer_as::<TileLayer>();
                let chunked: usize = tiles.chunks().iter().map(|c| c.tiles.len()).sum();
                summary.tiles = Some(tiles.tiles().len() + chunked);
                summary.encoding = tiles.encoding().map(|e| e.to_string());
            }
            LayerKind::Object => {
                summary.objects = Some(layer.layer_as::<ObjectGroup>().objects().len());
            }
            LayerKind::Image => {
                summary.image = layer
                    .layer_as::<ImageLayer>()
                    .image()
                    .map(|image| image.source.display().to_string());
            }
            LayerKind::Group => {
                summary.layers = layer
                    .layer_as::<LayerGroup>()
                    .layers()
                    .iter()
                    .map(LayerSummary::new)
                    .collect();
            }
        }

        summary
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let detail = "  ".repeat(depth + 1);

        writeln!(f, "{}{} layer '{}'", indent, self.kind, self.name)?;
        writeln!(f, "{}Size: {} x {}", detail, self.size.x, self.size.y)?;
        if !self.class.is_empty() {
            writeln!(f, "{}Class: {}", detail, self.class)?;
        }
        if let Some(tint) = &self.tint {
            writeln!(f, "{}Tint: {}", detail, tint)?;
        }
        if !self.visible {
            writeln!(f, "{}Hidden", detail)?;
        }
        if self.opacity != 1.0 {
            writeln!(f, "{}Opacity: {}", detail, self.opacity)?;
        }
        if !self.properties.is_empty() {
            writeln!(f, "{}Properties: {}", detail, self.properties.len())?;
            write_properties(f, &self.properties, depth + 2)?;
        }

        if let Some(tiles) = self.tiles {
            match &self.encoding {
                Some(encoding) => writeln!(f, "{}Tiles: {} ({})", detail, tiles, encoding)?,
                None => writeln!(f, "{}Tiles: {}", detail, tiles)?,
            }
        }
        if let Some(objects) = self.objects {
            writeln!(f, "{}Objects: {}", detail, objects)?;
        }
        if let Some(image) = &self.image {
            writeln!(f, "{}Image: {}", detail, image)?;
        }
        if self.kind == LayerKind::Group {
            writeln!(f, "{}Sublayers: {}", detail, self.layers.len())?;
            for layer in &self.layers {
                layer.write(f, depth + 2)?;
            }
        }

        Ok(())
    }
}

fn summarize_properties(properties: &Properties) -> Vec<PropertySummary> {
    properties
        .iter()
        .map(|property| PropertySummary {
            name: property.name().to_string(),
            property_type: property.property_type().to_string(),
            value: property.value().to_string(),
        })
        .collect()
}

fn write_properties(f: &mut fmt::Formatter<'_>, properties: &[PropertySummary], depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    for property in properties {
        writeln!(f, "{}{} ({}): {}", indent, property.name, property.property_type, property.value)?;
    }
    Ok(())
}

impl fmt::Display for MapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Map version: {}", self.version)?;
        if !self.class.is_empty() {
            writeln!(f, "Map class: {}", self.class)?;
        }
        writeln!(f, "Orientation: {}", self.orientation)?;
        writeln!(
            f,
            "Size: {} x {} tiles of {} x {} px",
            self.tile_count.x, self.tile_count.y, self.tile_size.x, self.tile_size.y
        )?;
        if self.infinite {
            writeln!(f, "Infinite")?;
        }

        writeln!(f, "Tilesets: {}", self.tilesets.len())?;
        for tileset in &self.tilesets {
            let label = tileset.source.as_deref().unwrap_or(&tileset.name);
            writeln!(f, "  [{}] {}", tileset.first_gid, label)?;
        }

        writeln!(f, "Properties: {}", self.properties.len())?;
        write_properties(f, &self.properties, 1)?;

        writeln!(f, "Layers: {}", self.layers.len())?;
        for layer in &self.layers {
            layer.write(f, 1)?;
        }

        Ok(())
    }
}
