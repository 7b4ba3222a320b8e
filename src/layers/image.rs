//! Image layers.

use std::path::{Path, PathBuf};

use normalize_path::NormalizePath;

use super::{check_tag, layer_variant, parse_layer_attributes, Layer, LayerAttributes, LayerKind, LayerVariant, ParseContext};
use crate::diagnostics::Diagnostics;
use crate::markup::Node;
use crate::types::{Colour, Vector2u};

/// An image referenced by a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Source path resolved against the map's directory.
    pub source: PathBuf,
    /// Colour treated as transparent.
    pub transparent_colour: Option<Colour>,
    /// Size in pixels, when the document states it.
    pub size: Option<Vector2u>,
}

impl Image {
    fn parse(node: Node<'_, '_>, working_dir: &Path, diagnostics: &mut Diagnostics) -> Option<Self> {
        let source = node.attr_str("source");
        if source.is_empty() {
            diagnostics.warning(
                "tmx::image::missing-source",
                "Image has no source file (embedded image data is not supported): image skipped",
            );
            return None;
        }

        let transparent_colour = match node.attribute("trans").filter(|t| !t.is_empty()) {
            Some(trans) => match Colour::from_hex(trans) {
                Ok(colour) => Some(colour),
                Err(e) => {
                    diagnostics.warning("tmx::image::invalid-colour", format!("Image '{}': {}", source, e));
                    None
                }
            },
            None => None,
        };

        let size = match (node.attr_u32("width", 0), node.attr_u32("height", 0)) {
            (0, _) | (_, 0) => None,
            (w, h) => Some(Vector2u::new(w, h)),
        };

        Some(Self {
            source: resolve_path(working_dir, source),
            transparent_colour,
            size,
        })
    }
}

/// Join a document-relative path onto `working_dir`, folding `.` and `..`.
pub(crate) fn resolve_path(working_dir: &Path, relative: &str) -> PathBuf {
    working_dir.join(relative).normalize()
}

/// A layer displaying a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    attributes: LayerAttributes,
    working_dir: PathBuf,
    image: Option<Image>,
    repeat_x: bool,
    repeat_y: bool,
}

layer_variant!(ImageLayer, Image);

impl ImageLayer {
    /// `working_dir` is the directory image paths are relative to.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            attributes: LayerAttributes::default(),
            working_dir: working_dir.into(),
            image: None,
            repeat_x: false,
            repeat_y: false,
        }
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn repeat_x(&self) -> bool {
        self.repeat_x
    }

    pub fn repeat_y(&self) -> bool {
        self.repeat_y
    }
}

impl LayerVariant for ImageLayer {
    const KIND: LayerKind = LayerKind::Image;

    fn attributes(&self) -> &LayerAttributes {
        &self.attributes
    }

    fn parse(&mut self, node: Node<'_, '_>, ctx: &mut ParseContext<'_>) -> bool {
        if !check_tag(node, LayerKind::Image, ctx.diagnostics) {
            return false;
        }

        parse_layer_attributes(node, &mut self.attributes, ctx.diagnostics);
        self.repeat_x = node.attr_bool("repeatx", false);
        self.repeat_y = node.attr_bool("repeaty", false);

        for child in node.children() {
            match child.name() {
                "properties" => self.attributes.properties_mut().parse_children(child, ctx.diagnostics),
                "image" => self.image = Image::parse(child, &self.working_dir, ctx.diagnostics),
                other => ctx.diagnostics.warning(
                    "tmx::image::unknown-element",
                    format!("Image layer '{}': unidentified name {}: node skipped", self.name(), other),
                ),
            }
        }

        true
    }

    fn from_layer(layer: &Layer) -> Option<&Self> {
        match layer {
            Layer::Image(image) => Some(image),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadOptions;
    use crate::map::MapInfo;
    use crate::markup::parse_document;
    use pretty_assertions::assert_eq;

    fn parse(xml: &str, working_dir: &str) -> (ImageLayer, Diagnostics) {
        let doc = parse_document(xml).unwrap();
        let info = MapInfo::default();
        let options = LoadOptions::default();
        let mut diagnostics = Diagnostics::new();
        let mut layer = ImageLayer::new(working_dir);
        {
            let mut ctx = ParseContext::new(&info, &options, &mut diagnostics);
            assert!(layer.parse(Node::root(&doc), &mut ctx));
        }
        (layer, diagnostics)
    }

    #[test]
    fn test_image_resolved_against_working_dir() {
        let (layer, diagnostics) = parse(
            r#"<imagelayer name="sky" repeatx="1"><image source="../images/sky.png" width="640" height="480"/></imagelayer>"#,
            "assets/maps",
        );

        assert!(diagnostics.is_empty());
        assert_eq!(layer.name(), "sky");
        assert!(layer.repeat_x());
        assert!(!layer.repeat_y());

        let image = layer.image().unwrap();
        assert_eq!(image.source, PathBuf::from("assets/images/sky.png"));
        assert_eq!(image.size, Some(Vector2u::new(640, 480)));
        assert_eq!(image.transparent_colour, None);
    }

    #[test]
    fn test_transparent_colour() {
        let (layer, _) = parse(r#"<imagelayer><image source="a.png" trans="ff00ff"/></imagelayer>"#, ".");
        let image = layer.image().unwrap();
        assert_eq!(image.transparent_colour, Some(Colour::rgb(255, 0, 255)));
        assert_eq!(image.size, None);
        assert_eq!(image.source, PathBuf::from("a.png"));
    }

    #[test]
    fn test_layer_without_image() {
        let (layer, diagnostics) = parse(r#"<imagelayer name="empty"/>"#, ".");
        assert!(layer.image().is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_embedded_image_is_skipped() {
        let (layer, diagnostics) = parse(
            r#"<imagelayer><image format="png"><data encoding="base64">AAAA</data></image></imagelayer>"#,
            ".",
        );
        assert!(layer.image().is_none());
        assert_eq!(diagnostics.with_code("tmx::image::missing-source").count(), 1);
    }
}
