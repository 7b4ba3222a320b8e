//! Layer groups and recursive layer tree construction.

use std::path::{Path, PathBuf};

use super::{
    append_layer, check_tag, layer_variant, parse_layer_attributes, ChildTag, Layer, LayerAttributes, LayerKind,
    LayerVariant, ParseContext,
};
use crate::markup::Node;
use crate::types::Vector2u;

/// A layer whose payload is an ordered sequence of child layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    attributes: LayerAttributes,
    /// Base directory for image layers below this group.
    working_dir: PathBuf,
    /// Map size in tiles, used to size tile layers below this group.
    tile_count: Vector2u,
    layers: Vec<Layer>,
}

layer_variant!(LayerGroup, Group);

impl LayerGroup {
    pub fn new(working_dir: impl Into<PathBuf>, tile_count: Vector2u) -> Self {
        Self {
            attributes: LayerAttributes::default(),
            working_dir: working_dir.into(),
            tile_count,
            layers: Vec::new(),
        }
    }

    /// Child layers in declaration order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn tile_count(&self) -> Vector2u {
        self.tile_count
    }

    /// Depth-first iterator over every layer below this group, parents
    /// before children.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.layers.iter().rev().collect(),
        }
    }
}

impl LayerVariant for LayerGroup {
    const KIND: LayerKind = LayerKind::Group;

    fn attributes(&self) -> &LayerAttributes {
        &self.attributes
    }

    /// Build this group from a `<group>` element.
    ///
    /// Children are classified by tag and appended in document order;
    /// nested groups are built by recursing into this method. Unknown
    /// elements are skipped with a warning so that one unrecognised child
    /// never aborts its siblings.
    fn parse(&mut self, node: Node<'_, '_>, ctx: &mut ParseContext<'_>) -> bool {
        if !check_tag(node, LayerKind::Group, ctx.diagnostics) {
            return false;
        }

        parse_layer_attributes(node, &mut self.attributes, ctx.diagnostics);

        ctx.depth += 1;
        for child in node.children() {
            match ChildTag::classify(child.name()) {
                ChildTag::Properties => {
                    self.attributes
                        .properties_mut()
                        .parse_children(child, ctx.diagnostics);
                }
                ChildTag::Layer(kind) => {
                    append_layer(&mut self.layers, kind, child, &self.working_dir, self.tile_count, ctx);
                }
                ChildTag::Unknown(name) => {
                    ctx.diagnostics.warning(
                        "tmx::layer::unknown-element",
                        format!("Unidentified name {}: node skipped", name),
                    );
                }
            }
        }
        ctx.depth -= 1;

        true
    }

    fn from_layer(layer: &Layer) -> Option<&Self> {
        match layer {
            Layer::Group(group) => Some(group),
            _ => None,
        }
    }
}

/// Iterator returned by [`LayerGroup::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Layer>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Layer;

    fn next(&mut self) -> Option<Self::Item> {
        let layer = self.stack.pop()?;
        if let Layer::Group(group) = layer {
            self.stack.extend(group.layers.iter().rev());
        }
        Some(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadOptions;
    use crate::diagnostics::{Diagnostics, Severity};
    use crate::layers::{ImageLayer, ObjectGroup, TileLayer};
    use crate::map::MapInfo;
    use crate::markup::parse_document;
    use crate::types::{Colour, PropertyValue, Vector2f, Vector2i};
    use pretty_assertions::assert_eq;

    fn build_with(xml: &str, options: &LoadOptions) -> (LayerGroup, bool, Diagnostics) {
        let doc = parse_document(xml).unwrap();
        let info = MapInfo::default();
        let mut diagnostics = Diagnostics::new();
        let mut group = LayerGroup::new("maps", Vector2u::new(4, 3));
        let accepted = {
            let mut ctx = ParseContext::new(&info, options, &mut diagnostics);
            group.parse(Node::root(&doc), &mut ctx)
        };
        (group, accepted, diagnostics)
    }

    fn build(xml: &str) -> (LayerGroup, bool, Diagnostics) {
        build_with(xml, &LoadOptions::default())
    }

    fn kinds_and_names(layers: &[Layer]) -> Vec<(LayerKind, &str)> {
        layers.iter().map(|l| (l.kind(), l.name())).collect()
    }

    #[test]
    fn test_preserves_declaration_order_across_kinds() {
        let (group, accepted, diagnostics) = build(
            r#"<group name="root">
                <objectgroup name="spawns"/>
                <layer name="ground"/>
                <imagelayer name="sky"/>
                <layer name="detail"/>
                <group name="inner"/>
                <objectgroup name="triggers"/>
            </group>"#,
        );

        assert!(accepted);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(
            kinds_and_names(group.layers()),
            vec![
                (LayerKind::Object, "spawns"),
                (LayerKind::Tile, "ground"),
                (LayerKind::Image, "sky"),
                (LayerKind::Tile, "detail"),
                (LayerKind::Group, "inner"),
                (LayerKind::Object, "triggers"),
            ]
        );
    }

    #[test]
    fn test_group_attributes_and_properties() {
        let (group, _, _) = build(
            r##"<group name="fx" class="overlay" opacity="0.5" visible="0" offsetx="3" offsety="-2"
                      parallaxx="0.5" parallaxy="2" tintcolor="#FF112233">
                <properties>
                    <property name="z" type="int" value="4"/>
                    <property name="label" value="top"/>
                </properties>
            </group>"##,
        );

        assert_eq!(group.name(), "fx");
        assert_eq!(group.attributes().class(), "overlay");
        assert_eq!(group.attributes().opacity(), 0.5);
        assert!(!group.attributes().visible());
        assert_eq!(group.attributes().offset(), Vector2i::new(3, -2));
        assert_eq!(group.attributes().parallax_factor(), Vector2f::new(0.5, 2.0));
        assert_eq!(group.attributes().tint_colour(), Some(Colour::new(0x11, 0x22, 0x33, 0xFF)));

        let names: Vec<&str> = group.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["z", "label"]);
        assert_eq!(group.properties().value("z"), Some(&PropertyValue::Int(4)));
        assert!(group.layers().is_empty());
    }

    #[test]
    fn test_defaults_for_omitted_attributes() {
        let (group, _, _) = build("<group><layer/></group>");

        for attributes in [group.attributes(), group.layers()[0].attributes()] {
            assert_eq!(attributes.opacity(), 1.0);
            assert!(attributes.visible());
            assert_eq!(attributes.offset(), Vector2i::new(0, 0));
            assert_eq!(attributes.parallax_factor(), Vector2f::new(1.0, 1.0));
            assert_eq!(attributes.tint_colour(), None);
        }
    }

    #[test]
    fn test_nesting_two_levels() {
        let (outer, _, _) = build(r#"<group name="outer"><group name="mid"><layer name="leaf"/></group></group>"#);

        let mid = &outer.layers()[0];
        assert_eq!(mid.kind(), LayerKind::Group);
        let mid = mid.layer_as::<LayerGroup>();
        assert_eq!(mid.layers()[0].kind(), LayerKind::Tile);
        assert_eq!(mid.layers()[0].name(), "leaf");
    }

    #[test]
    fn test_children_inherit_construction_context() {
        let (outer, _, _) = build(
            r#"<group>
                <group name="inner">
                    <layer name="tiles"/>
                    <imagelayer name="img"/>
                </group>
            </group>"#,
        );

        let inner = outer.layers()[0].layer_as::<LayerGroup>();
        assert_eq!(inner.working_dir(), Path::new("maps"));
        assert_eq!(inner.tile_count(), Vector2u::new(4, 3));
        assert_eq!(inner.layers()[0].layer_as::<TileLayer>().expected_tile_count(), 12);
        assert_eq!(inner.layers()[1].layer_as::<ImageLayer>().working_dir(), Path::new("maps"));
    }

    #[test]
    fn test_root_mismatch_leaves_target_untouched() {
        let (group, accepted, diagnostics) = build(r#"<objectgroup name="not-a-group"><object id="1"/></objectgroup>"#);

        assert!(!accepted);
        assert!(group.layers().is_empty());
        assert_eq!(group.name(), "");
        assert!(diagnostics.iter().any(|d| d.severity == Severity::Error));
    }

    #[test]
    fn test_unknown_element_is_skipped_with_warning() {
        let (group, accepted, diagnostics) = build(r#"<group><layer name="a"/><foo/></group>"#);

        assert!(accepted);
        assert_eq!(group.layers().len(), 1);
        assert_eq!(group.layers()[0].kind(), LayerKind::Tile);

        let warnings: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("foo"));
    }

    #[test]
    fn test_unknown_element_does_not_stop_siblings() {
        let (group, _, diagnostics) = build(
            r#"<group>
                <layer name="a"/>
                <foo><layer name="hidden"/></foo>
                <bar/>
                <objectgroup name="b"/>
            </group>"#,
        );

        assert_eq!(
            kinds_and_names(group.layers()),
            vec![(LayerKind::Tile, "a"), (LayerKind::Object, "b")]
        );
        assert_eq!(diagnostics.with_code("tmx::layer::unknown-element").count(), 2);
    }

    #[test]
    fn test_parsing_twice_yields_equal_trees() {
        let xml = r##"<group name="g" tintcolor="#80FFFFFF">
            <properties><property name="p" type="float" value="1.5"/></properties>
            <layer name="t" width="4" height="3"><data encoding="csv">1,2,3,4,5,6,7,8,9,10,11,12</data></layer>
            <group name="n"><objectgroup name="o"><object id="3" x="1" y="2"/></objectgroup></group>
        </group>"##;

        let (first, _, _) = build(xml);
        let (second, _, _) = build(xml);
        assert_eq!(first, second);
    }

    #[test]
    fn test_depth_guard_skips_groups_past_the_limit() {
        let options = LoadOptions {
            max_group_depth: 2,
            ..LoadOptions::default()
        };
        let (outer, _, diagnostics) = build_with(
            r#"<group name="d0">
                <group name="d1">
                    <group name="d2"><layer name="too-deep"/></group>
                    <layer name="kept"/>
                </group>
            </group>"#,
            &options,
        );

        let d1 = outer.layers()[0].layer_as::<LayerGroup>();
        assert_eq!(kinds_and_names(d1.layers()), vec![(LayerKind::Tile, "kept")]);
        assert_eq!(diagnostics.with_code("tmx::layer::max-depth").count(), 1);
    }

    #[test]
    fn test_deep_nesting_within_limit() {
        let depth = 40;
        let mut xml = String::new();
        for i in 0..depth {
            xml.push_str(&format!("<group name=\"g{i}\">"));
        }
        xml.push_str("<layer name=\"bottom\"/>");
        for _ in 0..depth {
            xml.push_str("</group>");
        }

        let (root, _, diagnostics) = build(&xml);
        assert!(diagnostics.is_empty());

        let leaves: Vec<&Layer> = root
            .descendants()
            .filter(|l| l.kind() == LayerKind::Tile)
            .collect();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].name(), "bottom");
        assert_eq!(root.descendants().count(), depth);
    }

    #[test]
    fn test_descendants_are_depth_first() {
        let (root, _, _) = build(
            r#"<group>
                <group name="a"><layer name="a1"/><layer name="a2"/></group>
                <objectgroup name="b"/>
            </group>"#,
        );

        let names: Vec<&str> = root.descendants().map(Layer::name).collect();
        assert_eq!(names, vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_object_groups_are_delegated() {
        let (group, _, _) = build(
            r#"<group><objectgroup name="o"><object id="1"/><object id="2"/></objectgroup></group>"#,
        );
        assert_eq!(group.layers()[0].layer_as::<ObjectGroup>().objects().len(), 2);
    }
}
