use super::*;
use crate::model::tree::ResourceKey;

fn single_output(xml: &str) -> OutputNode {
    let mut artwork = parse_artwork_strict(xml).unwrap();
    assert_eq!(artwork.outputs.len(), 1, "expected exactly one output");
    artwork.outputs.remove(0)
}

#[test]
fn outputs_are_found_inside_unknown_wrappers() {
    let artwork = parse_artwork(
        r#"<artwork>
             <output type="cover" width="640"/>
             <output type="wheel"/>
           </artwork>"#,
    );
    assert_eq!(artwork.outputs.len(), 2);
    assert_eq!(artwork.outputs[0].key(), Some(ResourceKey::Cover));
    assert_eq!(artwork.outputs[0].size, DeclaredSize::new(Some(640), None));
    assert_eq!(artwork.outputs[1].key(), Some(ResourceKey::Wheel));
    assert_eq!(artwork.outputs[1].size, DeclaredSize::UNSPECIFIED);
}

#[test]
fn output_resource_alias_is_accepted() {
    let out = single_output(r#"<output resource="marquee"/>"#);
    assert_eq!(out.key(), Some(ResourceKey::Marquee));
}

#[test]
fn output_without_type_is_dropped() {
    let artwork = parse_artwork(r#"<a><output width="10"><layer resource="cover"/></output></a>"#);
    assert!(artwork.is_empty());
}

#[test]
fn unknown_output_key_is_kept_verbatim() {
    let out = single_output(r#"<output type="banner"/>"#);
    assert_eq!(out.resource, "banner");
    assert_eq!(out.key(), None);
}

#[test]
fn layer_attributes_are_parsed() {
    let out = single_output(
        r#"<output type="screenshot">
             <layer resource="frames/tv.png" width="-1" height="120"
                    align="Center" valign="bottom" x="5" y="-7"/>
           </output>"#,
    );
    let LayerNode::Image(layer) = &out.children[0] else {
        panic!("expected image layer");
    };
    assert_eq!(layer.resource, Resource::File("frames/tv.png".to_string()));
    assert_eq!(layer.size, DeclaredSize::new(None, Some(120)));
    assert_eq!(layer.align, Align::Center);
    assert_eq!(layer.valign, VAlign::Bottom);
    assert_eq!((layer.x, layer.y), (5, -7));
}

#[test]
fn layer_defaults_are_left_top_zero() {
    let out = single_output(r#"<output type="cover"><layer resource="wheel"/></output>"#);
    let LayerNode::Image(layer) = &out.children[0] else {
        panic!("expected image layer");
    };
    assert_eq!(layer.resource, Resource::Named(ResourceKey::Wheel));
    assert_eq!(layer.align, Align::Left);
    assert_eq!(layer.valign, VAlign::Top);
    assert_eq!((layer.x, layer.y), (0, 0));
    assert_eq!(layer.size, DeclaredSize::UNSPECIFIED);
}

#[test]
fn children_keep_document_order() {
    let out = single_output(
        r#"<output type="cover">
             <layer resource="a.png"/>
             <shadow distance="3" softness="4" opacity="200"/>
             <mask file="m.png"/>
             <frame file="f.png" width="10" height="20"/>
           </output>"#,
    );
    assert_eq!(out.children.len(), 4);
    assert!(matches!(out.children[0], LayerNode::Image(_)));
    assert_eq!(
        out.children[1],
        LayerNode::Shadow(ShadowSpec {
            distance: 3,
            softness: 4,
            opacity: 200,
        })
    );
    assert_eq!(
        out.children[2],
        LayerNode::Mask(EffectImage {
            file: "m.png".to_string(),
            size: DeclaredSize::UNSPECIFIED,
        })
    );
    assert_eq!(
        out.children[3],
        LayerNode::Frame(EffectImage {
            file: "f.png".to_string(),
            size: DeclaredSize::exact(10, 20),
        })
    );
}

#[test]
fn layer_without_resource_is_dropped_with_descendants() {
    let out = single_output(
        r#"<output type="cover">
             <layer width="10">
               <layer resource="cover"/>
               <shadow distance="1" softness="1" opacity="1"/>
             </layer>
             <layer resource="wheel"/>
           </output>"#,
    );
    assert_eq!(out.children.len(), 1);
    let LayerNode::Image(layer) = &out.children[0] else {
        panic!("expected image layer");
    };
    assert_eq!(layer.resource, Resource::Named(ResourceKey::Wheel));
    assert!(layer.children.is_empty());
}

#[test]
fn incomplete_effects_are_dropped() {
    let out = single_output(
        r#"<output type="cover">
             <shadow distance="1" softness="2"/>
             <mask width="4"/>
             <frame/>
           </output>"#,
    );
    assert!(out.children.is_empty());
}

#[test]
fn nested_layers_build_subtrees() {
    let out = single_output(
        r#"<output type="cover">
             <layer resource="screenshot" width="100">
               <layer resource="wheel" align="right"/>
               <frame file="border.png"/>
             </layer>
           </output>"#,
    );
    let LayerNode::Image(layer) = &out.children[0] else {
        panic!("expected image layer");
    };
    assert_eq!(layer.children.len(), 2);
    assert!(matches!(layer.children[1], LayerNode::Frame(_)));
}

#[test]
fn unknown_elements_are_transparent() {
    let out = single_output(
        r#"<output type="cover">
             <group><layer resource="wheel"/></group>
             <unknown/>
           </output>"#,
    );
    assert_eq!(out.children.len(), 1);
}

#[test]
fn effect_content_and_nested_outputs_are_ignored() {
    let out = single_output(
        r#"<output type="cover">
             <shadow distance="1" softness="1" opacity="9"><layer resource="a.png"/></shadow>
             <layer resource="b.png"><output type="wheel"/></layer>
           </output>"#,
    );
    assert_eq!(out.children.len(), 2);
    let LayerNode::Image(layer) = &out.children[1] else {
        panic!("expected image layer");
    };
    assert!(layer.children.is_empty());
}

#[test]
fn top_level_layers_are_not_roots() {
    let artwork = parse_artwork(r#"<artwork><layer resource="cover"/></artwork>"#);
    assert!(artwork.is_empty());
}

#[test]
fn shadow_values_are_clamped() {
    let out = single_output(
        r#"<output type="cover"><shadow distance="-2" softness="-5" opacity="999"/></output>"#,
    );
    assert_eq!(
        out.children[0],
        LayerNode::Shadow(ShadowSpec {
            distance: -2,
            softness: 0,
            opacity: 255,
        })
    );
}

#[test]
fn non_integer_sizes_stay_unspecified() {
    let out = single_output(r#"<output type="cover" width="wide" height="-3"/>"#);
    assert_eq!(out.size, DeclaredSize::UNSPECIFIED);
}

#[test]
fn malformed_xml_is_lenient_or_strict() {
    let xml = r#"<artwork><output type="cover">"#;
    assert!(parse_artwork(xml).is_empty());
    assert!(matches!(
        parse_artwork_strict(xml),
        Err(CompositorError::Description(_))
    ));
}
