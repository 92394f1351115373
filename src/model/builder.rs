//! Builds an [`Artwork`] from its XML description.
//!
//! Element kinds are `output`, `layer`, `shadow`, `mask` and `frame`. Each
//! kind has a minimum attribute set; an element missing it is dropped together
//! with everything nested inside it, and parsing carries on with its
//! siblings. Unknown elements are transparent: their children are read as if
//! they sat directly in the enclosing scope.

use roxmltree::{Document, Node};

use crate::{
    foundation::error::{CompositorError, CompositorResult},
    model::tree::{
        Align, Artwork, DeclaredSize, EffectImage, ImageLayer, LayerNode, OutputNode, Resource,
        ShadowSpec, VAlign,
    },
};

/// Lenient parse. A document that is not well-formed yields an empty artwork.
pub fn parse_artwork(xml: &str) -> Artwork {
    match parse_artwork_strict(xml) {
        Ok(artwork) => artwork,
        Err(err) => {
            tracing::warn!(error = %err, "artwork description unreadable, no outputs produced");
            Artwork::default()
        }
    }
}

/// Like [`parse_artwork`], but reports a document that is not well-formed XML.
///
/// Attribute gating still drops incomplete elements silently.
pub fn parse_artwork_strict(xml: &str) -> CompositorResult<Artwork> {
    let doc = Document::parse(xml)
        .map_err(|e| CompositorError::description(format!("parse artwork xml: {e}")))?;
    let mut outputs = Vec::new();
    collect_outputs(doc.root(), &mut outputs);
    Ok(Artwork { outputs })
}

fn collect_outputs(scope: Node<'_, '_>, out: &mut Vec<OutputNode>) {
    for node in scope.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "output" => {
                if let Some(output) = build_output(node) {
                    out.push(output);
                }
            }
            "layer" | "shadow" | "mask" | "frame" => {
                tracing::debug!(
                    element = node.tag_name().name(),
                    "ignoring layer element outside of an output"
                );
            }
            _ => collect_outputs(node, out),
        }
    }
}

fn collect_layers(scope: Node<'_, '_>, out: &mut Vec<LayerNode>) {
    for node in scope.children().filter(|n| n.is_element()) {
        let built = match node.tag_name().name() {
            "layer" => build_image_layer(node).map(LayerNode::Image),
            "shadow" => build_shadow(node).map(LayerNode::Shadow),
            "mask" => build_effect_image(node).map(LayerNode::Mask),
            "frame" => build_effect_image(node).map(LayerNode::Frame),
            "output" => {
                tracing::warn!("ignoring output nested inside another node");
                None
            }
            _ => {
                collect_layers(node, out);
                None
            }
        };
        if let Some(layer) = built {
            out.push(layer);
        }
    }
}

fn build_output(node: Node<'_, '_>) -> Option<OutputNode> {
    let Some(resource) = node.attribute("type").or_else(|| node.attribute("resource")) else {
        tracing::warn!("dropping output without a type");
        return None;
    };
    let mut children = Vec::new();
    collect_layers(node, &mut children);
    Some(OutputNode {
        resource: resource.to_string(),
        size: declared_size(node),
        children,
    })
}

fn build_image_layer(node: Node<'_, '_>) -> Option<ImageLayer> {
    let Some(resource) = node.attribute("resource") else {
        tracing::warn!("dropping layer without a resource");
        return None;
    };
    let mut layer = ImageLayer::new(Resource::parse(resource));
    layer.size = declared_size(node);
    layer.align = node.attribute("align").map(parse_align).unwrap_or_default();
    layer.valign = node.attribute("valign").map(parse_valign).unwrap_or_default();
    layer.x = int_attr(node, "x").unwrap_or(0);
    layer.y = int_attr(node, "y").unwrap_or(0);
    collect_layers(node, &mut layer.children);
    Some(layer)
}

fn build_shadow(node: Node<'_, '_>) -> Option<ShadowSpec> {
    let gated = ["distance", "softness", "opacity"]
        .iter()
        .all(|name| node.has_attribute(*name));
    if !gated {
        tracing::warn!("dropping shadow without distance, softness and opacity");
        return None;
    }
    Some(ShadowSpec {
        distance: int_attr(node, "distance").unwrap_or(0),
        softness: int_attr(node, "softness").unwrap_or(0).max(0) as u32,
        opacity: int_attr(node, "opacity").unwrap_or(0).clamp(0, 255) as u8,
    })
}

fn build_effect_image(node: Node<'_, '_>) -> Option<EffectImage> {
    let Some(file) = node.attribute("file") else {
        tracing::warn!(
            element = node.tag_name().name(),
            "dropping effect without a file"
        );
        return None;
    };
    Some(EffectImage {
        file: file.to_string(),
        size: declared_size(node),
    })
}

fn declared_size(node: Node<'_, '_>) -> DeclaredSize {
    DeclaredSize::new(dim_attr(node, "width"), dim_attr(node, "height"))
}

/// `-1` and any other negative value mean "unspecified".
fn dim_attr(node: Node<'_, '_>, name: &str) -> Option<u32> {
    int_attr(node, name).and_then(|v| u32::try_from(v).ok())
}

fn int_attr(node: Node<'_, '_>, name: &str) -> Option<i32> {
    let raw = node.attribute(name)?;
    match raw.trim().parse::<i32>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(
                element = node.tag_name().name(),
                attribute = name,
                value = raw,
                "ignoring non-integer attribute"
            );
            None
        }
    }
}

fn parse_align(raw: &str) -> Align {
    match raw.trim().to_ascii_lowercase().as_str() {
        "center" => Align::Center,
        "right" => Align::Right,
        _ => Align::Left,
    }
}

fn parse_valign(raw: &str) -> VAlign {
    match raw.trim().to_ascii_lowercase().as_str() {
        "middle" => VAlign::Middle,
        "bottom" => VAlign::Bottom,
        _ => VAlign::Top,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/builder.rs"]
mod tests;
