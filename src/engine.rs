//! Per-output compositing.
//!
//! Children are painted in reverse document order: the last declared child
//! is the bottom layer and the first declared child ends up on top. Effects
//! (shadow, mask, frame) act on the canvas as accumulated at the point they
//! are reached, so their position among siblings decides which layers they
//! apply to.

use std::path::Path;

use crate::{
    effects,
    foundation::core::{Extent, Offset},
    model::tree::{Align, ImageLayer, LayerNode, OutputNode, Resource, ResourceKey, VAlign},
    render::{
        backend::{BlendMode, ImageBackend, SourceImages},
        scale::apply_scale,
    },
};

/// A rendered layer together with the concrete size used to align it.
#[derive(Clone, Debug)]
pub struct Rendered<I> {
    pub image: I,
    pub extent: Extent,
}

/// Composites output trees against one request's source images.
///
/// Unresolvable resources are logged and rendered as empty images; nothing
/// here fails.
pub struct Compositor<'a, B: ImageBackend + ?Sized> {
    backend: &'a B,
    sources: &'a SourceImages<B::Image>,
    asset_dir: &'a Path,
}

impl<'a, B: ImageBackend + ?Sized> Compositor<'a, B> {
    pub fn new(backend: &'a B, sources: &'a SourceImages<B::Image>, asset_dir: &'a Path) -> Self {
        Self {
            backend,
            sources,
            asset_dir,
        }
    }

    /// Build the finished canvas for one output.
    #[tracing::instrument(skip_all, fields(output = %output.resource))]
    pub fn compose_output(&self, output: &OutputNode) -> B::Image {
        let base = match output.key() {
            Some(key) => self.named(key),
            None => {
                tracing::warn!("unknown output type, starting from a transparent canvas");
                self.backend.blank(Extent::EMPTY)
            }
        };
        let base = self.backend.to_premultiplied(&base);
        let mut canvas = apply_scale(self.backend, base, output.size.scale_op());

        if !output.children.is_empty() {
            let extent = self.backend.extent(&canvas);
            canvas = self.backend.blank(extent);
            self.composite_children(&mut canvas, extent, &output.children);
        }
        canvas
    }

    /// Render an image layer and, recursively, its children on top of it.
    pub fn render_layer(&self, layer: &ImageLayer) -> Rendered<B::Image> {
        let source = self.resolve(&layer.resource);
        let mut image = apply_scale(self.backend, source, layer.size.scale_op());
        let extent = self.backend.extent(&image);
        if !layer.children.is_empty() {
            self.composite_children(&mut image, extent, &layer.children);
        }
        Rendered { image, extent }
    }

    fn composite_children(&self, canvas: &mut B::Image, parent: Extent, children: &[LayerNode]) {
        for child in children.iter().rev() {
            match child {
                LayerNode::Image(layer) => {
                    let rendered = self.render_layer(layer);
                    let at = placement(parent, rendered.extent, layer);
                    self.backend
                        .draw(canvas, &rendered.image, at, BlendMode::SourceOver);
                }
                LayerNode::Shadow(shadow) => {
                    *canvas = effects::apply_shadow(self.backend, canvas, shadow);
                }
                LayerNode::Mask(mask) => {
                    let art = self.load_asset(&mask.file);
                    *canvas = effects::apply_mask(self.backend, canvas, &art, mask.size);
                }
                LayerNode::Frame(frame) => {
                    let art = self.load_asset(&frame.file);
                    *canvas = effects::apply_frame(self.backend, canvas, &art, frame.size);
                }
            }
        }
    }

    fn resolve(&self, resource: &Resource) -> B::Image {
        match resource {
            Resource::Named(key) => self.named(*key),
            Resource::File(file) => self.load_asset(file),
        }
    }

    fn named(&self, key: ResourceKey) -> B::Image {
        match self.sources.get(key) {
            Some(image) => image.clone(),
            None => {
                tracing::debug!(%key, "source image not supplied");
                self.backend.blank(Extent::EMPTY)
            }
        }
    }

    fn load_asset(&self, file: &str) -> B::Image {
        let path = self.asset_dir.join(file);
        match self.backend.load(&path) {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "asset unavailable");
                self.backend.blank(Extent::EMPTY)
            }
        }
    }
}

/// Top-left corner of a child inside its parent: alignment first, then the
/// child's own offset. Each size is halved separately, in integers.
pub fn placement(parent: Extent, child: Extent, layer: &ImageLayer) -> Offset {
    let (pw, ph) = (i64::from(parent.width), i64::from(parent.height));
    let (cw, ch) = (i64::from(child.width), i64::from(child.height));

    let x = match layer.align {
        Align::Left => 0,
        Align::Center => pw / 2 - cw / 2,
        Align::Right => pw - cw,
    };
    let y = match layer.valign {
        VAlign::Top => 0,
        VAlign::Middle => ph / 2 - ch / 2,
        VAlign::Bottom => ph - ch,
    };
    Offset::new(x + i64::from(layer.x), y + i64::from(layer.y))
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
