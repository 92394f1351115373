//! Canvas-wide effects. Each takes the canvas as accumulated so far and
//! returns its replacement; none of them are positioned by alignment.

use crate::{
    foundation::core::Offset,
    model::tree::{DeclaredSize, ShadowSpec},
    render::{
        backend::{BlendMode, ImageBackend},
        scale::apply_scale,
    },
};

pub fn apply_shadow<B: ImageBackend + ?Sized>(
    backend: &B,
    canvas: &B::Image,
    shadow: &ShadowSpec,
) -> B::Image {
    backend.drop_shadow(canvas, shadow)
}

/// Intersect the canvas's alpha with the mask's. An unspecified mask size
/// stretches the mask over the whole canvas; an empty mask leaves the canvas
/// untouched.
pub fn apply_mask<B: ImageBackend + ?Sized>(
    backend: &B,
    canvas: &B::Image,
    mask: &B::Image,
    size: DeclaredSize,
) -> B::Image {
    overlay_fitted(backend, canvas, mask, size, BlendMode::DestinationIn)
}

/// Draw frame art straight over the canvas, sized like a mask.
pub fn apply_frame<B: ImageBackend + ?Sized>(
    backend: &B,
    canvas: &B::Image,
    frame: &B::Image,
    size: DeclaredSize,
) -> B::Image {
    overlay_fitted(backend, canvas, frame, size, BlendMode::SourceOver)
}

fn overlay_fitted<B: ImageBackend + ?Sized>(
    backend: &B,
    canvas: &B::Image,
    art: &B::Image,
    size: DeclaredSize,
    mode: BlendMode,
) -> B::Image {
    let mut out = canvas.clone();
    if backend.extent(art).is_empty() {
        return out;
    }
    let art = backend.to_premultiplied(art);
    let art = apply_scale(
        backend,
        art,
        size.scale_op_fitting(backend.extent(canvas)),
    );
    backend.draw(&mut out, &art, Offset::ZERO, mode);
    out
}

#[cfg(test)]
#[path = "../tests/unit/effects.rs"]
mod tests;
