//! layercomp composites finished artwork images from a declarative layer tree.
//!
//! # Pipeline overview
//!
//! 1. **Build**: XML description -> [`Artwork`] (a forest of [`OutputNode`] trees)
//! 2. **Composite**: each output is resolved against the caller's [`SourceImages`],
//!    scaled, and its children are layered bottom-up with shadow, mask and frame effects
//! 3. **Finalize**: the canvas is written to the per-key destination directory and the
//!    written path is reported in [`OutputPaths`]
//!
//! Image primitives live behind [`ImageBackend`]; [`CpuBackend`] implements them with
//! the `image` crate. Nothing in steps 1-3 aborts on bad input: unreadable assets
//! become empty images, incomplete elements are dropped, and failed writes are simply
//! missing from the result.
#![forbid(unsafe_code)]

pub mod effects;
pub mod engine;
pub mod foundation;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod render;

pub use engine::{Compositor, Rendered, placement};
pub use foundation::config::{CompositorConfig, PersistDepth};
pub use foundation::core::{Extent, Offset};
pub use foundation::error::{CompositorError, CompositorResult};
pub use model::builder::{parse_artwork, parse_artwork_strict};
pub use model::tree::{
    Align, Artwork, DeclaredSize, EffectImage, ImageLayer, LayerNode, OutputNode, Resource,
    ResourceKey, ShadowSpec, VAlign,
};
pub use output::{OutputPaths, finalize_output};
pub use pipeline::{ComposeThreading, compose_all, compose_all_with};
pub use render::backend::{BlendMode, ImageBackend, SourceImages};
pub use render::cpu::{CpuBackend, CpuSettings, RasterImage};
pub use render::scale::{ScaleOp, apply_scale, target_extent};
