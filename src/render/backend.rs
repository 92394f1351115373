use std::path::Path;

use crate::{
    foundation::{
        core::{Extent, Offset},
        error::CompositorResult,
    },
    model::tree::{ResourceKey, ShadowSpec},
};

/// How a drawn image combines with the pixels beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Ordinary alpha composition.
    #[default]
    SourceOver,
    /// Keep the destination only where the source has coverage.
    DestinationIn,
}

/// Image primitives the compositing engine is written against.
///
/// Implementations keep no state between calls, so one instance can serve
/// any number of sequential or concurrent compositions.
pub trait ImageBackend {
    type Image: Clone;

    /// Fully transparent image of the given size.
    fn blank(&self, extent: Extent) -> Self::Image;

    fn extent(&self, image: &Self::Image) -> Extent;

    fn load(&self, path: &Path) -> CompositorResult<Self::Image>;

    fn to_premultiplied(&self, image: &Self::Image) -> Self::Image;

    /// Resample to exactly `extent`, ignoring aspect ratio.
    fn scale(&self, image: &Self::Image, extent: Extent) -> Self::Image;

    /// Composite `src` onto `dst` with its top-left corner at `at`. Only
    /// destination pixels covered by `src` are touched.
    fn draw(&self, dst: &mut Self::Image, src: &Self::Image, at: Offset, mode: BlendMode);

    fn drop_shadow(&self, image: &Self::Image, shadow: &ShadowSpec) -> Self::Image;

    fn save(&self, image: &Self::Image, path: &Path) -> CompositorResult<()>;
}

/// The four named source images supplied per composition request.
#[derive(Clone, Debug)]
pub struct SourceImages<I> {
    pub cover: Option<I>,
    pub screenshot: Option<I>,
    pub wheel: Option<I>,
    pub marquee: Option<I>,
}

impl<I> Default for SourceImages<I> {
    fn default() -> Self {
        Self {
            cover: None,
            screenshot: None,
            wheel: None,
            marquee: None,
        }
    }
}

impl<I> SourceImages<I> {
    pub fn get(&self, key: ResourceKey) -> Option<&I> {
        match key {
            ResourceKey::Cover => self.cover.as_ref(),
            ResourceKey::Screenshot => self.screenshot.as_ref(),
            ResourceKey::Wheel => self.wheel.as_ref(),
            ResourceKey::Marquee => self.marquee.as_ref(),
        }
    }

    pub fn set(&mut self, key: ResourceKey, image: I) {
        let slot = match key {
            ResourceKey::Cover => &mut self.cover,
            ResourceKey::Screenshot => &mut self.screenshot,
            ResourceKey::Wheel => &mut self.wheel,
            ResourceKey::Marquee => &mut self.marquee,
        };
        *slot = Some(image);
    }

    pub fn with(mut self, key: ResourceKey, image: I) -> Self {
        self.set(key, image);
        self
    }
}
