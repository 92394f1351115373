use crate::{
    foundation::core::Extent,
    model::tree::DeclaredSize,
    render::backend::ImageBackend,
};

/// What to do with a source image given a node's declared size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleOp {
    Keep,
    ToHeight(u32),
    ToWidth(u32),
    Exact(Extent),
}

impl DeclaredSize {
    /// Scale op for plain layers and outputs, where "both unspecified" keeps the source.
    pub fn scale_op(self) -> ScaleOp {
        match (self.width, self.height) {
            (None, None) => ScaleOp::Keep,
            (None, Some(h)) => ScaleOp::ToHeight(h),
            (Some(w), None) => ScaleOp::ToWidth(w),
            (Some(w), Some(h)) => ScaleOp::Exact(Extent::new(w, h)),
        }
    }

    /// Scale op for masks and frames: "both unspecified" stretches to `canvas`.
    pub fn scale_op_fitting(self, canvas: Extent) -> ScaleOp {
        match self.scale_op() {
            ScaleOp::Keep => ScaleOp::Exact(canvas),
            op => op,
        }
    }
}

/// Concrete size a source of extent `src` must be resampled to, or `None`
/// when it stays as it is.
///
/// Aspect-preserving ops round the free axis to the nearest pixel and never
/// collapse it below one pixel. An empty source has no aspect ratio, so only
/// [`ScaleOp::Exact`] produces a non-empty target from it.
pub fn target_extent(src: Extent, op: ScaleOp) -> Option<Extent> {
    let target = match op {
        ScaleOp::Keep => return None,
        ScaleOp::Exact(extent) => extent,
        _ if src.is_empty() => return None,
        ScaleOp::ToHeight(h) => Extent::new(proportional(src.width, h, src.height), h),
        ScaleOp::ToWidth(w) => Extent::new(w, proportional(src.height, w, src.width)),
    };
    (target != src).then_some(target)
}

/// Apply `op` to `image`, resampling only when the size actually changes.
pub fn apply_scale<B: ImageBackend + ?Sized>(backend: &B, image: B::Image, op: ScaleOp) -> B::Image {
    match target_extent(backend.extent(&image), op) {
        Some(extent) => backend.scale(&image, extent),
        None => image,
    }
}

/// `value * num / den`, rounded, at least 1 unless `num` is 0.
fn proportional(value: u32, num: u32, den: u32) -> u32 {
    if num == 0 {
        return 0;
    }
    let scaled = (u64::from(value) * u64::from(num) + u64::from(den) / 2) / u64::from(den);
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/render/scale.rs"]
mod tests;
