use std::{borrow::Cow, path::Path};

use anyhow::Context;
use image::imageops::{self, FilterType};

use crate::{
    foundation::{
        config::{CompositorConfig, PersistDepth},
        core::{Extent, Offset},
        error::{CompositorError, CompositorResult},
    },
    model::tree::ShadowSpec,
    render::{
        backend::{BlendMode, ImageBackend},
        blur::blur_rgba8_premul,
        composite::{
            demultiply, destination_in, mul_div255, over, premultiply_in_place, quantize_6bit,
        },
    },
};

/// Row-major, tightly packed RGBA8 image.
///
/// `data` always holds exactly `width * height * 4` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
    /// Whether `data` holds premultiplied color.
    premultiplied: bool,
}

impl RasterImage {
    /// Fully transparent image. Sizes past [`Extent::MAX_PIXELS`] give an
    /// empty image instead.
    pub fn transparent(extent: Extent) -> Self {
        let extent = allocatable_or_empty(extent);
        Self {
            width: extent.width,
            height: extent.height,
            data: vec![0; extent.pixel_count() * 4],
            premultiplied: true,
        }
    }

    /// Wrap straight (non-premultiplied) RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> CompositorResult<Self> {
        let expected = Extent::new(width, height)
            .rgba8_len()
            .ok_or_else(|| CompositorError::asset("image size overflow"))?;
        if data.len() != expected {
            return Err(CompositorError::asset(format!(
                "rgba8 buffer of {} bytes does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied: false,
        })
    }

    /// Solid straight-alpha color, mostly useful for building fixtures.
    pub fn filled(extent: Extent, rgba: [u8; 4]) -> Self {
        let extent = allocatable_or_empty(extent);
        Self {
            width: extent.width,
            height: extent.height,
            data: rgba.repeat(extent.pixel_count()),
            premultiplied: false,
        }
    }

    /// Decode any format the `image` crate understands into premultiplied pixels.
    pub fn decode(bytes: &[u8]) -> CompositorResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();
        premultiply_in_place(&mut data);
        Ok(Self {
            width,
            height,
            data,
            premultiplied: true,
        })
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_premultiplied(&self) -> bool {
        self.premultiplied
    }

    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    pub fn premultiplied(&self) -> Cow<'_, RasterImage> {
        if self.premultiplied {
            return Cow::Borrowed(self);
        }
        let mut data = self.data.clone();
        premultiply_in_place(&mut data);
        Cow::Owned(Self {
            width: self.width,
            height: self.height,
            data,
            premultiplied: true,
        })
    }

    /// Straight RGBA8 bytes, reduced to `depth`.
    fn persisted_bytes(&self, depth: PersistDepth) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let px = [px[0], px[1], px[2], px[3]];
            let straight = if self.premultiplied { demultiply(px) } else { px };
            match depth {
                PersistDepth::Rgba8 => out.extend_from_slice(&straight),
                PersistDepth::Rgba6666 => out.extend(straight.map(quantize_6bit)),
            }
        }
        out
    }
}

fn allocatable_or_empty(extent: Extent) -> Extent {
    if extent.is_allocatable() {
        return extent;
    }
    tracing::warn!(
        width = extent.width,
        height = extent.height,
        max_pixels = Extent::MAX_PIXELS,
        "image size over the pixel limit, using an empty image"
    );
    Extent::EMPTY
}

#[derive(Clone, Debug, Default)]
pub struct CpuSettings {
    pub persist_depth: PersistDepth,
}

/// [`ImageBackend`] on the CPU using the `image` crate for decode, resample and PNG output.
#[derive(Clone, Debug, Default)]
pub struct CpuBackend {
    settings: CpuSettings,
}

impl CpuBackend {
    pub fn new(settings: CpuSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &CompositorConfig) -> Self {
        Self::new(CpuSettings {
            persist_depth: config.persist_depth,
        })
    }
}

impl ImageBackend for CpuBackend {
    type Image = RasterImage;

    fn blank(&self, extent: Extent) -> RasterImage {
        RasterImage::transparent(extent)
    }

    fn extent(&self, image: &RasterImage) -> Extent {
        image.extent()
    }

    fn load(&self, path: &Path) -> CompositorResult<RasterImage> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        RasterImage::decode(&bytes)
    }

    fn to_premultiplied(&self, image: &RasterImage) -> RasterImage {
        image.premultiplied().into_owned()
    }

    fn scale(&self, image: &RasterImage, extent: Extent) -> RasterImage {
        if image.extent().is_empty() || !extent.is_allocatable() || extent.is_empty() {
            return RasterImage::transparent(extent);
        }
        let src = image.premultiplied();
        let Some(buf) = image::RgbaImage::from_raw(src.width, src.height, src.data.clone()) else {
            tracing::warn!(
                width = src.width,
                height = src.height,
                "pixel buffer does not match image size, scaling to transparent"
            );
            return RasterImage::transparent(extent);
        };
        // Resampling premultiplied data keeps transparent edges from bleeding color.
        let resized = imageops::resize(&buf, extent.width, extent.height, FilterType::Triangle);
        RasterImage {
            width: extent.width,
            height: extent.height,
            data: resized.into_raw(),
            premultiplied: true,
        }
    }

    fn draw(&self, dst: &mut RasterImage, src: &RasterImage, at: Offset, mode: BlendMode) {
        if !dst.premultiplied {
            *dst = dst.premultiplied().into_owned();
        }
        let src = src.premultiplied();

        let (dw, dh) = (i64::from(dst.width), i64::from(dst.height));
        let sw = i64::from(src.width);
        let x0 = at.x.max(0);
        let y0 = at.y.max(0);
        let x1 = (at.x + sw).min(dw);
        let y1 = (at.y + i64::from(src.height)).min(dh);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                let si = (((y - at.y) * sw + (x - at.x)) as usize) * 4;
                let di = ((y * dw + x) as usize) * 4;
                let s = [
                    src.data[si],
                    src.data[si + 1],
                    src.data[si + 2],
                    src.data[si + 3],
                ];
                let d = [
                    dst.data[di],
                    dst.data[di + 1],
                    dst.data[di + 2],
                    dst.data[di + 3],
                ];
                let out = match mode {
                    BlendMode::SourceOver => over(d, s),
                    BlendMode::DestinationIn => destination_in(d, s),
                };
                dst.data[di..di + 4].copy_from_slice(&out);
            }
        }
    }

    fn drop_shadow(&self, image: &RasterImage, shadow: &ShadowSpec) -> RasterImage {
        let base = image.premultiplied().into_owned();
        let extent = base.extent();
        if extent.is_empty() || shadow.opacity == 0 {
            return base;
        }

        let opacity = u16::from(shadow.opacity);
        let mut silhouette = vec![0u8; base.data.len()];
        for (d, s) in silhouette.chunks_exact_mut(4).zip(base.data.chunks_exact(4)) {
            d[3] = mul_div255(u16::from(s[3]), opacity);
        }

        // A kernel wider than the image only repeats edge pixels.
        let radius = shadow.softness.min(extent.width.max(extent.height));
        let blurred = if radius == 0 {
            silhouette
        } else {
            match blur_rgba8_premul(&silhouette, extent, radius, shadow.softness as f32 / 2.0) {
                Ok(blurred) => blurred,
                Err(err) => {
                    tracing::warn!(error = %err, "shadow blur failed, using a hard shadow");
                    silhouette
                }
            }
        };

        let shadow_img = RasterImage {
            width: extent.width,
            height: extent.height,
            data: blurred,
            premultiplied: true,
        };
        let distance = i64::from(shadow.distance);
        let mut out = RasterImage::transparent(extent);
        self.draw(
            &mut out,
            &shadow_img,
            Offset::new(distance, distance),
            BlendMode::SourceOver,
        );
        self.draw(&mut out, &base, Offset::ZERO, BlendMode::SourceOver);
        out
    }

    fn save(&self, image: &RasterImage, path: &Path) -> CompositorResult<()> {
        if image.extent().is_empty() {
            return Err(CompositorError::persist(format!(
                "refusing to write empty image to '{}'",
                path.display()
            )));
        }
        let bytes = image.persisted_bytes(self.settings.persist_depth);
        image::save_buffer_with_format(
            path,
            &bytes,
            image.width,
            image.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
