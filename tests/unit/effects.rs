use super::*;
use crate::{
    foundation::core::Extent,
    render::cpu::{CpuBackend, RasterImage},
};

const RED: [u8; 4] = [255, 0, 0, 255];

fn half_alpha_mask() -> RasterImage {
    // 4x2: left half opaque, right half 50% alpha.
    let mut data = Vec::new();
    for _ in 0..2 {
        data.extend_from_slice(&[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 128, 0, 0, 0, 128]);
    }
    RasterImage::from_rgba8(4, 2, data).unwrap()
}

#[test]
fn mask_scaled_to_canvas_halves_right_side_alpha() {
    let b = CpuBackend::default();
    let canvas = RasterImage::filled(Extent::new(8, 4), RED);
    let out = apply_mask(&b, &canvas, &half_alpha_mask(), DeclaredSize::UNSPECIFIED);

    assert_eq!(out.extent(), Extent::new(8, 4));
    for y in 0..4 {
        for x in 0..2 {
            assert_eq!(out.pixel(x, y), Some(RED), "left side at ({x},{y})");
        }
        for x in 6..8 {
            let px = out.pixel(x, y).unwrap();
            assert!((126..=130).contains(&px[3]), "right side alpha {px:?}");
            assert_eq!(px[0], px[3]);
        }
    }
}

#[test]
fn explicit_mask_size_only_affects_its_area() {
    let b = CpuBackend::default();
    let canvas = RasterImage::filled(Extent::new(6, 6), RED);
    let clear = RasterImage::filled(Extent::new(1, 1), [0, 0, 0, 0]);
    let out = apply_mask(&b, &canvas, &clear, DeclaredSize::exact(2, 2));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(out.pixel(2, 2), Some(RED));
}

#[test]
fn empty_mask_leaves_canvas_untouched() {
    let b = CpuBackend::default();
    let canvas = RasterImage::filled(Extent::new(3, 3), RED);
    let empty = RasterImage::transparent(Extent::EMPTY);
    let out = apply_mask(&b, &canvas, &empty, DeclaredSize::UNSPECIFIED);
    assert_eq!(out, canvas);
}

#[test]
fn frame_is_drawn_over_stretched_to_canvas() {
    let b = CpuBackend::default();
    let canvas = RasterImage::filled(Extent::new(4, 4), RED);
    let frame = RasterImage::filled(Extent::new(1, 1), [0, 255, 0, 255]);
    let out = apply_frame(&b, &canvas, &frame, DeclaredSize::UNSPECIFIED);
    assert_eq!(out.pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(out.pixel(3, 3), Some([0, 255, 0, 255]));
}

#[test]
fn transparent_frame_keeps_canvas_pixels() {
    let b = CpuBackend::default();
    let canvas = RasterImage::filled(Extent::new(4, 4), RED);
    let frame = RasterImage::filled(Extent::new(2, 2), [0, 0, 0, 0]);
    let out = apply_frame(&b, &canvas, &frame, DeclaredSize::new(Some(4), None));
    assert_eq!(out.extent(), Extent::new(4, 4));
    assert_eq!(out.pixel(2, 2), Some(RED));
}

#[test]
fn shadow_delegates_to_backend() {
    let b = CpuBackend::default();
    let canvas = RasterImage::filled(Extent::new(2, 2), RED);
    let spec = ShadowSpec {
        distance: 1,
        softness: 0,
        opacity: 255,
    };
    assert_eq!(apply_shadow(&b, &canvas, &spec), b.drop_shadow(&canvas, &spec));
}
