use crate::foundation::{
    core::Extent,
    error::{CompositorError, CompositorResult},
};

/// Separable Gaussian blur over a premultiplied RGBA8 buffer. Edges clamp.
///
/// Callers bound `radius` by the image size; taps past the edge only repeat
/// edge pixels.
pub fn blur_rgba8_premul(
    src: &[u8],
    extent: Extent,
    radius: u32,
    sigma: f32,
) -> CompositorResult<Vec<u8>> {
    let expected_len = extent
        .rgba8_len()
        .ok_or_else(|| CompositorError::asset("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(CompositorError::asset(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || extent.is_empty() {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    convolve(src, &mut tmp, extent, &kernel, Axis::Horizontal);
    convolve(&tmp, &mut out, extent, &kernel, Axis::Vertical);
    Ok(out)
}

/// Normalized Q16 taps for `-radius..=radius`, summing to exactly `1 << 16`.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CompositorResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CompositorError::asset("blur sigma must be > 0"));
    }
    let half = usize::try_from(radius)
        .map_err(|_| CompositorError::asset("blur radius too large"))?;
    let taps = half
        .checked_mul(2)
        .and_then(|v| v.checked_add(1))
        .ok_or_else(|| CompositorError::asset("blur radius too large"))?;

    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (0..taps)
        .map(|i| {
            let x = i as f64 - half as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return Err(CompositorError::asset("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    // Rounding drift goes to the centre tap.
    let mid = half;
    weights[mid] = (i64::from(weights[mid]) + 65536 - total).clamp(0, 65536) as u32;

    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn convolve(src: &[u8], dst: &mut [u8], extent: Extent, k: &[u32], axis: Axis) {
    let half = (k.len() / 2) as i64;
    let w = i64::from(extent.width);
    let h = i64::from(extent.height);
    let limit = match axis {
        Axis::Horizontal => w - 1,
        Axis::Vertical => h - 1,
    };

    for y in 0..h {
        for x in 0..w {
            let along = match axis {
                Axis::Horizontal => x,
                Axis::Vertical => y,
            };
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let s = (along + ki as i64 - half).clamp(0, limit);
                let (sx, sy) = match axis {
                    Axis::Horizontal => (s, y),
                    Axis::Vertical => (x, s),
                };
                let idx = ((sy * w + sx) as usize) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for (c, a) in acc.into_iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
