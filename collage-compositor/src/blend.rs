//! CPU blend kernels over premultiplied RGBA8 buffers.
//!
//! Normal compositing runs on an integer fast path; the separable modes
//! unpremultiply, apply the per-channel blend function, and recombine with
//! Porter-Duff source-over. Mode dispatch happens once per call, outside the
//! pixel loop.

use collage_core::BlendMode;

use crate::error::{CompositorError, CompositorResult};

/// Convert straight-alpha RGBA bytes to premultiplied, in a fresh buffer.
#[must_use]
pub fn premultiply(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        let a = u16::from(px[3]);
        out.push(mul_div255(u16::from(px[0]), a));
        out.push(mul_div255(u16::from(px[1]), a));
        out.push(mul_div255(u16::from(px[2]), a));
        out.push(px[3]);
    }
    out
}

/// Convert premultiplied RGBA bytes back to straight alpha, in a fresh
/// buffer. Fully transparent pixels come back as four zero bytes.
#[must_use]
pub fn unpremultiply(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        for c in 0..3 {
            let straight = (u32::from(px[c]) * 255 + a / 2) / a;
            out.push(u8::try_from(straight.min(255)).unwrap_or(u8::MAX));
        }
        out.push(px[3]);
    }
    out
}

/// Composite `src` over `dst` in place with the given blend mode.
///
/// Both buffers are premultiplied RGBA8 and must agree in length.
///
/// # Errors
///
/// Returns [`CompositorError::BufferMismatch`] if the buffers differ in
/// length or the length is not a multiple of four.
pub fn composite_over(dst: &mut [u8], src: &[u8], mode: BlendMode) -> CompositorResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CompositorError::BufferMismatch(format!(
            "composite_over expects equal-length rgba8 buffers, got {} and {}",
            dst.len(),
            src.len()
        )));
    }

    match mode {
        BlendMode::Normal => over_in_place(dst, src),
        BlendMode::Multiply => separable(dst, src, |s, d| s * d),
        BlendMode::Screen => separable(dst, src, |s, d| s + d - s * d),
        BlendMode::Overlay => separable(dst, src, |s, d| {
            if d <= 0.5 {
                2.0 * s * d
            } else {
                1.0 - 2.0 * (1.0 - s) * (1.0 - d)
            }
        }),
        BlendMode::Darken => separable(dst, src, f32::min),
        BlendMode::Lighten => separable(dst, src, f32::max),
        BlendMode::Difference => separable(dst, src, |s, d| (d - s).abs()),
    }
    Ok(())
}

/// Integer source-over for premultiplied buffers.
fn over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - u16::from(sa);
        for c in 0..4 {
            d[c] = s[c].saturating_add(mul_div255(u16::from(d[c]), inv));
        }
    }
}

/// Source-over with a separable blend function on unpremultiplied channels:
/// `out_a = sa + da(1-sa)`, `out_p = sp(1-da) + dp(1-sa) + B(sc,dc)·sa·da`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn separable<F>(dst: &mut [u8], src: &[u8], blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = f32::from(s[3]) / 255.0;
        let da = f32::from(d[3]) / 255.0;
        if sa <= 0.0 {
            continue;
        }
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = f32::from(s[c]) / 255.0;
            let dp = f32::from(d[c]) / 255.0;
            let sc = (sp / sa).clamp(0.0, 1.0);
            let dc = if da > 0.0 {
                (dp / da).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let blended = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * (1.0 - sa) + blended * sa * da).clamp(0.0, 1.0);
            d[c] = (out_p * 255.0).round() as u8;
        }
        d[3] = (out_a * 255.0).round() as u8;
    }
}

/// `x * y / 255` with correct rounding.
#[allow(clippy::cast_possible_truncation)]
fn mul_div255(x: u16, y: u16) -> u8 {
    let t = u32::from(x) * u32::from(y) + 128;
    ((t + (t >> 8)) >> 8) as u8
}
