use crate::{
    codec::backend::Raster,
    foundation::{error::PhotomaskResult, math::mul_div255_u8},
};

/// Straight RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Blend straight-alpha `src` over `dst`: `rgb = src * a + dst * (1 - a)`.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    let inv = 255 - sa;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), sa);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out[3] = src[3].saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    out
}

/// Composite `overlay` onto `base` with its top-left corner at `(left, top)`.
///
/// Only the intersection with `base` is touched; everything else is dropped.
pub fn over_at(base: &mut Raster, overlay: &Raster, left: i64, top: i64) -> PhotomaskResult<()> {
    let base_w = i64::from(base.width);
    let base_h = i64::from(base.height);

    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + i64::from(overlay.width)).min(base_w);
    let y1 = (top + i64::from(overlay.height)).min(base_h);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let span = (x1 - x0) as usize;
    let base_stride = base.width as usize * 4;
    let overlay_stride = overlay.width as usize * 4;
    for y in y0..y1 {
        let b_start = y as usize * base_stride + x0 as usize * 4;
        let o_start = (y - top) as usize * overlay_stride + (x0 - left) as usize * 4;
        let dst_row = &mut base.data[b_start..b_start + span * 4];
        let src_row = &overlay.data[o_start..o_start + span * 4];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
