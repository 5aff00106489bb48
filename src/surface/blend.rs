//! Source-over compositing for surface writes

use image::Rgba;

/// Composite `src` over `dst` with Porter-Duff "source over".
///
/// Colors are straight (non-premultiplied) alpha, as stored in PNG.
pub(crate) fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let src_alpha = src[3] as f32 / 255.0;
    if src_alpha >= 1.0 {
        return src;
    }
    let dst_alpha = dst[3] as f32 / 255.0;

    // out_alpha = src_alpha + dst_alpha * (1 - src_alpha)
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let composite = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let result = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (result.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        composite(src[0], dst[0]),
        composite(src[1], dst[1]),
        composite(src[2], dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
