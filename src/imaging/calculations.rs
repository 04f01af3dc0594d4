//! Pure dimension math. No I/O.

use super::params::Bounds;

/// Largest size that fits inside `bounds` while keeping the aspect ratio.
///
/// Never upscales: an original already inside the box keeps its native size.
/// Each output edge is at least 1px.
///
/// ```text
/// 4000x3000 into 1800x1600 → 1800x1350 (width-limited)
/// 3000x4000 into 1800x1600 → 1200x1600 (height-limited)
/// 800x600   into 1800x1600 → 800x600   (no upscaling)
/// ```
pub fn fit_within(original: (u32, u32), bounds: Bounds) -> (u32, u32) {
    let (w, h) = original;
    if w == 0 || h == 0 || (w <= bounds.width && h <= bounds.height) {
        return (w, h);
    }

    let scale_w = bounds.width as f64 / w as f64;
    let scale_h = bounds.height as f64 / h as f64;
    let scale = scale_w.min(scale_h);

    let out_w = ((w as f64 * scale).round() as u32).clamp(1, bounds.width);
    let out_h = ((h as f64 * scale).round() as u32).clamp(1, bounds.height);
    (out_w, out_h)
}
