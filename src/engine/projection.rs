//! Distance → pseudo-3D strip mapping.
//!
//! The engine's only obligation to the 3D view is the ordered distance
//! array plus each ray's angular offset; everything below is a plain
//! per-column transform the presentation layer can consume directly.

use crate::engine::types::Screen;
use crate::engine::visibility::RayHit;

/// One vertical slice of the strip view.
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub x: f32,
    pub width: f32,
    /// Full height in pixels, centred on the horizon line.
    pub height: f32,
    /// 255 = full brightness (near), 0 = black (at the render limit).
    pub shade: u8,
}

/// Perpendicular distances: each hit's distance scaled by the cosine
/// of its angular offset from the facing direction, which flattens the
/// fish-eye curve. The centre ray (offset 0) passes through unchanged.
pub fn correct_fisheye(hits: &[RayHit]) -> Vec<f32> {
    hits.iter().map(|h| h.distance * h.offset.cos()).collect()
}

/// Map ordered per-ray distances to strip columns.
///
/// Column width divides the viewport evenly among the rays; height is
/// inverse to distance (`height_scale / dist`); brightness falls
/// linearly to zero at `render_dist`, and columns past that limit are
/// dropped entirely rather than drawn black.
pub fn project_strip(
    dists: &[f32],
    screen: &Screen,
    render_dist: f32,
    height_scale: f32,
) -> Vec<Column> {
    let width = screen.w as f32 / dists.len() as f32;
    let mut columns = Vec::with_capacity(dists.len());
    for (i, &dist) in dists.iter().enumerate() {
        if dist <= 0.0 || dist > render_dist {
            continue;
        }
        columns.push(Column {
            x: i as f32 * width,
            width,
            height: height_scale / dist,
            shade: map_range(dist, 0.0, render_dist, 255.0, 0.0) as u8,
        });
    }
    columns
}

/// Linear remap of `val` from `in_min..in_max` to `out_min..out_max`.
fn map_range(val: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (out_max - out_min) / (in_max - in_min) * (val - in_min)
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
