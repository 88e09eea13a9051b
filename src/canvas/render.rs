use crate::canvas::composite::{Rgba, RgbaBuffer};
use crate::canvas::model::BrushConfig;

/// Stamp a filled disk of the brush diameter at `center`.
///
/// Coordinates outside the buffer clamp away naturally; nothing is validated
/// up front.
pub fn stamp_brush(buffer: &mut RgbaBuffer, center: (f32, f32), brush: &BrushConfig) {
    draw_segment(buffer, center, center, brush);
}

/// Rasterize one stroke segment as a capsule: the segment swept by a disk of
/// half the brush width. This gives round caps and round joins for free, so
/// consecutive segments of a polyline meet without notches.
pub fn draw_segment(buffer: &mut RgbaBuffer, start: (f32, f32), end: (f32, f32), brush: &BrushConfig) {
    if buffer.is_empty() {
        return;
    }

    let radius = (brush.width as f32) * 0.5;
    let radius_sq = radius * radius;
    let color = Rgba::opaque(brush.color);

    let min_x = (start.0.min(end.0) - radius).floor() as i64;
    let max_x = (start.0.max(end.0) + radius).ceil() as i64;
    let min_y = (start.1.min(end.1) - radius).floor() as i64;
    let max_y = (start.1.max(end.1) + radius).ceil() as i64;

    let x0 = min_x.clamp(0, buffer.width as i64 - 1) as u32;
    let x1 = max_x.clamp(0, buffer.width as i64 - 1) as u32;
    let y0 = min_y.clamp(0, buffer.height as i64 - 1) as u32;
    let y1 = max_y.clamp(0, buffer.height as i64 - 1) as u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            if point_segment_distance_sq((px, py), start, end) <= radius_sq {
                let idx = ((y * buffer.width + x) * 4) as usize;
                buffer.pixels[idx] = color.r;
                buffer.pixels[idx + 1] = color.g;
                buffer.pixels[idx + 2] = color.b;
                buffer.pixels[idx + 3] = color.a;
            }
        }
    }
}

fn point_segment_distance_sq(point: (f32, f32), start: (f32, f32), end: (f32, f32)) -> f32 {
    let vx = end.0 - start.0;
    let vy = end.1 - start.1;
    let wx = point.0 - start.0;
    let wy = point.1 - start.1;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        return wx * wx + wy * wy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let dx = point.0 - (start.0 + vx * t);
    let dy = point.1 - (start.1 + vy * t);
    dx * dx + dy * dy
}
