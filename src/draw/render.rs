use crate::draw::model::{Color, Point, StrokeStyle};
use crate::draw::raster::RasterSurface;

/// Draws one path segment from `start` to `end` with round joins and caps by
/// stamping a disc of the stroke width at every step of a Bresenham walk.
pub fn draw_segment(surface: &mut RasterSurface, start: Point, end: Point, style: StrokeStyle) {
    let (mut x0, mut y0) = start.to_pixel();
    let (x1, y1) = end.to_pixel();
    let width = style.width.max(1);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        draw_brush(surface, (x0, y0), style.color, width);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Odd widths centre the disc on the pixel. Even widths centre it on the
/// pixel corner at `center`, so a width-2 pen covers a 2x2 block.
fn draw_brush(surface: &mut RasterSurface, center: (i32, i32), color: Color, stroke_width: u32) {
    let width = i64::from(stroke_width.max(1));
    let even = width % 2 == 0;
    let (lo, hi) = if even {
        (-(width / 2), width / 2 - 1)
    } else {
        (-(width - 1) / 2, (width - 1) / 2)
    };
    let limit = if even { width * width } else { (width - 1) * (width - 1) };

    let (cx, cy) = (i64::from(center.0), i64::from(center.1));
    let (surface_w, surface_h) = (i64::from(surface.width()), i64::from(surface.height()));
    let (x_min, x_max) = ((cx + lo).max(0), (cx + hi).min(surface_w - 1));
    let (y_min, y_max) = ((cy + lo).max(0), (cy + hi).min(surface_h - 1));

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            // Doubled coordinates keep the half-pixel offset of even pens integral.
            let (dx, dy) = if even {
                (2 * (x - cx) + 1, 2 * (y - cy) + 1)
            } else {
                (2 * (x - cx), 2 * (y - cy))
            };
            if dx * dx + dy * dy <= limit {
                surface.set_pixel(x as i32, y as i32, color);
            }
        }
    }
}
