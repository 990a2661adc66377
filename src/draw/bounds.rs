use crate::draw::model::Point;
use crate::draw::raster::RasterSurface;

/// Inclusive pixel extent of the ink on a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl InkBounds {
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x as f64 + self.max_x as f64) / 2.0,
            (self.min_y as f64 + self.max_y as f64) / 2.0,
        )
    }
}

/// Scans every pixel and returns the tight box around all pixels with
/// non-zero alpha. A raster without ink yields the full canvas extent
/// `(0, 0, width, height)`.
pub fn detect_ink_bounds(surface: &RasterSurface) -> InkBounds {
    let width = surface.width() as usize;
    let mut found: Option<InkBounds> = None;

    if width > 0 {
        for (y, row) in surface.pixels().chunks_exact(width * 4).enumerate() {
            for (x, px) in row.chunks_exact(4).enumerate() {
                if px[3] == 0 {
                    continue;
                }
                let (x, y) = (x as u32, y as u32);
                found = Some(match found {
                    None => InkBounds {
                        min_x: x,
                        min_y: y,
                        max_x: x,
                        max_y: y,
                    },
                    Some(b) => InkBounds {
                        min_x: b.min_x.min(x),
                        min_y: b.min_y.min(y),
                        max_x: b.max_x.max(x),
                        max_y: b.max_y.max(y),
                    },
                });
            }
        }
    }

    found.unwrap_or(InkBounds {
        min_x: 0,
        min_y: 0,
        max_x: surface.width(),
        max_y: surface.height(),
    })
}
