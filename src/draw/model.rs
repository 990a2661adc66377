use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }
}

/// Colours offered to the user as quick swatches.
pub const SWATCHES: [Color; 10] = [
    Color::rgb(255, 255, 255),
    Color::rgb(238, 48, 20),
    Color::rgb(230, 73, 128),
    Color::rgb(190, 75, 219),
    Color::rgb(130, 143, 255),
    Color::rgb(34, 139, 230),
    Color::rgb(59, 201, 219),
    Color::rgb(64, 192, 87),
    Color::rgb(250, 176, 5),
    Color::rgb(253, 126, 20),
];

/// A position in raster buffer space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_pixel(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub width: u32,
    pub color: Color,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 3,
            color: Color::WHITE,
        }
    }
}
