use crate::draw::model::Color;
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageFormat};

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// RGBA8 pixel buffer sized to the viewport. Alpha separates ink from the
/// transparent background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

fn buffer_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; buffer_len(width, height)],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != buffer_len(width, height) {
            return Err(anyhow!(
                "pixel buffer of {} bytes does not match {}x{} rgba",
                pixels.len(),
                width,
                height
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        Some(Color::rgba(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ))
    }

    /// Writes one pixel; coordinates outside the surface are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_rgba_array());
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Resizes the surface, keeping existing content anchored at the origin.
    /// Content outside the new extent is clipped.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size() == (width, height) {
            return;
        }
        let previous = std::mem::replace(self, Self::new(width, height));
        self.blit_at_origin(&previous);
    }

    /// Clears the surface and draws `source` at the origin, clipped to this
    /// surface. Never blends with prior content.
    pub fn replace_with(&mut self, source: &RasterSurface) {
        if self.size() == source.size() {
            self.pixels.copy_from_slice(&source.pixels);
            return;
        }
        self.clear();
        self.blit_at_origin(source);
    }

    fn blit_at_origin(&mut self, source: &RasterSurface) {
        let copy_w = self.width.min(source.width) as usize;
        let copy_h = self.height.min(source.height) as usize;
        if copy_w == 0 {
            return;
        }
        for y in 0..copy_h {
            let src = y * source.width as usize * 4;
            let dst = y * self.width as usize * 4;
            self.pixels[dst..dst + copy_w * 4]
                .copy_from_slice(&source.pixels[src..src + copy_w * 4]);
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&self.pixels, self.width, self.height, ColorType::Rgba8)
            .with_context(|| format!("encode {}x{} raster as png", self.width, self.height))?;
        Ok(out)
    }

    pub fn decode_png(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .context("decode png raster")?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_pixels(width, height, image.into_raw())
    }

    /// Encodes the surface as a `data:image/png;base64,...` string.
    pub fn to_data_uri(&self) -> Result<String> {
        let png = self.encode_png()?;
        Ok(format!(
            "{PNG_DATA_URI_PREFIX}{}",
            general_purpose::STANDARD.encode(png)
        ))
    }
}

/// Immutable PNG encoding of a raster at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    png: Vec<u8>,
}

impl Snapshot {
    pub fn capture(surface: &RasterSurface) -> Result<Self> {
        Ok(Self {
            png: surface.encode_png()?,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn restore_into(&self, surface: &mut RasterSurface) -> Result<()> {
        let decoded = RasterSurface::decode_png(&self.png)?;
        surface.replace_with(&decoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn resize_preserves_content_at_origin() {
        let mut surface = RasterSurface::new(4, 4);
        surface.set_pixel(1, 2, RED);
        surface.set_pixel(3, 3, RED);

        surface.resize(8, 3);
        assert_eq!(surface.size(), (8, 3));
        assert_eq!(surface.pixel(1, 2), Some(RED));
        assert_eq!(surface.pixel(7, 2), Some(Color::TRANSPARENT));

        surface.resize(2, 2);
        assert!(surface.is_blank());
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut surface = RasterSurface::new(2, 2);
        surface.set_pixel(-1, 0, RED);
        surface.set_pixel(0, 2, RED);
        assert!(surface.is_blank());
        assert_eq!(surface.pixel(2, 0), None);
    }

    #[test]
    fn snapshot_restore_replaces_instead_of_blending() {
        let mut surface = RasterSurface::new(5, 5);
        surface.set_pixel(0, 0, RED);
        let snapshot = Snapshot::capture(&surface).expect("capture");

        surface.set_pixel(4, 4, Color::WHITE);
        snapshot.restore_into(&mut surface).expect("restore");

        assert_eq!(surface.pixel(0, 0), Some(RED));
        assert_eq!(surface.pixel(4, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn smaller_snapshot_is_drawn_at_origin_after_clear() {
        let mut small = RasterSurface::new(2, 2);
        small.set_pixel(1, 1, RED);
        let snapshot = Snapshot::capture(&small).expect("capture");

        let mut surface = RasterSurface::new(4, 4);
        surface.set_pixel(3, 3, Color::WHITE);
        snapshot.restore_into(&mut surface).expect("restore");

        assert_eq!(surface.size(), (4, 4));
        assert_eq!(surface.pixel(1, 1), Some(RED));
        assert_eq!(surface.pixel(3, 3), Some(Color::TRANSPARENT));
    }

    #[test]
    fn data_uri_carries_png_payload() {
        let surface = RasterSurface::new(3, 2);
        let uri = surface.to_data_uri().expect("data uri");
        let payload = uri.strip_prefix(PNG_DATA_URI_PREFIX).expect("prefix");
        let png = general_purpose::STANDARD.decode(payload).expect("base64");
        let decoded = RasterSurface::decode_png(&png).expect("decode");
        assert_eq!(decoded.size(), (3, 2));
    }

    #[test]
    fn from_pixels_rejects_wrong_length() {
        assert!(RasterSurface::from_pixels(2, 2, vec![0; 15]).is_err());
    }
}
