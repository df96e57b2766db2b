//! Canonical 1 bit per pixel frame buffer in SSD1306 page layout
//!
//! Mutation never touches the bus. Writes outside the panel are dropped
//! silently while reads outside it fail, so drawing primitives that overshoot
//! an edge never abort half way through.

use image::DynamicImage;

use crate::ssd1306::error::{Error, Result};
use crate::ssd1306::raster::PackedRaster;

/// Luma level at or above which an image pixel becomes an "on" pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold(pub u8);

impl Default for Threshold {
    fn default() -> Self {
        Threshold(128)
    }
}

impl Threshold {
    /// Whether a pixel with this luma and alpha lights up.
    /// Mostly transparent pixels stay dark.
    pub fn is_on(self, luma: u8, alpha: u8) -> bool {
        alpha >= 128 && luma >= self.0
    }
}

/// Owned byte buffer plus the raster that addresses it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    raster: PackedRaster<u8>,
    buffer: Vec<u8>,
}

impl Framebuffer {
    /// Zeroed `width` x `height` buffer
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let raster = PackedRaster::new(width, height, 1)?;
        Ok(Framebuffer {
            buffer: raster.create_buffer(),
            raster,
        })
    }

    /// Binarize `image` into a fresh buffer of the same size
    pub fn from_image(image: &DynamicImage, threshold: Threshold) -> Result<Self> {
        let gray = image.to_luma_alpha8();
        let mut mono = Framebuffer::new(gray.width(), gray.height())?;
        for (x, y, pixel) in gray.enumerate_pixels() {
            let [luma, alpha] = pixel.0;
            mono.set_pixel(x as i32, y as i32, threshold.is_on(luma, alpha));
        }
        Ok(mono)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// The addressing scheme of [`Framebuffer::buffer`]
    pub fn raster(&self) -> &PackedRaster<u8> {
        &self.raster
    }

    /// Raw bytes in device order
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Set every pixel on or off
    pub fn clear(&mut self, on: bool) {
        self.buffer.fill(if on { 0xFF } else { 0x00 });
    }

    /// Turn one pixel on or off. Coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if self.raster.contains(x, y) {
            // in bounds and the buffer always has unit_len bytes
            let written = self.raster.set_pixel(x, y, u32::from(on), &mut self.buffer);
            debug_assert!(written.is_ok(), "in-bounds write failed: {written:?}");
        }
    }

    /// State of one pixel; fails with [`Error::OutOfBounds`] outside the panel
    pub fn get_pixel(&self, x: i32, y: i32) -> Result<bool> {
        Ok(self.raster.get_pixel(x, y, &self.buffer)? != 0)
    }

    /// Set every pixel of a rectangle, clipped to the panel
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, on: bool) {
        let x_end = x.saturating_add(width).min(self.width() as i32);
        let y_end = y.saturating_add(height).min(self.height() as i32);
        for py in y.max(0)..y_end {
            for px in x.max(0)..x_end {
                self.set_pixel(px, py, on);
            }
        }
    }

    /// Binarize `image` and copy it with its top left corner at `(x, y)`.
    ///
    /// Every covered pixel is overwritten, dark image pixels included.
    pub fn draw_image(
        &mut self,
        image: &DynamicImage,
        x: i32,
        y: i32,
        threshold: Threshold,
    ) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(());
        }
        let mono = Framebuffer::from_image(image, threshold)?;
        self.copy_from(&mono, x, y)
    }

    /// Copy all of `source` into this buffer at `(x, y)` with clipping
    pub fn copy_from(&mut self, source: &Framebuffer, x: i32, y: i32) -> Result<()> {
        for sy in 0..source.height() as i32 {
            for sx in 0..source.width() as i32 {
                let on = source.get_pixel(sx, sy)?;
                self.set_pixel(x.saturating_add(sx), y.saturating_add(sy), on);
            }
        }
        Ok(())
    }

    /// Overwrite the whole buffer
    pub fn replace_buffer(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() != self.buffer.len() {
            return Err(Error::SizeMismatch {
                expected: self.buffer.len(),
                actual: bytes.len(),
            });
        }
        self.buffer.copy_from_slice(bytes);
        Ok(())
    }
}
