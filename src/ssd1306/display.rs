//! One physical display: framebuffer plus protocol session behind a lock
//!
//! Every operation takes `&self` and holds the lock for its whole duration,
//! so callers on different threads serialize instead of interleaving pixel
//! updates or bus transactions. Dropping the display closes it, which blanks
//! the panel and releases the bus.

use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use embedded_hal::i2c::I2c;
use image::DynamicImage;

use crate::config::DisplayConfig;
use crate::ssd1306::driver::{SessionState, Ssd1306};
use crate::ssd1306::error::Result;
use crate::ssd1306::framebuffer::{Framebuffer, Threshold};
use crate::ssd1306::graphics::Canvas;
use crate::ssd1306::stream::BitReverseStream;

struct Inner<I2C> {
    framebuffer: Framebuffer,
    session: Ssd1306<I2C>,
}

/// Initialized SSD1306 with its own framebuffer
pub struct OledDisplay<I2C>
where
    I2C: I2c,
{
    inner: Mutex<Inner<I2C>>,
    width: u32,
    height: u32,
    threshold: Threshold,
}

impl<I2C> OledDisplay<I2C>
where
    I2C: I2c,
{
    /// Open and initialize a 128x64 panel at `address`
    pub fn new(i2c: I2C, address: u8) -> Result<Self> {
        let config = DisplayConfig {
            address,
            ..DisplayConfig::default()
        };
        Self::with_config(i2c, &config)
    }

    /// Open and initialize a panel described by `config`.
    ///
    /// The `bus` field is ignored here; the caller already opened the bus.
    pub fn with_config(i2c: I2C, config: &DisplayConfig) -> Result<Self> {
        let mut session =
            Ssd1306::new(config.width, config.height)?.with_chunk_size(config.chunk_size)?;
        let framebuffer = Framebuffer::new(config.width, config.height)?;

        session.open(i2c, config.address)?;
        session.init()?;

        Ok(OledDisplay {
            inner: Mutex::new(Inner {
                framebuffer,
                session,
            }),
            width: config.width,
            height: config.height,
            threshold: Threshold(config.threshold),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner<I2C>> {
        // a panic mid-operation leaves at worst a half drawn buffer
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Threshold used when composing images
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Current protocol session state
    pub fn state(&self) -> SessionState {
        self.lock().session.state()
    }

    /// Set every buffered pixel on or off
    pub fn clear(&self, on: bool) {
        self.lock().framebuffer.clear(on);
    }

    /// Set one buffered pixel; ignored outside the panel
    pub fn set_pixel(&self, x: i32, y: i32, on: bool) {
        self.lock().framebuffer.set_pixel(x, y, on);
    }

    /// Read one buffered pixel
    pub fn get_pixel(&self, x: i32, y: i32) -> Result<bool> {
        self.lock().framebuffer.get_pixel(x, y)
    }

    /// Fill a rectangle of the buffer, clipped to the panel
    pub fn fill_rect(&self, x: i32, y: i32, width: i32, height: i32, on: bool) {
        self.lock().framebuffer.fill_rect(x, y, width, height, on);
    }

    /// Compose `image` into the buffer at `(x, y)`
    pub fn draw_image(&self, image: &DynamicImage, x: i32, y: i32) -> Result<()> {
        self.lock()
            .framebuffer
            .draw_image(image, x, y, self.threshold)
    }

    /// Load an image file and compose it into the buffer at `(x, y)`
    pub fn draw_image_file(&self, path: impl AsRef<Path>, x: i32, y: i32) -> Result<()> {
        let path = path.as_ref();
        log::info!("Loading image {}", path.display());
        let image = image::open(path)?;
        self.draw_image(&image, x, y)
    }

    /// Overwrite the whole buffer with device-order bytes
    pub fn replace_buffer(&self, bytes: &[u8]) -> Result<()> {
        self.lock().framebuffer.replace_buffer(bytes)
    }

    /// Copy of the buffered bytes
    pub fn buffer(&self) -> Vec<u8> {
        self.lock().framebuffer.buffer().to_vec()
    }

    /// Send the buffer to the panel
    pub fn update(&self) -> Result<()> {
        let mut inner = self.lock();
        let Inner {
            framebuffer,
            session,
        } = &mut *inner;
        session.write_frame(framebuffer.buffer())
    }

    /// Replace the buffer with `bytes` and send it, as one locked step
    pub fn write_display(&self, bytes: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        inner.framebuffer.replace_buffer(bytes)?;
        let Inner {
            framebuffer,
            session,
        } = &mut *inner;
        session.write_frame(framebuffer.buffer())
    }

    /// Switch the panel on or off
    pub fn power(&self, on: bool) -> Result<()> {
        self.lock().session.power(on)
    }

    /// Invert the panel's colors
    pub fn invert(&self, inverted: bool) -> Result<()> {
        self.lock().session.invert(inverted)
    }

    /// Set the panel contrast
    pub fn set_contrast(&self, contrast: u8) -> Result<()> {
        self.lock().session.set_contrast(contrast)
    }

    /// Run `write` against a bit-reversing stream into display RAM.
    ///
    /// The display buffer is not updated; the next [`OledDisplay::update`]
    /// overwrites whatever was streamed.
    pub fn with_data_stream<F>(&self, write: F) -> Result<()>
    where
        F: FnOnce(&mut BitReverseStream<'_, I2C>) -> io::Result<()>,
    {
        let mut inner = self.lock();
        let mut stream = inner.session.data_stream()?;
        write(&mut stream)?;
        Ok(())
    }

    /// Independent drawing surface whose buffer reaches this display on
    /// [`Canvas::push_buffer`]
    pub fn graphics(&self) -> Result<Canvas<'_, I2C>> {
        Canvas::new(self)
    }

    /// Blank the panel and release the bus. Never fails; safe to call twice.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.session.state() == SessionState::Closed {
            return;
        }
        inner.framebuffer.clear(false);
        inner.session.close();
    }
}

#[cfg(feature = "linux")]
impl OledDisplay<linux_embedded_hal::I2cdev> {
    /// Open `/dev/i2c-<bus>` and initialize the panel on it
    pub fn open_linux(config: &DisplayConfig) -> Result<Self> {
        let path = config.device_path();
        log::info!("Opening {} for device 0x{:02X}", path, config.address);
        let i2c = linux_embedded_hal::I2cdev::new(&path).map_err(|e| {
            crate::ssd1306::error::Error::BusOpen {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        Self::with_config(i2c, config)
    }
}

impl<I2C> Drop for OledDisplay<I2C>
where
    I2C: I2c,
{
    fn drop(&mut self) {
        self.close();
    }
}
