//! SSD1306 OLED Display Driver
//!
//! Used with the common 0.96" 128x64 I2C OLED modules (and their 128x32 and
//! 128x16 siblings) wired to a Raspberry Pi or any other `embedded-hal` I2C bus.
//!
//! ### Memory layout
//! Display RAM is split into pages of 8 rows. Each byte holds one column of
//! one page, with bit 0 as the top row of that page. The byte for pixel
//! `(x, y)` is `x + (y / 8) * width` and its bit is `y % 8`.
//! [`raster::PackedRaster`] implements this addressing for any pixel depth
//! that divides the storage unit.
//!
//! ### Usage
//! To display something you:
//!
//! 1. open the display with [`display::OledDisplay::new`] (or `open_linux`
//!    on a Pi), which sends the power-up sequence
//! 1. draw into its buffer directly, or through a [`graphics::Canvas`] with
//!    [`embedded_graphics`](https://github.com/embedded-graphics/embedded-graphics)
//! 1. send the frame using [`display::OledDisplay::update`] or
//!    [`graphics::Canvas::push_buffer`]
//!
//! Dropping the display blanks the panel and releases the bus.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod cmd;
pub mod display;
pub mod driver;
pub mod error;
pub mod flag;
pub mod framebuffer;
pub mod graphics;
pub mod interface;
pub mod raster;
pub mod stream;

#[cfg(test)]
pub(crate) mod testing;

/// Maximum display width this driver supports
pub const MAX_WIDTH: u16 = 128;

/// Maximum display height this driver supports
pub const MAX_HEIGHT: u16 = 64;

/// Default display width, pixels horizontally
pub const WIDTH: u16 = 128;

/// Default display height, pixels vertically
pub const HEIGHT: u16 = 64;

pub use display::OledDisplay;
pub use driver::{SessionState, Ssd1306};
pub use error::{Error, Result};
pub use framebuffer::{Framebuffer, Threshold};
pub use graphics::Canvas;
pub use raster::PackedRaster;
pub use stream::{reverse_bits, BitReverseStream};
