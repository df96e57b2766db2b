//! Driver for SSD1306 monochrome OLED displays on an I2C bus
//!
//! Drawing happens in a page-packed 1 bit per pixel buffer that mirrors the
//! controller's RAM; a full frame is sent with one window command pair and a
//! run of fixed size data transactions.
//!
//! ```no_run
//! # #[cfg(feature = "linux")]
//! # fn main() -> pi_oled::ssd1306::Result<()> {
//! use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::*};
//! use pi_oled::{DisplayConfig, OledDisplay};
//!
//! let display = OledDisplay::open_linux(&DisplayConfig::default())?;
//! let mut canvas = display.graphics()?;
//! let _ = Circle::new(Point::new(48, 16), 32)
//!     .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
//!     .draw(&mut canvas);
//! canvas.push_buffer()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "linux"))]
//! # fn main() {}
//! ```

pub mod config;
pub mod ssd1306;

pub use config::DisplayConfig;
pub use ssd1306::{Canvas, Error, Framebuffer, OledDisplay, Result, SessionState, Threshold};
