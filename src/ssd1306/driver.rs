//! SSD1306 Display Driver Implementation
//!
//! This module contains the protocol session for one SSD1306 controller: the
//! power-up sequence, the addressing window, full-frame transfers and the
//! small set of runtime commands (power, polarity, contrast).
//!
//! ## Session states
//!
//! ```text
//! Uninitialized --open--> Initializing --init--> Ready <--power--> Off
//!                                                  |                |
//!                                                  +-----close------+--> Closed
//! ```
//!
//! - `write_frame()` and `data_stream()` require `Ready`
//! - `power()`, `invert()` and `set_contrast()` work in `Ready` and `Off`
//! - `close()` works from any state and is idempotent
//!
//! A failed `init()` moves the session straight to `Closed`. Nothing about a
//! half-initialized controller is trusted; [`Ssd1306::release`] hands the bus
//! back so the caller can start over with a new session.
//!
//! ## Frame transfers
//!
//! The controller runs in horizontal addressing mode: after the column and
//! page window is set, each data byte lands in the next column and wraps to
//! the next page at the right edge of the window. A full frame is therefore
//! the framebuffer bytes in order, split into `chunk_size` byte transactions.

use embedded_hal::i2c::I2c;

use crate::ssd1306::cmd::Cmd;
use crate::ssd1306::error::{Error, Result};
use crate::ssd1306::flag::Flag;
use crate::ssd1306::interface::{I2cInterface, MAX_DATA_CHUNK};
use crate::ssd1306::stream::BitReverseStream;
use crate::ssd1306::MAX_WIDTH;

/// Bytes per data transaction used by the reference sequence
pub const DEFAULT_CHUNK_SIZE: usize = 16;

/// Lifecycle of a protocol session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Geometry known, no bus yet
    Uninitialized,
    /// Bus acquired, power-up sequence not yet sent
    Initializing,
    /// Panel on and accepting frames
    Ready,
    /// Panel switched off, RAM retained
    Off,
    /// Bus released; terminal
    Closed,
}

/// SSD1306 protocol session
///
/// Owns the bus exclusively from `open()` until `close()`.
pub struct Ssd1306<I2C> {
    interface: Option<I2cInterface<I2C>>,
    width: u32,
    height: u32,
    chunk_size: usize,
    state: SessionState,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    /// Session for a `width` x `height` panel.
    ///
    /// Widths of 1 to 128 columns and heights of 16, 32 or 64 rows are
    /// supported. The chunk size starts at [`DEFAULT_CHUNK_SIZE`] and is
    /// checked against the frame length when the bus is opened.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || width > u32::from(MAX_WIDTH) {
            return Err(Error::config(format!(
                "width {width} outside 1..={MAX_WIDTH} columns"
            )));
        }
        if !matches!(height, 16 | 32 | 64) {
            return Err(Error::config(format!(
                "height {height} is not one of 16, 32 or 64 rows"
            )));
        }

        Ok(Ssd1306 {
            interface: None,
            width,
            height,
            chunk_size: DEFAULT_CHUNK_SIZE,
            state: SessionState::Uninitialized,
        })
    }

    /// Change the number of bytes per data transaction.
    ///
    /// Must be between 1 and [`MAX_DATA_CHUNK`] and divide the frame length.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_size > MAX_DATA_CHUNK {
            return Err(Error::config(format!(
                "chunk size {chunk_size} outside 1..={MAX_DATA_CHUNK}"
            )));
        }
        if self.frame_len() % chunk_size != 0 {
            return Err(Error::config(format!(
                "chunk size {chunk_size} does not divide the {} byte frame",
                self.frame_len()
            )));
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    /// Panel width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Panel height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of 8-row pages
    pub fn page_count(&self) -> u32 {
        self.height / 8
    }

    /// Bytes in one full frame
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.page_count() as usize
    }

    /// Bytes per data transaction
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Take ownership of the bus for the device at `address`
    pub fn open(&mut self, i2c: I2C, address: u8) -> Result<()> {
        self.require("open the bus", &[SessionState::Uninitialized])?;
        if self.frame_len() % self.chunk_size != 0 {
            return Err(Error::config(format!(
                "chunk size {} does not divide the {} byte frame",
                self.chunk_size,
                self.frame_len()
            )));
        }
        log::info!("Opened I2C device at 0x{:02X}", address);
        self.interface = Some(I2cInterface::new(i2c, address));
        self.state = SessionState::Initializing;
        Ok(())
    }

    /// Send the power-up sequence, clear the display RAM and switch the panel on
    pub fn init(&mut self) -> Result<()> {
        self.require("initialize", &[SessionState::Initializing])?;
        log::info!(
            "Initializing {}x{} SSD1306 display",
            self.width,
            self.height
        );

        match self.power_up() {
            Ok(()) => {
                self.state = SessionState::Ready;
                log::info!("Display initialization successful");
                Ok(())
            }
            Err(e) => {
                log::error!("Display initialization failed: {}", e);
                self.state = SessionState::Closed;
                Err(e)
            }
        }
    }

    fn power_up(&mut self) -> Result<()> {
        let multiplex = (self.height - 1) as u8;
        let com_pins = if self.height == 64 {
            Flag::COM_PINS_ALTERNATIVE
        } else {
            Flag::COM_PINS_SEQUENTIAL
        };

        let iface = self.interface()?;

        // Panel off while the controller is configured
        iface.cmd(Cmd::DISPLAY_OFF)?;

        // Timing and multiplexing
        iface.cmd_with_args(Cmd::SET_DISPLAY_CLOCK_DIV, &[Flag::CLOCK_DIV_DEFAULT])?;
        iface.cmd_with_args(Cmd::SET_MULTIPLEX, &[multiplex])?;
        iface.cmd_with_args(Cmd::SET_DISPLAY_OFFSET, &[Flag::DISPLAY_OFFSET_NONE])?;
        iface.cmd(Cmd::SET_START_LINE | Flag::START_LINE_ZERO)?;

        // Internal DC/DC for the panel supply
        iface.cmd_with_args(Cmd::CHARGE_PUMP, &[Flag::CHARGE_PUMP_ENABLE])?;

        // Horizontal addressing so a frame streams as one run of bytes
        iface.cmd_with_args(Cmd::MEMORY_MODE, &[Flag::MEMORY_MODE_HORIZONTAL])?;

        // Orientation: column 127 is SEG0, COM scan from COM[N-1] to COM0
        iface.cmd(Cmd::SEG_REMAP | Flag::SEG_REMAP_REVERSED)?;
        iface.cmd(Cmd::COM_SCAN_DEC)?;
        iface.cmd_with_args(Cmd::SET_COM_PINS, &[com_pins])?;

        // Driving levels
        iface.cmd_with_args(Cmd::SET_CONTRAST, &[Flag::CONTRAST_DEFAULT])?;
        iface.cmd_with_args(Cmd::SET_PRECHARGE, &[Flag::PRECHARGE_DEFAULT])?;
        iface.cmd_with_args(Cmd::SET_VCOM_DETECT, &[Flag::VCOM_DESELECT_DEFAULT])?;

        // Show RAM content, non-inverted
        iface.cmd(Cmd::DISPLAY_ALL_ON_RESUME)?;
        iface.cmd(Cmd::NORMAL_DISPLAY)?;

        // Power-on RAM content is random
        let blank = vec![0u8; self.frame_len()];
        self.push_frame(&blank)?;

        self.interface()?.cmd(Cmd::DISPLAY_ON)?;
        Ok(())
    }

    /// Restrict the next data writes to columns `col_start..=col_end` of
    /// pages `page_start..=page_end`
    pub fn set_address_window(
        &mut self,
        col_start: u8,
        col_end: u8,
        page_start: u8,
        page_end: u8,
    ) -> Result<()> {
        self.require(
            "set the address window",
            &[
                SessionState::Initializing,
                SessionState::Ready,
                SessionState::Off,
            ],
        )?;
        if col_start > col_end || u32::from(col_end) >= self.width {
            return Err(Error::config(format!(
                "column window {col_start}..={col_end} outside 0..{}",
                self.width
            )));
        }
        if page_start > page_end || u32::from(page_end) >= self.page_count() {
            return Err(Error::config(format!(
                "page window {page_start}..={page_end} outside 0..{}",
                self.page_count()
            )));
        }

        log::debug!(
            "set_address_window: columns {}-{}, pages {}-{}",
            col_start,
            col_end,
            page_start,
            page_end
        );
        let iface = self.interface()?;
        iface.cmd_with_args(Cmd::COLUMN_ADDR, &[col_start, col_end])?;
        iface.cmd_with_args(Cmd::PAGE_ADDR, &[page_start, page_end])?;
        Ok(())
    }

    /// Send a complete frame in device byte order
    pub fn write_frame(&mut self, buffer: &[u8]) -> Result<()> {
        self.require("write a frame", &[SessionState::Ready])?;
        self.push_frame(buffer)
    }

    fn push_frame(&mut self, buffer: &[u8]) -> Result<()> {
        if buffer.len() != self.frame_len() {
            return Err(Error::SizeMismatch {
                expected: self.frame_len(),
                actual: buffer.len(),
            });
        }

        self.set_full_window()?;

        let chunk_size = self.chunk_size;
        log::debug!(
            "Writing {} bytes in {} chunks",
            buffer.len(),
            buffer.len() / chunk_size
        );
        let iface = self.interface()?;
        for chunk in buffer.chunks(chunk_size) {
            iface.data(chunk)?;
        }
        Ok(())
    }

    fn set_full_window(&mut self) -> Result<()> {
        let col_end = (self.width - 1) as u8;
        let page_end = (self.page_count() - 1) as u8;
        self.set_address_window(0, col_end, 0, page_end)
    }

    /// Switch the panel on or off. RAM content is kept.
    pub fn power(&mut self, on: bool) -> Result<()> {
        self.require(
            "change power",
            &[SessionState::Ready, SessionState::Off],
        )?;
        log::info!("Switching display {}", if on { "on" } else { "off" });
        let command = if on { Cmd::DISPLAY_ON } else { Cmd::DISPLAY_OFF };
        self.interface()?.cmd(command)?;
        self.state = if on {
            SessionState::Ready
        } else {
            SessionState::Off
        };
        Ok(())
    }

    /// Invert display colors
    pub fn invert(&mut self, inverted: bool) -> Result<()> {
        self.require(
            "change polarity",
            &[SessionState::Ready, SessionState::Off],
        )?;
        let command = if inverted {
            Cmd::INVERT_DISPLAY
        } else {
            Cmd::NORMAL_DISPLAY
        };
        self.interface()?.cmd(command)?;
        Ok(())
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<()> {
        self.require(
            "change contrast",
            &[SessionState::Ready, SessionState::Off],
        )?;
        self.interface()?
            .cmd_with_args(Cmd::SET_CONTRAST, &[contrast])?;
        Ok(())
    }

    /// Byte sink that bit-reverses and streams into display RAM from the
    /// top left corner
    pub fn data_stream(&mut self) -> Result<BitReverseStream<'_, I2C>> {
        self.require("stream data", &[SessionState::Ready])?;
        self.set_full_window()?;
        let chunk_size = self.chunk_size;
        Ok(BitReverseStream::new(self.interface()?, chunk_size))
    }

    /// Blank the panel, release the bus and end the session.
    ///
    /// Failures while blanking are logged and otherwise ignored. Calling
    /// `close()` on a closed session does nothing.
    pub fn close(&mut self) {
        match self.state {
            SessionState::Closed => return,
            SessionState::Uninitialized => {}
            _ => {
                let blank = vec![0u8; self.frame_len()];
                if let Err(e) = self.push_frame(&blank) {
                    log::warn!("Failed to clear display before closing: {}", e);
                }
            }
        }

        if self.interface.take().is_some() {
            log::info!("Closing I2C bus");
        }
        self.state = SessionState::Closed;
    }

    /// Give the bus back, if the session still holds it
    pub fn release(mut self) -> Option<I2C> {
        self.interface.take().map(I2cInterface::release)
    }

    fn interface(&mut self) -> Result<&mut I2cInterface<I2C>> {
        let state = self.state;
        self.interface.as_mut().ok_or(Error::InvalidState {
            operation: "access the bus",
            state,
        })
    }

    fn require(&self, operation: &'static str, allowed: &[SessionState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

/// Exact power-up command bytes for a 128x64 panel, display-on excluded
#[cfg(test)]
pub(crate) const REFERENCE_INIT: [u8; 24] = [
    0xAE, 0xD5, 0x80, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1, 0xC8, 0xDA,
    0x12, 0x81, 0xCF, 0xD9, 0xF1, 0xDB, 0x40, 0xA4, 0xA6,
];
