//! Error taxonomy shared by the raster, framebuffer and protocol layers
pub use display_interface::DisplayError;
use thiserror::Error;

use crate::ssd1306::driver::SessionState;

/// Result alias used throughout the driver
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can go wrong between a drawing call and the bus
#[derive(Debug, Error)]
pub enum Error {
    /// Raster or display geometry that cannot be represented
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A read outside the raster extent. Writes never produce this.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} raster")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// A buffer that does not have the length the geometry requires
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Transport failure during a command or data write
    #[error("bus transaction failed: {0:?}")]
    Bus(DisplayError),

    /// The session is not in a state that allows the operation
    #[error("cannot {operation} while the display is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// The bus device node could not be opened
    #[error("unable to open {path}: {reason}")]
    BusOpen { path: String, reason: String },

    /// An image file could not be loaded for composition
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Failure reported by a stream writer
    #[error("stream write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Error::Bus(e)
    }
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
