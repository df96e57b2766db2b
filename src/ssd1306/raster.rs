//! Column-major packed raster addressing
//!
//! The SSD1306 stores its RAM as pages: each byte holds eight vertically
//! stacked pixels, least significant bit on top, and consecutive bytes sweep
//! left to right across the panel. [`PackedRaster`] makes that layout the
//! native addressing scheme so drawing code writes straight into the bytes
//! that go over the wire, with no transpose on flush.
//!
//! A pixel at `(x, y)` lives in storage unit
//! `floor(y / pixels_per_unit) * width + x` at bit shift
//! `(y mod pixels_per_unit) * bits_per_pixel`. The raster only describes the
//! layout; the buffer it addresses is passed to every accessor.
//!
//! Storage units may be `u8`, `u16` or `u32` and pixels may be any power of
//! two bits deep as long as they never straddle a unit boundary.

use core::fmt::Debug;
use core::marker::PhantomData;

use crate::ssd1306::error::{Error, Result};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// Width class of a storage unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// 8-bit units
    Byte,
    /// 16-bit units
    Short,
    /// 32-bit units
    Int,
}

impl UnitKind {
    /// Number of bits in one unit of this kind
    pub const fn bits(self) -> u32 {
        match self {
            UnitKind::Byte => 8,
            UnitKind::Short => 16,
            UnitKind::Int => 32,
        }
    }
}

/// An unsigned integer a raster can pack pixels into
pub trait StorageUnit: Copy + Default + Eq + Debug + sealed::Sealed {
    /// Kind tag used for raster equality and reporting
    const KIND: UnitKind;
    /// Bits in one unit
    const BITS: u32;
    /// Widen to `u32`
    fn to_u32(self) -> u32;
    /// Narrow from `u32`, discarding bits that do not fit
    fn from_u32(value: u32) -> Self;
}

impl StorageUnit for u8 {
    const KIND: UnitKind = UnitKind::Byte;
    const BITS: u32 = 8;

    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    fn from_u32(value: u32) -> Self {
        value as u8
    }
}

impl StorageUnit for u16 {
    const KIND: UnitKind = UnitKind::Short;
    const BITS: u32 = 16;

    fn to_u32(self) -> u32 {
        u32::from(self)
    }

    fn from_u32(value: u32) -> Self {
        value as u16
    }
}

impl StorageUnit for u32 {
    const KIND: UnitKind = UnitKind::Int;
    const BITS: u32 = 32;

    fn to_u32(self) -> u32 {
        self
    }

    fn from_u32(value: u32) -> Self {
        value
    }
}

/// Smallest integer type that can carry one sample of a given depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferType {
    /// Depths up to 8 bits
    Byte,
    /// Depths of 9 to 16 bits
    Short,
    /// Depths of 17 to 32 bits
    Int,
}

impl TransferType {
    fn for_depth(bits_per_pixel: u32) -> Self {
        if bits_per_pixel > 16 {
            TransferType::Int
        } else if bits_per_pixel > 8 {
            TransferType::Short
        } else {
            TransferType::Byte
        }
    }
}

/// One pixel's sample carried in its [`TransferType`]
///
/// Used by block copies that move pixels between rasters without
/// interpreting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferBlock {
    /// Sample of a pixel up to 8 bits deep
    Byte(u8),
    /// Sample of a pixel up to 16 bits deep
    Short(u16),
    /// Sample of a pixel up to 32 bits deep
    Int(u32),
}

impl TransferBlock {
    /// The carried sample, widened
    pub fn value(self) -> u32 {
        match self {
            TransferBlock::Byte(v) => u32::from(v),
            TransferBlock::Short(v) => u32::from(v),
            TransferBlock::Int(v) => v,
        }
    }

    fn new(kind: TransferType, sample: u32) -> Self {
        match kind {
            TransferType::Byte => TransferBlock::Byte(sample as u8),
            TransferType::Short => TransferBlock::Short(sample as u16),
            TransferType::Int => TransferBlock::Int(sample),
        }
    }
}

/// Layout descriptor for a column-major packed buffer of `U` units
///
/// Two rasters compare equal when every layout parameter matches, so
/// descriptors can be copied and compared freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedRaster<U: StorageUnit = u8> {
    width: u32,
    height: u32,
    bits_per_pixel: u32,
    pixels_per_unit: u32,
    bit_mask: u32,
    bit_offset: u32,
    unit: PhantomData<U>,
}

impl<U: StorageUnit> PackedRaster<U> {
    /// Describe a `width` x `height` raster with `bits_per_pixel` deep samples
    pub fn new(width: u32, height: u32, bits_per_pixel: u32) -> Result<Self> {
        Self::with_bit_offset(width, height, bits_per_pixel, 0)
    }

    /// Like [`PackedRaster::new`], with the first pixel `bit_offset` bits
    /// into the buffer. The offset must be a multiple of the pixel depth.
    pub fn with_bit_offset(
        width: u32,
        height: u32,
        bits_per_pixel: u32,
        bit_offset: u32,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::config(format!(
                "raster must be at least 1x1, got {width}x{height}"
            )));
        }
        if bits_per_pixel == 0 || bits_per_pixel > U::BITS {
            return Err(Error::config(format!(
                "{bits_per_pixel} bits per pixel does not fit a {}-bit storage unit",
                U::BITS
            )));
        }

        let pixels_per_unit = U::BITS / bits_per_pixel;
        if pixels_per_unit * bits_per_pixel != U::BITS {
            return Err(Error::config(format!(
                "{bits_per_pixel}-bit pixels would span {}-bit storage unit boundaries",
                U::BITS
            )));
        }
        if bit_offset % bits_per_pixel != 0 {
            return Err(Error::config(format!(
                "bit offset {bit_offset} is not a multiple of the {bits_per_pixel}-bit pixel stride"
            )));
        }

        let raster = PackedRaster {
            width,
            height,
            bits_per_pixel,
            pixels_per_unit,
            bit_mask: ((1u64 << bits_per_pixel) - 1) as u32,
            bit_offset,
            unit: PhantomData,
        };

        // the whole buffer must stay addressable
        let units = (raster.page_count() as usize).checked_mul(width as usize);
        if units.is_none() {
            return Err(Error::config(format!(
                "{width}x{height} raster is too large to address"
            )));
        }

        Ok(raster)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth of one sample in bits
    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    /// How many vertically adjacent pixels share one storage unit
    pub fn pixels_per_unit(&self) -> u32 {
        self.pixels_per_unit
    }

    /// `(1 << bits_per_pixel) - 1`
    pub fn bit_mask(&self) -> u32 {
        self.bit_mask
    }

    /// Offset of the first pixel from the start of the buffer, in bits
    pub fn bit_offset(&self) -> u32 {
        self.bit_offset
    }

    /// Storage unit kind
    pub fn unit_kind(&self) -> UnitKind {
        U::KIND
    }

    /// Type used by [`PackedRaster::get_transfer_block`]
    pub fn transfer_type(&self) -> TransferType {
        TransferType::for_depth(self.bits_per_pixel)
    }

    /// Number of unit-tall row bands ("pages")
    pub fn page_count(&self) -> u32 {
        self.height.div_ceil(self.pixels_per_unit)
    }

    /// Number of storage units a buffer for this raster needs
    pub fn unit_len(&self) -> usize {
        self.page_count() as usize * self.width as usize
            + self.bit_offset.div_ceil(U::BITS) as usize
    }

    /// A zeroed buffer of exactly [`PackedRaster::unit_len`] units
    pub fn create_buffer(&self) -> Vec<U> {
        vec![U::default(); self.unit_len()]
    }

    /// Whether `(x, y)` is inside `[0, width) x [0, height)`
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Storage index and in-unit shift of the pixel at `(x, y)`
    pub fn locate(&self, x: i32, y: i32) -> Result<(usize, u32)> {
        if !self.contains(x, y) {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let (x, y) = (x as u32, y as u32);

        let unit = (y / self.pixels_per_unit) as usize * self.width as usize + x as usize;
        let bit = self.bit_offset as usize
            + unit * U::BITS as usize
            + ((y % self.pixels_per_unit) * self.bits_per_pixel) as usize;

        Ok((bit / U::BITS as usize, (bit % U::BITS as usize) as u32))
    }

    /// Sample of the pixel at `(x, y)`
    pub fn get_pixel(&self, x: i32, y: i32, data: &[U]) -> Result<u32> {
        let (index, shift) = self.locate(x, y)?;
        let unit = self.read_unit(index, data)?;
        Ok((unit.to_u32() >> shift) & self.bit_mask)
    }

    /// Store `sample` (masked to the pixel depth) at `(x, y)`, leaving the
    /// other pixels of the same storage unit untouched
    pub fn set_pixel(&self, x: i32, y: i32, sample: u32, data: &mut [U]) -> Result<()> {
        let (index, shift) = self.locate(x, y)?;
        let expected = self.unit_len();
        let actual = data.len();
        let slot = data
            .get_mut(index)
            .ok_or(Error::SizeMismatch { expected, actual })?;

        let mut unit = slot.to_u32();
        unit &= !(self.bit_mask << shift);
        unit |= (sample & self.bit_mask) << shift;
        *slot = U::from_u32(unit);
        Ok(())
    }

    /// Sample at `(x, y)` wrapped in the raster's transfer type
    pub fn get_transfer_block(&self, x: i32, y: i32, data: &[U]) -> Result<TransferBlock> {
        let sample = self.get_pixel(x, y, data)?;
        Ok(TransferBlock::new(self.transfer_type(), sample))
    }

    /// Store a block previously read with [`PackedRaster::get_transfer_block`]
    pub fn set_transfer_block(
        &self,
        x: i32,
        y: i32,
        block: TransferBlock,
        data: &mut [U],
    ) -> Result<()> {
        self.set_pixel(x, y, block.value(), data)
    }

    fn read_unit(&self, index: usize, data: &[U]) -> Result<U> {
        data.get(index).copied().ok_or(Error::SizeMismatch {
            expected: self.unit_len(),
            actual: data.len(),
        })
    }
}
