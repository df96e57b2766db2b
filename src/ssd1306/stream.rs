//! Bit-reversing byte sink for MSB-first producers
//!
//! Many monochrome formats (PBM rows, XBM after reversal, bitmap fonts) put
//! the top pixel in bit 7. Display RAM expects it in bit 0, so every byte is
//! mirrored on the way through.

use std::io;

use display_interface::DisplayError;
use embedded_hal::i2c::I2c;

use crate::ssd1306::interface::I2cInterface;

/// Mirror the bit order of one byte (bit 0 <-> bit 7, 1 <-> 6, ...)
pub fn reverse_bits(byte: u8) -> u8 {
    byte.reverse_bits()
}

/// Buffers reversed bytes and sends them as data transactions of exactly
/// `chunk_size` bytes.
///
/// A partial chunk only goes out on [`io::Write::flush`] or
/// [`BitReverseStream::pad_and_flush`]. Bytes still pending when the stream
/// is dropped are discarded.
pub struct BitReverseStream<'a, I2C> {
    interface: &'a mut I2cInterface<I2C>,
    chunk_size: usize,
    pending: Vec<u8>,
}

impl<'a, I2C> BitReverseStream<'a, I2C>
where
    I2C: I2c,
{
    pub(crate) fn new(interface: &'a mut I2cInterface<I2C>, chunk_size: usize) -> Self {
        BitReverseStream {
            interface,
            chunk_size,
            pending: Vec::with_capacity(chunk_size),
        }
    }

    /// Bytes accepted but not yet sent
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue one byte, sending a chunk once the buffer is full
    pub fn push(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.pending.push(reverse_bits(byte));
        if self.pending.len() == self.chunk_size {
            self.send()?;
        }
        Ok(())
    }

    /// Fill the partial chunk with `fill` bytes (reversed like any other
    /// input) and send it
    pub fn pad_and_flush(&mut self, fill: u8) -> Result<(), DisplayError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        while !self.pending.is_empty() {
            self.push(fill)?;
        }
        Ok(())
    }

    fn send(&mut self) -> Result<(), DisplayError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let result = self.interface.data(&self.pending);
        self.pending.clear();
        result
    }
}

impl<I2C> io::Write for BitReverseStream<'_, I2C>
where
    I2C: I2c,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            self.push(byte).map_err(bus_error)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send().map_err(bus_error)
    }
}

impl<I2C> Drop for BitReverseStream<'_, I2C> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            log::warn!(
                "Discarding {} unflushed stream bytes",
                self.pending.len()
            );
        }
    }
}

fn bus_error(e: DisplayError) -> io::Error {
    io::Error::other(format!("display bus error: {e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssd1306::testing::RecordingI2c;
    use proptest::prelude::*;
    use std::io::Write;

    #[test]
    fn known_reversals() {
        assert_eq!(reverse_bits(0b0010_0110), 0b0110_0100);
        assert_eq!(reverse_bits(38), 100);
        assert_eq!(reverse_bits(100), 38);
        assert_eq!(reverse_bits(0b1000_1000), 0b0001_0001);
        assert_eq!(reverse_bits(136), 17);
        assert_eq!(reverse_bits(0x01), 0x80);
        assert_eq!(reverse_bits(0x00), 0x00);
        assert_eq!(reverse_bits(0xFF), 0xFF);
    }

    proptest! {
        #[test]
        fn reversal_is_an_involution(byte in any::<u8>()) {
            prop_assert_eq!(reverse_bits(reverse_bits(byte)), byte);
            prop_assert_eq!(reverse_bits(byte).count_ones(), byte.count_ones());
        }
    }

    #[test]
    fn sends_only_full_chunks_until_flushed() {
        let bus = RecordingI2c::new();
        let mut iface = I2cInterface::new(bus.clone(), 0x3C);
        let mut stream = BitReverseStream::new(&mut iface, 4);

        stream.write_all(&[0x80, 0x40, 0x20, 0x10, 0x01, 0x03]).unwrap();
        assert_eq!(bus.data_writes(), vec![vec![0x01, 0x02, 0x04, 0x08]]);
        assert_eq!(stream.pending(), 2);

        stream.flush().unwrap();
        assert_eq!(stream.pending(), 0);
        assert_eq!(
            bus.data_writes(),
            vec![vec![0x01, 0x02, 0x04, 0x08], vec![0x80, 0xC0]]
        );

        // nothing pending, nothing sent
        stream.flush().unwrap();
        assert_eq!(bus.data_writes().len(), 2);
    }

    #[test]
    fn pad_completes_the_chunk() {
        let bus = RecordingI2c::new();
        let mut iface = I2cInterface::new(bus.clone(), 0x3C);
        let mut stream = BitReverseStream::new(&mut iface, 4);

        stream.write_all(&[0xF0]).unwrap();
        stream.pad_and_flush(0x01).unwrap();
        assert_eq!(bus.data_writes(), vec![vec![0x0F, 0x80, 0x80, 0x80]]);

        stream.pad_and_flush(0x01).unwrap();
        assert_eq!(bus.data_writes().len(), 1);
    }

    #[test]
    fn dropping_discards_pending_bytes() {
        let bus = RecordingI2c::new();
        let mut iface = I2cInterface::new(bus.clone(), 0x3C);
        {
            let mut stream = BitReverseStream::new(&mut iface, 16);
            stream.write_all(&[1, 2, 3]).unwrap();
        }
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn bus_failure_surfaces_as_io_error() {
        let bus = RecordingI2c::failing_after(0);
        let mut iface = I2cInterface::new(bus, 0x3C);
        let mut stream = BitReverseStream::new(&mut iface, 2);

        let err = stream.write_all(&[1, 2]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(stream.pending(), 0);
    }
}
