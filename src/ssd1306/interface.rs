//! Display interface using I2C
//!
//! Every transaction starts with a control byte: [`Control::COMMAND`] followed
//! by exactly one command byte, or [`Control::DATA`] followed by up to
//! [`MAX_DATA_CHUNK`] bytes of display RAM.
use crate::ssd1306::cmd::Control;
use display_interface::DisplayError;
use embedded_hal::i2c::I2c;

/// Largest data payload sent in a single transaction
pub const MAX_DATA_CHUNK: usize = 32;

/// Default SSD1306 7-bit address (0x3D when SA0 is pulled high)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// The connection to one SSD1306 on an I2C bus
pub struct I2cInterface<I2C> {
    /// I2C bus, owned for the life of the interface
    i2c: I2C,
    /// 7-bit device address
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Wrap a bus handle
    pub fn new(i2c: I2C, address: u8) -> Self {
        I2cInterface { i2c, address }
    }

    /// Device address this interface talks to
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> I2cInterface<I2C>
where
    I2C: I2c,
{
    /// Basic function for sending a single command byte
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), DisplayError> {
        match self.i2c.write(self.address, &[Control::COMMAND, command]) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::error!("I2C write error for command 0x{:02X}: {:?}", command, e);
                Err(DisplayError::BusWriteError)
            }
        }
    }

    /// Send a sequence of command bytes, one transaction each
    pub(crate) fn cmds(&mut self, commands: &[u8]) -> Result<(), DisplayError> {
        for &command in commands {
            self.cmd(command)?;
        }
        Ok(())
    }

    /// Basic function for sending a command and the argument bytes belonging to it.
    pub(crate) fn cmd_with_args(&mut self, command: u8, args: &[u8]) -> Result<(), DisplayError> {
        self.cmd(command)?;
        self.cmds(args)
    }

    /// Send one transaction of display RAM data
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if data.len() > MAX_DATA_CHUNK {
            log::error!(
                "data payload of {} bytes exceeds the {} byte transaction limit",
                data.len(),
                MAX_DATA_CHUNK
            );
            return Err(DisplayError::OutOfBoundsError);
        }

        let mut frame = [0u8; MAX_DATA_CHUNK + 1];
        frame[0] = Control::DATA;
        frame[1..=data.len()].copy_from_slice(data);

        self.i2c
            .write(self.address, &frame[..=data.len()])
            .map_err(|e| {
                log::error!("I2C data write error ({} bytes): {:?}", data.len(), e);
                DisplayError::BusWriteError
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssd1306::testing::RecordingI2c;

    #[test]
    fn commands_are_prefixed_with_zero() {
        let bus = RecordingI2c::new();
        let mut iface = I2cInterface::new(bus.clone(), DEFAULT_ADDRESS);
        iface.cmd_with_args(0x81, &[0xCF]).unwrap();

        assert_eq!(
            bus.writes(),
            vec![(0x3C, vec![0x00, 0x81]), (0x3C, vec![0x00, 0xCF])]
        );
    }

    #[test]
    fn data_is_prefixed_with_0x40() {
        let bus = RecordingI2c::new();
        let mut iface = I2cInterface::new(bus.clone(), 0x3D);
        iface.data(&[1, 2, 3]).unwrap();

        assert_eq!(bus.writes(), vec![(0x3D, vec![0x40, 1, 2, 3])]);
    }

    #[test]
    fn oversized_data_is_rejected_without_touching_the_bus() {
        let bus = RecordingI2c::new();
        let mut iface = I2cInterface::new(bus.clone(), DEFAULT_ADDRESS);
        assert!(matches!(
            iface.data(&[0u8; MAX_DATA_CHUNK + 1]),
            Err(DisplayError::OutOfBoundsError)
        ));
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn bus_failures_map_to_bus_write_error() {
        let bus = RecordingI2c::failing_after(1);
        let mut iface = I2cInterface::new(bus.clone(), DEFAULT_ADDRESS);
        iface.cmd(0xAE).unwrap();
        assert!(matches!(iface.cmd(0xAF), Err(DisplayError::BusWriteError)));
        assert!(matches!(iface.data(&[0]), Err(DisplayError::BusWriteError)));
        assert_eq!(bus.writes().len(), 1);
    }
}
