//! I2C double that records every transaction
use std::sync::{Arc, Mutex, PoisonError};

use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, Operation};

use crate::ssd1306::cmd::Control;

#[derive(Debug)]
pub struct BusFault;

impl i2c::Error for BusFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct Record {
    writes: Vec<(u8, Vec<u8>)>,
    fail_after: Option<usize>,
}

/// Clones share one record, so a test can keep a handle after the driver
/// has taken ownership of (or dropped) its copy.
#[derive(Debug, Clone, Default)]
pub struct RecordingI2c {
    record: Arc<Mutex<Record>>,
}

impl RecordingI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` writes, then fail every following one
    pub fn failing_after(n: usize) -> Self {
        let bus = Self::new();
        bus.fail_after(Some(n));
        bus
    }

    pub fn fail_after(&self, n: Option<usize>) {
        self.lock().fail_after = n;
    }

    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.lock().writes.clone()
    }

    pub fn clear(&self) {
        self.lock().writes.clear();
    }

    /// Payload byte of every command transaction, in order
    pub fn commands(&self) -> Vec<u8> {
        self.lock()
            .writes
            .iter()
            .filter(|(_, bytes)| bytes.len() == 2 && bytes[0] == Control::COMMAND)
            .map(|(_, bytes)| bytes[1])
            .collect()
    }

    /// Payload of every data transaction, in order
    pub fn data_writes(&self) -> Vec<Vec<u8>> {
        self.lock()
            .writes
            .iter()
            .filter(|(_, bytes)| bytes.first() == Some(&Control::DATA))
            .map(|(_, bytes)| bytes[1..].to_vec())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Record> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ErrorType for RecordingI2c {
    type Error = BusFault;
}

impl I2c for RecordingI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut record = self.lock();
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if record.fail_after.is_some_and(|n| record.writes.len() >= n) {
                        return Err(BusFault);
                    }
                    record.writes.push((address, bytes.to_vec()));
                }
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}
