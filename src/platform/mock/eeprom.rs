//! Mock EEPROM implementation for testing
//!
//! Models an EEPROM emulation with a working buffer and a committed image:
//! writes land in the buffer, `commit` copies it to the image, and
//! `power_cycle` discards anything not committed.

use crate::platform::error::EepromError;
use crate::platform::traits::eeprom::check_range;
use crate::platform::traits::EepromInterface;
use crate::platform::Result;
use bitflags::bitflags;
use std::vec;
use std::vec::Vec;

bitflags! {
    /// Operations forced to fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EepromFaults: u8 {
        const READ = 0b0000_0001;
        const WRITE = 0b0000_0010;
        const COMMIT = 0b0000_0100;
    }
}

/// In-memory EEPROM
#[derive(Debug, Clone)]
pub struct MockEeprom {
    buffer: Vec<u8>,
    committed: Vec<u8>,
    faults: EepromFaults,
    commit_count: u32,
}

impl MockEeprom {
    /// Create an erased (0xFF) EEPROM of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0xFF; capacity],
            committed: vec![0xFF; capacity],
            faults: EepromFaults::empty(),
            commit_count: 0,
        }
    }

    /// Make the given operations fail until cleared
    pub fn inject_faults(&mut self, faults: EepromFaults) {
        self.faults.insert(faults);
    }

    pub fn clear_faults(&mut self) {
        self.faults = EepromFaults::empty();
    }

    /// Overwrite a range of both buffer and image with a corrupt pattern
    pub fn inject_corruption(&mut self, offset: usize, len: usize) {
        for image in [&mut self.buffer, &mut self.committed] {
            image[offset..offset + len].fill(0xAA);
        }
    }

    /// Patch bytes in both buffer and image, bypassing fault injection
    pub fn poke(&mut self, offset: usize, data: &[u8]) {
        for image in [&mut self.buffer, &mut self.committed] {
            image[offset..offset + data.len()].copy_from_slice(data);
        }
    }

    /// Discard uncommitted writes
    pub fn power_cycle(&mut self) {
        self.buffer.copy_from_slice(&self.committed);
    }

    /// Number of successful commits
    pub fn commit_count(&self) -> u32 {
        self.commit_count
    }

    /// Committed image (for test verification)
    pub fn committed(&self) -> &[u8] {
        &self.committed
    }
}

impl EepromInterface for MockEeprom {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()> {
        if !check_range(offset, buf.len(), self.buffer.len()) {
            return Err(EepromError::OutOfBounds.into());
        }
        if self.faults.contains(EepromFaults::READ) {
            return Err(EepromError::ReadFailed.into());
        }
        buf.copy_from_slice(&self.buffer[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        if !check_range(offset, data.len(), self.buffer.len()) {
            return Err(EepromError::OutOfBounds.into());
        }
        if self.faults.contains(EepromFaults::WRITE) {
            return Err(EepromError::WriteFailed.into());
        }
        self.buffer[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.faults.contains(EepromFaults::COMMIT) {
            return Err(EepromError::CommitFailed.into());
        }
        self.committed.copy_from_slice(&self.buffer);
        self.commit_count += 1;
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
