//! Mock Flash implementation for testing
//!
//! Provides in-memory Flash simulation for unit tests.

use crate::platform::{error::FlashError, traits::FlashInterface, Result};
use std::vec;
use std::vec::Vec;

/// Default block size (4 KB)
const DEFAULT_BLOCK_SIZE: u32 = 4096;

/// Default number of blocks (64 KB total)
const DEFAULT_BLOCK_COUNT: u32 = 16;

/// Mock Flash implementation
///
/// Simulates Flash storage in memory for testing. Supports:
/// - Read/write/erase operations with erase-before-write bit semantics
/// - Corruption injection for testing error handling
/// - Erase count tracking for wear validation
/// - Power-loss simulation and erase failure injection
#[derive(Debug, Clone)]
pub struct MockFlash {
    /// Flash storage (initialized to 0xFF - erased state)
    storage: Vec<u8>,
    /// Erase count per block
    erase_counts: Vec<u32>,
    block_size: u32,
    /// Next write only programs half of its data
    power_loss: bool,
    /// Next erase fails
    erase_failure: bool,
}

impl MockFlash {
    /// Create a 64 KB Flash with 4 KB blocks
    pub fn new() -> Self {
        Self::with_geometry(DEFAULT_BLOCK_SIZE, DEFAULT_BLOCK_COUNT)
    }

    /// Create a Flash of `block_count` blocks of `block_size` bytes
    pub fn with_geometry(block_size: u32, block_count: u32) -> Self {
        Self {
            storage: vec![0xFF; (block_size * block_count) as usize],
            erase_counts: vec![0; block_count as usize],
            block_size,
            power_loss: false,
            erase_failure: false,
        }
    }

    /// Get Flash contents (for test verification)
    pub fn get_contents(&self, address: u32, len: usize) -> Vec<u8> {
        self.storage[address as usize..(address as usize + len)].to_vec()
    }

    /// Overwrite a range with a corrupt pattern
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        for byte in &mut self.storage[address as usize..address as usize + len] {
            *byte = 0xAA;
        }
    }

    /// Number of times the block containing `address` was erased
    pub fn get_erase_count(&self, address: u32) -> u32 {
        self.erase_counts[(address / self.block_size) as usize]
    }

    /// Total erase count across all blocks
    pub fn get_total_erase_count(&self) -> u32 {
        self.erase_counts.iter().sum()
    }

    /// The next write only partially completes
    pub fn simulate_power_loss(&mut self) {
        self.power_loss = true;
    }

    /// The next erase fails with `EraseFailed`
    pub fn fail_next_erase(&mut self) {
        self.erase_failure = true;
    }

    fn in_bounds(&self, address: u32, len: usize) -> bool {
        (address as usize)
            .checked_add(len)
            .is_some_and(|end| end <= self.storage.len())
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if !self.in_bounds(address, buf.len()) {
            return Err(FlashError::InvalidAddress.into());
        }
        let start = address as usize;
        buf.copy_from_slice(&self.storage[start..start + buf.len()]);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if !self.in_bounds(address, data.len()) {
            return Err(FlashError::InvalidAddress.into());
        }

        let write_len = if self.power_loss {
            self.power_loss = false;
            data.len() / 2
        } else {
            data.len()
        };

        // Programming can only clear bits
        let start = address as usize;
        for (cell, byte) in self.storage[start..start + write_len].iter_mut().zip(data) {
            *cell &= *byte;
        }
        Ok(())
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        if address % self.block_size != 0 || size % self.block_size != 0 {
            return Err(FlashError::InvalidAddress.into());
        }
        if !self.in_bounds(address, size as usize) {
            return Err(FlashError::InvalidAddress.into());
        }
        if self.erase_failure {
            self.erase_failure = false;
            return Err(FlashError::EraseFailed.into());
        }

        let start = address as usize;
        self.storage[start..start + size as usize].fill(0xFF);

        let first_block = (address / self.block_size) as usize;
        for count in &mut self.erase_counts[first_block..first_block + (size / self.block_size) as usize] {
            *count += 1;
        }
        Ok(())
    }

    fn block_size(&self) -> u32 {
        self.block_size
    }

    fn capacity(&self) -> u32 {
        self.storage.len() as u32
    }
}
