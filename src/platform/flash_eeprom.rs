//! EEPROM emulation on top of Flash
//!
//! Keeps a RAM shadow of `SIZE` bytes. Reads and writes only touch the
//! shadow; `commit` erases the backing blocks and programs the shadow back.
//! The region must span whole erase blocks.

use crate::platform::error::{EepromError, PlatformError};
use crate::platform::traits::eeprom::check_range;
use crate::platform::traits::{EepromInterface, FlashInterface};
use crate::platform::Result;
use crate::{log_debug, log_error};

/// Flash-backed EEPROM with a `SIZE`-byte RAM shadow
pub struct FlashEeprom<F: FlashInterface, const SIZE: usize> {
    flash: F,
    base: u32,
    shadow: [u8; SIZE],
    dirty: bool,
}

impl<F: FlashInterface, const SIZE: usize> FlashEeprom<F, SIZE> {
    /// Mount the region starting at `base` and load it into the shadow.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `base` or `SIZE` is not a multiple of the erase
    /// block, or the region does not fit the Flash; any read error from the
    /// Flash.
    pub fn new(mut flash: F, base: u32) -> Result<Self> {
        let block_size = flash.block_size();
        let size = u32::try_from(SIZE).map_err(|_| PlatformError::InvalidConfig)?;
        if block_size == 0 || base % block_size != 0 || size == 0 || size % block_size != 0 {
            return Err(PlatformError::InvalidConfig);
        }
        if base
            .checked_add(size)
            .is_none_or(|end| end > flash.capacity())
        {
            return Err(PlatformError::InvalidConfig);
        }

        let mut shadow = [0xFF; SIZE];
        flash.read(base, &mut shadow)?;
        log_debug!("Flash EEPROM mounted at 0x{:x} ({} bytes)", base, SIZE);

        Ok(Self {
            flash,
            base,
            shadow,
            dirty: false,
        })
    }

    /// Whether the shadow holds writes not yet committed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Release the underlying Flash
    pub fn into_inner(self) -> F {
        self.flash
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }
}

impl<F: FlashInterface, const SIZE: usize> EepromInterface for FlashEeprom<F, SIZE> {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()> {
        if !check_range(offset, buf.len(), SIZE) {
            return Err(EepromError::OutOfBounds.into());
        }
        buf.copy_from_slice(&self.shadow[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        if !check_range(offset, data.len(), SIZE) {
            return Err(EepromError::OutOfBounds.into());
        }
        let target = &mut self.shadow[offset..offset + data.len()];
        if target != data {
            target.copy_from_slice(data);
            self.dirty = true;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let result = self
            .flash
            .erase(self.base, SIZE as u32)
            .and_then(|()| self.flash.write(self.base, &self.shadow));
        if let Err(e) = result {
            log_error!("Flash EEPROM commit failed: {}", e);
            return Err(EepromError::CommitFailed.into());
        }

        self.dirty = false;
        Ok(())
    }

    fn capacity(&self) -> usize {
        SIZE
    }
}
