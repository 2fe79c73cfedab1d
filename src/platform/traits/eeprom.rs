//! EEPROM interface trait

use crate::platform::Result;

/// Byte-addressable non-volatile region
///
/// Writes may be buffered; they are only guaranteed to survive a power cycle
/// after a successful [`commit`](EepromInterface::commit).
pub trait EepromInterface {
    /// Read `buf.len()` bytes starting at `offset`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Eeprom(EepromError::OutOfBounds)` if the range
    /// exceeds [`capacity`](EepromInterface::capacity).
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `offset`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Eeprom(EepromError::OutOfBounds)` if the range
    /// exceeds [`capacity`](EepromInterface::capacity).
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()>;

    /// Persist buffered writes to the backing medium
    fn commit(&mut self) -> Result<()>;

    /// Size of the region in bytes
    fn capacity(&self) -> usize;
}

impl<E: EepromInterface + ?Sized> EepromInterface for &mut E {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<()> {
        (**self).read(offset, buf)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        (**self).write(offset, data)
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}

/// Check that `[offset, offset + len)` lies inside `capacity`
pub(crate) fn check_range(offset: usize, len: usize, capacity: usize) -> bool {
    offset
        .checked_add(len)
        .is_some_and(|end| end <= capacity)
}
