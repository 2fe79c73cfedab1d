//! Flash interface trait

use crate::platform::Result;

/// Flash interface trait
///
/// # Flash Characteristics
///
/// - Flash is organized in blocks (typically 4 KB)
/// - Erase operations set all bytes to 0xFF
/// - Write operations can only change bits from 1→0 (must erase first to reset to 1)
/// - Operations are blocking
pub trait FlashInterface {
    /// Read `buf.len()` bytes starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if address is out of bounds.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `address`
    ///
    /// The target region must have been erased first.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if address is out of bounds.
    /// Returns `PlatformError::Flash(FlashError::WriteFailed)` if the write operation fails.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase `size` bytes starting at `address` (both block-aligned)
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if the region
    /// is misaligned or out of bounds.
    fn erase(&mut self, address: u32, size: u32) -> Result<()>;

    /// Minimum erasable unit size
    fn block_size(&self) -> u32;

    /// Total Flash size in bytes
    fn capacity(&self) -> u32;
}

impl<F: FlashInterface + ?Sized> FlashInterface for &mut F {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        (**self).read(address, buf)
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        (**self).write(address, data)
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        (**self).erase(address, size)
    }

    fn block_size(&self) -> u32 {
        (**self).block_size()
    }

    fn capacity(&self) -> u32 {
        (**self).capacity()
    }
}
