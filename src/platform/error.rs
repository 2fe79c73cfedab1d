//! Platform error types
//!
//! Storage media map their driver-specific failures to these variants.

use core::fmt;
use webconf_core::parameters::StorageError;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// EEPROM (or emulated EEPROM) operation failed
    Eeprom(EepromError),
    /// Flash operation failed
    Flash(FlashError),
    /// Invalid configuration provided
    InvalidConfig,
}

/// EEPROM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Access outside the EEPROM region
    OutOfBounds,
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
    /// Commit to the backing medium failed
    CommitFailed,
}

/// Flash-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Erase operation failed
    EraseFailed,
    /// Write operation failed
    WriteFailed,
    /// Read operation failed
    ReadFailed,
    /// Invalid address (out of bounds or misaligned)
    InvalidAddress,
    /// Verify failed (data mismatch after write)
    VerifyFailed,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Eeprom(e) => write!(f, "EEPROM error: {:?}", e),
            PlatformError::Flash(e) => write!(f, "Flash error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

impl From<EepromError> for PlatformError {
    fn from(error: EepromError) -> Self {
        PlatformError::Eeprom(error)
    }
}

impl From<FlashError> for PlatformError {
    fn from(error: FlashError) -> Self {
        PlatformError::Flash(error)
    }
}

impl From<PlatformError> for StorageError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::Eeprom(EepromError::ReadFailed)
            | PlatformError::Flash(FlashError::ReadFailed) => StorageError::ReadError,
            _ => StorageError::CommitError,
        }
    }
}
