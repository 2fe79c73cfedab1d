//! Platform abstraction layer
//!
//! Storage media used by the configuration store. Target-specific drivers
//! implement the traits in [`traits`]; host tests use [`mock`].

pub mod error;
pub mod flash_eeprom;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{EepromError, FlashError, PlatformError, Result};
pub use flash_eeprom::FlashEeprom;
pub use traits::{EepromInterface, FlashInterface};
