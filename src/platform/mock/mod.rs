//! Mock storage media for host testing
//!
//! In-memory implementations of the storage traits with fault injection.
//! Available in unit tests and with the `mock` feature.

pub mod eeprom;
pub mod flash;

pub use eeprom::{EepromFaults, MockEeprom};
pub use flash::MockFlash;
