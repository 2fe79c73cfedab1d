//! Storage medium traits
//!
//! The configuration store only talks to [`EepromInterface`]. Targets without
//! a native EEPROM emulate one on top of [`FlashInterface`].

pub mod eeprom;
pub mod flash;

pub use eeprom::EepromInterface;
pub use flash::FlashInterface;
