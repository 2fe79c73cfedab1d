//! Platform-agnostic traits.
//!
//! Trait definitions here carry no feature gates; mock implementations are
//! always available so host tests can drive timing deterministically.

pub mod time;

pub use time::{MockTime, TimeSource};
