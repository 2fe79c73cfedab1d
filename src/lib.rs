#![cfg_attr(not(test), no_std)]

//! webconf - On-device configuration for network-connected controllers
//!
//! This library keeps a registry of typed, user-editable parameters, persists
//! it to a non-volatile byte region and governs how long the device accepts
//! configuration edits. The HTTP transport and UI rendering live outside this
//! crate and call into [`config::ConfigSession`].

#[cfg(all(feature = "mock", not(test)))]
extern crate std;

// Storage media abstraction
pub mod platform;

// Logging macros
pub mod core;

// Configuration store and session
pub mod config;

pub use webconf_core::parameters;
pub use webconf_core::session::SessionState;
pub use webconf_core::traits::{MockTime, TimeSource};
