//! webconf_core - Pure no_std logic for on-device configuration
//!
//! This crate contains the platform-agnostic parts of the configuration
//! subsystem and can be tested on host without any platform feature.
//!
//! # Modules
//!
//! - [`parameters`]: Descriptors, registry, validation and the persisted record format
//! - [`session`]: Session lifecycle states, debounce and window timers
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)

#![cfg_attr(not(test), no_std)]

pub mod parameters;
pub mod session;
pub mod traits;
