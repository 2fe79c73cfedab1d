//! Core infrastructure shared by the configuration modules

pub mod logging;
