//! Configuration store and session
//!
//! - [`store`]: record persistence on an EEPROM region
//! - [`session`]: lifecycle, auto-save and the timed configuration window
//! - [`options`]: session and storage options with build-time defaults
//! - [`hooks`]: collaborator callbacks
//! - [`json`]: backup document export

pub mod hooks;
pub mod json;
pub mod options;
pub mod session;
pub mod store;

pub use hooks::{NoHooks, ParameterHooks, SessionHooks};
pub use json::JsonError;
pub use options::{ConfigWindow, SessionOptions, StoreOptions};
pub use session::{ConfigSession, Hydration, SessionError, TickOutcome};
pub use store::{LoadReport, PersistentStore, StorageStats, MAX_RECORD_SIZE};
