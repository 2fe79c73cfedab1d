//! Configuration session state and timing
//!
//! Pure state types for the configuration session. The session itself, which
//! owns the registry and the storage medium, is in the `webconf` crate.

mod state;
mod timing;

pub use state::SessionState;
pub use timing::{SaveDebounce, WindowTimer};
