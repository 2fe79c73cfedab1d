//! Session and storage options
//!
//! Defaults are baked in at build time from `WEBCONF_*` environment
//! variables (see `build.rs`).

use webconf_core::parameters::NumericParse;

/// Quiet period before an auto-save (ms)
pub const DEFAULT_SAVE_DELAY_MS: u64 = parse_u64(env!("WEBCONF_SAVE_DELAY_MS"));

/// Length of the timed configuration window (ms)
pub const DEFAULT_WINDOW_TIMEOUT_MS: u64 = parse_u64(env!("WEBCONF_WINDOW_TIMEOUT_MS"));

/// Bytes reserved for the configuration record
pub const DEFAULT_STORAGE_CAPACITY: usize = parse_u64(env!("WEBCONF_STORAGE_CAPACITY")) as usize;

/// Placement of the configuration record on the medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Byte offset of the record region
    pub offset: usize,
    /// Size of the record region, length prefix included
    pub capacity: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            capacity: DEFAULT_STORAGE_CAPACITY,
        }
    }
}

/// Timed configuration window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigWindow {
    /// Time after `begin` at which the session expires
    pub timeout_ms: u64,
    /// A successful explicit save closes the window immediately
    pub complete_session_on_save: bool,
}

impl Default for ConfigWindow {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WINDOW_TIMEOUT_MS,
            complete_session_on_save: true,
        }
    }
}

/// Configuration session options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Persist automatically after `save_delay_ms` without edits
    pub auto_save: bool,
    /// Auto-save quiet period
    pub save_delay_ms: u64,
    /// Timed window; `None` keeps the session open indefinitely
    pub config_window: Option<ConfigWindow>,
    /// Record placement
    pub storage: StoreOptions,
    /// Handling of unparseable numeric input
    pub numeric_parse: NumericParse,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            auto_save: true,
            save_delay_ms: DEFAULT_SAVE_DELAY_MS,
            config_window: None,
            storage: StoreOptions::default(),
            numeric_parse: NumericParse::Strict,
        }
    }
}

impl SessionOptions {
    /// Options for a session that closes after a timed window
    pub fn timed(window: ConfigWindow) -> Self {
        Self {
            config_window: Some(window),
            ..Self::default()
        }
    }

    pub fn with_auto_save(mut self, auto_save: bool) -> Self {
        self.auto_save = auto_save;
        self
    }

    pub fn with_save_delay_ms(mut self, save_delay_ms: u64) -> Self {
        self.save_delay_ms = save_delay_ms;
        self
    }

    pub fn with_storage(mut self, storage: StoreOptions) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_numeric_parse(mut self, numeric_parse: NumericParse) -> Self {
        self.numeric_parse = numeric_parse;
        self
    }
}

/// Parse a decimal build-time constant; build.rs guarantees digits only.
const fn parse_u64(text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if digit.is_ascii_digit() {
            value = value.saturating_mul(10).saturating_add((digit - b'0') as u64);
        }
        i += 1;
    }
    value
}
