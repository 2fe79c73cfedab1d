//! Configuration session
//!
//! Owns the parameter registry and its persistent store, and drives the
//! session lifecycle: hydrate at boot, debounced auto-save, explicit
//! save/reset/export/import, and the optional timed configuration window.
//!
//! ```text
//! Uninitialized --begin--> Hydrated --> Serving <--> {AutoSaving, Exporting, Importing}
//! Serving --window elapsed / save--> Expired --acknowledge_teardown--> Disabled
//! ```
//!
//! Everything is run-to-completion: the transport calls the edit operations
//! and [`ConfigSession::tick`] from the same loop.

use super::hooks::SessionHooks;
use super::json::{self, JsonError};
use super::options::SessionOptions;
use super::store::{LoadReport, PersistentStore, StorageStats};
use crate::platform::{EepromInterface, PlatformError};
use crate::{log_debug, log_error, log_info, log_warn};
use core::fmt;
use webconf_core::parameters::{
    format_bool, format_float, format_int, ImportReport, ParameterDescriptor, ParameterRegistry,
    RegistryError, Snapshot, StorageError, ValidationError,
};
use webconf_core::session::{SaveDebounce, SessionState, WindowTimer};
use webconf_core::traits::TimeSource;

/// Session lifecycle errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// `begin` called twice
    AlreadyStarted,
    /// Teardown acknowledged while the window is still open
    NotExpired,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyStarted => write!(f, "session already started"),
            SessionError::NotExpired => write!(f, "session has not expired"),
        }
    }
}

/// How the registry was populated by `begin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// Values restored from storage
    Restored(LoadReport),
    /// Storage unusable; registry reset to defaults
    Defaults(StorageError),
}

/// Result of one [`ConfigSession::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing happened
    Idle,
    /// Pending edits were auto-saved
    Saved,
    /// Auto-save failed; it is retried one save delay later
    SaveFailed(StorageError),
    /// The configuration window is closed; release the transport and call
    /// [`ConfigSession::acknowledge_teardown`]
    Expired,
}

/// Configuration session over an EEPROM `E`, a clock `T` and hooks `H`,
/// holding up to `N` parameters.
pub struct ConfigSession<E: EepromInterface, T: TimeSource, H: SessionHooks, const N: usize> {
    registry: ParameterRegistry<N>,
    store: PersistentStore<E>,
    time: T,
    hooks: H,
    options: SessionOptions,
    state: SessionState,
    debounce: SaveDebounce,
    window: Option<WindowTimer>,
    last_save_ms: Option<u64>,
}

impl<E, T, H, const N: usize> ConfigSession<E, T, H, N>
where
    E: EepromInterface,
    T: TimeSource,
    H: SessionHooks,
{
    /// Create a session. Parameters are registered next, then [`Self::begin`].
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the storage region does not fit the medium.
    pub fn new(eeprom: E, time: T, hooks: H, options: SessionOptions) -> Result<Self, PlatformError> {
        let store = PersistentStore::new(eeprom, options.storage)?;
        Ok(Self {
            registry: ParameterRegistry::with_numeric_parse(options.numeric_parse),
            store,
            time,
            hooks,
            options,
            state: SessionState::Uninitialized,
            debounce: SaveDebounce::new(options.save_delay_ms),
            window: options.config_window.map(|w| WindowTimer::new(w.timeout_ms)),
            last_save_ms: None,
        })
    }

    /// Register a parameter. Only allowed before [`Self::begin`].
    pub fn register(&mut self, descriptor: ParameterDescriptor) -> Result<(), RegistryError> {
        if self.state.is_started() {
            return Err(RegistryError::RegistrationClosed);
        }
        self.registry.register(descriptor)
    }

    /// Hydrate the registry and start serving.
    ///
    /// A missing or corrupt record is not an error: the registry falls back
    /// to defaults, which are then auto-saved after the save delay.
    pub fn begin(&mut self) -> Result<Hydration, SessionError> {
        if self.state.is_started() {
            return Err(SessionError::AlreadyStarted);
        }

        let hydration = match self.restore() {
            Ok(report) => Hydration::Restored(report),
            Err(e) => Hydration::Defaults(e),
        };
        self.set_state(SessionState::Hydrated);

        let now = self.time.now_ms();
        if let Some(window) = self.window.as_mut() {
            window.start(now);
            log_info!("Configuration window open for {} ms", window.timeout_ms());
        }
        self.set_state(SessionState::Serving);
        Ok(hydration)
    }

    /// Reload from storage, falling back to defaults on failure.
    ///
    /// The registry only becomes clean when every parameter was restored
    /// from the record; otherwise pending edits stay dirty and queued for
    /// auto-save.
    pub fn load(&mut self) -> Result<LoadReport, StorageError> {
        self.restore()
    }

    fn restore(&mut self) -> Result<LoadReport, StorageError> {
        match self.store.load(&mut self.registry) {
            Ok(report) => {
                if report.is_complete() {
                    self.registry.mark_clean();
                    self.debounce.disarm();
                } else if self.registry.is_dirty() && !self.debounce.is_armed() {
                    self.debounce.arm(self.time.now_ms());
                }
                self.hooks.on_load();
                Ok(report)
            }
            Err(e) => {
                log_warn!("Using default configuration: {}", e);
                self.registry.reset_to_defaults();
                self.debounce.arm(self.time.now_ms());
                Err(e)
            }
        }
    }

    /// Validate and apply one edit.
    pub fn validate_and_set(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        if !self.state.accepts_edits() {
            return Err(ValidationError::SessionClosed);
        }

        match self
            .registry
            .validate_and_set_with(key, value, &mut self.hooks)
        {
            Ok(()) => {
                self.debounce.arm(self.time.now_ms());
                log_debug!("Parameter {} set", key);
                Ok(())
            }
            Err(e) => {
                log_warn!("Parameter {} rejected: {}", key, e);
                Err(e)
            }
        }
    }

    pub fn set_int(&mut self, key: &str, value: i32) -> Result<(), ValidationError> {
        self.validate_and_set(key, &format_int(value))
    }

    pub fn set_float(&mut self, key: &str, value: f32) -> Result<(), ValidationError> {
        self.validate_and_set(key, &format_float(value))
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<(), ValidationError> {
        self.validate_and_set(key, format_bool(value))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.registry.get(key)
    }

    pub fn as_int(&self, key: &str) -> Option<i32> {
        self.registry.as_int(key)
    }

    pub fn as_float(&self, key: &str) -> Option<f32> {
        self.registry.as_float(key)
    }

    pub fn as_bool(&self, key: &str) -> Option<bool> {
        self.registry.as_bool(key)
    }

    /// Advance timers.
    ///
    /// Auto-save is evaluated first, then the configuration window. When the
    /// window closes in the same tick as an auto-save, `Expired` is reported
    /// and the save is still reflected in [`Self::last_save_ms`].
    pub fn tick(&mut self) -> TickOutcome {
        match self.state {
            SessionState::Serving => {}
            SessionState::Expired => return TickOutcome::Expired,
            _ => return TickOutcome::Idle,
        }

        let now = self.time.now_ms();
        let mut outcome = TickOutcome::Idle;

        if !self.registry.is_dirty() {
            self.debounce.disarm();
        } else if self.options.auto_save && self.debounce.is_due(now) {
            self.set_state(SessionState::AutoSaving);
            outcome = match self.persist() {
                Ok(()) => TickOutcome::Saved,
                Err(e) => {
                    self.debounce.arm(now);
                    TickOutcome::SaveFailed(e)
                }
            };
            self.set_state(SessionState::Serving);
        }

        if self.window.is_some_and(|w| w.is_expired(now)) {
            self.expire();
            outcome = TickOutcome::Expired;
        }

        outcome
    }

    /// Persist now.
    ///
    /// On success the registry is clean and, in a timed session with
    /// `complete_session_on_save`, the window closes.
    pub fn save(&mut self) -> Result<(), StorageError> {
        self.persist()?;

        let completes = self
            .options
            .config_window
            .is_some_and(|w| w.complete_session_on_save);
        if completes && self.state == SessionState::Serving {
            log_info!("Configuration saved, closing configuration window");
            self.expire();
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        match self.store.save(&self.registry) {
            Ok(_) => {
                self.registry.mark_clean();
                self.debounce.disarm();
                self.last_save_ms = Some(self.time.now_ms());
                self.hooks.on_save();
                Ok(())
            }
            Err(e) => {
                log_error!("Saving configuration failed: {}", e);
                Err(e)
            }
        }
    }

    /// Erase storage, restore defaults and persist them.
    ///
    /// Stops at the first failure. Never closes the configuration window.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        log_info!("Resetting configuration to defaults");
        self.store.erase()?;
        self.registry.reset_to_defaults();
        self.persist()
    }

    /// Ordered copy of all values
    pub fn export_snapshot(&mut self) -> Snapshot<N> {
        let previous = self.enter(SessionState::Exporting);
        let snapshot = self.registry.export_snapshot();
        self.set_state(previous);
        snapshot
    }

    /// Render the JSON backup document (`device`, `version`, `config`) into `buf`.
    ///
    /// Returns the number of bytes written.
    pub fn export_json(&mut self, device: &str, buf: &mut [u8]) -> Result<usize, JsonError> {
        let snapshot = self.export_snapshot();
        json::write_snapshot(buf, device, env!("CARGO_PKG_VERSION"), &snapshot)
    }

    /// Apply key/value pairs best-effort through the normal edit path.
    pub fn import_snapshot<I, K, V>(&mut self, pairs: I) -> Result<ImportReport, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if !self.state.accepts_edits() {
            return Err(ValidationError::SessionClosed);
        }

        let previous = self.enter(SessionState::Importing);
        let report = self
            .registry
            .import_snapshot_with(pairs, &mut self.hooks);
        if report.applied > 0 {
            self.debounce.arm(self.time.now_ms());
        }
        self.set_state(previous);

        log_info!(
            "Imported configuration ({} applied, {} rejected)",
            report.applied,
            report.rejected
        );
        Ok(report)
    }

    /// Confirm the transport was released after `Expired`.
    pub fn acknowledge_teardown(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Expired {
            return Err(SessionError::NotExpired);
        }
        self.set_state(SessionState::Disabled);
        Ok(())
    }

    /// Time left in the configuration window; `None` without a running window
    pub fn remaining_window_ms(&self) -> Option<u64> {
        if self.state.is_closed() {
            return Some(0);
        }
        let now = self.time.now_ms();
        self.window.and_then(|w| w.remaining_ms(now))
    }

    /// Whether edits are currently accepted
    pub fn is_accepting(&self) -> bool {
        self.state.accepts_edits()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.registry.is_dirty()
    }

    /// Timestamp of the last successful save
    pub fn last_save_ms(&self) -> Option<u64> {
        self.last_save_ms
    }

    pub fn registry(&self) -> &ParameterRegistry<N> {
        &self.registry
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn storage_stats(&self) -> StorageStats {
        self.store.stats()
    }

    pub fn store(&self) -> &PersistentStore<E> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PersistentStore<E> {
        &mut self.store
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    fn expire(&mut self) {
        self.set_state(SessionState::Expired);
    }

    /// Switch to a transient state while serving; returns the state to restore
    fn enter(&mut self, transient: SessionState) -> SessionState {
        let previous = self.state;
        if previous == SessionState::Serving {
            self.state = transient;
        }
        previous
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            log_debug!("Session state {} -> {}", self.state.as_str(), state.as_str());
            self.state = state;
        }
    }
}
