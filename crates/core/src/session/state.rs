//! Session lifecycle states

/// Lifecycle state of a configuration session
///
/// ```text
/// Uninitialized -> Hydrated -> Serving <-> {AutoSaving, Exporting, Importing}
///                              Serving -> Expired -> Disabled   (timed window only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Parameters may still be registered
    #[default]
    Uninitialized,
    /// Registry loaded from storage or reset to defaults
    Hydrated,
    /// Accepting edits
    Serving,
    /// Debounced save in progress
    AutoSaving,
    /// Snapshot export in progress
    Exporting,
    /// Snapshot import in progress
    Importing,
    /// Configuration window closed; transport should be torn down
    Expired,
    /// Transport released; session is inert
    Disabled,
}

impl SessionState {
    /// Whether edits are accepted in this state
    pub fn accepts_edits(self) -> bool {
        matches!(
            self,
            SessionState::Hydrated
                | SessionState::Serving
                | SessionState::AutoSaving
                | SessionState::Exporting
                | SessionState::Importing
        )
    }

    /// Whether the session has been started
    pub fn is_started(self) -> bool {
        self != SessionState::Uninitialized
    }

    /// Whether the configuration window has closed
    pub fn is_closed(self) -> bool {
        matches!(self, SessionState::Expired | SessionState::Disabled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Hydrated => "hydrated",
            SessionState::Serving => "serving",
            SessionState::AutoSaving => "auto-saving",
            SessionState::Exporting => "exporting",
            SessionState::Importing => "importing",
            SessionState::Expired => "expired",
            SessionState::Disabled => "disabled",
        }
    }
}

impl core::fmt::Display for SessionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uninitialized() {
        let state = SessionState::default();
        assert_eq!(state, SessionState::Uninitialized);
        assert!(!state.is_started());
        assert!(!state.accepts_edits());
    }

    #[test]
    fn test_closed_states_reject_edits() {
        for state in [SessionState::Expired, SessionState::Disabled] {
            assert!(state.is_closed());
            assert!(!state.accepts_edits());
        }
        assert!(SessionState::Serving.accepts_edits());
        assert!(!SessionState::Serving.is_closed());
    }
}
