//! Parameter error types
//!
//! Errors are grouped by the operation that produces them: registration,
//! per-edit validation and persistence. None of them is fatal.

use core::fmt;

/// Maximum length of a custom validator rejection reason
pub const MAX_REASON_LEN: usize = 64;

/// Free-text reason returned by a custom validator
pub type Reason = heapless::String<MAX_REASON_LEN>;

/// Errors from registering a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// A parameter with the same key is already registered
    DuplicateKey,
    /// Key is empty or longer than `MAX_KEY_LEN`
    InvalidKey,
    /// Registry capacity reached
    CapacityExceeded,
    /// Default value does not satisfy the descriptor's own constraints
    InvalidDefault,
    /// Registration attempted after the session started
    RegistrationClosed,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateKey => write!(f, "duplicate parameter key"),
            RegistryError::InvalidKey => write!(f, "invalid parameter key"),
            RegistryError::CapacityExceeded => write!(f, "parameter registry full"),
            RegistryError::InvalidDefault => write!(f, "default value violates constraints"),
            RegistryError::RegistrationClosed => write!(f, "registration closed"),
        }
    }
}

/// Errors from validating a single edit
///
/// A validation error never mutates registry state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// No parameter with this key
    UnknownKey,
    /// Parameter is read-only
    ReadOnly,
    /// Value exceeds `MAX_VALUE_LEN`
    ValueTooLong,
    /// Numeric value outside `[min, max]`
    OutOfRange,
    /// Value is malformed for the parameter kind
    InvalidFormat,
    /// Required parameter set to an empty value
    RequiredFieldMissing,
    /// Rejected by the collaborator-supplied validator
    CustomValidationFailed(Reason),
    /// Configuration session no longer accepts edits
    SessionClosed,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownKey => write!(f, "unknown parameter"),
            ValidationError::ReadOnly => write!(f, "parameter is read-only"),
            ValidationError::ValueTooLong => write!(f, "value too long"),
            ValidationError::OutOfRange => write!(f, "value out of range"),
            ValidationError::InvalidFormat => write!(f, "invalid value format"),
            ValidationError::RequiredFieldMissing => write!(f, "required value missing"),
            ValidationError::CustomValidationFailed(reason) => {
                write!(f, "rejected: {}", reason)
            }
            ValidationError::SessionClosed => write!(f, "configuration session closed"),
        }
    }
}

/// Errors from persisting or restoring the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No record, or a record with foreign magic / version
    NoValidRecord,
    /// Record header is valid but the payload is malformed
    DecodeError,
    /// Encoded record does not fit into the reserved region
    PayloadTooLarge,
    /// Medium refused to write or finalize
    CommitError,
    /// Medium read failed
    ReadError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NoValidRecord => write!(f, "no valid configuration record"),
            StorageError::DecodeError => write!(f, "configuration record corrupted"),
            StorageError::PayloadTooLarge => write!(f, "configuration too large for storage"),
            StorageError::CommitError => write!(f, "storage commit failed"),
            StorageError::ReadError => write!(f, "storage read failed"),
        }
    }
}
