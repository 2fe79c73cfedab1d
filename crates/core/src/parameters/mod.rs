//! Parameter definitions, registry and persisted record format
//!
//! Everything here is platform-agnostic. Storage media and the session that
//! ties the registry to them live in the `webconf` crate.

pub mod descriptor;
pub mod error;
pub mod kind;
pub mod record;
pub mod registry;

pub use descriptor::{
    format_bool, format_float, format_int, Constraints, NumericRange, ParamFlags, ParamString,
    ParameterDescriptor, DEFAULT_GROUP, MAX_KEY_LEN, MAX_VALUE_LEN,
};
pub use error::{Reason, RegistryError, StorageError, ValidationError, MAX_REASON_LEN};
pub use kind::ParameterKind;
pub use record::{RecordHeader, RecordView, RECORD_MAGIC, RECORD_VERSION};
pub use registry::{
    ImportReport, NoHooks, NumericParse, ParameterHooks, ParameterRegistry, Snapshot,
    MAX_IMPORT_FAILURES,
};
