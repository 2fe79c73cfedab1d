//! Parameter registry
//!
//! Ordered, key-unique collection of [`ParameterDescriptor`]s. Every edit goes
//! through [`ParameterRegistry::validate_and_set_with`], which runs the kind
//! check, the required check and the collaborator validator in that order and
//! fires exactly one change notification on success.

use super::descriptor::{
    format_bool, format_float, format_int, ParamString, ParameterDescriptor, MAX_KEY_LEN,
};
use super::error::{Reason, RegistryError, ValidationError};
use super::kind::ParameterKind;

/// Maximum number of per-key failures kept in an [`ImportReport`]
pub const MAX_IMPORT_FAILURES: usize = 8;

/// Ordered key/value copy of the registry
pub type Snapshot<const N: usize> = heapless::Vec<(&'static str, ParamString), N>;

/// Handling of numeric input that does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NumericParse {
    /// Reject with `InvalidFormat`
    #[default]
    Strict,
    /// Treat as zero, then range-check
    Lenient,
}

/// Collaborator callbacks invoked while a value is being applied.
///
/// Hooks only receive keys and values, never the registry, so they cannot
/// re-enter a mutation in progress.
pub trait ParameterHooks {
    /// Veto an edit. Called after all built-in checks passed.
    fn validate(&mut self, _key: &str, _value: &str) -> Result<(), Reason> {
        Ok(())
    }

    /// Called once per accepted edit, after the value was replaced.
    fn on_parameter_changed(&mut self, _key: &str, _old: &str, _new: &str) {}
}

impl<H: ParameterHooks + ?Sized> ParameterHooks for &mut H {
    fn validate(&mut self, key: &str, value: &str) -> Result<(), Reason> {
        (**self).validate(key, value)
    }

    fn on_parameter_changed(&mut self, key: &str, old: &str, new: &str) {
        (**self).on_parameter_changed(key, old, new)
    }
}

/// Hooks that accept everything and observe nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ParameterHooks for NoHooks {}

/// Outcome of a best-effort import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Pairs that were applied
    pub applied: usize,
    /// Pairs that were rejected
    pub rejected: usize,
    /// First rejections, by key
    pub failures: heapless::Vec<(heapless::String<MAX_KEY_LEN>, ValidationError), MAX_IMPORT_FAILURES>,
}

impl ImportReport {
    /// True when every pair was applied
    pub fn is_complete(&self) -> bool {
        self.rejected == 0
    }

    fn record_failure(&mut self, key: &str, error: ValidationError) {
        self.rejected += 1;
        if let Ok(key) = heapless::String::try_from(key) {
            // Only the first MAX_IMPORT_FAILURES are kept
            let _ = self.failures.push((key, error));
        }
    }
}

/// Registry of up to `N` parameters
#[derive(Debug, Clone)]
pub struct ParameterRegistry<const N: usize> {
    params: heapless::Vec<ParameterDescriptor, N>,
    dirty: bool,
    numeric_parse: NumericParse,
}

impl<const N: usize> Default for ParameterRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ParameterRegistry<N> {
    /// Create an empty registry with strict numeric parsing
    pub const fn new() -> Self {
        Self {
            params: heapless::Vec::new(),
            dirty: false,
            numeric_parse: NumericParse::Strict,
        }
    }

    /// Create an empty registry with the given numeric parse policy
    pub const fn with_numeric_parse(numeric_parse: NumericParse) -> Self {
        Self {
            params: heapless::Vec::new(),
            dirty: false,
            numeric_parse,
        }
    }

    pub fn numeric_parse(&self) -> NumericParse {
        self.numeric_parse
    }

    /// Add a parameter.
    ///
    /// The default is checked against the descriptor's own kind constraints
    /// and stored canonicalized. An empty default on a required parameter is
    /// allowed; the required check only applies to edits.
    pub fn register(&mut self, mut descriptor: ParameterDescriptor) -> Result<(), RegistryError> {
        let key = descriptor.key();
        if key.is_empty() || key.len() > MAX_KEY_LEN {
            return Err(RegistryError::InvalidKey);
        }
        if self.contains(key) {
            return Err(RegistryError::DuplicateKey);
        }
        if self.params.is_full() {
            return Err(RegistryError::CapacityExceeded);
        }
        if !descriptor.default_fits() {
            return Err(RegistryError::InvalidDefault);
        }

        let default = check_kind(&descriptor, descriptor.default_value(), self.numeric_parse)
            .map_err(|_| RegistryError::InvalidDefault)?;
        descriptor.set_canonical_default(default);
        descriptor.assign_order(self.params.len());

        self.params
            .push(descriptor)
            .map_err(|_| RegistryError::CapacityExceeded)
    }

    /// Current value, `None` for unknown keys
    pub fn get(&self, key: &str) -> Option<&str> {
        self.descriptor(key).map(ParameterDescriptor::value)
    }

    /// Full descriptor for `key`
    pub fn descriptor(&self, key: &str) -> Option<&ParameterDescriptor> {
        self.params.iter().find(|p| p.key() == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.descriptor(key).is_some()
    }

    /// Validate and apply an edit without collaborator hooks
    pub fn validate_and_set(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        self.validate_and_set_with(key, value, &mut NoHooks)
    }

    /// Validate and apply an edit.
    ///
    /// On failure the registry is left untouched. On success the value is
    /// replaced (even when equal to the old one), the registry becomes dirty
    /// and `hooks.on_parameter_changed` fires exactly once.
    pub fn validate_and_set_with<H: ParameterHooks + ?Sized>(
        &mut self,
        key: &str,
        value: &str,
        hooks: &mut H,
    ) -> Result<(), ValidationError> {
        let numeric_parse = self.numeric_parse;
        let param = self
            .params
            .iter_mut()
            .find(|p| p.key() == key)
            .ok_or(ValidationError::UnknownKey)?;

        if param.is_read_only() {
            return Err(ValidationError::ReadOnly);
        }

        let accepted = check_kind(param, value, numeric_parse)?;

        if param.is_required() && accepted.is_empty() {
            return Err(ValidationError::RequiredFieldMissing);
        }

        hooks
            .validate(key, &accepted)
            .map_err(ValidationError::CustomValidationFailed)?;

        let old = param.replace_value(accepted);
        self.dirty = true;
        hooks.on_parameter_changed(key, &old, param.value());
        Ok(())
    }

    /// Set an integer parameter from a typed value
    pub fn set_int(&mut self, key: &str, value: i32) -> Result<(), ValidationError> {
        self.validate_and_set(key, &format_int(value))
    }

    /// Set a float parameter from a typed value
    pub fn set_float(&mut self, key: &str, value: f32) -> Result<(), ValidationError> {
        self.validate_and_set(key, &format_float(value))
    }

    /// Set a boolean parameter from a typed value
    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<(), ValidationError> {
        self.validate_and_set(key, format_bool(value))
    }

    /// Integer view of a value. Text that does not parse reads as 0.
    pub fn as_int(&self, key: &str) -> Option<i32> {
        self.get(key).map(parse_int_lenient)
    }

    /// Float view of a value. Text that does not parse reads as 0.0.
    pub fn as_float(&self, key: &str) -> Option<f32> {
        self.get(key).map(|v| v.trim().parse::<f32>().unwrap_or(0.0))
    }

    /// Boolean view of a value: `"true"`, `"1"` and `"on"` are true.
    pub fn as_bool(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| matches!(v, "true" | "1" | "on"))
    }

    /// Restore every value to its default. Does not persist.
    pub fn reset_to_defaults(&mut self) {
        for param in self.params.iter_mut() {
            param.restore_default();
        }
        self.dirty = true;
    }

    /// Copy of all key/value pairs in insertion order
    pub fn export_snapshot(&self) -> Snapshot<N> {
        let mut snapshot = Snapshot::new();
        for param in self.params.iter() {
            // Cannot overflow: both hold at most N entries
            let _ = snapshot.push((param.key(), param.value_string().clone()));
        }
        snapshot
    }

    /// Apply key/value pairs best-effort, without hooks
    pub fn import_snapshot<I, K, V>(&mut self, pairs: I) -> ImportReport
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.import_snapshot_with(pairs, &mut NoHooks)
    }

    /// Apply key/value pairs best-effort.
    ///
    /// Each pair goes through [`Self::validate_and_set_with`]; rejected pairs
    /// are skipped and reported, the rest are applied.
    pub fn import_snapshot_with<I, K, V, H>(&mut self, pairs: I, hooks: &mut H) -> ImportReport
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        H: ParameterHooks + ?Sized,
    {
        let mut report = ImportReport::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            match self.validate_and_set_with(key, value.as_ref(), hooks) {
                Ok(()) => report.applied += 1,
                Err(e) => report.record_failure(key, e),
            }
        }
        report
    }

    /// Apply a value read back from storage.
    ///
    /// Unknown keys and values that no longer satisfy the descriptor are
    /// skipped. No hooks fire and the dirty flag is untouched. Returns whether
    /// the value was applied.
    pub fn apply_persisted(&mut self, key: &str, value: &str) -> bool {
        let numeric_parse = self.numeric_parse;
        let Some(param) = self.params.iter_mut().find(|p| p.key() == key) else {
            return false;
        };
        match check_kind(param, value, numeric_parse) {
            Ok(accepted) => {
                param.replace_value(accepted);
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after a successful save
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Descriptors in insertion order
    pub fn iter(&self) -> core::slice::Iter<'_, ParameterDescriptor> {
        self.params.iter()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(ParameterDescriptor::key)
    }

    /// Descriptors sorted by presentation order; ties keep insertion order
    pub fn presentation_order(&self) -> heapless::Vec<&ParameterDescriptor, N> {
        let mut indexed: heapless::Vec<(usize, &ParameterDescriptor), N> = self
            .params
            .iter()
            .enumerate()
            .collect();
        indexed.sort_unstable_by_key(|(index, p)| (p.order(), *index));
        indexed.into_iter().map(|(_, p)| p).collect()
    }

    /// Distinct groups in first-seen presentation order
    pub fn groups(&self) -> heapless::Vec<&'static str, N> {
        let mut groups: heapless::Vec<&'static str, N> = heapless::Vec::new();
        for param in self.presentation_order() {
            if !groups.contains(&param.group()) {
                let _ = groups.push(param.group());
            }
        }
        groups
    }
}

/// Kind-specific check. Returns the value to store (canonicalized for
/// numeric kinds).
fn check_kind(
    param: &ParameterDescriptor,
    value: &str,
    numeric_parse: NumericParse,
) -> Result<ParamString, ValidationError> {
    let stored = ParamString::try_from(value).map_err(|_| ValidationError::ValueTooLong)?;
    let constraints = param.constraints();

    match param.kind() {
        kind if kind.is_integer() => {
            let parsed = match (value.parse::<i32>(), numeric_parse) {
                (Ok(v), _) => v,
                (Err(_), NumericParse::Lenient) => 0,
                (Err(_), NumericParse::Strict) => return Err(ValidationError::InvalidFormat),
            };
            if let Some(range) = constraints.range {
                if !range.contains_int(parsed) {
                    return Err(ValidationError::OutOfRange);
                }
            }
            Ok(format_int(parsed))
        }
        ParameterKind::Float => {
            let parsed = match (value.parse::<f32>(), numeric_parse) {
                (Ok(v), _) if v.is_finite() => v,
                (_, NumericParse::Lenient) => 0.0,
                (_, NumericParse::Strict) => return Err(ValidationError::InvalidFormat),
            };
            if let Some(range) = constraints.range {
                if !range.contains_float(parsed) {
                    return Err(ValidationError::OutOfRange);
                }
            }
            Ok(format_float(parsed))
        }
        ParameterKind::Select => {
            if !value.is_empty()
                && !constraints.options.is_empty()
                && !constraints.options.contains(&value)
            {
                return Err(ValidationError::InvalidFormat);
            }
            Ok(stored)
        }
        ParameterKind::Email => {
            if !(value.contains('@') && value.contains('.')) {
                return Err(ValidationError::InvalidFormat);
            }
            Ok(stored)
        }
        _ => Ok(stored),
    }
}

fn parse_int_lenient(value: &str) -> i32 {
    let value = value.trim();
    value
        .parse::<i32>()
        .ok()
        .or_else(|| value.parse::<f32>().ok().map(|f| f as i32))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        changes: Vec<(String, String, String)>,
        reject_odd: bool,
    }

    impl ParameterHooks for Recorder {
        fn validate(&mut self, key: &str, value: &str) -> Result<(), Reason> {
            if self.reject_odd && key == "count" {
                let n: i32 = value.parse().unwrap_or(0);
                if n % 2 != 0 {
                    return Err(Reason::try_from("must be even").unwrap());
                }
            }
            Ok(())
        }

        fn on_parameter_changed(&mut self, key: &str, old: &str, new: &str) {
            self.changes.push((key.into(), old.into(), new.into()));
        }
    }

    fn sample() -> ParameterRegistry<8> {
        let mut reg = ParameterRegistry::new();
        reg.register(ParameterDescriptor::text("device_name", "Device Name", "ESP32-Device"))
            .unwrap();
        reg.register(ParameterDescriptor::integer("brightness", "Brightness", 50, 0, 100, 1))
            .unwrap();
        reg.register(ParameterDescriptor::boolean("enabled", "Enabled", true))
            .unwrap();
        reg.register(ParameterDescriptor::email("email", "E-mail", "admin@example.com"))
            .unwrap();
        reg
    }

    #[test]
    fn register_rejects_duplicate_key() {
        let mut reg = sample();
        let result = reg.register(ParameterDescriptor::text("brightness", "Again", ""));
        assert_eq!(result, Err(RegistryError::DuplicateKey));
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn register_rejects_bad_keys_and_capacity() {
        let mut reg: ParameterRegistry<1> = ParameterRegistry::new();
        assert_eq!(
            reg.register(ParameterDescriptor::text("", "Empty", "")),
            Err(RegistryError::InvalidKey)
        );
        assert_eq!(
            reg.register(ParameterDescriptor::text(
                "a_key_that_is_much_longer_than_32_bytes",
                "Long",
                ""
            )),
            Err(RegistryError::InvalidKey)
        );
        reg.register(ParameterDescriptor::text("a", "A", "")).unwrap();
        assert_eq!(
            reg.register(ParameterDescriptor::text("b", "B", "")),
            Err(RegistryError::CapacityExceeded)
        );
    }

    #[test]
    fn register_rejects_invalid_default() {
        let mut reg: ParameterRegistry<4> = ParameterRegistry::new();
        assert_eq!(
            reg.register(ParameterDescriptor::integer("level", "Level", 200, 0, 100, 1)),
            Err(RegistryError::InvalidDefault)
        );
        assert_eq!(
            reg.register(ParameterDescriptor::select("mode", "Mode", &["a", "b"], "c")),
            Err(RegistryError::InvalidDefault)
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn register_canonicalizes_default_and_assigns_order() {
        let mut reg: ParameterRegistry<4> = ParameterRegistry::new();
        reg.register(ParameterDescriptor::text("a", "A", "")).unwrap();
        reg.register(ParameterDescriptor::new("level", "Level", ParameterKind::Integer, "075"))
            .unwrap();
        let level = reg.descriptor("level").unwrap();
        assert_eq!(level.default_value(), "75");
        assert_eq!(level.value(), "75");
        assert_eq!(level.order(), 1);
    }

    #[test]
    fn required_with_empty_default_registers() {
        let mut reg: ParameterRegistry<2> = ParameterRegistry::new();
        reg.register(ParameterDescriptor::text("ssid", "SSID", "").required())
            .unwrap();
        assert_eq!(
            reg.validate_and_set("ssid", ""),
            Err(ValidationError::RequiredFieldMissing)
        );
    }

    #[test]
    fn set_then_get_returns_canonical_value_with_one_notification() {
        let mut reg = sample();
        let mut hooks = Recorder::default();

        reg.validate_and_set_with("brightness", "075", &mut hooks).unwrap();

        assert_eq!(reg.get("brightness"), Some("75"));
        assert!(reg.is_dirty());
        assert_eq!(hooks.changes.len(), 1);
        assert_eq!(hooks.changes[0], ("brightness".into(), "50".into(), "75".into()));
    }

    #[test]
    fn same_value_still_notifies() {
        let mut reg = sample();
        let mut hooks = Recorder::default();
        reg.validate_and_set_with("brightness", "50", &mut hooks).unwrap();
        assert_eq!(hooks.changes.len(), 1);
        assert_eq!(hooks.changes[0].1, hooks.changes[0].2);
    }

    #[test]
    fn out_of_range_leaves_value_and_no_notification() {
        let mut reg = sample();
        let mut hooks = Recorder::default();

        let result = reg.validate_and_set_with("brightness", "150", &mut hooks);

        assert_eq!(result, Err(ValidationError::OutOfRange));
        assert_eq!(reg.get("brightness"), Some("50"));
        assert!(!reg.is_dirty());
        assert!(hooks.changes.is_empty());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut reg = sample();
        assert_eq!(reg.validate_and_set("nope", "1"), Err(ValidationError::UnknownKey));
        assert_eq!(reg.get("nope"), None);
        assert_eq!(reg.as_int("nope"), None);
    }

    #[test]
    fn strict_and_lenient_numeric_parse() {
        let mut strict = sample();
        assert_eq!(
            strict.validate_and_set("brightness", "abc"),
            Err(ValidationError::InvalidFormat)
        );

        let mut lenient: ParameterRegistry<2> =
            ParameterRegistry::with_numeric_parse(NumericParse::Lenient);
        lenient
            .register(ParameterDescriptor::integer("brightness", "B", 50, 0, 100, 1))
            .unwrap();
        lenient
            .register(ParameterDescriptor::integer("offset", "O", 5, 1, 10, 1))
            .unwrap();
        lenient.validate_and_set("brightness", "abc").unwrap();
        assert_eq!(lenient.get("brightness"), Some("0"));
        assert_eq!(
            lenient.validate_and_set("offset", "abc"),
            Err(ValidationError::OutOfRange)
        );
    }

    #[test]
    fn float_range_and_format() {
        let mut reg: ParameterRegistry<2> = ParameterRegistry::new();
        reg.register(ParameterDescriptor::float("gain", "Gain", 1.0, 0.0, 2.0, 0.1))
            .unwrap();
        reg.validate_and_set("gain", "1.50").unwrap();
        assert_eq!(reg.get("gain"), Some("1.5"));
        assert_eq!(reg.validate_and_set("gain", "2.5"), Err(ValidationError::OutOfRange));
        assert_eq!(reg.validate_and_set("gain", "NaN"), Err(ValidationError::InvalidFormat));
        assert_eq!(reg.as_float("gain"), Some(1.5));
    }

    #[test]
    fn email_requires_at_and_dot() {
        let mut reg = sample();
        assert_eq!(
            reg.validate_and_set("email", "user.example"),
            Err(ValidationError::InvalidFormat)
        );
        assert_eq!(
            reg.validate_and_set("email", "user@example"),
            Err(ValidationError::InvalidFormat)
        );
        assert_eq!(
            reg.validate_and_set("email", ""),
            Err(ValidationError::InvalidFormat)
        );
        assert_eq!(reg.get("email"), Some("admin@example.com"));
        reg.validate_and_set("email", "user@example.com").unwrap();
        assert_eq!(reg.get("email"), Some("user@example.com"));
    }

    #[test]
    fn email_default_must_be_an_address() {
        let mut reg: ParameterRegistry<2> = ParameterRegistry::new();
        assert_eq!(
            reg.register(ParameterDescriptor::email("contact", "Contact", "")),
            Err(RegistryError::InvalidDefault)
        );
        assert!(!reg.contains("contact"));
    }

    #[test]
    fn select_checks_option_set() {
        let mut reg: ParameterRegistry<2> = ParameterRegistry::new();
        reg.register(ParameterDescriptor::select(
            "mode",
            "Mode",
            &["auto", "manual"],
            "auto",
        ))
        .unwrap();
        assert_eq!(reg.validate_and_set("mode", "turbo"), Err(ValidationError::InvalidFormat));
        reg.validate_and_set("mode", "manual").unwrap();
    }

    #[test]
    fn read_only_and_too_long() {
        let mut reg: ParameterRegistry<2> = ParameterRegistry::new();
        reg.register(ParameterDescriptor::text("serial", "Serial", "0001").read_only())
            .unwrap();
        reg.register(ParameterDescriptor::textarea("notes", "Notes", ""))
            .unwrap();

        assert_eq!(reg.validate_and_set("serial", "0002"), Err(ValidationError::ReadOnly));
        let long = "n".repeat(65);
        assert_eq!(reg.validate_and_set("notes", &long), Err(ValidationError::ValueTooLong));
    }

    #[test]
    fn custom_validator_runs_last_and_vetoes() {
        let mut reg: ParameterRegistry<2> = ParameterRegistry::new();
        reg.register(ParameterDescriptor::integer("count", "Count", 2, 0, 10, 1))
            .unwrap();
        let mut hooks = Recorder {
            reject_odd: true,
            ..Default::default()
        };

        // Range failure wins over the validator
        assert_eq!(
            reg.validate_and_set_with("count", "11", &mut hooks),
            Err(ValidationError::OutOfRange)
        );

        let err = reg.validate_and_set_with("count", "3", &mut hooks).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CustomValidationFailed(Reason::try_from("must be even").unwrap())
        );
        assert_eq!(reg.get("count"), Some("2"));

        reg.validate_and_set_with("count", "4", &mut hooks).unwrap();
        assert_eq!(hooks.changes.len(), 1);
    }

    #[test]
    fn boolean_reads_are_canonicalized_at_read_time() {
        let mut reg = sample();
        for (raw, expected) in [("true", true), ("1", true), ("on", true), ("yes", false), ("", false)] {
            reg.validate_and_set("enabled", raw).unwrap();
            assert_eq!(reg.get("enabled"), Some(raw));
            assert_eq!(reg.as_bool("enabled"), Some(expected));
        }
    }

    #[test]
    fn typed_setters_and_reads() {
        let mut reg = sample();
        reg.set_int("brightness", 80).unwrap();
        assert_eq!(reg.as_int("brightness"), Some(80));
        reg.set_bool("enabled", false).unwrap();
        assert_eq!(reg.get("enabled"), Some("false"));
        assert_eq!(reg.as_int("device_name"), Some(0));
        assert_eq!(reg.set_int("brightness", 101), Err(ValidationError::OutOfRange));
    }

    #[test]
    fn reset_to_defaults_marks_dirty() {
        let mut reg = sample();
        reg.validate_and_set("brightness", "80").unwrap();
        reg.mark_clean();

        reg.reset_to_defaults();

        assert_eq!(reg.get("brightness"), Some("50"));
        assert!(reg.is_dirty());
    }

    #[test]
    fn export_is_in_insertion_order() {
        let reg = sample();
        let snapshot = reg.export_snapshot();
        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["device_name", "brightness", "enabled", "email"]);
        assert_eq!(snapshot[1].1.as_str(), "50");
    }

    #[test]
    fn import_is_best_effort() {
        let mut reg = sample();
        let mut hooks = Recorder::default();

        let report = reg.import_snapshot_with(
            [("brightness", "80"), ("bogus", "x"), ("email", "not-an-email")],
            &mut hooks,
        );

        assert_eq!(report.applied, 1);
        assert_eq!(report.rejected, 2);
        assert!(!report.is_complete());
        assert_eq!(report.failures[0].0.as_str(), "bogus");
        assert_eq!(report.failures[0].1, ValidationError::UnknownKey);
        assert_eq!(report.failures[1].1, ValidationError::InvalidFormat);
        assert_eq!(reg.get("brightness"), Some("80"));
        assert_eq!(reg.get("email"), Some("admin@example.com"));
        assert_eq!(hooks.changes.len(), 1);
    }

    #[test]
    fn apply_persisted_skips_invalid_without_dirtying() {
        let mut reg = sample();
        assert!(reg.apply_persisted("brightness", "90"));
        assert!(!reg.apply_persisted("brightness", "900"));
        assert!(!reg.apply_persisted("missing", "1"));
        assert_eq!(reg.get("brightness"), Some("90"));
        assert!(!reg.is_dirty());
    }

    #[test]
    fn presentation_order_and_groups() {
        let mut reg: ParameterRegistry<4> = ParameterRegistry::new();
        reg.register(ParameterDescriptor::text("ssid", "SSID", "").in_group("wifi"))
            .unwrap();
        reg.register(ParameterDescriptor::text("name", "Name", "").with_order(0))
            .unwrap();
        reg.register(ParameterDescriptor::text("pass", "Pass", "").in_group("wifi"))
            .unwrap();

        let ordered: Vec<&str> = reg.presentation_order().iter().map(|p| p.key()).collect();
        assert_eq!(ordered, ["ssid", "name", "pass"]);
        assert_eq!(reg.groups().as_slice(), ["wifi", "general"]);
        assert_eq!(reg.keys().collect::<Vec<_>>(), ["ssid", "name", "pass"]);
    }
}
