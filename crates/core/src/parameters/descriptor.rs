//! Parameter descriptor
//!
//! A descriptor carries everything the registry needs to validate an edit
//! and everything a transport needs to render an input for it. Values are
//! held as fixed-capacity strings; numbers and booleans produced by the typed
//! constructors are canonicalized to decimal text and `"true"`/`"false"`.

use super::kind::ParameterKind;
use bitflags::bitflags;
use core::fmt::Write;

/// Maximum parameter key length
pub const MAX_KEY_LEN: usize = 32;

/// Maximum value length (current and default)
pub const MAX_VALUE_LEN: usize = 64;

/// Fixed-capacity parameter value
pub type ParamString = heapless::String<MAX_VALUE_LEN>;

/// Group assigned when none is given
pub const DEFAULT_GROUP: &str = "general";

bitflags! {
    /// Parameter editability flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Empty values are rejected
        const REQUIRED = 0b0000_0001;
        /// Value cannot be changed through `validate_and_set`
        const READ_ONLY = 0b0000_0010;
    }
}

/// Numeric bounds for integer, range and float kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericRange {
    /// Integer bounds (inclusive)
    Int {
        /// Minimum accepted value
        min: i32,
        /// Maximum accepted value
        max: i32,
        /// UI step
        step: i32,
    },
    /// Float bounds (inclusive)
    Float {
        /// Minimum accepted value
        min: f32,
        /// Maximum accepted value
        max: f32,
        /// UI step
        step: f32,
    },
}

impl NumericRange {
    /// Check an integer against the bounds
    pub fn contains_int(&self, value: i32) -> bool {
        match *self {
            NumericRange::Int { min, max, .. } => value >= min && value <= max,
            NumericRange::Float { min, max, .. } => {
                let v = value as f32;
                v >= min && v <= max
            }
        }
    }

    /// Check a float against the bounds
    pub fn contains_float(&self, value: f32) -> bool {
        match *self {
            NumericRange::Int { min, max, .. } => value >= min as f32 && value <= max as f32,
            NumericRange::Float { min, max, .. } => value >= min && value <= max,
        }
    }
}

/// Kind-dependent constraints
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    /// Bounds for numeric kinds
    pub range: Option<NumericRange>,
    /// Accepted values for `Select`; empty means unconstrained
    pub options: &'static [&'static str],
    /// Required / read-only flags
    pub flags: ParamFlags,
    /// Free-form validation metadata (e.g. a pattern for the UI); not enforced
    pub pattern: Option<&'static str>,
}

impl Constraints {
    /// No constraints at all
    pub const fn none() -> Self {
        Self {
            range: None,
            options: &[],
            flags: ParamFlags::empty(),
            pattern: None,
        }
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::none()
    }
}

/// Definition and current value of one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    key: &'static str,
    label: &'static str,
    description: &'static str,
    kind: ParameterKind,
    value: ParamString,
    default_value: ParamString,
    /// Set when the default passed to a constructor did not fit `MAX_VALUE_LEN`
    default_truncated: bool,
    constraints: Constraints,
    group: &'static str,
    order: Option<usize>,
}

impl ParameterDescriptor {
    /// Create a descriptor of any kind from a string default.
    ///
    /// Integer and range kinds get the bounds `0..=100`, floats are unbounded.
    /// Use the typed constructors to set other bounds.
    pub fn new(key: &'static str, label: &'static str, kind: ParameterKind, default: &str) -> Self {
        let range = match kind {
            ParameterKind::Integer | ParameterKind::Range => Some(NumericRange::Int {
                min: 0,
                max: 100,
                step: 1,
            }),
            ParameterKind::Float => Some(NumericRange::Float {
                min: f32::MIN,
                max: f32::MAX,
                step: 0.1,
            }),
            _ => None,
        };

        let (default_value, default_truncated) = match ParamString::try_from(default) {
            Ok(s) => (s, false),
            Err(_) => (ParamString::new(), true),
        };

        Self {
            key,
            label,
            description: "",
            kind,
            value: default_value.clone(),
            default_value,
            default_truncated,
            constraints: Constraints {
                range,
                ..Constraints::none()
            },
            group: DEFAULT_GROUP,
            order: None,
        }
    }

    /// Single-line text parameter
    pub fn text(key: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(key, label, ParameterKind::Text, default)
    }

    /// Password parameter, empty by default
    pub fn password(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, ParameterKind::Password, "")
    }

    /// Multi-line text parameter
    pub fn textarea(key: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(key, label, ParameterKind::Textarea, default)
    }

    /// Integer parameter with inclusive bounds
    pub fn integer(
        key: &'static str,
        label: &'static str,
        default: i32,
        min: i32,
        max: i32,
        step: i32,
    ) -> Self {
        Self::numeric_int(key, label, ParameterKind::Integer, default, min, max, step)
    }

    /// Slider parameter with inclusive bounds
    pub fn range(
        key: &'static str,
        label: &'static str,
        default: i32,
        min: i32,
        max: i32,
        step: i32,
    ) -> Self {
        Self::numeric_int(key, label, ParameterKind::Range, default, min, max, step)
    }

    /// Float parameter with inclusive bounds
    pub fn float(
        key: &'static str,
        label: &'static str,
        default: f32,
        min: f32,
        max: f32,
        step: f32,
    ) -> Self {
        let mut param = Self::new(key, label, ParameterKind::Float, &format_float(default));
        param.constraints.range = Some(NumericRange::Float { min, max, step });
        param
    }

    /// Checkbox parameter
    pub fn boolean(key: &'static str, label: &'static str, default: bool) -> Self {
        Self::new(key, label, ParameterKind::Boolean, format_bool(default))
    }

    /// Select parameter restricted to `options`
    pub fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: &str,
    ) -> Self {
        let mut param = Self::new(key, label, ParameterKind::Select, default);
        param.constraints.options = options;
        param
    }

    /// Color parameter
    pub fn color(key: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(key, label, ParameterKind::Color, default)
    }

    /// E-mail parameter
    pub fn email(key: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(key, label, ParameterKind::Email, default)
    }

    /// URL parameter
    pub fn url(key: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(key, label, ParameterKind::Url, default)
    }

    /// Time-of-day parameter
    pub fn time(key: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(key, label, ParameterKind::Time, default)
    }

    /// Date parameter
    pub fn date(key: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(key, label, ParameterKind::Date, default)
    }

    fn numeric_int(
        key: &'static str,
        label: &'static str,
        kind: ParameterKind,
        default: i32,
        min: i32,
        max: i32,
        step: i32,
    ) -> Self {
        let mut param = Self::new(key, label, kind, &format_int(default));
        param.constraints.range = Some(NumericRange::Int { min, max, step });
        param
    }

    /// Place the parameter in a presentation group
    pub fn in_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Override the presentation order
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }

    /// Reject empty values
    pub fn required(mut self) -> Self {
        self.constraints.flags.insert(ParamFlags::REQUIRED);
        self
    }

    /// Refuse edits through `validate_and_set`
    pub fn read_only(mut self) -> Self {
        self.constraints.flags.insert(ParamFlags::READ_ONLY);
        self
    }

    /// Attach help text
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Attach UI validation metadata
    pub fn with_pattern(mut self, pattern: &'static str) -> Self {
        self.constraints.pattern = Some(pattern);
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Current value
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    pub(crate) fn value_string(&self) -> &ParamString {
        &self.value
    }

    /// Factory value
    pub fn default_value(&self) -> &str {
        self.default_value.as_str()
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn group(&self) -> &'static str {
        self.group
    }

    /// Presentation order (insertion index unless overridden)
    pub fn order(&self) -> usize {
        self.order.unwrap_or(0)
    }

    pub fn is_required(&self) -> bool {
        self.constraints.flags.contains(ParamFlags::REQUIRED)
    }

    pub fn is_read_only(&self) -> bool {
        self.constraints.flags.contains(ParamFlags::READ_ONLY)
    }

    pub(crate) fn default_fits(&self) -> bool {
        !self.default_truncated
    }

    pub(crate) fn assign_order(&mut self, index: usize) {
        self.order.get_or_insert(index);
    }

    /// Replace both default and current value with the canonical default
    pub(crate) fn set_canonical_default(&mut self, default: ParamString) {
        self.value = default.clone();
        self.default_value = default;
    }

    pub(crate) fn replace_value(&mut self, value: ParamString) -> ParamString {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn restore_default(&mut self) {
        self.value = self.default_value.clone();
    }
}

/// Canonical text for an integer
pub fn format_int(value: i32) -> ParamString {
    let mut s = ParamString::new();
    // i32 needs at most 11 bytes
    let _ = write!(s, "{}", value);
    s
}

/// Canonical text for a float (shortest round-trip representation)
pub fn format_float(value: f32) -> ParamString {
    let mut s = ParamString::new();
    // the longest finite f32 rendering is under 50 bytes
    let _ = write!(s, "{}", value);
    s
}

/// Canonical text for a boolean
pub fn format_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_constructor_canonicalizes_default() {
        let param = ParameterDescriptor::integer("brightness", "Brightness", 50, 0, 100, 1);
        assert_eq!(param.key(), "brightness");
        assert_eq!(param.kind(), ParameterKind::Integer);
        assert_eq!(param.value(), "50");
        assert_eq!(param.default_value(), "50");
        assert_eq!(
            param.constraints().range,
            Some(NumericRange::Int {
                min: 0,
                max: 100,
                step: 1
            })
        );
    }

    #[test]
    fn float_and_bool_defaults() {
        let gain = ParameterDescriptor::float("gain", "Gain", 1.5, 0.0, 10.0, 0.5);
        assert_eq!(gain.value(), "1.5");

        let enabled = ParameterDescriptor::boolean("enabled", "Enabled", true);
        assert_eq!(enabled.value(), "true");
        assert_eq!(enabled.kind(), ParameterKind::Boolean);
    }

    #[test]
    fn generic_numeric_defaults_bounds() {
        let param = ParameterDescriptor::new("level", "Level", ParameterKind::Range, "10");
        assert!(param.constraints().range.unwrap().contains_int(100));
        assert!(!param.constraints().range.unwrap().contains_int(101));
    }

    #[test]
    fn builder_modifiers() {
        let param = ParameterDescriptor::text("ssid", "WiFi SSID", "")
            .in_group("network")
            .with_order(3)
            .required()
            .with_description("Network to join")
            .with_pattern("[A-Za-z0-9 ]+");

        assert_eq!(param.group(), "network");
        assert_eq!(param.order(), 3);
        assert!(param.is_required());
        assert!(!param.is_read_only());
        assert_eq!(param.description(), "Network to join");
        assert_eq!(param.constraints().pattern, Some("[A-Za-z0-9 ]+"));
    }

    #[test]
    fn default_group_is_general() {
        let param = ParameterDescriptor::password("pass", "Password");
        assert_eq!(param.group(), DEFAULT_GROUP);
        assert_eq!(param.value(), "");
    }

    #[test]
    fn oversized_default_is_flagged() {
        let long = "x".repeat(MAX_VALUE_LEN + 1);
        let param = ParameterDescriptor::text("motd", "Message", &long);
        assert!(!param.default_fits());

        let ok = ParameterDescriptor::text("motd", "Message", "hello");
        assert!(ok.default_fits());
    }

    #[test]
    fn assign_order_keeps_explicit_order() {
        let mut explicit = ParameterDescriptor::text("a", "A", "").with_order(9);
        explicit.assign_order(2);
        assert_eq!(explicit.order(), 9);

        let mut implicit = ParameterDescriptor::text("b", "B", "");
        implicit.assign_order(2);
        assert_eq!(implicit.order(), 2);
    }

    #[test]
    fn float_range_accepts_integral_checks() {
        let range = NumericRange::Float {
            min: -1.0,
            max: 1.0,
            step: 0.1,
        };
        assert!(range.contains_float(0.5));
        assert!(!range.contains_float(1.5));
        assert!(range.contains_int(1));
        assert!(!range.contains_int(2));
    }
}
