//! Parameter kinds

/// Kind of a configurable parameter.
///
/// The kind selects the validation rule applied by the registry and tells
/// the transport which input widget to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParameterKind {
    /// Single-line text
    Text,
    /// Text rendered masked
    Password,
    /// Signed integer with `[min, max]` bounds
    Integer,
    /// Floating point with `[min, max]` bounds
    Float,
    /// Checkbox, read back through `as_bool`
    Boolean,
    /// One value out of a declared option set
    Select,
    /// Multi-line text
    Textarea,
    /// Color picker value (e.g. `#ff8800`)
    Color,
    /// Integer slider with `[min, max]` bounds
    Range,
    /// E-mail address
    Email,
    /// URL
    Url,
    /// Time of day
    Time,
    /// Calendar date
    Date,
}

impl ParameterKind {
    /// Kinds whose value is parsed and range-checked as an integer.
    pub fn is_integer(self) -> bool {
        matches!(self, ParameterKind::Integer | ParameterKind::Range)
    }

    /// Kinds whose value is parsed and range-checked.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self == ParameterKind::Float
    }

    /// Lower-case name used in logs and by transports.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterKind::Text => "text",
            ParameterKind::Password => "password",
            ParameterKind::Integer => "number",
            ParameterKind::Float => "float",
            ParameterKind::Boolean => "checkbox",
            ParameterKind::Select => "select",
            ParameterKind::Textarea => "textarea",
            ParameterKind::Color => "color",
            ParameterKind::Range => "range",
            ParameterKind::Email => "email",
            ParameterKind::Url => "url",
            ParameterKind::Time => "time",
            ParameterKind::Date => "date",
        }
    }
}

impl core::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
