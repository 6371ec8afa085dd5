//! Field specifications: type, presence and constraints of one record member.

use regex::Regex;
use std::fmt;

use crate::errors::ContractError;
use crate::value::Value;

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string.
    String,
    /// Integer.
    Integer,
    /// Float (integers do not match).
    Float,
    /// Boolean.
    Boolean,
    /// Symbol.
    Symbol,
    /// Record, optionally with nested field specs.
    Map,
    /// List with elements of any type.
    List,
    /// List whose elements all match the item type.
    ListOf(Box<FieldType>),
}

impl FieldType {
    /// Creates a `list_of(item)` type.
    #[must_use]
    pub fn list_of(item: Self) -> Self {
        Self::ListOf(Box::new(item))
    }

    /// Shallow runtime type match.
    ///
    /// `ListOf` only checks that the value is a list; element types are
    /// checked by the validation engine.
    #[must_use]
    pub const fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::String, Value::String(_))
                | (Self::Integer, Value::Integer(_))
                | (Self::Float, Value::Float(_))
                | (Self::Boolean, Value::Boolean(_))
                | (Self::Symbol, Value::Symbol(_))
                | (Self::Map, Value::Map(_))
                | (Self::List | Self::ListOf(_), Value::List(_))
        )
    }

    /// Name used in `expected <type>` messages.
    #[must_use]
    pub const fn expected_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
            Self::Map => "map",
            Self::List | Self::ListOf(_) => "list",
        }
    }

    const fn is_sized(&self) -> bool {
        matches!(self, Self::String | Self::List | Self::ListOf(_))
    }

    const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListOf(item) => write!(f, "list_of({item})"),
            other => write!(f, "{}", other.expected_name()),
        }
    }
}

/// Numeric bound for `min`/`max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer bound.
    Integer(i64),
    /// Float bound.
    Float(f64),
}

impl Number {
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    fn is_finite(self) -> bool {
        match self {
            Self::Integer(_) => true,
            Self::Float(f) => f.is_finite(),
        }
    }

    fn cmp_bound(self, other: Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }

    /// Compares a numeric value to this bound; `None` for non-numbers.
    ///
    /// Integer against integer is exact, anything mixed goes through `f64`.
    #[must_use]
    pub fn compare(self, value: &Value) -> Option<std::cmp::Ordering> {
        match (value, self) {
            (Value::Integer(v), Self::Integer(b)) => Some(v.cmp(&b)),
            _ => value.as_f64()?.partial_cmp(&self.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Number {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// A `format` pattern, compiled at declaration time.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl Pattern {
    /// Compiles a pattern. Compilation errors surface when the contract is built.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source);
        Self { source, compiled }
    }

    /// Pattern source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if the pattern compiled and finds a match in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.compiled.as_ref().is_ok_and(|re| re.is_match(text))
    }

    pub(crate) fn error(&self) -> Option<&regex::Error> {
        self.compiled.as_ref().err()
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self {
            source: regex.as_str().to_string(),
            compiled: Ok(regex),
        }
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// One constraint on a present, correctly typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// String must match the pattern.
    Format(Pattern),
    /// Minimum string or list length.
    MinLength(usize),
    /// Maximum string or list length.
    MaxLength(usize),
    /// Minimum numeric value, inclusive.
    Min(Number),
    /// Maximum numeric value, inclusive.
    Max(Number),
    /// Value must equal one of these.
    In(Vec<Value>),
}

impl Constraint {
    /// Constraint kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Format(_) => "format",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::In(_) => "in",
        }
    }

    const fn applies_to(&self, field_type: &FieldType) -> bool {
        match self {
            Self::Format(_) => matches!(field_type, FieldType::String),
            Self::MinLength(_) | Self::MaxLength(_) => field_type.is_sized(),
            Self::Min(_) | Self::Max(_) => field_type.is_numeric(),
            Self::In(_) => true,
        }
    }
}

/// One named member of a contract.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field name, unique among siblings.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Whether the field must be present.
    pub required: bool,
    /// Constraints, at most one per kind, in declaration order.
    pub constraints: Vec<Constraint>,
    /// Nested specs for `map` fields.
    pub fields: Vec<FieldSpec>,
}

impl FieldSpec {
    /// Creates a field spec.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            required,
            constraints: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Creates a required field.
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, field_type, true)
    }

    /// Creates an optional field.
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self::new(name, field_type, false)
    }

    /// Adds a constraint, replacing any earlier one of the same kind.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        match self
            .constraints
            .iter_mut()
            .find(|c| c.kind() == constraint.kind())
        {
            Some(existing) => *existing = constraint,
            None => self.constraints.push(constraint),
        }
        self
    }

    /// Requires the string to match a regular expression.
    #[must_use]
    pub fn format(self, pattern: impl Into<Pattern>) -> Self {
        self.constraint(Constraint::Format(pattern.into()))
    }

    /// Sets a minimum length.
    #[must_use]
    pub fn min_length(self, n: usize) -> Self {
        self.constraint(Constraint::MinLength(n))
    }

    /// Sets a maximum length.
    #[must_use]
    pub fn max_length(self, n: usize) -> Self {
        self.constraint(Constraint::MaxLength(n))
    }

    /// Sets an inclusive minimum value.
    #[must_use]
    pub fn min(self, n: impl Into<Number>) -> Self {
        self.constraint(Constraint::Min(n.into()))
    }

    /// Sets an inclusive maximum value.
    #[must_use]
    pub fn max(self, n: impl Into<Number>) -> Self {
        self.constraint(Constraint::Max(n.into()))
    }

    /// Restricts the value to an explicit set.
    #[must_use]
    pub fn one_of<V: Into<Value>>(self, allowed: impl IntoIterator<Item = V>) -> Self {
        self.constraint(Constraint::In(allowed.into_iter().map(Into::into).collect()))
    }

    /// Declares nested fields of a `map` field.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Looks up a nested field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn check(&self) -> Result<(), ContractError> {
        if !self.fields.is_empty() && self.field_type != FieldType::Map {
            return Err(ContractError::UnexpectedNestedFields {
                field: self.name.clone(),
                field_type: self.field_type.to_string(),
            });
        }

        for constraint in &self.constraints {
            if !constraint.applies_to(&self.field_type) {
                return Err(ContractError::InapplicableConstraint {
                    field: self.name.clone(),
                    constraint: constraint.kind(),
                    field_type: self.field_type.to_string(),
                });
            }
            if let Constraint::Min(bound) | Constraint::Max(bound) = constraint {
                if !bound.is_finite() {
                    return Err(ContractError::NonFiniteBound {
                        field: self.name.clone(),
                        constraint: constraint.kind(),
                    });
                }
            }
            if let Constraint::Format(pattern) = constraint {
                if let Some(err) = pattern.error() {
                    return Err(ContractError::InvalidFormat {
                        field: self.name.clone(),
                        pattern: pattern.as_str().to_string(),
                        source: err.clone(),
                    });
                }
            }
        }

        self.check_bounds()
    }

    fn check_bounds(&self) -> Result<(), ContractError> {
        let mut min_len = None;
        let mut max_len = None;
        let mut min = None;
        let mut max = None;
        for constraint in &self.constraints {
            match constraint {
                Constraint::MinLength(n) => min_len = Some(*n),
                Constraint::MaxLength(n) => max_len = Some(*n),
                Constraint::Min(n) => min = Some(*n),
                Constraint::Max(n) => max = Some(*n),
                _ => {}
            }
        }

        if let (Some(lo), Some(hi)) = (min_len, max_len) {
            if lo > hi {
                return Err(self.conflict("min_length", "max_length"));
            }
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo.cmp_bound(hi).is_some_and(std::cmp::Ordering::is_gt) {
                return Err(self.conflict("min", "max"));
            }
        }
        Ok(())
    }

    fn conflict(&self, lower: &'static str, upper: &'static str) -> ContractError {
        ContractError::ConflictingBounds {
            field: self.name.clone(),
            lower,
            upper,
        }
    }
}
