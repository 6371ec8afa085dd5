//! Error types for the perimeter engine.
//!
//! Validation failures are reported as [`Violation`] lists and surfaced at the
//! guard boundary as a single [`ValidationError`]. Declaration mistakes in
//! contracts, registries and guard scopes have their own error types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Common error codes.
pub mod codes {
    /// Validation failed at a guarded boundary.
    pub const VALIDATION: &str = "PERIMETER-001-VALIDATION";
    /// Contract declaration is invalid.
    pub const CONTRACT: &str = "PERIMETER-002-CONTRACT";
    /// Registry rejected a contract.
    pub const REGISTRY: &str = "PERIMETER-003-REGISTRY";
    /// Guard scope declaration is invalid.
    pub const SCOPE: &str = "PERIMETER-004-SCOPE";
}

/// Sentinel field used when the named contract is not registered.
pub const CONTRACT_FIELD: &str = "_contract";

/// Sentinel field used when the validated value is not a record.
pub const ROOT_FIELD: &str = "_root";

/// One reported contract failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Leaf field name.
    pub field: String,
    /// Human-readable description.
    pub error: String,
    /// Ancestor field names from the validated root down to, but excluding, `field`.
    #[serde(default)]
    pub path: Vec<String>,
}

impl Violation {
    /// Creates a top-level violation.
    #[must_use]
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
            path: Vec::new(),
        }
    }

    /// Creates a violation below the given ancestors.
    #[must_use]
    pub fn at(path: &[String], field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
            path: path.to_vec(),
        }
    }

    /// Dotted location, `path.field`.
    #[must_use]
    pub fn location(&self) -> String {
        if self.path.is_empty() {
            self.field.clone()
        } else {
            format!("{}.{}", self.path.join("."), self.field)
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "- {}: {}", self.location(), self.error)
    }
}

/// Error raised when a guarded boundary rejects its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.render())]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Creates a validation error from a violation list.
    #[must_use]
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Fixed summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Validation failed at perimeter with {} violation(s):",
            self.violations.len()
        )
    }

    /// One rendered line per violation, in report order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Summary followed by the violation lines.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = self.summary();
        for line in self.lines() {
            out.push('\n');
            out.push_str(&line);
        }
        out
    }

    /// The ordered violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True if no violations are carried.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Converts to a dictionary representation for API responses.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(codes::VALIDATION));
        map.insert("message".to_string(), serde_json::json!(self.summary()));
        map.insert(
            "violations".to_string(),
            serde_json::json!(self.violations),
        );
        map
    }
}

impl From<Vec<Violation>> for ValidationError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::new(violations)
    }
}

/// Errors raised while declaring a contract.
#[derive(Debug, Clone, Error)]
pub enum ContractError {
    /// Contract name is empty or whitespace-only.
    #[error("Invalid contract name: {reason}")]
    InvalidName {
        /// Why the name was rejected.
        reason: String,
    },

    /// Two sibling fields share a name.
    #[error("Contract '{contract}' declares field '{field}' more than once{}", at_path(.path))]
    DuplicateField {
        /// Contract name.
        contract: String,
        /// Ancestor field names.
        path: Vec<String>,
        /// Repeated field name.
        field: String,
    },

    /// A `format` pattern failed to compile.
    #[error("Field '{field}' has an invalid format pattern '{pattern}': {source}")]
    InvalidFormat {
        /// Field name.
        field: String,
        /// Pattern source.
        pattern: String,
        /// Compilation error.
        #[source]
        source: regex::Error,
    },

    /// A constraint cannot apply to the field's type.
    #[error("Constraint '{constraint}' does not apply to field '{field}' of type {field_type}")]
    InapplicableConstraint {
        /// Field name.
        field: String,
        /// Constraint kind.
        constraint: &'static str,
        /// Declared field type.
        field_type: String,
    },

    /// Nested fields were declared on a non-map field.
    #[error("Field '{field}' of type {field_type} cannot declare nested fields")]
    UnexpectedNestedFields {
        /// Field name.
        field: String,
        /// Declared field type.
        field_type: String,
    },

    /// A numeric bound is NaN or infinite.
    #[error("Field '{field}' declares a non-finite {constraint} bound")]
    NonFiniteBound {
        /// Field name.
        field: String,
        /// Constraint kind.
        constraint: &'static str,
    },

    /// Lower bound exceeds upper bound.
    #[error("Field '{field}' declares {lower} greater than {upper}")]
    ConflictingBounds {
        /// Field name.
        field: String,
        /// Lower-bound constraint kind.
        lower: &'static str,
        /// Upper-bound constraint kind.
        upper: &'static str,
    },
}

impl ContractError {
    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        codes::CONTRACT
    }
}

fn at_path(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" under '{}'", path.join("."))
    }
}

/// Errors raised by the contract registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A different contract is already registered under this name.
    #[error("Contract '{name}' already registered with a different definition")]
    DuplicateContract {
        /// Contract name.
        name: String,
    },
}

impl RegistryError {
    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        codes::REGISTRY
    }
}

/// Errors raised while building a guard scope.
#[derive(Debug, Clone, Error)]
pub enum ScopeError {
    /// A guard names a call shape that was never declared.
    #[error("Cannot guard {name}/{arity}: no such operation in scope")]
    UnknownOperation {
        /// Operation name.
        name: String,
        /// Parameter count.
        arity: usize,
    },

    /// Two operations share one call shape.
    #[error("Operation {name}/{arity} declared more than once")]
    DuplicateOperation {
        /// Operation name.
        name: String,
        /// Parameter count.
        arity: usize,
    },

    /// A call shape was guarded more than once.
    #[error("Operation {name}/{arity} already guarded by contract '{contract}'")]
    DuplicateGuard {
        /// Operation name.
        name: String,
        /// Parameter count.
        arity: usize,
        /// Contract already bound.
        contract: String,
    },

    /// Guarded argument position is outside the parameter list.
    #[error("Operation {name}/{arity} has no argument at position {position}")]
    InvalidArgumentPosition {
        /// Operation name.
        name: String,
        /// Parameter count.
        arity: usize,
        /// Requested position.
        position: usize,
    },
}

impl ScopeError {
    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        codes::SCOPE
    }
}

/// The signal surfaced to callers of a guarded operation.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Input failed its contract; the body was not invoked.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Called with a different number of arguments than the guarded shape.
    #[error("Operation {name}/{expected} called with {actual} argument(s)")]
    ArityMismatch {
        /// Operation name.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// No operation with this call shape exists in the scope.
    #[error("Undefined operation {name}/{arity}")]
    UndefinedOperation {
        /// Operation name.
        name: String,
        /// Parameter count.
        arity: usize,
    },

    /// The operation body itself failed.
    #[error("Operation {name} failed: {source}")]
    Operation {
        /// Operation name.
        name: String,
        /// Body error.
        #[source]
        source: anyhow::Error,
    },
}

impl GuardError {
    /// Returns the validation error if the boundary rejected the input.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// True if the input was rejected by a contract.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
