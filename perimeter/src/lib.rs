//! # Perimeter
//!
//! Runtime contract validation for structured values.
//!
//! Perimeter lets a program declare the expected shape of a record and check
//! arbitrary values against it:
//!
//! - **Contracts**: named, immutable lists of typed fields with constraints,
//!   nested to any depth
//! - **Validation**: every violation in one pass, each tagged with the path of
//!   ancestor fields that leads to it
//! - **Boundary guards**: operations whose body only runs once a designated
//!   argument satisfies its contract
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use perimeter::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ContractRegistry::new());
//! registry.register(
//!     Contract::builder("user_params")
//!         .field(FieldSpec::required("email", FieldType::String).format("@"))
//!         .field(FieldSpec::required("password", FieldType::String).min_length(12))
//!         .build()?,
//! )?;
//!
//! let scope = ScopeBuilder::new(registry)
//!     .operation(OperationDef::new("create_user", 1, |args| Ok(args[0].clone())))
//!     .guard("create_user", 1, "user_params")
//!     .build()?;
//!
//! let created = scope.invoke("create_user", vec![params])?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod contracts;
pub mod errors;
pub mod guard;
pub mod observability;
pub mod validation;
pub mod value;

pub use config::{DuplicatePolicy, ListItemPolicy, ValidationConfig};
pub use validation::validate;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{DuplicatePolicy, ListItemPolicy, ValidationConfig};
    pub use crate::contracts::{
        Constraint, Contract, ContractBuilder, ContractRegistry, FieldSpec, FieldType, Number,
    };
    pub use crate::errors::{
        ContractError, GuardError, RegistryError, ScopeError, ValidationError, Violation,
    };
    pub use crate::guard::{
        guard, guard_arg, GuardedOperation, Operation, OperationDef, OperationId, Scope,
        ScopeBuilder,
    };
    pub use crate::validation::{validate, validate_fields, Validator};
    pub use crate::value::{Record, Value};
}
