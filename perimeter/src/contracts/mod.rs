//! Contract model.
//!
//! This module provides:
//! - Field specifications with types and constraints
//! - Named contracts built once and frozen
//! - A name-keyed contract registry

mod contract;
mod field;
mod registry;

pub use contract::{Contract, ContractBuilder};
pub use field::{Constraint, FieldSpec, FieldType, Number, Pattern};
pub use registry::ContractRegistry;
