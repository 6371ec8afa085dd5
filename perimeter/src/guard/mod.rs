//! Boundary guards.
//!
//! A guard validates one argument of an operation against a named contract
//! before the operation body runs. Rejected calls never reach the body and
//! surface as [`crate::errors::GuardError::Validation`].
//!
//! Guards are declared per call shape through a [`ScopeBuilder`], or applied
//! to a single operation with [`guard`] / [`guard_arg`].

mod guarded;
mod operation;
mod scope;

pub use guarded::{guard, guard_arg, GuardedOperation};
#[cfg(test)]
pub use operation::MockOperation;
pub use operation::{Operation, OperationDef, OperationId};
pub use scope::{Scope, ScopeBuilder};
