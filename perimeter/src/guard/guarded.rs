//! Operations wrapped with a contract check on one argument.

use std::sync::Arc;
use tracing::{debug, warn};

use super::{OperationDef, OperationId};
use crate::contracts::ContractRegistry;
use crate::errors::{GuardError, ScopeError, ValidationError};
use crate::validation::Validator;
use crate::value::Value;

/// An operation whose body only runs once its guarded argument passes a contract.
///
/// The wrapped [`OperationDef`] keeps its documentation and metadata.
#[derive(Debug, Clone)]
pub struct GuardedOperation {
    def: OperationDef,
    contract: String,
    position: usize,
    validator: Validator,
}

/// Guards the first argument of `def` with `contract`.
///
/// # Errors
///
/// Fails if the operation takes no arguments.
pub fn guard(
    registry: Arc<ContractRegistry>,
    def: OperationDef,
    contract: impl Into<String>,
) -> Result<GuardedOperation, ScopeError> {
    guard_arg(registry, def, 0, contract)
}

/// Guards the argument at `position` of `def` with `contract`.
///
/// # Errors
///
/// Fails if `position` is not below the operation's arity.
pub fn guard_arg(
    registry: Arc<ContractRegistry>,
    def: OperationDef,
    position: usize,
    contract: impl Into<String>,
) -> Result<GuardedOperation, ScopeError> {
    if position >= def.arity() {
        return Err(ScopeError::InvalidArgumentPosition {
            name: def.name().to_string(),
            arity: def.arity(),
            position,
        });
    }

    let contract = contract.into();
    if !registry.contains(&contract) {
        warn!(
            operation = %def.id(),
            contract = %contract,
            "Guarding with a contract that is not registered"
        );
    }

    Ok(GuardedOperation {
        def,
        contract,
        position,
        validator: Validator::new(registry),
    })
}

impl GuardedOperation {
    /// Validates the guarded argument, then runs the body with the validated value.
    ///
    /// On a contract failure the body is not entered and the full violation
    /// list is returned as [`GuardError::Validation`].
    pub fn call(&self, mut args: Vec<Value>) -> Result<Value, GuardError> {
        self.def.check_arity(args.len())?;

        let candidate = std::mem::replace(&mut args[self.position], Value::Null);
        match self.validator.validate(&self.contract, candidate) {
            Ok(validated) => {
                debug!(
                    operation = %self.def.id(),
                    contract = %self.contract,
                    "Guard passed"
                );
                args[self.position] = validated;
                self.def.invoke(args)
            }
            Err(violations) => {
                warn!(
                    operation = %self.def.id(),
                    contract = %self.contract,
                    violations = violations.len(),
                    "Guard rejected call"
                );
                Err(ValidationError::new(violations).into())
            }
        }
    }

    /// The wrapped declaration.
    #[must_use]
    pub const fn def(&self) -> &OperationDef {
        &self.def
    }

    /// Call shape.
    #[must_use]
    pub const fn id(&self) -> &OperationId {
        self.def.id()
    }

    /// Attached documentation of the wrapped operation.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.def.doc()
    }

    /// Contract checked before each call.
    #[must_use]
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Position of the guarded argument.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}
