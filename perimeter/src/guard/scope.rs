//! Declaring scopes: a set of operations plus the guards bound to them.

use std::collections::HashMap;
use std::sync::Arc;

use super::{guard_arg, GuardedOperation, OperationDef, OperationId};
use crate::contracts::ContractRegistry;
use crate::errors::{GuardError, ScopeError};
use crate::value::Value;

#[derive(Debug, Clone)]
struct GuardDecl {
    id: OperationId,
    position: usize,
    contract: String,
}

/// Builder collecting operations and `(call shape, contract)` guard pairs.
///
/// Guards bind to one exact call shape. An operation with a defaulted
/// trailing parameter is two shapes, and each must be guarded on its own.
#[derive(Debug)]
pub struct ScopeBuilder {
    registry: Arc<ContractRegistry>,
    operations: Vec<OperationDef>,
    guards: Vec<GuardDecl>,
}

impl ScopeBuilder {
    /// Creates a builder validating against `registry`.
    #[must_use]
    pub const fn new(registry: Arc<ContractRegistry>) -> Self {
        Self {
            registry,
            operations: Vec::new(),
            guards: Vec::new(),
        }
    }

    /// Declares an operation.
    #[must_use]
    pub fn operation(mut self, def: OperationDef) -> Self {
        self.operations.push(def);
        self
    }

    /// Guards the first argument of `name/arity` with `contract`.
    #[must_use]
    pub fn guard(self, name: impl Into<String>, arity: usize, contract: impl Into<String>) -> Self {
        self.guard_arg(name, arity, 0, contract)
    }

    /// Guards the argument at `position` of `name/arity` with `contract`.
    #[must_use]
    pub fn guard_arg(
        mut self,
        name: impl Into<String>,
        arity: usize,
        position: usize,
        contract: impl Into<String>,
    ) -> Self {
        self.guards.push(GuardDecl {
            id: OperationId::new(name, arity),
            position,
            contract: contract.into(),
        });
        self
    }

    /// Wires every guard to its operation.
    ///
    /// # Errors
    ///
    /// Fails when two operations share a call shape, a guard names an
    /// undeclared shape, a shape is guarded twice, or a guard position is
    /// outside the operation's parameters.
    pub fn build(self) -> Result<Scope, ScopeError> {
        let mut entries: HashMap<OperationId, Entry> = HashMap::new();
        for def in self.operations {
            let id = def.id().clone();
            if entries.contains_key(&id) {
                return Err(ScopeError::DuplicateOperation {
                    name: id.name,
                    arity: id.arity,
                });
            }
            entries.insert(id, Entry::Plain(def));
        }

        for decl in self.guards {
            let entry = entries
                .remove(&decl.id)
                .ok_or_else(|| ScopeError::UnknownOperation {
                    name: decl.id.name.clone(),
                    arity: decl.id.arity,
                })?;

            let def = match entry {
                Entry::Plain(def) => def,
                Entry::Guarded(existing) => {
                    return Err(ScopeError::DuplicateGuard {
                        name: decl.id.name,
                        arity: decl.id.arity,
                        contract: existing.contract().to_string(),
                    });
                }
            };

            let guarded = guard_arg(Arc::clone(&self.registry), def, decl.position, decl.contract)?;
            entries.insert(decl.id, Entry::Guarded(guarded));
        }

        Ok(Scope { entries })
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Plain(OperationDef),
    Guarded(GuardedOperation),
}

impl Entry {
    const fn def(&self) -> &OperationDef {
        match self {
            Self::Plain(def) => def,
            Self::Guarded(guarded) => guarded.def(),
        }
    }
}

/// A built scope: dispatches calls by `(name, argument count)`.
#[derive(Debug, Clone)]
pub struct Scope {
    entries: HashMap<OperationId, Entry>,
}

impl Scope {
    /// Calls `name` with `args`, validating first if that call shape is guarded.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value, GuardError> {
        let id = OperationId::new(name, args.len());
        match self.entries.get(&id) {
            Some(Entry::Guarded(guarded)) => guarded.call(args),
            Some(Entry::Plain(def)) => def.invoke(args),
            None => Err(GuardError::UndefinedOperation {
                name: id.name,
                arity: id.arity,
            }),
        }
    }

    /// The declaration for a call shape, with its documentation and metadata.
    #[must_use]
    pub fn operation(&self, name: &str, arity: usize) -> Option<&OperationDef> {
        self.entries
            .get(&OperationId::new(name, arity))
            .map(Entry::def)
    }

    /// True if the call shape validates its input.
    #[must_use]
    pub fn is_guarded(&self, name: &str, arity: usize) -> bool {
        self.contract_for(name, arity).is_some()
    }

    /// Contract bound to a call shape, if guarded.
    #[must_use]
    pub fn contract_for(&self, name: &str, arity: usize) -> Option<&str> {
        match self.entries.get(&OperationId::new(name, arity)) {
            Some(Entry::Guarded(guarded)) => Some(guarded.contract()),
            _ => None,
        }
    }

    /// All guarded call shapes and their contracts, sorted by shape.
    #[must_use]
    pub fn guarded_shapes(&self) -> Vec<(OperationId, String)> {
        let mut shapes: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(id, entry)| match entry {
                Entry::Guarded(guarded) => Some((id.clone(), guarded.contract().to_string())),
                Entry::Plain(_) => None,
            })
            .collect();
        shapes.sort();
        shapes
    }

    /// Number of declared call shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no operations were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(name: &str, arity: usize) -> OperationDef {
        OperationDef::new(name, arity, |_args| Ok(Value::Null))
    }

    fn builder() -> ScopeBuilder {
        ScopeBuilder::new(Arc::new(ContractRegistry::new()))
    }

    #[test]
    fn test_build_rejects_unknown_operation() {
        let result = builder().operation(noop("create", 1)).guard("create", 2, "c").build();
        assert!(matches!(
            result,
            Err(ScopeError::UnknownOperation { arity: 2, .. })
        ));
    }

    #[test]
    fn test_build_rejects_duplicate_operation() {
        let result = builder()
            .operation(noop("create", 1))
            .operation(noop("create", 1))
            .build();
        assert!(matches!(result, Err(ScopeError::DuplicateOperation { .. })));
    }

    #[test]
    fn test_build_rejects_duplicate_guard() {
        let result = builder()
            .operation(noop("create", 1))
            .guard("create", 1, "a")
            .guard("create", 1, "b")
            .build();
        match result {
            Err(ScopeError::DuplicateGuard { contract, .. }) => assert_eq!(contract, "a"),
            other => panic!("expected duplicate guard, got {other:?}"),
        }
    }

    #[test]
    fn test_build_rejects_bad_position() {
        let result = builder()
            .operation(noop("create", 2))
            .guard_arg("create", 2, 2, "c")
            .build();
        assert!(matches!(
            result,
            Err(ScopeError::InvalidArgumentPosition { position: 2, .. })
        ));
    }

    #[test]
    fn test_invoke_undefined_shape() {
        let scope = builder().operation(noop("create", 1)).build().unwrap();
        let err = scope.invoke("create", vec![]).unwrap_err();
        assert!(matches!(
            err,
            GuardError::UndefinedOperation { arity: 0, .. }
        ));
    }

    #[test]
    fn test_scope_introspection() {
        let scope = builder()
            .operation(noop("b", 1))
            .operation(noop("a", 1))
            .operation(noop("a", 2))
            .guard("b", 1, "cb")
            .guard("a", 1, "ca")
            .build()
            .unwrap();

        assert_eq!(scope.len(), 3);
        assert!(scope.is_guarded("a", 1));
        assert!(!scope.is_guarded("a", 2));
        assert_eq!(scope.contract_for("b", 1), Some("cb"));
        assert_eq!(
            scope.guarded_shapes(),
            vec![
                (OperationId::new("a", 1), "ca".to_string()),
                (OperationId::new("b", 1), "cb".to_string()),
            ]
        );
    }
}
