//! Recursive validation of records against field specs.

use std::sync::Arc;
use tracing::debug;

use super::constraints;
use crate::config::{ListItemPolicy, ValidationConfig};
use crate::contracts::{Contract, ContractRegistry, FieldSpec, FieldType};
use crate::errors::{Violation, CONTRACT_FIELD, ROOT_FIELD};
use crate::value::{Record, Value};

/// Validates `value` against the contract registered as `contract_name`.
///
/// Returns the value unchanged when it satisfies the contract, otherwise every
/// violation found, in field declaration order, depth first.
pub fn validate(
    registry: &ContractRegistry,
    contract_name: &str,
    value: Value,
) -> Result<Value, Vec<Violation>> {
    let Some(contract) = registry.get(contract_name) else {
        debug!(contract = contract_name, "Contract not found");
        return Err(vec![Violation::new(
            CONTRACT_FIELD,
            format!("contract {contract_name} not found"),
        )]);
    };
    validate_contract(&contract, value, registry.config())
}

/// Validates `value` against a contract that is already in hand.
pub fn validate_contract(
    contract: &Contract,
    value: Value,
    config: &ValidationConfig,
) -> Result<Value, Vec<Violation>> {
    let Some(record) = value.as_record() else {
        debug!(contract = contract.name(), got = value.type_name(), "Rejected non-record value");
        return Err(vec![Violation::new(
            ROOT_FIELD,
            format!("expected map, got {value}"),
        )]);
    };

    let mut walker = Walker::new(config);
    walker.fields(contract.fields(), record);

    if walker.violations.is_empty() {
        debug!(contract = contract.name(), "Validation passed");
        Ok(value)
    } else {
        debug!(
            contract = contract.name(),
            violations = walker.violations.len(),
            "Validation failed"
        );
        Err(walker.violations)
    }
}

/// Validates a record against an explicit field list, below `path`.
///
/// Returns the accumulated violations; empty means success at this level.
pub fn validate_fields(fields: &[FieldSpec], record: &Record, path: &[String]) -> Vec<Violation> {
    validate_fields_with(fields, record, path, &ValidationConfig::default())
}

/// [`validate_fields`] with an explicit config.
pub fn validate_fields_with(
    fields: &[FieldSpec],
    record: &Record,
    path: &[String],
    config: &ValidationConfig,
) -> Vec<Violation> {
    let mut walker = Walker::new(config);
    walker.path.extend_from_slice(path);
    walker.fields(fields, record);
    walker.violations
}

/// Validation entry point bound to a shared registry.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<ContractRegistry>,
}

impl Validator {
    /// Creates a validator over the registry.
    #[must_use]
    pub const fn new(registry: Arc<ContractRegistry>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }

    /// See [`validate`].
    pub fn validate(&self, contract_name: &str, value: Value) -> Result<Value, Vec<Violation>> {
        validate(&self.registry, contract_name, value)
    }
}

struct Walker<'a> {
    config: &'a ValidationConfig,
    path: Vec<String>,
    violations: Vec<Violation>,
}

impl<'a> Walker<'a> {
    const fn new(config: &'a ValidationConfig) -> Self {
        Self {
            config,
            path: Vec::new(),
            violations: Vec::new(),
        }
    }

    fn fields(&mut self, fields: &[FieldSpec], record: &Record) {
        for spec in fields {
            match record.get(&spec.name) {
                None if spec.required => self.push(&spec.name, "is required".to_string()),
                None => {}
                Some(value) => {
                    if self.check_type(spec, value) {
                        for constraint in &spec.constraints {
                            if let Some(error) = constraints::check(constraint, value) {
                                self.push(&spec.name, error);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Returns true when the value has the declared type.
    fn check_type(&mut self, spec: &FieldSpec, value: &Value) -> bool {
        if !spec.field_type.matches(value) {
            self.push(
                &spec.name,
                format!(
                    "expected {}, got {}",
                    spec.field_type.expected_name(),
                    value.type_name()
                ),
            );
            return false;
        }

        match (&spec.field_type, value) {
            (FieldType::Map, Value::Map(record)) => {
                self.path.push(spec.name.clone());
                self.fields(&spec.fields, record);
                self.path.pop();
                true
            }
            (FieldType::ListOf(item), Value::List(items)) => self.check_items(spec, item, items),
            _ => true,
        }
    }

    fn check_items(&mut self, spec: &FieldSpec, item: &FieldType, items: &[Value]) -> bool {
        match self.config.list_items {
            ListItemPolicy::PerField => {
                if items.iter().all(|v| item.matches(v)) {
                    return true;
                }
                self.push(&spec.name, "invalid list item".to_string());
                false
            }
            ListItemPolicy::PerIndex => {
                let before = self.violations.len();
                self.path.push(spec.name.clone());
                for (index, v) in items.iter().enumerate() {
                    if !item.matches(v) {
                        self.push(
                            &index.to_string(),
                            format!("expected {}, got {}", item.expected_name(), v.type_name()),
                        );
                    }
                }
                self.path.pop();
                self.violations.len() == before
            }
        }
    }

    fn push(&mut self, field: &str, error: String) {
        self.violations.push(Violation::at(&self.path, field, error));
    }
}
