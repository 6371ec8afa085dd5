//! Named contracts and their builder.

use std::collections::HashSet;

use super::FieldSpec;
use crate::errors::{ContractError, Violation};
use crate::validation;
use crate::value::Value;

/// A named, immutable schema of expected fields for a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Contract {
    name: String,
    fields: Vec<FieldSpec>,
}

impl Contract {
    /// Starts declaring a contract.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name)
    }

    /// Contract name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a top-level field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates a value against this contract alone, with default config.
    pub fn validate(&self, value: Value) -> Result<Value, Vec<Violation>> {
        validation::validate_contract(self, value, &crate::ValidationConfig::default())
    }
}

/// Builder for a [`Contract`].
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl ContractBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Appends several fields.
    #[must_use]
    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(specs);
        self
    }

    /// Checks the declaration and freezes it.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty name, repeated sibling names, malformed
    /// `format` patterns, constraints that do not fit the field type, nested
    /// fields on non-map types, or inverted bounds.
    pub fn build(self) -> Result<Contract, ContractError> {
        if self.name.trim().is_empty() {
            return Err(ContractError::InvalidName {
                reason: "Contract name cannot be empty or whitespace-only".to_string(),
            });
        }

        let mut path = Vec::new();
        check_fields(&self.name, &self.fields, &mut path)?;

        Ok(Contract {
            name: self.name,
            fields: self.fields,
        })
    }
}

fn check_fields(
    contract: &str,
    fields: &[FieldSpec],
    path: &mut Vec<String>,
) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for spec in fields {
        if !seen.insert(spec.name.as_str()) {
            return Err(ContractError::DuplicateField {
                contract: contract.to_string(),
                path: path.clone(),
                field: spec.name.clone(),
            });
        }
        spec.check()?;

        if !spec.fields.is_empty() {
            path.push(spec.name.clone());
            check_fields(contract, &spec.fields, path)?;
            path.pop();
        }
    }
    Ok(())
}
