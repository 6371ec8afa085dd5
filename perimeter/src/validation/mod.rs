//! Validation engine.
//!
//! Checks candidate values against contracts and reports every violation with
//! the path of ancestor fields leading to it. The engine never modifies the
//! value it checks: on success the input is handed back unchanged, including
//! any fields the contract does not declare.

mod constraints;
mod engine;
#[cfg(test)]
mod validation_tests;

pub use engine::{
    validate, validate_contract, validate_fields, validate_fields_with, Validator,
};
