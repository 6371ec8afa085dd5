//! Operations and their call shapes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::GuardError;
use crate::value::Value;

/// Body of an operation that can be placed behind a guard.
#[cfg_attr(test, mockall::automock)]
pub trait Operation: Send + Sync {
    /// Runs the body with positional arguments.
    fn call(&self, args: Vec<Value>) -> anyhow::Result<Value>;
}

impl<F> Operation for F
where
    F: Fn(Vec<Value>) -> anyhow::Result<Value> + Send + Sync,
{
    fn call(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        self(args)
    }
}

/// Call shape: operation name plus parameter count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId {
    /// Operation name.
    pub name: String,
    /// Parameter count.
    pub arity: usize,
}

impl OperationId {
    /// Creates a call shape.
    #[must_use]
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// An operation declaration: call shape, body and inspectable metadata.
#[derive(Clone)]
pub struct OperationDef {
    id: OperationId,
    doc: Option<String>,
    metadata: BTreeMap<String, String>,
    body: Arc<dyn Operation>,
}

impl OperationDef {
    /// Declares an operation whose body is a closure.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, arity: usize, body: F) -> Self
    where
        F: Fn(Vec<Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::from_arc(name, arity, Arc::new(body))
    }

    /// Declares an operation around any [`Operation`] implementation.
    #[must_use]
    pub fn from_operation(
        name: impl Into<String>,
        arity: usize,
        body: impl Operation + 'static,
    ) -> Self {
        Self::from_arc(name, arity, Arc::new(body))
    }

    /// Declares an operation around a shared body.
    #[must_use]
    pub fn from_arc(name: impl Into<String>, arity: usize, body: Arc<dyn Operation>) -> Self {
        Self {
            id: OperationId::new(name, arity),
            doc: None,
            metadata: BTreeMap::new(),
            body,
        }
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Attaches a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Call shape.
    #[must_use]
    pub const fn id(&self) -> &OperationId {
        &self.id
    }

    /// Operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.id.name
    }

    /// Parameter count.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.id.arity
    }

    /// Attached documentation.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Attached metadata.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Calls the body directly, with no contract check.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, GuardError> {
        self.check_arity(args.len())?;
        self.body.call(args).map_err(|source| GuardError::Operation {
            name: self.id.name.clone(),
            source,
        })
    }

    pub(crate) fn check_arity(&self, actual: usize) -> Result<(), GuardError> {
        if actual == self.id.arity {
            Ok(())
        } else {
            Err(GuardError::ArityMismatch {
                name: self.id.name.clone(),
                expected: self.id.arity,
                actual,
            })
        }
    }
}

impl fmt::Debug for OperationDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationDef")
            .field("id", &self.id)
            .field("doc", &self.doc)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
