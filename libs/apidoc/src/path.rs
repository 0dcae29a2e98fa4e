use std::collections::BTreeMap;

use crate::method::Method;
use crate::operation::{Operation, OperationBuilder};

/// Compiled operations of one path, keyed by method.
pub type PathItemDraft = BTreeMap<Method, Operation>;

/// All operations declared against one path string.
#[derive(Debug, Clone)]
pub struct PathRegistration {
    path: String,
    operations: Vec<OperationBuilder>,
}

impl PathRegistration {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            operations: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Builders in registration order.
    pub fn operations(&self) -> &[OperationBuilder] {
        &self.operations
    }

    pub(crate) fn has_method(&self, method: Method) -> bool {
        self.operations.iter().any(|op| op.method() == method)
    }

    /// Methods registered more than once on this path.
    pub(crate) fn duplicated_methods(&self) -> Vec<Method> {
        let mut seen = BTreeMap::new();
        for op in &self.operations {
            *seen.entry(op.method()).or_insert(0usize) += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(method, _)| method)
            .collect()
    }

    /// Attach a new builder for `method` and hand it back for configuration.
    pub(crate) fn add(&mut self, method: Method) -> &mut OperationBuilder {
        let index = self.operations.len();
        self.operations.push(OperationBuilder::new(method));
        &mut self.operations[index]
    }

    /// Fold the builders into a method map in registration order; a later
    /// builder for the same method replaces the earlier entry.
    pub fn build(&self) -> (String, PathItemDraft) {
        let item = self
            .operations
            .iter()
            .fold(PathItemDraft::new(), |mut acc, builder| {
                acc.insert(builder.method(), builder.build());
                acc
            });
        (self.path.clone(), item)
    }
}
