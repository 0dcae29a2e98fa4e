//! Top-level route registry and document compilation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::assembler;
use crate::error::AssembleError;
use crate::method::Method;
use crate::openapi::OpenApi;
use crate::operation::OperationBuilder;
use crate::path::{PathItemDraft, PathRegistration};

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Info {
    pub fn new(
        title: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: description.into(),
        }
    }
}

/// What happens when the same (path, method) pair is declared twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The most recently declared builder is the one compiled. A warning is
    /// logged when the duplicate is declared.
    #[default]
    LastWins,
    /// Compilation fails with [`AssembleError::DuplicateOperation`].
    Reject,
}

/// Behavioural switches for an [`ApiDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderOptions {
    pub duplicate_operations: DuplicatePolicy,
}

/// Merged, assembly-ready view of a document.
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub openapi: String,
    pub info: Info,
    pub paths: IndexMap<String, PathItemDraft>,
}

/// Registry of every path and operation declared for one API.
///
/// Paths keep their first-declaration order in the compiled document.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    openapi: String,
    info: Info,
    options: BuilderOptions,
    paths: IndexMap<String, PathRegistration>,
}

impl ApiDocument {
    /// `openapi` is the interface-description format version written to the
    /// document (e.g. `"3.0.0"`).
    pub fn new(openapi: impl Into<String>, info: Info) -> Self {
        Self::with_options(openapi, info, BuilderOptions::default())
    }

    pub fn with_options(openapi: impl Into<String>, info: Info, options: BuilderOptions) -> Self {
        Self {
            openapi: openapi.into(),
            info,
            options,
            paths: IndexMap::new(),
        }
    }

    pub fn openapi(&self) -> &str {
        &self.openapi
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn builder_options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Registrations in first-declaration order.
    pub fn paths(&self) -> impl Iterator<Item = &PathRegistration> {
        self.paths.values()
    }

    pub fn path(&self, path: &str) -> Option<&PathRegistration> {
        self.paths.get(path)
    }

    /// Number of declared builders, duplicates included.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|p| p.operations().len()).sum()
    }

    pub fn get(&mut self, path: impl Into<String>) -> &mut OperationBuilder {
        self.method(path.into(), Method::Get)
    }

    pub fn post(&mut self, path: impl Into<String>) -> &mut OperationBuilder {
        self.method(path.into(), Method::Post)
    }

    pub fn put(&mut self, path: impl Into<String>) -> &mut OperationBuilder {
        self.method(path.into(), Method::Put)
    }

    pub fn delete(&mut self, path: impl Into<String>) -> &mut OperationBuilder {
        self.method(path.into(), Method::Delete)
    }

    pub fn patch(&mut self, path: impl Into<String>) -> &mut OperationBuilder {
        self.method(path.into(), Method::Patch)
    }

    pub fn head(&mut self, path: impl Into<String>) -> &mut OperationBuilder {
        self.method(path.into(), Method::Head)
    }

    pub fn options(&mut self, path: impl Into<String>) -> &mut OperationBuilder {
        self.method(path.into(), Method::Options)
    }

    pub fn trace(&mut self, path: impl Into<String>) -> &mut OperationBuilder {
        self.method(path.into(), Method::Trace)
    }

    /// Create-or-reuse the registration for `path` and attach a fresh builder.
    fn method(&mut self, path: String, method: Method) -> &mut OperationBuilder {
        let policy = self.options.duplicate_operations;
        let registration = self
            .paths
            .entry(path.clone())
            .or_insert_with(|| PathRegistration::new(path));

        if registration.has_method(method) {
            tracing::warn!(
                path = %registration.path(),
                %method,
                ?policy,
                "Duplicate (method, path) declared"
            );
        }

        tracing::debug!(
            path = %registration.path(),
            %method,
            "Registered API operation"
        );
        registration.add(method)
    }

    /// Fold every registration into one paths map. Repeated path keys merge
    /// per method, later entries replacing earlier ones.
    pub fn draft(&self) -> Result<DocumentDraft, AssembleError> {
        let mut paths: IndexMap<String, PathItemDraft> = IndexMap::new();

        for registration in self.paths.values() {
            if self.options.duplicate_operations == DuplicatePolicy::Reject {
                if let Some(method) = registration.duplicated_methods().into_iter().next() {
                    return Err(AssembleError::DuplicateOperation {
                        path: registration.path().to_string(),
                        method,
                    });
                }
            }

            let (path, item) = registration.build();
            paths.entry(path).or_default().extend(item);
        }

        Ok(DocumentDraft {
            openapi: self.openapi.clone(),
            info: self.info.clone(),
            paths,
        })
    }

    /// Compile the current registry state into the final document.
    pub fn document(&self) -> Result<OpenApi, AssembleError> {
        let draft = self.draft()?;
        assembler::assemble(&draft)
    }
}
