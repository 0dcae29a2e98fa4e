//! Turns a [`DocumentDraft`] into the final [`OpenApi`] document.
//!
//! This is where schema sources are converted into their representation,
//! parameter objects are expanded into individual parameters, and shared
//! schemas are collected under `components.schemas`.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::document::DocumentDraft;
use crate::error::AssembleError;
use crate::method::Method;
use crate::openapi::{
    Components, MediaType, OpenApi, Operation, Parameter, ParameterIn, PathItem, RequestBody,
    Response,
};
use crate::operation::{self, MediaContent, RequestParams};
use crate::schema::{to_schema_object, DescribeSchema, SchemaContext};

/// Shared schemas collected while assembling one document.
#[derive(Debug, Default, Clone)]
pub struct ComponentsRegistry {
    /// Schema name -> representation (serialized to components.schemas)
    pub schemas: BTreeMap<String, Value>,
}

impl ComponentsRegistry {
    /// Register a schema component with conflict detection.
    /// Returns: true if inserted, false if an identical schema was already
    /// present (no-op).
    pub fn register_schema(
        &mut self,
        name: impl Into<String>,
        schema: Value,
    ) -> Result<bool, AssembleError> {
        let name = name.into();

        if let Some(existing) = self.schemas.get(&name) {
            if *existing == schema {
                tracing::trace!(schema_name = %name, "Identical schema re-registered, ignoring");
                return Ok(false);
            }
            tracing::error!(
                schema_name = %name,
                "Conflicting schema content under the same component key"
            );
            return Err(AssembleError::SchemaConflict { name });
        }

        tracing::debug!(schema_name = %name, "Registered schema");
        self.schemas.insert(name, schema);
        Ok(true)
    }

    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// `None` when nothing was shared, so the document omits `components`.
    pub fn into_components(self) -> Option<Components> {
        if self.schemas.is_empty() {
            None
        } else {
            Some(Components {
                schemas: self.schemas,
            })
        }
    }
}

/// Build the final document from a merged draft.
pub fn assemble(draft: &DocumentDraft) -> Result<OpenApi, AssembleError> {
    let op_count: usize = draft.paths.values().map(|item| item.len()).sum();
    tracing::info!(
        paths = draft.paths.len(),
        operations = op_count,
        "Building OpenAPI document"
    );

    let mut components = ComponentsRegistry::default();
    let mut paths = IndexMap::with_capacity(draft.paths.len());
    {
        let mut ctx = SchemaContext::new(&mut components, &draft.openapi);
        for (path, item) in &draft.paths {
            let mut path_item = PathItem::default();
            for (method, op) in item {
                path_item.set(*method, convert_operation(path, *method, op, &mut ctx)?);
            }
            paths.insert(path.clone(), path_item);
        }
    }

    tracing::debug!(
        shared_schemas = components.schemas.len(),
        "OpenAPI document assembled"
    );

    Ok(OpenApi {
        openapi: draft.openapi.clone(),
        info: draft.info.clone(),
        paths,
        components: components.into_components(),
    })
}

fn convert_operation(
    path: &str,
    method: Method,
    op: &operation::Operation,
    ctx: &mut SchemaContext<'_>,
) -> Result<Operation, AssembleError> {
    let parameters = match &op.request_params {
        Some(params) => {
            let parameters = convert_parameters(path, method, params, ctx)?;
            (!parameters.is_empty()).then_some(parameters)
        }
        None => None,
    };

    let request_body = match &op.request_body {
        Some(body) => Some(RequestBody {
            content: convert_content(&body.content, ctx)?,
        }),
        None => None,
    };

    let mut responses = IndexMap::with_capacity(op.responses.len());
    for (status, response) in &op.responses {
        responses.insert(
            status.to_string(),
            Response {
                description: response.description.clone(),
                content: Some(convert_content(&response.content, ctx)?),
            },
        );
    }

    Ok(Operation {
        tags: op.tags.clone(),
        summary: op.summary.clone(),
        description: op.description.clone(),
        operation_id: op.operation_id.clone(),
        parameters,
        request_body,
        responses,
        deprecated: op.deprecated,
    })
}

fn convert_content(
    content: &IndexMap<String, MediaContent>,
    ctx: &mut SchemaContext<'_>,
) -> Result<IndexMap<String, MediaType>, AssembleError> {
    let mut out = IndexMap::with_capacity(content.len());
    for (media_type, media) in content {
        let schema = to_schema_object(media.schema.as_ref(), ctx)?;
        out.insert(media_type.clone(), MediaType { schema });
    }
    Ok(out)
}

/// Expand each parameter object schema into one parameter per property.
/// Path parameters are always required.
fn convert_parameters(
    path: &str,
    method: Method,
    params: &RequestParams,
    ctx: &mut SchemaContext<'_>,
) -> Result<Vec<Parameter>, AssembleError> {
    let kinds = [
        (ParameterIn::Path, &params.path),
        (ParameterIn::Query, &params.query),
        (ParameterIn::Header, &params.header),
        (ParameterIn::Cookie, &params.cookie),
    ];

    let mut parameters = Vec::new();
    for (location, schema) in kinds {
        let Some(schema) = schema else {
            continue;
        };

        let described = schema.describe(ctx)?;
        let Some(properties) = described.get("properties").and_then(Value::as_object) else {
            return Err(AssembleError::ParametersNotObject {
                path: path.to_string(),
                method,
                location: location.as_str(),
            });
        };

        let required: Vec<&str> = described
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        for (name, property) in properties {
            parameters.push(Parameter {
                location,
                name: name.clone(),
                required: location == ParameterIn::Path || required.contains(&name.as_str()),
                schema: property.clone(),
            });
        }
    }

    Ok(parameters)
}
