//! Per-method operation builder.
//!
//! An [`OperationBuilder`] accumulates everything one HTTP method on one path
//! declares: parameter schemas, request body, responses keyed by status code,
//! tags and descriptive metadata. Every configuration method overwrites one
//! slot and hands back the same builder, so declarations chain:
//!
//! ```
//! use apidoc::{ApiDocument, Info, Schema, StatusCode};
//!
//! let mut api = ApiDocument::new("3.0.0", Info::new("Pets", "1.0.0", "Pet store"));
//! api.get("/pets/{id}")
//!     .path_params(Schema::object([("id", Schema::string())]))
//!     .responds(StatusCode::OK, Schema::object([("name", Schema::string())]))
//!     .with_tags(["pets"]);
//! ```
//!
//! [`OperationBuilder::build`] is a pure projection into an [`Operation`]
//! record that the assembler later turns into the document representation.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::method::Method;
use crate::schema::{DescribeSchema, SchemaRef};
use crate::status::StatusCode;

/// Media type used for every request and response body.
pub const APPLICATION_JSON: &str = "application/json";

/// Per-response settings supplied alongside a response schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseOptions {
    pub description: Option<String>,
}

impl ResponseOptions {
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

/// Parameter schemas by location; only the kinds that were set are present.
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    pub path: Option<SchemaRef>,
    pub query: Option<SchemaRef>,
    pub header: Option<SchemaRef>,
    pub cookie: Option<SchemaRef>,
}

impl RequestParams {
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.query.is_none() && self.header.is_none() && self.cookie.is_none()
    }
}

/// One media type entry of a body.
#[derive(Debug, Clone)]
pub struct MediaContent {
    pub schema: SchemaRef,
}

#[derive(Debug, Clone)]
pub struct RequestBody {
    pub content: IndexMap<String, MediaContent>,
}

#[derive(Debug, Clone)]
pub struct Response {
    pub description: String,
    pub content: IndexMap<String, MediaContent>,
}

/// Compiled operation, still holding schema sources rather than their
/// representations.
#[derive(Debug, Clone, Default)]
pub struct Operation {
    pub tags: Option<Vec<String>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    pub request_params: Option<RequestParams>,
    pub request_body: Option<RequestBody>,
    /// Always present; empty when no response was declared.
    pub responses: BTreeMap<StatusCode, Response>,
    pub deprecated: bool,
}

fn json_content(schema: &SchemaRef) -> IndexMap<String, MediaContent> {
    let mut content = IndexMap::new();
    content.insert(
        APPLICATION_JSON.to_string(),
        MediaContent {
            schema: Arc::clone(schema),
        },
    );
    content
}

/// Builder for one HTTP method on one path.
#[derive(Debug, Clone)]
pub struct OperationBuilder {
    method: Method,
    path_schema: Option<SchemaRef>,
    query_schema: Option<SchemaRef>,
    header_schema: Option<SchemaRef>,
    cookie_schema: Option<SchemaRef>,
    body_schema: Option<SchemaRef>,
    response_schemas: BTreeMap<StatusCode, SchemaRef>,
    response_options: BTreeMap<StatusCode, ResponseOptions>,
    tags: Vec<String>,
    summary: Option<String>,
    description: Option<String>,
    operation_id: Option<String>,
    deprecated: bool,
}

impl OperationBuilder {
    pub(crate) fn new(method: Method) -> Self {
        Self {
            method,
            path_schema: None,
            query_schema: None,
            header_schema: None,
            cookie_schema: None,
            body_schema: None,
            response_schemas: BTreeMap::new(),
            response_options: BTreeMap::new(),
            tags: Vec::new(),
            summary: None,
            description: None,
            operation_id: None,
            deprecated: false,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Object schema whose properties are the path parameters.
    pub fn path_params(&mut self, schema: impl DescribeSchema + 'static) -> &mut Self {
        self.path_schema = Some(Arc::new(schema));
        self
    }

    /// Object schema whose properties are the query parameters.
    pub fn query(&mut self, schema: impl DescribeSchema + 'static) -> &mut Self {
        self.query_schema = Some(Arc::new(schema));
        self
    }

    /// Object schema whose properties are the header parameters.
    pub fn headers(&mut self, schema: impl DescribeSchema + 'static) -> &mut Self {
        self.header_schema = Some(Arc::new(schema));
        self
    }

    /// Object schema whose properties are the cookie parameters.
    pub fn cookies(&mut self, schema: impl DescribeSchema + 'static) -> &mut Self {
        self.cookie_schema = Some(Arc::new(schema));
        self
    }

    /// JSON request body schema.
    pub fn body(&mut self, schema: impl DescribeSchema + 'static) -> &mut Self {
        self.body_schema = Some(Arc::new(schema));
        self
    }

    /// Set the response schema for `status`. Options previously given for the
    /// same status stay in place.
    pub fn responds(
        &mut self,
        status: StatusCode,
        schema: impl DescribeSchema + 'static,
    ) -> &mut Self {
        self.response_schemas.insert(status, Arc::new(schema));
        self
    }

    /// Set the response schema and its options for `status`.
    pub fn responds_with(
        &mut self,
        status: StatusCode,
        schema: impl DescribeSchema + 'static,
        options: ResponseOptions,
    ) -> &mut Self {
        self.response_options.insert(status.clone(), options);
        self.responds(status, schema)
    }

    /// Replace the tag list.
    pub fn with_tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn summary(&mut self, text: impl Into<String>) -> &mut Self {
        self.summary = Some(text.into());
        self
    }

    pub fn description(&mut self, text: impl Into<String>) -> &mut Self {
        self.description = Some(text.into());
        self
    }

    pub fn operation_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn deprecated(&mut self) -> &mut Self {
        self.deprecated = true;
        self
    }

    /// Compile the accumulated declaration. Does not modify the builder.
    pub fn build(&self) -> Operation {
        let params = RequestParams {
            path: self.path_schema.clone(),
            query: self.query_schema.clone(),
            header: self.header_schema.clone(),
            cookie: self.cookie_schema.clone(),
        };

        let responses = self
            .response_schemas
            .iter()
            .map(|(status, schema)| {
                let description = self
                    .response_options
                    .get(status)
                    .and_then(|options| options.description.clone())
                    .unwrap_or_default();
                let response = Response {
                    description,
                    content: json_content(schema),
                };
                (status.clone(), response)
            })
            .collect();

        Operation {
            tags: (!self.tags.is_empty()).then(|| self.tags.clone()),
            summary: self.summary.clone(),
            description: self.description.clone(),
            operation_id: self.operation_id.clone(),
            request_params: (!params.is_empty()).then_some(params),
            request_body: self.body_schema.as_ref().map(|schema| RequestBody {
                content: json_content(schema),
            }),
            responses,
            deprecated: self.deprecated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn shared_name(schema: &SchemaRef) -> Option<String> {
        schema.shared_name().map(|n| n.into_owned())
    }

    #[test]
    fn empty_builder_compiles_to_empty_responses() {
        let op = OperationBuilder::new(Method::Get).build();

        assert!(op.responses.is_empty());
        assert!(op.request_params.is_none());
        assert!(op.request_body.is_none());
        assert!(op.tags.is_none());
        assert!(!op.deprecated);
    }

    #[test]
    fn params_section_only_contains_set_kinds() {
        let mut builder = OperationBuilder::new(Method::Get);
        builder.query(Schema::object([("id", Schema::string())]));

        let params = builder.build().request_params.expect("params present");
        assert!(params.query.is_some());
        assert!(params.path.is_none());
        assert!(params.header.is_none());
        assert!(params.cookie.is_none());
    }

    #[test]
    fn body_is_wrapped_in_json_media_type() {
        let mut builder = OperationBuilder::new(Method::Post);
        builder.body(Schema::object([("name", Schema::string())]).shared("NewPet"));

        let body = builder.build().request_body.expect("body present");
        assert_eq!(body.content.len(), 1);
        let media = &body.content[APPLICATION_JSON];
        assert_eq!(shared_name(&media.schema).as_deref(), Some("NewPet"));
    }

    #[test]
    fn response_description_defaults_to_empty() {
        let mut builder = OperationBuilder::new(Method::Get);
        builder.responds(StatusCode::CREATED, Schema::object([("amount", Schema::number())]));

        let op = builder.build();
        assert_eq!(op.responses[&StatusCode::CREATED].description, "");
        assert!(op.responses[&StatusCode::CREATED]
            .content
            .contains_key(APPLICATION_JSON));
    }

    #[test]
    fn response_description_comes_from_options() {
        let mut builder = OperationBuilder::new(Method::Get);
        builder.responds_with(
            StatusCode::OK,
            Schema::string(),
            ResponseOptions::with_description("x"),
        );

        assert_eq!(builder.build().responses[&StatusCode::OK].description, "x");
    }

    #[test]
    fn second_responds_overwrites_schema_but_keeps_options() {
        let mut builder = OperationBuilder::new(Method::Get);
        builder
            .responds_with(
                StatusCode::OK,
                Schema::string().shared("First"),
                ResponseOptions::with_description("kept"),
            )
            .responds(StatusCode::OK, Schema::string().shared("Second"));

        let op = builder.build();
        let response = &op.responses[&StatusCode::OK];
        assert_eq!(response.description, "kept");
        assert_eq!(
            shared_name(&response.content[APPLICATION_JSON].schema).as_deref(),
            Some("Second")
        );
    }

    #[test]
    fn later_options_overwrite_earlier_ones() {
        let mut builder = OperationBuilder::new(Method::Get);
        builder
            .responds_with(StatusCode::OK, Schema::string(), ResponseOptions::with_description("a"))
            .responds_with(StatusCode::OK, Schema::string(), ResponseOptions::with_description("b"));

        assert_eq!(builder.build().responses[&StatusCode::OK].description, "b");
    }

    #[test]
    fn responses_are_ordered_by_status() {
        let mut builder = OperationBuilder::new(Method::Get);
        builder
            .responds(StatusCode::BAD_REQUEST, Schema::string())
            .responds(StatusCode::CREATED, Schema::string());

        let codes: Vec<_> = builder
            .build()
            .responses
            .keys()
            .map(|c| c.as_str().to_string())
            .collect();
        assert_eq!(codes, ["201", "400"]);
    }

    #[test]
    fn tags_are_replaced_and_empty_list_is_omitted() {
        let mut builder = OperationBuilder::new(Method::Get);
        builder.with_tags(["a", "b"]).with_tags(["c"]);
        assert_eq!(builder.build().tags, Some(vec!["c".to_string()]));

        builder.with_tags(Vec::<String>::new());
        assert_eq!(builder.build().tags, None);
    }

    #[test]
    fn build_is_repeatable() {
        let mut builder = OperationBuilder::new(Method::Put);
        builder
            .summary("Replace")
            .operation_id("pets.replace")
            .deprecated()
            .responds(StatusCode::NO_CONTENT, Schema::any());

        let first = builder.build();
        let second = builder.build();
        assert_eq!(first.summary, second.summary);
        assert_eq!(first.operation_id.as_deref(), Some("pets.replace"));
        assert!(second.deprecated);
        assert_eq!(first.responses.len(), second.responses.len());
    }
}
