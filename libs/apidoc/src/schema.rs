//! Schema description seam and the bundled structural schema language.
//!
//! The builder never looks inside a schema. Everything it needs goes through
//! [`DescribeSchema`]:
//! - `describe()` produces the expanded JSON-Schema-like representation
//! - `shared_name()` marks a schema as a reusable component
//!
//! [`to_schema_object`] is the single conversion entry point used by the
//! assembler. Shared schemas are described once, stored under
//! `components.schemas`, and replaced by a `$ref`.
//!
//! [`Schema`] is a small value-based description language that carries its
//! metadata (shared name, example, description) on the value itself.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::assembler::ComponentsRegistry;
use crate::error::AssembleError;

/// Prefix of every reference emitted for a shared schema.
pub const COMPONENTS_SCHEMAS_PREFIX: &str = "#/components/schemas/";

/// Shared, type-erased schema handle stored by builders.
pub type SchemaRef = Arc<dyn DescribeSchema>;

/// Capability every schema source must provide to take part in a document.
pub trait DescribeSchema: fmt::Debug + Send + Sync {
    /// Expanded representation of this schema. Nested schemas should be
    /// converted with [`to_schema_object`] so shared ones become references.
    fn describe(&self, ctx: &mut SchemaContext<'_>) -> Result<Value, AssembleError>;

    /// Component name under which this schema is shared, if any.
    fn shared_name(&self) -> Option<Cow<'_, str>> {
        None
    }
}

/// Conversion state threaded through one document assembly.
pub struct SchemaContext<'a> {
    components: &'a mut ComponentsRegistry,
    nullable_as_type_array: bool,
}

impl<'a> SchemaContext<'a> {
    /// `openapi_version` selects how nullability is rendered: 3.1 documents
    /// use a `["T", "null"]` type array, earlier ones use `nullable: true`.
    pub fn new(components: &'a mut ComponentsRegistry, openapi_version: &str) -> Self {
        Self {
            components,
            nullable_as_type_array: openapi_version.starts_with("3.1"),
        }
    }

    pub fn components(&mut self) -> &mut ComponentsRegistry {
        &mut *self.components
    }

    pub fn nullable_as_type_array(&self) -> bool {
        self.nullable_as_type_array
    }
}

/// Build a `$ref` object pointing at a component schema.
pub fn component_ref(name: &str) -> Value {
    json!({ "$ref": format!("{COMPONENTS_SCHEMAS_PREFIX}{name}") })
}

/// Convert a schema into its document representation, extracting shared
/// schemas into the components registry.
pub fn to_schema_object(
    schema: &dyn DescribeSchema,
    ctx: &mut SchemaContext<'_>,
) -> Result<Value, AssembleError> {
    match schema.shared_name() {
        Some(name) => {
            let expanded = schema.describe(ctx)?;
            ctx.components().register_schema(name.as_ref(), expanded)?;
            Ok(component_ref(&name))
        }
        None => schema.describe(ctx),
    }
}

impl<T: DescribeSchema + ?Sized> DescribeSchema for Arc<T> {
    fn describe(&self, ctx: &mut SchemaContext<'_>) -> Result<Value, AssembleError> {
        (**self).describe(ctx)
    }

    fn shared_name(&self) -> Option<Cow<'_, str>> {
        (**self).shared_name()
    }
}

/// Recursively rewrite JSON-Schema style `#/definitions/*` and `#/$defs/*`
/// references to `#/components/schemas/*`.
fn rewrite_refs_to_components(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get_mut("$ref") {
                for old in ["#/definitions/", "#/$defs/"] {
                    if let Some(rest) = s.strip_prefix(old) {
                        *s = format!("{COMPONENTS_SCHEMAS_PREFIX}{rest}");
                        break;
                    }
                }
            }
            for v in map.values_mut() {
                rewrite_refs_to_components(v);
            }
        }
        Value::Array(arr) => {
            for v in arr {
                rewrite_refs_to_components(v);
            }
        }
        _ => {}
    }
}

/// Recursively rewrite 3.1 style nullability into the 3.0 form: a
/// `"type": ["T", "null"]` array becomes `"type": "T", "nullable": true`, and a
/// `null` variant of `oneOf` becomes `nullable: true` on the remaining ones.
pub(crate) fn downgrade_null_type_arrays(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut made_nullable = false;
            if let Some(Value::Array(types)) = map.get_mut("type") {
                let before = types.len();
                types.retain(|t| t.as_str() != Some("null"));
                made_nullable = types.len() != before;
            }
            if made_nullable {
                if let Some(Value::Array(types)) = map.get("type") {
                    if types.len() == 1 {
                        let single = types[0].clone();
                        map.insert("type".to_string(), single);
                    }
                }
                map.insert("nullable".to_string(), Value::Bool(true));
            }
            // `Option<Ref>` renders as `oneOf: [{"type": "null"}, {"$ref": ..}]`.
            if let Some(Value::Array(variants)) = map.get_mut("oneOf") {
                let before = variants.len();
                variants.retain(|v| v.get("type").and_then(Value::as_str) != Some("null"));
                if variants.len() != before {
                    if variants.len() == 1 {
                        let only = variants.remove(0);
                        map.shift_remove("oneOf");
                        map.insert("allOf".to_string(), Value::Array(vec![only]));
                    }
                    map.insert("nullable".to_string(), Value::Bool(true));
                }
            }
            for v in map.values_mut() {
                downgrade_null_type_arrays(v);
            }
        }
        Value::Array(arr) => {
            for v in arr {
                downgrade_null_type_arrays(v);
            }
        }
        _ => {}
    }
}

/// Raw JSON Schema. Embedded `definitions`/`$defs` are lifted into the
/// document components and references to them are rewritten.
impl DescribeSchema for Value {
    fn describe(&self, ctx: &mut SchemaContext<'_>) -> Result<Value, AssembleError> {
        let mut value = self.clone();
        rewrite_refs_to_components(&mut value);

        if let Value::Object(map) = &mut value {
            for key in ["definitions", "$defs"] {
                if let Some(Value::Object(definitions)) = map.shift_remove(key) {
                    for (name, definition) in definitions {
                        ctx.components().register_schema(name, definition)?;
                    }
                }
            }
        }

        Ok(value)
    }
}

// -------------------------------------------------------------------------------------------------
// Structural schema language
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum SchemaKind {
    Any,
    String,
    Number,
    Integer,
    Boolean,
    Literal(Value),
    Enum(Vec<String>),
    Array(Box<Schema>),
    Object(IndexMap<String, Schema>),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SchemaMeta {
    shared_name: Option<String>,
    description: Option<String>,
    example: Option<Value>,
    format: Option<String>,
    optional: bool,
    nullable: bool,
}

/// Structural schema value with explicitly attached metadata.
///
/// ```
/// use apidoc::schema::Schema;
///
/// let pet = Schema::object([
///     ("id", Schema::integer()),
///     ("name", Schema::string().description("Display name")),
///     ("tag", Schema::string().optional()),
/// ])
/// .shared("Pet");
/// assert_eq!(pet.shared_name_str(), Some("Pet"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    kind: SchemaKind,
    meta: SchemaMeta,
}

impl Schema {
    fn of(kind: SchemaKind) -> Self {
        Self {
            kind,
            meta: SchemaMeta::default(),
        }
    }

    /// Unconstrained value (`{}`).
    pub fn any() -> Self {
        Self::of(SchemaKind::Any)
    }

    pub fn string() -> Self {
        Self::of(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::of(SchemaKind::Number)
    }

    pub fn integer() -> Self {
        Self::of(SchemaKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    /// Single allowed value.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::of(SchemaKind::Literal(value.into()))
    }

    /// String restricted to the given values.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of(SchemaKind::Enum(values.into_iter().map(Into::into).collect()))
    }

    pub fn array(items: Schema) -> Self {
        Self::of(SchemaKind::Array(Box::new(items)))
    }

    /// Object with properties in declaration order. A repeated field name
    /// keeps its first position and takes the last schema.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Self::of(SchemaKind::Object(
            fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Field may be absent from its parent object.
    pub fn optional(mut self) -> Self {
        self.meta.optional = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.meta.nullable = true;
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.meta.description = Some(text.into());
        self
    }

    pub fn example(mut self, value: impl Into<Value>) -> Self {
        self.meta.example = Some(value.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.meta.format = Some(format.into());
        self
    }

    /// Publish this schema as a reusable component under `name`.
    pub fn shared(mut self, name: impl Into<String>) -> Self {
        self.meta.shared_name = Some(name.into());
        self
    }

    pub fn shared_name_str(&self) -> Option<&str> {
        self.meta.shared_name.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.meta.optional
    }

    fn type_name(&self) -> Option<&'static str> {
        match &self.kind {
            SchemaKind::Any => None,
            SchemaKind::String | SchemaKind::Enum(_) => Some("string"),
            SchemaKind::Number => Some("number"),
            SchemaKind::Integer => Some("integer"),
            SchemaKind::Boolean => Some("boolean"),
            SchemaKind::Array(_) => Some("array"),
            SchemaKind::Object(_) => Some("object"),
            SchemaKind::Literal(value) => match value {
                Value::String(_) => Some("string"),
                Value::Bool(_) => Some("boolean"),
                Value::Number(n) if n.is_f64() => Some("number"),
                Value::Number(_) => Some("integer"),
                Value::Array(_) => Some("array"),
                Value::Object(_) => Some("object"),
                Value::Null => None,
            },
        }
    }
}

impl DescribeSchema for Schema {
    fn describe(&self, ctx: &mut SchemaContext<'_>) -> Result<Value, AssembleError> {
        let mut out = Map::new();

        match (self.type_name(), self.meta.nullable) {
            (Some(ty), true) if ctx.nullable_as_type_array() => {
                out.insert("type".into(), json!([ty, "null"]));
            }
            (Some(ty), true) => {
                out.insert("type".into(), json!(ty));
                out.insert("nullable".into(), Value::Bool(true));
            }
            (Some(ty), false) => {
                out.insert("type".into(), json!(ty));
            }
            (None, true) if !ctx.nullable_as_type_array() => {
                out.insert("nullable".into(), Value::Bool(true));
            }
            (None, _) => {}
        }

        if let Some(format) = &self.meta.format {
            out.insert("format".into(), json!(format));
        }

        match &self.kind {
            SchemaKind::Literal(value) => {
                out.insert("enum".into(), json!([value]));
            }
            SchemaKind::Enum(values) => {
                out.insert("enum".into(), json!(values));
            }
            SchemaKind::Array(items) => {
                out.insert("items".into(), to_schema_object(items.as_ref(), ctx)?);
            }
            SchemaKind::Object(fields) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for (name, field) in fields {
                    properties.insert(name.clone(), to_schema_object(field, ctx)?);
                    if !field.meta.optional {
                        required.push(Value::String(name.clone()));
                    }
                }
                out.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    out.insert("required".into(), Value::Array(required));
                }
            }
            SchemaKind::Any
            | SchemaKind::String
            | SchemaKind::Number
            | SchemaKind::Integer
            | SchemaKind::Boolean => {}
        }

        if let Some(description) = &self.meta.description {
            out.insert("description".into(), json!(description));
        }
        if let Some(example) = &self.meta.example {
            out.insert("example".into(), example.clone());
        }

        Ok(Value::Object(out))
    }

    fn shared_name(&self) -> Option<Cow<'_, str>> {
        self.meta.shared_name.as_deref().map(Cow::Borrowed)
    }
}
