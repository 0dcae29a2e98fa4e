//! Bridge for types that already derive `utoipa::ToSchema`.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;
use utoipa::openapi::RefOr;
use utoipa::{PartialSchema, ToSchema};

use crate::error::AssembleError;
use crate::schema::{downgrade_null_type_arrays, DescribeSchema, SchemaContext};

/// Schema source backed by a Rust type's `utoipa` derivation.
///
/// The type is shared under `T::name()`, and every schema it references
/// (collected via `T::schemas`) is registered alongside it. Below 3.1 the
/// null type arrays `utoipa` emits for `Option<_>` are rewritten to
/// `nullable: true`.
pub struct Typed<T> {
    name: Cow<'static, str>,
    _type: PhantomData<fn() -> T>,
}

impl<T: ToSchema + 'static> Typed<T> {
    pub fn new() -> Self {
        Self {
            name: T::name(),
            _type: PhantomData,
        }
    }
}

impl<T: ToSchema + 'static> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typed")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: ToSchema + 'static> DescribeSchema for Typed<T> {
    fn describe(&self, ctx: &mut SchemaContext<'_>) -> Result<Value, AssembleError> {
        let downgrade = !ctx.nullable_as_type_array();
        let render = |schema: RefOr<utoipa::openapi::Schema>| -> Result<Value, AssembleError> {
            let mut value = serde_json::to_value(schema)?;
            if downgrade {
                downgrade_null_type_arrays(&mut value);
            }
            Ok(value)
        };

        let mut dependencies = Vec::new();
        T::schemas(&mut dependencies);
        for (name, schema) in dependencies {
            ctx.components().register_schema(name, render(schema)?)?;
        }

        render(<T as PartialSchema>::schema())
    }

    fn shared_name(&self) -> Option<Cow<'_, str>> {
        if self.name.is_empty() {
            None
        } else {
            Some(Cow::Borrowed(self.name.as_ref()))
        }
    }
}

/// Shorthand for [`Typed::new`].
pub fn typed<T: ToSchema + 'static>() -> Typed<T> {
    Typed::new()
}
