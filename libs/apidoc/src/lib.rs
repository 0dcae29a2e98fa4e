//! # apidoc - Fluent OpenAPI document builder
//!
//! Declare HTTP routes once and compile them into an OpenAPI document.
//!
//! ## Features
//!
//! - **Fluent**: per-method factories hand back a builder whose setters chain
//! - **Deterministic**: compilation is a pure fold over the declared routes
//! - **Shared schemas**: named schemas are emitted once under
//!   `components.schemas` and referenced everywhere else
//! - **Pluggable schemas**: anything implementing [`DescribeSchema`] works,
//!   including the bundled [`Schema`] language, raw JSON Schema values and
//!   `utoipa::ToSchema` types via [`Typed`]
//!
//! ## Example
//!
//! ```rust
//! use apidoc::{ApiDocument, Info, ResponseOptions, Schema, StatusCode};
//!
//! let mut api = ApiDocument::new("3.0.0", Info::new("My API", "1.0.0", "My API description"));
//!
//! api.get("/test")
//!     .query(Schema::object([("id", Schema::string())]))
//!     .responds_with(
//!         StatusCode::CREATED,
//!         Schema::object([("amount", Schema::number())]),
//!         ResponseOptions::with_description("Created"),
//!     )
//!     .with_tags(["test"]);
//!
//! let doc = api.document()?;
//! assert!(doc.paths["/test"].get.is_some());
//! # Ok::<(), apidoc::AssembleError>(())
//! ```

pub mod assembler;
pub mod document;
pub mod error;
pub mod method;
pub mod openapi;
pub mod operation;
pub mod path;
pub mod schema;
pub mod status;
pub mod typed;

pub use document::{ApiDocument, BuilderOptions, DocumentDraft, DuplicatePolicy, Info};
pub use error::{AssembleError, InvalidStatusCode};
pub use method::Method;
pub use openapi::OpenApi;
pub use operation::{OperationBuilder, ResponseOptions, APPLICATION_JSON};
pub use path::PathRegistration;
pub use schema::{DescribeSchema, Schema, SchemaContext};
pub use status::StatusCode;
pub use typed::{typed, Typed};
