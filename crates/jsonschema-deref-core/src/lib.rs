//! Dereference JSON Schema and OpenAPI documents.
//!
//! [`SchemaResolver`] inlines `$ref`s that point at files in a schema
//! directory (`https://host/.../schema/service.json`, `./service.json`) and
//! JSON Pointers into the document itself (`#/components/schemas/Foo`),
//! producing a self-contained tree. Cycles and self-referencing definitions
//! are kept as `$ref` nodes; every other failure degrades to an unresolved
//! `$ref` plus a [`Diagnostic`].
//!
//! ```no_run
//! use jsonschema_deref_core::SchemaResolver;
//! use serde_json::json;
//!
//! let resolver = SchemaResolver::new("public/specifications/3.0/schema");
//! let resolved = resolver.resolve(&json!({
//!     "properties": {
//!         "service": { "$ref": "https://example.org/specifications/3.0/schema/service.json" }
//!     }
//! }));
//! assert!(resolved["properties"]["service"].get("$ref").is_none());
//! ```

pub mod bundle;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod loader;
pub mod locator;
mod outcome;
pub mod pointer;
pub mod resolver;

pub use bundle::{bundle_all, bundle_file, find_specification_versions, BundleReport};
pub use config::{BundleOptions, InternalRefPolicy, ResolverOptions};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::ResolveError;
pub use locator::{classify, extract_file_name, is_external, is_internal, LocatorKind};
pub use pointer::{contains_ref, resolve_pointer, split_pointer};
pub use resolver::{Resolution, SchemaResolver};
