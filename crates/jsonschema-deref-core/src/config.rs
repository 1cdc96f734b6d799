//! Configuration for reference resolution and OpenAPI bundling.

use serde::{Deserialize, Serialize};

/// What to do with internal (`#/...`) references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InternalRefPolicy {
    /// Follow the pointer into the root document and inline the target.
    #[default]
    Inline,
    /// Leave internal references untouched. Only external files are inlined,
    /// which keeps `#/components/...` links intact in a bundled OpenAPI file.
    Preserve,
}

/// Options for a [`SchemaResolver`](crate::SchemaResolver).
///
/// Fields are serialized in `kebab-case` (e.g. `internal-refs`, `max-depth`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ResolverOptions {
    /// Handling of `#/...` references. Default: inline.
    pub internal_refs: InternalRefPolicy,
    /// Maximum nesting depth of the rewritten tree (stack overflow guard).
    /// A `$ref` met below this depth is left unresolved. Default: 256.
    pub max_depth: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            internal_refs: InternalRefPolicy::Inline,
            max_depth: 256,
        }
    }
}

/// Options for bundling a tree of versioned OpenAPI specifications.
///
/// Each version directory is expected to hold `openapi_file` next to a
/// `schema_dir` sub-directory; the bundle is written to `output_file` in the
/// same version directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BundleOptions {
    /// OpenAPI document name inside each version directory.
    pub openapi_file: String,
    /// Name of the directory holding the external schema files.
    pub schema_dir: String,
    /// Output file name inside each version directory.
    pub output_file: String,
    /// Resolver options. Default: preserve internal refs.
    pub resolver: ResolverOptions,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            openapi_file: "openapi.json".to_string(),
            schema_dir: "schema".to_string(),
            output_file: "openapi.bundled.json".to_string(),
            resolver: ResolverOptions {
                internal_refs: InternalRefPolicy::Preserve,
                ..ResolverOptions::default()
            },
        }
    }
}
