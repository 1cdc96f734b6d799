//! Error types for schema loading and OpenAPI bundling.
//!
//! Reference resolution itself never fails: every problem it meets degrades to
//! a placeholder `$ref` plus a [`Diagnostic`](crate::Diagnostic). These errors
//! surface from the filesystem-facing parts (the schema directory loader and
//! the bundler), where the caller decides whether to recover.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON from {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("specifications directory not found: {}", dir.display())]
    MissingSpecificationsDir { dir: PathBuf },

    #[error("no specification versions found in {} (each version needs both an OpenAPI file and a schema directory)", dir.display())]
    NoSpecificationVersions { dir: PathBuf },
}

impl ResolveError {
    /// The file or directory the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            ResolveError::Io { path, .. } | ResolveError::Json { path, .. } => path,
            ResolveError::MissingSpecificationsDir { dir }
            | ResolveError::NoSpecificationVersions { dir } => dir,
        }
    }
}
