//! Bundling of versioned OpenAPI specifications.
//!
//! A specifications tree looks like:
//!
//! ```text
//! specifications/
//!   3.0/
//!     openapi.json
//!     schema/service.json, organization.json, ...
//! ```
//!
//! Each version's OpenAPI document is resolved against its own schema
//! directory and written next to it as `openapi.bundled.json`. Unlike
//! [`SchemaResolver::resolve`](crate::SchemaResolver::resolve), I/O problems
//! with the OpenAPI document itself or the output file are hard errors.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{BundleOptions, ResolverOptions};
use crate::diagnostic::Diagnostic;
use crate::error::ResolveError;
use crate::loader::{read_json_file, write_json_file};
use crate::resolver::SchemaResolver;

/// Summary of one bundled document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleReport {
    /// Specification version (directory name), when bundled via [`bundle_all`].
    pub version: Option<String>,
    /// Path the bundled document was written to.
    pub output: PathBuf,
    /// Number of distinct references resolved.
    pub resolved_refs: usize,
    /// References left unresolved.
    pub diagnostics: Vec<Diagnostic>,
}

/// List the version directories under `specs_dir` that hold both the OpenAPI
/// file and the schema directory, sorted by name.
pub fn find_specification_versions(
    specs_dir: &Path,
    options: &BundleOptions,
) -> Result<Vec<String>, ResolveError> {
    if !specs_dir.is_dir() {
        return Err(ResolveError::MissingSpecificationsDir {
            dir: specs_dir.to_path_buf(),
        });
    }

    let io_err = |source: std::io::Error| ResolveError::Io {
        path: specs_dir.to_path_buf(),
        source,
    };

    let mut versions = Vec::new();
    for entry in fs::read_dir(specs_dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if !entry.file_type().map_err(io_err)?.is_dir() {
            continue;
        }

        let version_dir = entry.path();
        let complete = version_dir.join(&options.openapi_file).is_file()
            && version_dir.join(&options.schema_dir).is_dir();
        if !complete {
            tracing::debug!(dir = %version_dir.display(), "skipping incomplete version directory");
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => versions.push(name),
            Err(name) => tracing::warn!(?name, "skipping non UTF-8 version directory"),
        }
    }

    versions.sort();
    Ok(versions)
}

/// Resolve a single OpenAPI document and write the result to `output_path`.
pub fn bundle_file(
    openapi_path: &Path,
    schema_dir: &Path,
    output_path: &Path,
    options: &ResolverOptions,
) -> Result<BundleReport, ResolveError> {
    tracing::info!(input = %openapi_path.display(), "loading OpenAPI document");
    let document = read_json_file(openapi_path)?;

    let resolver = SchemaResolver::with_options(schema_dir, options.clone());
    let resolution = resolver.resolve_with_report(&document);

    write_json_file(output_path, &resolution.document)?;
    tracing::info!(
        output = %output_path.display(),
        resolved_refs = resolution.resolved_refs,
        unresolved = resolution.diagnostics.len(),
        "bundled OpenAPI document written"
    );

    Ok(BundleReport {
        version: None,
        output: output_path.to_path_buf(),
        resolved_refs: resolution.resolved_refs,
        diagnostics: resolution.diagnostics,
    })
}

/// Bundle every specification version under `specs_dir`.
///
/// Stops at the first version that fails.
pub fn bundle_all(
    specs_dir: &Path,
    options: &BundleOptions,
) -> Result<Vec<BundleReport>, ResolveError> {
    let versions = find_specification_versions(specs_dir, options)?;
    if versions.is_empty() {
        return Err(ResolveError::NoSpecificationVersions {
            dir: specs_dir.to_path_buf(),
        });
    }
    tracing::info!(count = versions.len(), ?versions, "found specification versions");

    let mut reports = Vec::with_capacity(versions.len());
    for version in versions {
        let version_dir = specs_dir.join(&version);
        let report = bundle_file(
            &version_dir.join(&options.openapi_file),
            &version_dir.join(&options.schema_dir),
            &version_dir.join(&options.output_file),
            &options.resolver,
        )?;
        reports.push(BundleReport {
            version: Some(version),
            ..report
        });
    }

    Ok(reports)
}
