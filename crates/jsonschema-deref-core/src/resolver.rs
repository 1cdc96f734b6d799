//! `$ref` resolution engine.
//!
//! [`SchemaResolver`] rewrites a schema document into a self-contained one by
//! inlining two kinds of references:
//! - **external** file references, loaded by file name from a schema directory
//! - **internal** JSON Pointers (`#/...`) into the root document
//!
//! Cycles and self-referencing definitions are kept as `$ref` nodes so the
//! output stays finite, and references nested deeper than
//! [`ResolverOptions::max_depth`] are left alone so long `$ref` chains cannot
//! exhaust the stack. Nothing here returns an error: every reference that
//! cannot be inlined becomes a placeholder and a [`Diagnostic`].
//!
//! All per-call state (cache, in-flight set, diagnostics) lives in a
//! `ResolveContext` built fresh by each [`SchemaResolver::resolve`] call,
//! so a resolver can be shared between threads.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::{InternalRefPolicy, ResolverOptions};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::loader::read_json_file;
use crate::locator::{classify, extract_file_name, LocatorKind};
use crate::outcome::RefOutcome;
use crate::pointer::{contains_ref, resolve_pointer};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Output of [`SchemaResolver::resolve_with_report`].
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The rewritten document.
    pub document: Value,
    /// Every reference left unresolved, in the order it was met.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of distinct locators resolved (and cached) during the call.
    pub resolved_refs: usize,
}

/// Inlines `$ref`s from a schema directory and from the document itself.
#[derive(Debug, Clone)]
pub struct SchemaResolver {
    schema_dir: PathBuf,
    options: ResolverOptions,
}

impl SchemaResolver {
    /// Resolver reading external schemas from `schema_dir`, with default options.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self::with_options(schema_dir, ResolverOptions::default())
    }

    /// Resolver reading external schemas from `schema_dir`, with explicit
    /// options (internal-ref policy, depth limit).
    pub fn with_options(schema_dir: impl Into<PathBuf>, options: ResolverOptions) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            options,
        }
    }

    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve every reference in `document` and return the new tree.
    ///
    /// The input is never modified.
    pub fn resolve(&self, document: &Value) -> Value {
        self.resolve_with_report(document).document
    }

    /// Like [`resolve`](Self::resolve), also returning diagnostics and the
    /// number of distinct references resolved.
    pub fn resolve_with_report(&self, document: &Value) -> Resolution {
        let mut ctx = ResolveContext::new(document);
        let resolved = self.resolve_all_refs(document, &mut ctx);
        debug_assert!(ctx.visiting.is_empty(), "in-flight set must drain");
        debug_assert_eq!(ctx.depth, 0);

        tracing::debug!(
            resolved_refs = ctx.cache.len(),
            diagnostics = ctx.diagnostics.len(),
            "schema resolution finished"
        );

        Resolution {
            document: resolved,
            diagnostics: ctx.diagnostics,
            resolved_refs: ctx.cache.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-call state
// ---------------------------------------------------------------------------

/// State for one `resolve` call.
struct ResolveContext<'a> {
    /// Root document; internal pointers are always relative to it, even
    /// while resolving the contents of an external file.
    root: &'a Value,
    /// Locator → resolved value. Shared by internal and external locators.
    cache: HashMap<String, Value>,
    /// Locators currently being resolved on the active path.
    visiting: HashSet<String>,
    /// Nesting of `resolve_all_refs` calls on objects and arrays.
    depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ResolveContext<'a> {
    fn new(root: &'a Value) -> Self {
        Self {
            root,
            cache: HashMap::new(),
            visiting: HashSet::new(),
            depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Turn an outcome into the value to substitute, recording its diagnostic.
    fn collapse(&mut self, outcome: RefOutcome) -> Value {
        let (value, diagnostic) = outcome.into_parts();
        if let Some(diagnostic) = diagnostic {
            diagnostic.log();
            self.diagnostics.push(diagnostic);
        }
        value
    }
}

// ---------------------------------------------------------------------------
// Tree rewrite
// ---------------------------------------------------------------------------

impl SchemaResolver {
    fn resolve_all_refs(&self, node: &Value, ctx: &mut ResolveContext<'_>) -> Value {
        if !(node.is_array() || node.is_object()) {
            return node.clone();
        }

        ctx.depth += 1;
        let rewritten = match node {
            Value::Array(arr) => Value::Array(
                arr.iter()
                    .map(|item| self.resolve_all_refs(item, ctx))
                    .collect(),
            ),
            Value::Object(obj) => self.resolve_object(obj, ctx),
            _ => node.clone(),
        };
        ctx.depth -= 1;
        rewritten
    }

    fn resolve_object(&self, obj: &Map<String, Value>, ctx: &mut ResolveContext<'_>) -> Value {
        let Some(locator) = obj
            .get("$ref")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        else {
            return Value::Object(self.resolve_entries(obj, ctx));
        };

        let kind = classify(locator);
        let followed = match (kind, self.options.internal_refs) {
            (LocatorKind::External, _) | (LocatorKind::Internal, InternalRefPolicy::Inline) => true,
            _ => false,
        };
        if !followed {
            // Unknown shapes (and preserved internal refs) stay exactly as written.
            return Value::Object(obj.clone());
        }

        let outcome = if ctx.depth > self.options.max_depth {
            RefOutcome::unresolved(
                locator,
                DiagnosticKind::DepthExceeded {
                    max_depth: self.options.max_depth,
                },
            )
        } else if kind == LocatorKind::External {
            self.resolve_external(locator, ctx)
        } else {
            self.resolve_internal(locator, ctx)
        };
        let resolved = ctx.collapse(outcome);

        let has_siblings = obj.keys().any(|k| k != "$ref");
        if !has_siblings {
            return resolved;
        }

        let siblings: Map<String, Value> = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "$ref")
            .map(|(k, v)| (k.clone(), self.resolve_all_refs(v, ctx)))
            .collect();

        // Siblings win over keys of the resolved target. A non-object target
        // contributes nothing.
        let mut merged = match resolved {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merged.extend(siblings);
        Value::Object(merged)
    }

    fn resolve_entries(
        &self,
        obj: &Map<String, Value>,
        ctx: &mut ResolveContext<'_>,
    ) -> Map<String, Value> {
        obj.iter()
            .map(|(k, v)| (k.clone(), self.resolve_all_refs(v, ctx)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// External and internal resolution
// ---------------------------------------------------------------------------

impl SchemaResolver {
    fn resolve_external(&self, locator: &str, ctx: &mut ResolveContext<'_>) -> RefOutcome {
        if let Some(cached) = ctx.cache.get(locator) {
            return RefOutcome::Resolved(cached.clone());
        }

        if ctx.visiting.contains(locator) {
            return RefOutcome::unresolved(locator, DiagnosticKind::Cycle);
        }

        ctx.visiting.insert(locator.to_string());

        let Some(file_name) = extract_file_name(locator) else {
            ctx.visiting.remove(locator);
            return RefOutcome::unresolved(locator, DiagnosticKind::UnresolvableFileName);
        };

        let schema = match read_json_file(&self.schema_dir.join(file_name)) {
            Ok(schema) => schema,
            Err(err) => {
                ctx.visiting.remove(locator);
                return RefOutcome::Unresolved {
                    locator: locator.to_string(),
                    reason: DiagnosticKind::SchemaLoadFailed {
                        file: file_name.to_string(),
                    },
                    detail: Some(err.to_string()),
                };
            }
        };
        tracing::debug!(locator, file = file_name, "loaded external schema");

        // Cache the raw schema first: a file that leads back to itself then
        // stops at the cache hit above instead of at the cycle check.
        ctx.cache.insert(locator.to_string(), schema.clone());
        let resolved = self.resolve_all_refs(&schema, ctx);
        ctx.cache.insert(locator.to_string(), resolved.clone());

        ctx.visiting.remove(locator);
        RefOutcome::Resolved(resolved)
    }

    fn resolve_internal(&self, pointer: &str, ctx: &mut ResolveContext<'_>) -> RefOutcome {
        // Checked before the cache: a pointer on the active path has no
        // cache entry yet.
        if ctx.visiting.contains(pointer) {
            return RefOutcome::unresolved(pointer, DiagnosticKind::Cycle);
        }

        if let Some(cached) = ctx.cache.get(pointer) {
            return RefOutcome::Resolved(cached.clone());
        }

        let root = ctx.root;
        let Some(target) = resolve_pointer(root, pointer) else {
            return RefOutcome::unresolved(pointer, DiagnosticKind::DanglingPointer);
        };

        // Not cached: the answer depends only on the target, so a repeat
        // lookup reaches the same conclusion.
        if contains_ref(target, pointer) {
            return RefOutcome::unresolved(pointer, DiagnosticKind::SelfReference);
        }

        ctx.visiting.insert(pointer.to_string());
        let resolved = self.resolve_all_refs(target, ctx);
        ctx.cache.insert(pointer.to_string(), resolved.clone());
        ctx.visiting.remove(pointer);

        RefOutcome::Resolved(resolved)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
