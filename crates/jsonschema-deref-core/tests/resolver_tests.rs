//! Integration tests for `SchemaResolver` against the shared fixture schema
//! directory (`tests/schemas`), via the public API only.

use jsonschema_deref_core::{DiagnosticKind, SchemaResolver};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/schemas");
const BASE: &str = "https://openreferraluk.org/specifications/3.0/schema";

fn resolver() -> SchemaResolver {
    SchemaResolver::new(FIXTURES_DIR)
}

fn load_fixture(name: &str) -> Value {
    let path = Path::new(FIXTURES_DIR).join(name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Collect every `$ref` string left anywhere in `node`.
fn remaining_refs(node: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_refs(node, &mut out);
    out
}

fn collect_refs(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::Object(obj) => {
            if let Some(r) = obj.get("$ref").and_then(Value::as_str) {
                out.push(r.to_string());
            }
            obj.values().for_each(|v| collect_refs(v, out));
        }
        Value::Array(arr) => arr.iter().for_each(|v| collect_refs(v, out)),
        _ => {}
    }
}

// ── External References ─────────────────────────────────────────────────────

#[test]
fn test_external_reference_inlined() {
    let schema = json!({
        "type": "object",
        "properties": {
            "service": { "$ref": format!("{BASE}/service.json") }
        }
    });

    let resolved = resolver().resolve(&schema);
    let service = &resolved["properties"]["service"];
    assert_eq!(service["name"], json!("service"));
    assert_eq!(service["type"], json!("object"));
    assert!(service.get("$ref").is_none());
}

#[test]
fn test_nested_external_references() {
    let schema = json!({ "$ref": format!("{BASE}/service.json") });

    let resolution = resolver().resolve_with_report(&schema);
    let resolved = &resolution.document;

    assert_eq!(resolved["name"], json!("service"));
    let organization = &resolved["properties"]["organization"];
    assert_eq!(organization["name"], json!("organization"));
    assert_eq!(
        organization["properties"]["phones"]["items"]["name"],
        json!("phone")
    );
    assert_eq!(
        resolved["properties"]["attributes"]["items"]["properties"]["taxonomy_term"]
            ["properties"]["taxonomy_detail"]["name"],
        json!("taxonomy")
    );
    assert!(remaining_refs(resolved).is_empty(), "{:?}", remaining_refs(resolved));
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn test_sibling_overrides_external_content() {
    let resolved = resolver().resolve(&json!({ "$ref": format!("{BASE}/service.json") }));
    assert_eq!(
        resolved["properties"]["organization"]["description"],
        json!("The organization that delivers this service.")
    );
}

#[test]
fn test_varied_locator_shapes_load_the_same_file() {
    let expected = resolver().resolve(&json!({ "$ref": "attribute.json" }));
    assert_eq!(expected["name"], json!("attribute"));

    for pattern in [
        "https://openreferraluk.org/specifications/3.0/schema/attribute.json",
        "http://localhost:3000/specifications/3.0/schema/attribute.json",
        "./schema/attribute.json",
        "attribute.json",
    ] {
        let resolved = resolver().resolve(&json!({ "$ref": pattern }));
        assert!(resolved.get("$ref").is_none(), "{pattern}");
        assert_eq!(resolved, expected, "{pattern}");
    }
}

#[test]
fn test_missing_file_fails_open() {
    let locator = format!("{BASE}/does_not_exist.json");
    let schema = json!({ "properties": { "gone": { "$ref": locator } } });

    let resolution = resolver().resolve_with_report(&schema);
    assert_eq!(resolution.document, schema);
    assert_eq!(resolution.diagnostics.len(), 1);
    assert_eq!(resolution.diagnostics[0].locator, locator);
    assert_eq!(
        resolution.diagnostics[0].kind,
        DiagnosticKind::SchemaLoadFailed {
            file: "does_not_exist.json".to_string()
        }
    );
}

#[test]
fn test_external_cycle_terminates_through_cache() {
    let resolution = resolver().resolve_with_report(&json!({ "$ref": format!("{BASE}/location.json") }));
    let location = &resolution.document;

    let sal = &location["properties"]["service_at_locations"]["items"];
    assert_eq!(sal["name"], json!("service_at_location"));
    // The way back into location.json hits the raw cached file, with the
    // sibling description laid over it.
    let mut expected = load_fixture("location.json");
    expected["description"] = json!("The location at which the service is delivered.");
    assert_eq!(sal["properties"]["location"], expected);
    assert!(resolution.diagnostics.is_empty());
    assert_eq!(resolution.resolved_refs, 2);
}

#[test]
fn test_sibling_overrides_cached_external_schema() {
    let resolution = resolver().resolve_with_report(&json!({
        "sal": { "$ref": format!("{BASE}/service_at_location.json") },
        "location": { "$ref": format!("{BASE}/location.json") }
    }));
    let doc = &resolution.document;

    let via_sal = &doc["sal"]["properties"]["location"];
    assert_eq!(
        via_sal["description"],
        json!("The location at which the service is delivered.")
    );
    assert_eq!(via_sal["name"], json!("location"));
    // The sibling must not leak into the cached copy used elsewhere.
    assert_eq!(
        doc["location"]["description"],
        load_fixture("location.json")["description"]
    );
    assert_eq!(resolution.resolved_refs, 2);
}

// ── Internal References ─────────────────────────────────────────────────────

#[test]
fn test_dangling_internal_reference_preserved() {
    let schema = json!({
        "type": "object",
        "properties": {
            "internalRef": { "$ref": "#/components/schemas/SomeSchema" },
            "externalRef": { "$ref": format!("{BASE}/attribute.json") }
        }
    });

    let resolution = resolver().resolve_with_report(&schema);
    let resolved = &resolution.document;
    assert_eq!(
        resolved["properties"]["internalRef"]["$ref"],
        json!("#/components/schemas/SomeSchema")
    );
    assert!(resolved["properties"]["externalRef"].get("$ref").is_none());
    assert_eq!(resolved["properties"]["externalRef"]["name"], json!("attribute"));
    assert_eq!(
        resolution
            .diagnostics
            .iter()
            .map(|d| d.kind.clone())
            .collect::<Vec<_>>(),
        vec![DiagnosticKind::DanglingPointer]
    );
}

#[test]
fn test_internal_json_pointer_references() {
    let schema = json!({
        "components": {
            "schemas": {
                "Person": {
                    "type": "object",
                    "properties": { "name": { "type": "string" } }
                },
                "Employee": {
                    "type": "object",
                    "properties": {
                        "person": { "$ref": "#/components/schemas/Person" },
                        "employeeId": { "type": "string" }
                    }
                }
            }
        },
        "paths": {
            "/employees": {
                "get": {
                    "responses": {
                        "200": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Employee" }
                                }
                            }
                        }
                    }
                }
            }
        }
    });

    let resolved = resolver().resolve(&schema);
    let employee =
        &resolved["paths"]["/employees"]["get"]["responses"]["200"]["content"]["application/json"]
            ["schema"];
    assert!(employee.get("$ref").is_none());
    assert!(employee["properties"]["person"].get("$ref").is_none());
    assert_eq!(employee["properties"]["person"]["type"], json!("object"));
    assert_eq!(
        employee["properties"]["person"]["properties"]["name"]["type"],
        json!("string")
    );
}

#[test]
fn test_mixed_internal_and_external_references() {
    let schema = json!({
        "components": {
            "schemas": {
                "ServiceDetails": {
                    "type": "object",
                    "properties": {
                        "attribute": { "$ref": format!("{BASE}/attribute.json") }
                    }
                }
            }
        },
        "paths": {
            "/services": {
                "get": {
                    "responses": {
                        "200": { "schema": { "$ref": "#/components/schemas/ServiceDetails" } }
                    }
                }
            }
        }
    });

    let resolved = resolver().resolve(&schema);
    let service = &resolved["paths"]["/services"]["get"]["responses"]["200"]["schema"];
    assert!(service.get("$ref").is_none());
    assert_eq!(service["type"], json!("object"));
    assert_eq!(service["properties"]["attribute"]["name"], json!("attribute"));
    assert!(remaining_refs(&resolved).is_empty());
}

#[test]
fn test_direct_cycle_preserved() {
    let schema = json!({
        "components": {
            "schemas": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "string" },
                        "children": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Node" }
                        }
                    }
                }
            }
        }
    });

    let resolution = resolver().resolve_with_report(&schema);
    assert_eq!(
        resolution.document["components"]["schemas"]["Node"]["properties"]["children"]["items"]
            ["$ref"],
        json!("#/components/schemas/Node")
    );
    assert_eq!(resolution.diagnostics[0].kind, DiagnosticKind::SelfReference);
}

#[test]
fn test_sibling_precedence_on_internal_reference() {
    let schema = json!({
        "components": {
            "schemas": {
                "Foo": { "type": "object", "description": "from Foo" }
            }
        },
        "target": { "$ref": "#/components/schemas/Foo", "description": "override" }
    });

    let resolved = resolver().resolve(&schema);
    assert_eq!(
        resolved["target"],
        json!({ "type": "object", "description": "override" })
    );
}

#[test]
fn test_identical_content_under_different_pointers_both_expand() {
    let schema = json!({
        "definitions": {
            "A": { "type": "object", "properties": { "x": { "type": "string" } } },
            "B": { "type": "object", "properties": { "x": { "type": "string" } } }
        },
        "properties": {
            "a": { "$ref": "#/definitions/A" },
            "b": { "$ref": "#/definitions/B" },
            "again": { "$ref": "#/definitions/A" }
        }
    });

    let resolution = resolver().resolve_with_report(&schema);
    let props = &resolution.document["properties"];
    let expected = json!({ "type": "object", "properties": { "x": { "type": "string" } } });
    assert_eq!(props["a"], expected);
    assert_eq!(props["b"], expected);
    assert_eq!(props["again"], expected);
    assert!(resolution.diagnostics.is_empty());
}

// ── Whole-document Properties ───────────────────────────────────────────────

#[test]
fn test_resolution_is_deterministic() {
    let schema = json!({
        "components": { "schemas": { "Service": { "$ref": format!("{BASE}/service.json") } } },
        "paths": { "/s": { "schema": { "$ref": "#/components/schemas/Service" } } }
    });

    let first = resolver().resolve(&schema);
    let second = resolver().resolve(&schema);
    assert_eq!(first, second);
}

#[test]
fn test_resolving_a_resolved_document_is_identity() {
    for schema in [
        json!({ "$ref": format!("{BASE}/service.json") }),
        json!({
            "definitions": {
                "Node": { "properties": { "next": { "$ref": "#/definitions/Node" } } }
            }
        }),
    ] {
        let once = resolver().resolve(&schema);
        let twice = resolver().resolve(&once);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_input_document_is_not_mutated() {
    let schema = json!({ "x": { "$ref": "attribute.json" } });
    let before = schema.clone();
    let _ = resolver().resolve(&schema);
    assert_eq!(schema, before);
}
