#![no_main]

use libfuzzer_sys::fuzz_target;

// Accepts arbitrary bytes, attempts to parse as JSON, feeds to resolve().
// Goal: no panics and termination, even on cyclic or dangling refs.
fuzz_target!(|data: &[u8]| {
    if let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) {
        let schema_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../tests/schemas");
        let _ = jsonschema_deref_core::SchemaResolver::new(schema_dir).resolve(&document);
    }
});
