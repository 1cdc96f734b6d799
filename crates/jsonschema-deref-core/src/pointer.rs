//! JSON Pointer lookup and `$ref` scanning over `serde_json::Value` trees.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Split an internal locator (`#/a/b%20c`) into URI-decoded segments.
///
/// Returns `None` if the locator is not of the `#/` form or a segment holds
/// percent-escapes that do not decode to UTF-8.
///
/// # Example
/// ```
/// use jsonschema_deref_core::split_pointer;
/// assert_eq!(
///     split_pointer("#/paths/%2Fservices/get").unwrap(),
///     vec!["paths", "/services", "get"]
/// );
/// assert_eq!(split_pointer("#/").unwrap(), vec![""]);
/// assert!(split_pointer("components/schemas").is_none());
/// ```
pub fn split_pointer(pointer: &str) -> Option<Vec<Cow<'_, str>>> {
    let path = pointer.strip_prefix("#/")?;
    path.split('/')
        .map(|segment| percent_decode_str(segment).decode_utf8().ok())
        .collect()
}

/// Resolve an internal locator against `root`.
///
/// Objects are walked by key, arrays by canonical decimal index. A lookup that
/// steps into a primitive, misses a key, or lands on `null` yields `None`.
pub fn resolve_pointer<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in split_pointer(pointer)? {
        current = match current {
            Value::Object(obj) => obj.get(&*segment)?,
            Value::Array(arr) => {
                let idx: usize = segment.parse().ok()?;
                if idx.to_string() != segment {
                    return None;
                }
                arr.get(idx)?
            }
            _ => return None,
        };
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// `true` if any object in `node` (including `node` itself) carries a `$ref`
/// exactly equal to `locator`.
///
/// Only literal matches count. A reference reaching `locator` through another
/// pointer is not detected.
pub fn contains_ref(node: &Value, locator: &str) -> bool {
    match node {
        Value::Object(obj) => {
            obj.get("$ref").and_then(Value::as_str) == Some(locator)
                || obj.values().any(|v| contains_ref(v, locator))
        }
        Value::Array(arr) => arr.iter().any(|v| contains_ref(v, locator)),
        _ => false,
    }
}
