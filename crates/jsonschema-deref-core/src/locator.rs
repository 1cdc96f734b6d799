//! Classification of `$ref` locator strings.
//!
//! A locator is one of:
//! - **external**: contains `.json` and does not start with `#`
//!   (`https://host/schema/service.json`, `./schema/service.json`, `service.json`)
//! - **internal**: a root-relative JSON Pointer (`#/components/schemas/Foo`)
//! - **unclassified**: anything else (`#anchor`, `urn:...`), left untouched.
//!
//! Only the trailing file name of an external locator is meaningful; the
//! directory part, query and fragment are ignored when loading.

/// Kind of a `$ref` locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    External,
    Internal,
    Unclassified,
}

/// Classify a locator. External wins over internal, so `#/a.json` is
/// internal (it starts with `#`) and `a.json#/b` is external.
pub fn classify(locator: &str) -> LocatorKind {
    if is_external(locator) {
        LocatorKind::External
    } else if is_internal(locator) {
        LocatorKind::Internal
    } else {
        LocatorKind::Unclassified
    }
}

/// `true` for a reference to a separate schema file.
pub fn is_external(locator: &str) -> bool {
    locator.contains(".json") && !locator.starts_with('#')
}

/// `true` for a JSON Pointer into the root document.
pub fn is_internal(locator: &str) -> bool {
    locator.starts_with("#/")
}

/// Extract the schema file name from an external locator.
///
/// Drops any `#fragment` and `?query`, requires a `.json` suffix and returns
/// the last `/`-separated segment.
///
/// # Example
/// ```
/// use jsonschema_deref_core::extract_file_name;
/// assert_eq!(
///     extract_file_name("https://example.org/specifications/3.0/schema/service.json"),
///     Some("service.json")
/// );
/// assert_eq!(extract_file_name("service.json?v=3#/properties"), Some("service.json"));
/// assert_eq!(extract_file_name("https://example.org/service.yaml"), None);
/// ```
pub fn extract_file_name(locator: &str) -> Option<&str> {
    let before_fragment = locator.split_once('#').map_or(locator, |(head, _)| head);
    let cleaned = before_fragment
        .split_once('?')
        .map_or(before_fragment, |(head, _)| head);

    if !cleaned.ends_with(".json") {
        return None;
    }

    Some(cleaned.rsplit_once('/').map_or(cleaned, |(_, name)| name))
}
